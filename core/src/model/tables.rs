//! Declarative tables of the hub model, in declaration order.

use super::{Epoch, Growth, Sampling, Size};

/// A population declaration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopulationRow {
    pub name: &'static str,
    pub size: Size,
    pub growth: Growth,
    pub sampling: Sampling,
}

/// A two-way admixture event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdmixtureRow {
    pub epoch: Epoch,
    pub derived: &'static str,
    pub ancestral: [&'static str; 2],
    pub proportions: [f64; 2],
}

/// A split or a complete mass migration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineageEvent {
    MassMigration {
        source: &'static str,
        dest: &'static str,
    },
    Split {
        derived: &'static [&'static str],
        ancestral: &'static str,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineageRow {
    pub epoch: Epoch,
    pub event: LineageEvent,
}

const fn population(
    name: &'static str,
    size: Size,
    growth: Growth,
    sampling: Sampling,
) -> PopulationRow {
    PopulationRow {
        name,
        size,
        growth,
        sampling,
    }
}

const fn admixture(
    epoch: Epoch,
    derived: &'static str,
    ancestral: [&'static str; 2],
    proportions: [f64; 2],
) -> AdmixtureRow {
    AdmixtureRow {
        epoch,
        derived,
        ancestral,
        proportions,
    }
}

const fn migration(epoch: Epoch, source: &'static str, dest: &'static str) -> LineageRow {
    LineageRow {
        epoch,
        event: LineageEvent::MassMigration { source, dest },
    }
}

const fn split(
    epoch: Epoch,
    derived: &'static [&'static str],
    ancestral: &'static str,
) -> LineageRow {
    LineageRow {
        epoch,
        event: LineageEvent::Split { derived, ancestral },
    }
}

pub const POPULATIONS: &[PopulationRow] = &[
    population("AMH", Size::Amh, Growth::None, Sampling::At(Epoch::AmhSample)),
    population("AFR1", Size::Afr, Growth::None, Sampling::Present),
    population("AFR2", Size::Afr, Growth::None, Sampling::Present),
    population("AFR3", Size::Afr, Growth::None, Sampling::Present),
    population("OOA", Size::Ooa, Growth::None, Sampling::Present),
    population("HUB", Size::Ooa, Growth::None, Sampling::Before(Epoch::WeaEeaSplit)),
    population("HUB_WEA", Size::Ooa, Growth::None, Sampling::Present),
    population("HUB_WEA2", Size::Ooa, Growth::None, Sampling::Present),
    population("BEA", Size::Bea, Growth::Bea, Sampling::Before(Epoch::Bea2Wea)),
    population("EEA", Size::Eea, Growth::Eea, Sampling::Present),
    population("WEA", Size::Wea, Growth::Wea, Sampling::Before(Epoch::Bea2Wea)),
    population("WEA2", Size::Wea, Growth::Wea, Sampling::Before(Epoch::Bea2Wea)),
    population("UST", Size::Ancient, Growth::None, Sampling::At(Epoch::UstSample)),
    population("KOS", Size::Ancient, Growth::None, Sampling::At(Epoch::KosSample)),
    population("TIA", Size::Ancient, Growth::None, Sampling::At(Epoch::TiaSample)),
    population("SUN", Size::Ancient, Growth::None, Sampling::At(Epoch::SunSample)),
    population("AR", Size::Ancient, Growth::None, Sampling::At(Epoch::ArSample)),
    population("WEA_BEA_a", Size::Wea, Growth::Wea, Sampling::Present),
    population("WEA_BEA_b", Size::Wea, Growth::Wea, Sampling::Present),
    population("WEA_BEA_c", Size::Wea, Growth::Wea, Sampling::Present),
    population("WEA_EEA_a", Size::Wea, Growth::Wea, Sampling::Present),
    population("WEA_EEA_b", Size::Eea, Growth::Eea, Sampling::Present),
    population("WEA_EEA_c", Size::Eea, Growth::Eea, Sampling::Present),
    population("WEA_BEA_EEA_a", Size::Wea, Growth::Wea, Sampling::Present),
    population("WEA_BEA_EEA_b", Size::Wea, Growth::Wea, Sampling::Present),
    population("WEA_BEA_EEA_c", Size::Wea, Growth::Wea, Sampling::Present),
    population("WEA_BEA_EEA_d", Size::Wea, Growth::Wea, Sampling::Present),
    population("WEA2_BEA_a", Size::Wea, Growth::Wea, Sampling::Present),
    population("WEA2_BEA_b", Size::Wea, Growth::Wea, Sampling::Present),
    population("WEA2_BEA_c", Size::Wea, Growth::Wea, Sampling::Present),
    population("WEA2_EEA_a", Size::Wea, Growth::Wea, Sampling::Present),
    population("WEA2_EEA_b", Size::Eea, Growth::Eea, Sampling::Present),
    population("WEA2_EEA_c", Size::Eea, Growth::Eea, Sampling::Present),
    population("WEA2_BEA_EEA_a", Size::Wea, Growth::Wea, Sampling::Present),
    population("WEA2_BEA_EEA_b", Size::Wea, Growth::Wea, Sampling::Present),
    population("WEA2_BEA_EEA_c", Size::Wea, Growth::Wea, Sampling::Present),
    population("WEA2_BEA_EEA_d", Size::Wea, Growth::Wea, Sampling::Present),
];

/// The admixture cascade. Each pulse creates a separate population, so that every mixture
/// proportion can be sampled on its own.
pub const ADMIXTURES: &[AdmixtureRow] = &[
    admixture(Epoch::Adm2, "WEA_BEA_EEA_a", ["WEA_BEA_a", "EEA"], [0.90, 0.10]),
    admixture(Epoch::Adm2, "WEA_BEA_EEA_b", ["WEA_BEA_a", "EEA"], [0.80, 0.20]),
    admixture(Epoch::Adm2, "WEA_BEA_EEA_c", ["WEA_BEA_b", "EEA"], [0.90, 0.10]),
    admixture(Epoch::Adm2, "WEA_BEA_EEA_d", ["WEA_BEA_b", "EEA"], [0.80, 0.20]),
    admixture(Epoch::Bea2Wea, "WEA_BEA_a", ["WEA", "BEA"], [0.90, 0.10]),
    admixture(Epoch::Bea2Wea, "WEA_BEA_b", ["WEA", "BEA"], [0.80, 0.20]),
    admixture(Epoch::Bea2Wea, "WEA_BEA_c", ["WEA", "BEA"], [0.70, 0.30]),
    admixture(Epoch::Bea2Wea, "WEA_EEA_a", ["WEA", "EEA"], [0.75, 0.25]),
    admixture(Epoch::Bea2Wea, "WEA_EEA_b", ["WEA", "EEA"], [0.5, 0.5]),
    admixture(Epoch::Bea2Wea, "WEA_EEA_c", ["WEA", "EEA"], [0.25, 0.75]),
    admixture(Epoch::Adm2, "WEA2_BEA_EEA_a", ["WEA2_BEA_a", "EEA"], [0.90, 0.10]),
    admixture(Epoch::Adm2, "WEA2_BEA_EEA_b", ["WEA2_BEA_a", "EEA"], [0.80, 0.20]),
    admixture(Epoch::Adm2, "WEA2_BEA_EEA_c", ["WEA2_BEA_b", "EEA"], [0.90, 0.10]),
    admixture(Epoch::Adm2, "WEA2_BEA_EEA_d", ["WEA2_BEA_b", "EEA"], [0.80, 0.20]),
    admixture(Epoch::Bea2Wea, "WEA2_BEA_a", ["WEA2", "BEA"], [0.90, 0.10]),
    admixture(Epoch::Bea2Wea, "WEA2_BEA_b", ["WEA2", "BEA"], [0.80, 0.20]),
    admixture(Epoch::Bea2Wea, "WEA2_BEA_c", ["WEA2", "BEA"], [0.70, 0.30]),
    admixture(Epoch::Bea2Wea, "WEA2_EEA_a", ["WEA2", "EEA"], [0.75, 0.25]),
    admixture(Epoch::Bea2Wea, "WEA2_EEA_b", ["WEA2", "EEA"], [0.5, 0.5]),
    admixture(Epoch::Bea2Wea, "WEA2_EEA_c", ["WEA2", "EEA"], [0.25, 0.75]),
];

pub const LINEAGE_EVENTS: &[LineageRow] = &[
    migration(Epoch::SunSplit, "SUN", "KOS"),
    migration(Epoch::ArSplit, "AR", "TIA"),
    migration(Epoch::KosSplit, "KOS", "WEA"),
    migration(Epoch::TiaSplit, "TIA", "EEA"),
    split(Epoch::WeaSplit, &["HUB_WEA2", "WEA"], "HUB_WEA"),
    split(Epoch::Wea2Split, &["WEA2"], "HUB_WEA2"),
    split(Epoch::WeaEeaSplit, &["HUB_WEA", "EEA"], "HUB"),
    split(Epoch::UstSplit, &["UST"], "HUB"),
    split(Epoch::BeaSplit, &["HUB", "BEA"], "OOA"),
    migration(Epoch::OoaSplit, "OOA", "AFR3"),
    migration(Epoch::Afr3Split, "AFR3", "AFR2"),
    migration(Epoch::Afr2Split, "AFR2", "AFR1"),
    split(Epoch::Afr1Split, &["AFR1"], "AMH"),
];

/// Populations sampled for the output, in column order.
pub const SAMPLED_POPULATIONS: &[&str] = &[
    "AMH",
    "KOS",
    "TIA",
    "UST",
    "SUN",
    "AFR3",
    "EEA",
    "WEA",
    "WEA2",
    "WEA_EEA_a",
    "WEA_EEA_b",
    "WEA_EEA_c",
    "WEA_BEA_a",
    "WEA_BEA_b",
    "WEA_BEA_c",
    "WEA_BEA_EEA_a",
    "WEA_BEA_EEA_b",
    "WEA_BEA_EEA_c",
    "WEA_BEA_EEA_d",
    "WEA2_EEA_a",
    "WEA2_EEA_b",
    "WEA2_EEA_c",
    "WEA2_BEA_a",
    "WEA2_BEA_b",
    "WEA2_BEA_c",
    "WEA2_BEA_EEA_a",
    "WEA2_BEA_EEA_b",
    "WEA2_BEA_EEA_c",
    "WEA2_BEA_EEA_d",
];
