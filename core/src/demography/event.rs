use super::PopulationId;

/// A demographic event, with time given in generations before present.
///
/// Events are phrased backwards in time, following coalescent convention: lineages in the
/// derived populations move into the ancestral ones at the time of the event.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Derived population formed as a mixture of the ancestral populations.
    Admixture {
        time: u64,
        derived: PopulationId,
        ancestral: Vec<PopulationId>,
        proportions: Vec<f64>,
    },
    /// A fraction of lineages moves from source to dest.
    MassMigration {
        time: u64,
        source: PopulationId,
        dest: PopulationId,
        proportion: f64,
    },
    /// Derived populations split off from an ancestral population.
    PopulationSplit {
        time: u64,
        derived: Vec<PopulationId>,
        ancestral: PopulationId,
    },
}

impl Event {
    pub fn time(&self) -> u64 {
        match self {
            Event::Admixture { time, .. }
            | Event::MassMigration { time, .. }
            | Event::PopulationSplit { time, .. } => *time,
        }
    }

    /// Returns the populations that begin at this event.
    ///
    /// Mass migrations do not create populations, and so return an empty slice.
    pub fn derived(&self) -> &[PopulationId] {
        match self {
            Event::Admixture { derived, .. } => std::slice::from_ref(derived),
            Event::MassMigration { .. } => &[],
            Event::PopulationSplit { derived, .. } => derived,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Event::Admixture { .. } => "admixture",
            Event::MassMigration { .. } => "mass migration",
            Event::PopulationSplit { .. } => "population split",
        }
    }
}
