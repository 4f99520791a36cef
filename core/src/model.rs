//! The hub model of Eurasian population history.
//!
//! African and out-of-Africa populations follow Gravel et al. (2011). After the out-of-Africa
//! bottleneck, an Asian hub gives rise to basal Eastern Eurasians (BEA), Eastern Eurasians
//! (EEA), and two waves of Western Eurasians (WEA, WEA2), the first of which leaves the hub at a
//! time controlled by the [`Departure`]. Ancient individuals (UST, KOS, TIA, SUN, AR) are
//! sampled along the way, and a cascade of admixed populations models two pulses of gene flow
//! into the Western Eurasians.
//!
//! The model is expressed as three declarative tables ([`POPULATIONS`], [`ADMIXTURES`], and
//! [`LINEAGE_EVENTS`]), with times and sizes referring to named [`Epoch`]s and [`Size`]s that
//! are resolved by [`Parameters`].

use std::fmt;

use crate::{
    demography::{Demography, DemographyError, Population},
    sample::SampleRequest,
    time::{present_day_size, years_to_generations},
};

mod tables;
pub use tables::{
    AdmixtureRow, LineageEvent, LineageRow, PopulationRow, ADMIXTURES, LINEAGE_EVENTS,
    POPULATIONS, SAMPLED_POPULATIONS,
};

/// Number of diploid individuals sampled from each population.
pub const SAMPLES_PER_POPULATION: usize = 10;

/// Ploidy of sampled individuals.
pub const PLOIDY: usize = 2;

/// The time at which the first wave of Western Eurasians leaves the hub.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Departure {
    /// One of the documented experiment variants.
    Variant(Variant),
    /// Years before present.
    Years(u64),
}

impl Departure {
    /// Returns the departure in years before present.
    pub fn years(&self) -> u64 {
        match self {
            Departure::Variant(variant) => variant.years(),
            Departure::Years(years) => *years,
        }
    }
}

impl From<Variant> for Departure {
    fn from(variant: Variant) -> Self {
        Self::Variant(variant)
    }
}

/// Documented experiment variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Variant {
    /// Departure 43,000 years ago.
    A,
    /// Departure 42,000 years ago.
    B,
    /// Departure 41,000 years ago.
    C,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::A, Variant::B, Variant::C];

    pub fn years(&self) -> u64 {
        match self {
            Variant::A => 43_000,
            Variant::B => 42_000,
            Variant::C => 41_000,
        }
    }
}

/// A named point in time of the model.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Epoch {
    AmhSample,
    Afr1Split,
    Afr2Split,
    Afr3Split,
    OoaSplit,
    BeaSplit,
    WeaEeaSplit,
    Wea2Split,
    WeaSplit,
    UstSample,
    UstSplit,
    TiaSample,
    TiaSplit,
    ArSample,
    ArSplit,
    KosSample,
    KosSplit,
    SunSample,
    SunSplit,
    /// Gene flow from BEA into Western Eurasians.
    Bea2Wea,
    /// Gene flow from EEA into the admixed Western Eurasians.
    Adm2,
}

/// A named population size of the model.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Size {
    Amh,
    Afr,
    Ooa,
    Bea,
    Eea,
    Wea,
    Ancient,
}

/// A named growth rate of the model.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Growth {
    None,
    Bea,
    Eea,
    Wea,
}

/// The default sampling time of a population.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Sampling {
    /// Sampled at the present.
    Present,
    /// Sampled at the epoch.
    At(Epoch),
    /// Sampled one generation before the epoch.
    Before(Epoch),
}

// Ne values from Gravel et al. (2011)
const NE_AMH: f64 = 7300.;
const NE_AFR: f64 = 14474.;
const NE_OOA: f64 = 1861.;
const NE_BEA_0: f64 = 500.;
const NE_WEA_0: f64 = 1032.;
const NE_EEA_0: f64 = 550.;
const NE_ANCIENT: f64 = 600.;

// Growth rates of Gravel et al. (2011), rescaled so the final sizes match
const R_WEA: f64 = 0.00232;
const R_EEA: f64 = 0.00319;
const R_BEA: f64 = R_WEA;

/// Resolved times and sizes of the model.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameters {
    departure: Departure,
    wea_split: u64,
    ne_bea: f64,
    ne_eea: f64,
    ne_wea: f64,
}

impl Parameters {
    /// Resolves the model parameters for a departure time.
    ///
    /// The departure must fall strictly between the second Western Eurasian split and the
    /// Western/Eastern Eurasian split, once converted to generations.
    pub fn new<D>(departure: D) -> Result<Self, ModelError>
    where
        D: Into<Departure>,
    {
        let departure = departure.into();
        let wea_split = years_to_generations(departure.years());

        let lower = split_time(Epoch::Wea2Split);
        let upper = split_time(Epoch::WeaEeaSplit);
        if !(lower < wea_split && wea_split < upper) {
            return Err(ModelError::Departure {
                years: departure.years(),
                generations: wea_split,
                lower,
                upper,
            });
        }

        let ne_eea_wea_t = split_time(Epoch::WeaEeaSplit);
        let ne_bea_t = split_time(Epoch::BeaSplit);

        Ok(Self {
            departure,
            wea_split,
            ne_bea: present_day_size(NE_BEA_0, R_BEA, ne_bea_t),
            ne_eea: present_day_size(NE_EEA_0, R_EEA, ne_eea_wea_t),
            ne_wea: present_day_size(NE_WEA_0, R_WEA, ne_eea_wea_t),
        })
    }

    pub fn departure(&self) -> Departure {
        self.departure
    }

    /// Returns the time of an epoch in generations.
    pub fn generations(&self, epoch: Epoch) -> u64 {
        match epoch {
            Epoch::WeaSplit => self.wea_split,
            epoch => split_time(epoch),
        }
    }

    /// Returns a population size.
    pub fn size(&self, size: Size) -> f64 {
        match size {
            Size::Amh => NE_AMH,
            Size::Afr => NE_AFR,
            Size::Ooa => NE_OOA,
            Size::Bea => self.ne_bea,
            Size::Eea => self.ne_eea,
            Size::Wea => self.ne_wea,
            Size::Ancient => NE_ANCIENT,
        }
    }

    /// Returns the size a population had at the start of its growth.
    pub fn base_size(&self, size: Size) -> f64 {
        match size {
            Size::Bea => NE_BEA_0,
            Size::Eea => NE_EEA_0,
            Size::Wea => NE_WEA_0,
            size => self.size(size),
        }
    }

    pub fn growth_rate(&self, growth: Growth) -> f64 {
        match growth {
            Growth::None => 0.0,
            Growth::Bea => R_BEA,
            Growth::Eea => R_EEA,
            Growth::Wea => R_WEA,
        }
    }

    pub fn sampling_time(&self, sampling: Sampling) -> Option<u64> {
        match sampling {
            Sampling::Present => None,
            Sampling::At(epoch) => Some(self.generations(epoch)),
            Sampling::Before(epoch) => Some(self.generations(epoch) + 1),
        }
    }
}

// All epochs except the free departure time, in generations.
fn split_time(epoch: Epoch) -> u64 {
    let years = match epoch {
        Epoch::AmhSample => 200_000,
        Epoch::Afr1Split => 172_000,
        Epoch::Afr2Split => 100_000,
        Epoch::Afr3Split => 65_000,
        Epoch::OoaSplit => 60_000,
        Epoch::BeaSplit => 57_500,
        Epoch::WeaEeaSplit | Epoch::UstSplit => 46_000,
        Epoch::Wea2Split => 40_000,
        Epoch::UstSample => 44_377,
        Epoch::TiaSample => 39_565,
        Epoch::ArSample => 33_592,
        Epoch::KosSample => 38_052,
        Epoch::SunSample => 34_170,
        Epoch::Bea2Wea => 25_000,
        Epoch::Adm2 => 10_000,
        // Offsets from sampling times given directly in generations
        Epoch::TiaSplit => return split_time(Epoch::TiaSample) + 34,
        Epoch::ArSplit => return split_time(Epoch::TiaSample) + 10,
        Epoch::KosSplit => return split_time(Epoch::KosSample) + 34,
        Epoch::SunSplit => return split_time(Epoch::KosSample) + 10,
        // Has no fixed value, callers go through `Parameters::generations`
        Epoch::WeaSplit => unreachable!("departure time depends on parameters"),
    };

    years_to_generations(years)
}

/// Builds the hub model demography, with events sorted by time.
pub fn build(parameters: &Parameters) -> Result<Demography, DemographyError> {
    let mut demography = Demography::new();

    for row in POPULATIONS {
        let mut population = Population::new(row.name, parameters.size(row.size))
            .with_growth_rate(parameters.growth_rate(row.growth));
        if let Some(time) = parameters.sampling_time(row.sampling) {
            population = population.with_default_sampling_time(time);
        }
        demography.add_population(population)?;
    }

    for row in ADMIXTURES {
        demography.add_admixture(
            parameters.generations(row.epoch),
            row.derived,
            &row.ancestral,
            &row.proportions,
        )?;
    }

    for row in LINEAGE_EVENTS {
        let time = parameters.generations(row.epoch);
        match row.event {
            LineageEvent::MassMigration { source, dest } => {
                demography.add_mass_migration(time, source, dest, 1.0)?
            }
            LineageEvent::Split { derived, ancestral } => {
                demography.add_population_split(time, derived, ancestral)?
            }
        }
    }

    demography.sort_events();

    log::debug!(
        "Built hub model with {} populations and {} events",
        demography.populations().len(),
        demography.events().len()
    );

    Ok(demography)
}

/// Returns the sample request of the hub model.
pub fn samples() -> SampleRequest {
    SampleRequest::uniform(SAMPLED_POPULATIONS, SAMPLES_PER_POPULATION, PLOIDY)
}

/// An error associated with the hub model parameters.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ModelError {
    /// Departure outside the admissible range, given in generations.
    Departure {
        years: u64,
        generations: u64,
        lower: u64,
        upper: u64,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Departure {
                years,
                generations,
                lower,
                upper,
            } => write!(
                f,
                "departure {years} years ago ({generations} generations) must fall strictly \
                between {lower} and {upper} generations"
            ),
        }
    }
}

impl std::error::Error for ModelError {}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    use crate::demography::Event;

    fn build_variant(variant: Variant) -> Demography {
        let parameters = Parameters::new(variant).unwrap();
        build(&parameters).unwrap()
    }

    #[test]
    fn test_variant_departures() {
        let generations = Variant::ALL
            .iter()
            .map(|&v| Parameters::new(v).unwrap().generations(Epoch::WeaSplit))
            .collect::<Vec<_>>();

        assert_eq!(generations, [1482, 1448, 1413]);
    }

    #[test]
    fn test_epochs_are_floored_years() {
        let parameters = Parameters::new(Variant::A).unwrap();

        for (epoch, years) in [
            (Epoch::AmhSample, 200_000),
            (Epoch::Afr1Split, 172_000),
            (Epoch::Afr2Split, 100_000),
            (Epoch::Afr3Split, 65_000),
            (Epoch::OoaSplit, 60_000),
            (Epoch::BeaSplit, 57_500),
            (Epoch::WeaEeaSplit, 46_000),
            (Epoch::UstSplit, 46_000),
            (Epoch::Wea2Split, 40_000),
            (Epoch::WeaSplit, 43_000),
            (Epoch::UstSample, 44_377),
            (Epoch::TiaSample, 39_565),
            (Epoch::ArSample, 33_592),
            (Epoch::KosSample, 38_052),
            (Epoch::SunSample, 34_170),
            (Epoch::Bea2Wea, 25_000),
            (Epoch::Adm2, 10_000),
        ] {
            assert_eq!(parameters.generations(epoch), years / 29, "{epoch:?}");
        }
    }

    #[test]
    fn test_offset_epochs() {
        let parameters = Parameters::new(Variant::B).unwrap();

        assert_eq!(parameters.generations(Epoch::TiaSplit), 1364 + 34);
        assert_eq!(parameters.generations(Epoch::ArSplit), 1364 + 10);
        assert_eq!(parameters.generations(Epoch::KosSplit), 1312 + 34);
        assert_eq!(parameters.generations(Epoch::SunSplit), 1312 + 10);
    }

    #[test]
    fn test_departure_out_of_range() {
        assert!(matches!(
            Parameters::new(Departure::Years(40_000)),
            Err(ModelError::Departure {
                lower: 1379,
                upper: 1586,
                ..
            })
        ));
        assert!(Parameters::new(Departure::Years(46_000)).is_err());
        assert!(Parameters::new(Departure::Years(45_000)).is_ok());
    }

    #[test]
    fn test_rescaled_sizes_round_trip() {
        let parameters = Parameters::new(Variant::A).unwrap();

        for (size, growth, epoch) in [
            (Size::Wea, Growth::Wea, Epoch::WeaEeaSplit),
            (Size::Eea, Growth::Eea, Epoch::WeaEeaSplit),
            (Size::Bea, Growth::Bea, Epoch::BeaSplit),
        ] {
            let ne = parameters.size(size);
            let r = parameters.growth_rate(growth);
            let t = parameters.generations(epoch) as f64;

            assert_approx_eq!(ne * (-r * t).exp(), parameters.base_size(size), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_table_sizes() {
        assert_eq!(POPULATIONS.len(), 37);
        assert_eq!(ADMIXTURES.len(), 20);
        assert_eq!(LINEAGE_EVENTS.len(), 13);
        assert_eq!(SAMPLED_POPULATIONS.len(), 29);
    }

    #[test]
    fn test_admixture_proportions_sum_to_one() {
        for row in ADMIXTURES {
            assert_approx_eq!(row.proportions.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_events_only_reference_declared_populations() {
        let declared = POPULATIONS.iter().map(|row| row.name).collect::<HashSet<_>>();

        for row in ADMIXTURES {
            assert!(declared.contains(row.derived), "{}", row.derived);
            for name in row.ancestral {
                assert!(declared.contains(name), "{name}");
            }
        }

        for row in LINEAGE_EVENTS {
            let names = match row.event {
                LineageEvent::MassMigration { source, dest } => vec![source, dest],
                LineageEvent::Split { derived, ancestral } => {
                    derived.iter().copied().chain([ancestral]).collect()
                }
            };
            for name in names {
                assert!(declared.contains(name), "{name}");
            }
        }

        for name in SAMPLED_POPULATIONS {
            assert!(declared.contains(name), "{name}");
        }
    }

    #[test]
    fn test_build_all_variants() {
        for variant in Variant::ALL {
            let demography = build_variant(variant);

            assert_eq!(demography.populations().len(), 37);
            assert_eq!(demography.events().len(), 33);
            assert!(demography.is_sorted());
        }
    }

    #[test]
    fn test_build_event_order() {
        let demography = build_variant(Variant::A);
        let events = demography.events();

        let first = events.first().unwrap();
        let last = events.last().unwrap();

        assert_eq!(first.time(), 344);
        assert!(matches!(first, Event::Admixture { .. }));
        assert_eq!(last.time(), 5931);
        assert!(matches!(last, Event::PopulationSplit { .. }));

        // Splits at the same time keep declaration order
        let hub = demography.get_id("HUB").unwrap();
        let tied = events
            .iter()
            .filter(|e| e.time() == 1586)
            .collect::<Vec<_>>();
        assert_eq!(tied.len(), 2);
        assert_eq!(
            tied[0],
            &Event::PopulationSplit {
                time: 1586,
                derived: vec![
                    demography.get_id("HUB_WEA").unwrap(),
                    demography.get_id("EEA").unwrap()
                ],
                ancestral: hub,
            }
        );
        assert_eq!(
            tied[1],
            &Event::PopulationSplit {
                time: 1586,
                derived: vec![demography.get_id("UST").unwrap()],
                ancestral: hub,
            }
        );
    }

    #[test]
    fn test_build_population_attributes() {
        let parameters = Parameters::new(Variant::C).unwrap();
        let demography = build(&parameters).unwrap();

        let amh = demography.population(demography.get_id("AMH").unwrap());
        assert_eq!(amh.initial_size(), 7300.);
        assert_eq!(amh.default_sampling_time(), Some(6896));

        let hub = demography.population(demography.get_id("HUB").unwrap());
        assert_eq!(hub.default_sampling_time(), Some(1587));

        let bea = demography.population(demography.get_id("BEA").unwrap());
        assert_eq!(bea.growth_rate(), 0.00232);
        assert_eq!(bea.default_sampling_time(), Some(863));
        assert_eq!(bea.initial_size(), parameters.size(Size::Bea));

        let mixed = demography.population(demography.get_id("WEA2_EEA_b").unwrap());
        assert_eq!(mixed.initial_size(), parameters.size(Size::Eea));
        assert_eq!(mixed.growth_rate(), 0.00319);
        assert_eq!(mixed.default_sampling_time(), None);
    }

    #[test]
    fn test_samples() {
        let samples = samples();

        assert_eq!(samples.sets().len(), 29);
        assert_eq!(samples.individual_names().len(), 290);
    }
}
