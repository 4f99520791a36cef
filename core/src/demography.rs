//! Demographic models.
//!
//! A [`Demography`] is a table of named [`Population`]s together with a list of timed
//! [`Event`]s connecting them. Populations must be declared before any event can refer to them,
//! and every event is checked as it is added, so that a constructed demography is always
//! well-formed. Once all events are added, [`Demography::sort_events`] orders them by time
//! before the model is handed to a simulation engine.

use std::fmt;

use indexmap::IndexSet;

mod event;
pub use event::Event;

mod population;
pub use population::{Population, PopulationId};

/// Tolerance when checking that admixture proportions sum to one.
pub const PROPORTION_TOLERANCE: f64 = 1e-9;

/// A demographic model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Demography {
    names: IndexSet<String>,
    populations: Vec<Population>,
    events: Vec<Event>,
}

impl Demography {
    /// Creates a new, empty demography.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a new population.
    pub fn add_population(
        &mut self,
        population: Population,
    ) -> Result<PopulationId, DemographyError> {
        let name = population.name();

        if name.is_empty() {
            return Err(DemographyError::EmptyName);
        }
        if self.names.contains(name) {
            return Err(DemographyError::DuplicatePopulation {
                name: name.to_string(),
            });
        }
        let size = population.initial_size();
        if !(size.is_finite() && size > 0.0) {
            return Err(DemographyError::InvalidSize {
                name: name.to_string(),
                size,
            });
        }
        if !population.growth_rate().is_finite() {
            return Err(DemographyError::InvalidGrowthRate {
                name: name.to_string(),
                rate: population.growth_rate(),
            });
        }

        let (index, _) = self.names.insert_full(name.to_string());
        self.populations.push(population);

        Ok(PopulationId(index))
    }

    /// Adds an admixture event, creating `derived` at `time` as a mixture of `ancestral`.
    pub fn add_admixture(
        &mut self,
        time: u64,
        derived: &str,
        ancestral: &[&str],
        proportions: &[f64],
    ) -> Result<(), DemographyError> {
        let derived_id = self.lookup(derived)?;
        let ancestral_ids = ancestral
            .iter()
            .map(|name| self.lookup(name))
            .collect::<Result<Vec<_>, _>>()?;

        if ancestral_ids.is_empty() {
            return Err(DemographyError::EmptyPopulationList { event: "admixture" });
        }
        if ancestral_ids.contains(&derived_id) {
            return Err(DemographyError::SelfReference {
                name: derived.to_string(),
            });
        }
        if proportions.len() != ancestral_ids.len() {
            return Err(DemographyError::ProportionsLength {
                derived: derived.to_string(),
                expected: ancestral_ids.len(),
                found: proportions.len(),
            });
        }
        for &proportion in proportions {
            check_proportion(proportion)?;
        }
        let sum: f64 = proportions.iter().sum();
        if (sum - 1.0).abs() > PROPORTION_TOLERANCE {
            return Err(DemographyError::ProportionsSum {
                derived: derived.to_string(),
                sum,
            });
        }

        self.push_event(Event::Admixture {
            time,
            derived: derived_id,
            ancestral: ancestral_ids,
            proportions: proportions.to_vec(),
        })
    }

    /// Adds a mass migration, moving `proportion` of lineages in `source` to `dest` at `time`.
    pub fn add_mass_migration(
        &mut self,
        time: u64,
        source: &str,
        dest: &str,
        proportion: f64,
    ) -> Result<(), DemographyError> {
        let source_id = self.lookup(source)?;
        let dest_id = self.lookup(dest)?;

        if source_id == dest_id {
            return Err(DemographyError::SelfReference {
                name: source.to_string(),
            });
        }
        check_proportion(proportion)?;

        self.push_event(Event::MassMigration {
            time,
            source: source_id,
            dest: dest_id,
            proportion,
        })
    }

    /// Adds a population split, where `derived` split off from `ancestral` at `time`.
    pub fn add_population_split(
        &mut self,
        time: u64,
        derived: &[&str],
        ancestral: &str,
    ) -> Result<(), DemographyError> {
        let derived_ids = derived
            .iter()
            .map(|name| self.lookup(name))
            .collect::<Result<Vec<_>, _>>()?;
        let ancestral_id = self.lookup(ancestral)?;

        if derived_ids.is_empty() {
            return Err(DemographyError::EmptyPopulationList {
                event: "population split",
            });
        }
        if derived_ids.contains(&ancestral_id) {
            return Err(DemographyError::SelfReference {
                name: ancestral.to_string(),
            });
        }

        self.push_event(Event::PopulationSplit {
            time,
            derived: derived_ids,
            ancestral: ancestral_id,
        })
    }

    /// Sorts events by time.
    ///
    /// The sort is stable, so that events at the same time keep the order in which they were
    /// added.
    pub fn sort_events(&mut self) {
        self.events.sort_by_key(Event::time);
    }

    /// Returns `true` if events are ordered by time.
    pub fn is_sorted(&self) -> bool {
        self.events.windows(2).all(|w| w[0].time() <= w[1].time())
    }

    /// Returns the events in their current order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Returns the id of a population by name, if declared.
    pub fn get_id(&self, name: &str) -> Option<PopulationId> {
        self.names.get_index_of(name).map(PopulationId)
    }

    /// Returns the population with the provided id.
    ///
    /// # Panics
    ///
    /// Panics if the id was not handed out by this demography.
    pub fn population(&self, id: PopulationId) -> &Population {
        &self.populations[usize::from(id)]
    }

    /// Returns the populations in declaration order.
    pub fn populations(&self) -> &[Population] {
        &self.populations
    }

    fn lookup(&self, name: &str) -> Result<PopulationId, DemographyError> {
        self.get_id(name)
            .ok_or_else(|| DemographyError::UnknownPopulation {
                name: name.to_string(),
            })
    }

    fn push_event(&mut self, event: Event) -> Result<(), DemographyError> {
        for &id in event.derived() {
            if self.events.iter().any(|e| e.derived().contains(&id)) {
                return Err(DemographyError::AlreadyDerived {
                    name: self.population(id).name().to_string(),
                });
            }
        }

        log::trace!("Adding {} event at generation {}", event.kind(), event.time());

        self.events.push(event);
        Ok(())
    }
}

fn check_proportion(proportion: f64) -> Result<(), DemographyError> {
    if (0.0..=1.0).contains(&proportion) {
        Ok(())
    } else {
        Err(DemographyError::ProportionOutOfRange { proportion })
    }
}

/// An error associated with building a demography.
#[derive(Clone, Debug, PartialEq)]
pub enum DemographyError {
    /// Population declared with an empty name.
    EmptyName,
    /// Population declared twice.
    DuplicatePopulation { name: String },
    /// Population size not positive and finite.
    InvalidSize { name: String, size: f64 },
    /// Growth rate not finite.
    InvalidGrowthRate { name: String, rate: f64 },
    /// Event refers to an undeclared population.
    UnknownPopulation { name: String },
    /// Event has no ancestral (admixture) or derived (split) populations.
    EmptyPopulationList { event: &'static str },
    /// Event has the same population on both sides.
    SelfReference { name: String },
    /// Admixture with a different number of proportions than ancestral populations.
    ProportionsLength {
        derived: String,
        expected: usize,
        found: usize,
    },
    /// Proportion outside the unit interval.
    ProportionOutOfRange { proportion: f64 },
    /// Admixture proportions do not sum to one.
    ProportionsSum { derived: String, sum: f64 },
    /// Population is derived in more than one event.
    AlreadyDerived { name: String },
}

impl fmt::Display for DemographyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemographyError::EmptyName => f.write_str("population name is empty"),
            DemographyError::DuplicatePopulation { name } => {
                write!(f, "population '{name}' declared more than once")
            }
            DemographyError::InvalidSize { name, size } => {
                write!(f, "population '{name}' has invalid size {size}")
            }
            DemographyError::InvalidGrowthRate { name, rate } => {
                write!(f, "population '{name}' has invalid growth rate {rate}")
            }
            DemographyError::UnknownPopulation { name } => {
                write!(f, "population '{name}' referenced before declaration")
            }
            DemographyError::EmptyPopulationList { event } => {
                write!(f, "{event} event requires at least one population")
            }
            DemographyError::SelfReference { name } => {
                write!(f, "population '{name}' appears on both sides of an event")
            }
            DemographyError::ProportionsLength {
                derived,
                expected,
                found,
            } => write!(
                f,
                "admixture into '{derived}' has {found} proportions for {expected} ancestral populations"
            ),
            DemographyError::ProportionOutOfRange { proportion } => {
                write!(f, "proportion {proportion} not in [0, 1]")
            }
            DemographyError::ProportionsSum { derived, sum } => {
                write!(f, "admixture proportions into '{derived}' sum to {sum}, not 1")
            }
            DemographyError::AlreadyDerived { name } => {
                write!(f, "population '{name}' is derived in more than one event")
            }
        }
    }
}

impl std::error::Error for DemographyError {}
