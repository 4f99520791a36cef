//! Sample requests.

use std::fmt;

use crate::demography::Demography;

/// A number of individuals to sample from one population.
///
/// Individuals are sampled at the default sampling time of the population.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SampleSet {
    pub population: String,
    pub num_samples: usize,
    pub ploidy: usize,
}

impl SampleSet {
    pub fn new<S>(population: S, num_samples: usize, ploidy: usize) -> Self
    where
        S: ToString,
    {
        Self {
            population: population.to_string(),
            num_samples,
            ploidy,
        }
    }

    /// Returns the names of the individuals in the set, `<pop>-<pop>_<i>` for `i` in `1..=n`.
    pub fn individual_names(&self) -> impl Iterator<Item = String> + '_ {
        let population = &self.population;

        (1..=self.num_samples).map(move |i| format!("{population}-{population}_{i}"))
    }
}

/// An ordered list of sample sets.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SampleRequest(Vec<SampleSet>);

impl SampleRequest {
    /// Creates a request with the same number of individuals from each population.
    pub fn uniform<I, S>(populations: I, num_samples: usize, ploidy: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        populations
            .into_iter()
            .map(|population| SampleSet::new(population, num_samples, ploidy))
            .collect()
    }

    pub fn sets(&self) -> &[SampleSet] {
        &self.0
    }

    /// Returns the total number of individuals.
    pub fn individuals(&self) -> usize {
        self.0.iter().map(|set| set.num_samples).sum()
    }

    /// Returns the names of all individuals, in population-then-index order.
    pub fn individual_names(&self) -> Vec<String> {
        self.0.iter().flat_map(|set| set.individual_names()).collect()
    }

    /// Checks that every requested population exists in the demography.
    pub fn check(&self, demography: &Demography) -> Result<(), UnknownPopulationError> {
        match self
            .0
            .iter()
            .find(|set| demography.get_id(&set.population).is_none())
        {
            Some(set) => Err(UnknownPopulationError(set.population.clone())),
            None => Ok(()),
        }
    }
}

impl FromIterator<SampleSet> for SampleRequest {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = SampleSet>,
    {
        Self(iter.into_iter().collect())
    }
}

/// An error associated with sampling from a population not in the demography.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownPopulationError(pub String);

impl fmt::Display for UnknownPopulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot sample from unknown population '{}'", self.0)
    }
}

impl std::error::Error for UnknownPopulationError {}
