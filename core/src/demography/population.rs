use std::fmt;

/// A numeric id for a population, given by its declaration order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PopulationId(pub usize);

impl From<PopulationId> for usize {
    fn from(id: PopulationId) -> Self {
        id.0
    }
}

impl fmt::Display for PopulationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named population.
///
/// Sizes are diploid effective sizes at the present, and the growth rate is exponential per
/// generation, so that the size `t` generations back is `initial_size * exp(-growth_rate * t)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Population {
    name: String,
    initial_size: f64,
    growth_rate: f64,
    default_sampling_time: Option<u64>,
}

impl Population {
    /// Creates a new population with no growth, sampled at the present by default.
    pub fn new<S>(name: S, initial_size: f64) -> Self
    where
        S: ToString,
    {
        Self {
            name: name.to_string(),
            initial_size,
            growth_rate: 0.0,
            default_sampling_time: None,
        }
    }

    /// Sets the exponential growth rate.
    pub fn with_growth_rate(mut self, growth_rate: f64) -> Self {
        self.growth_rate = growth_rate;
        self
    }

    /// Sets the time in generations at which samples are taken unless requested otherwise.
    pub fn with_default_sampling_time(mut self, time: u64) -> Self {
        self.default_sampling_time = Some(time);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn initial_size(&self) -> f64 {
        self.initial_size
    }

    pub fn growth_rate(&self) -> f64 {
        self.growth_rate
    }

    pub fn default_sampling_time(&self) -> Option<u64> {
        self.default_sampling_time
    }
}
