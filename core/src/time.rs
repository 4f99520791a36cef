//! Conversion between calendar years and generations.

/// Years per generation.
pub const GENERATION_TIME: u64 = 29;

/// Converts a time in years before present to whole generations, truncating.
pub fn years_to_generations(years: u64) -> u64 {
    years / GENERATION_TIME
}

/// Returns the size a population must have at the present so that, growing at `rate` per
/// generation, it has size `ne_0` after `generations` generations into the past.
///
/// That is, `ne_0 / exp(-rate * generations)`.
pub fn present_day_size(ne_0: f64, rate: f64, generations: u64) -> f64 {
    ne_0 / (-rate * generations as f64).exp()
}
