//! Injectable source of uniform random numbers for maze generation.

use rand::{rngs::StdRng, Rng as _, SeedableRng as _};

/// Source of uniform floats in `[0, 1)`.
///
/// The generator draws exactly one value per cell per attempt, so a scripted source fully
/// determines the grid it produces.
pub trait RandomSource {
    /// Returns the next value, uniformly distributed in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl RandomSource for StdRng {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Builds the standard source, seeded when a seed is given and from OS entropy otherwise.
#[must_use]
pub fn standard_source(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}
