//! The source of randomness used to seed new particles.
//!
//! Any `rand` generator works, so hosts normally pass a seeded `StdRng`. Tests can also script
//! the exact values they want.

use rand::Rng as _;

/// Uniform values in `[0, 1)` and random signs.
pub trait RandomSource {
    /// A uniformly distributed value in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Either `1.0` or `-1.0`, with equal probability.
    fn sign(&mut self) -> f64;
}

impl<R: rand::RngCore> RandomSource for R {
    fn unit(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn sign(&mut self) -> f64 {
        if self.gen::<bool>() {
            1.0
        } else {
            -1.0
        }
    }
}
