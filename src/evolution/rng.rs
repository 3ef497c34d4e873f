//! Seedable random source shared by all stochastic recipe operations.

use rand::prelude::*;

/// Random number generator wrapper for recipe operations.
///
/// Every sampling step (mutation, crossover pivot, parent selection) draws
/// from an explicit `RecipeRng`, so a fixed seed reproduces a whole run.
#[derive(Debug, Clone)]
pub struct RecipeRng {
    rng: StdRng,
}

impl RecipeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Generate next u64 for seeding child RNGs.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }

    /// Derive an independent child generator.
    pub fn child(&mut self) -> Self {
        Self::new(self.next_seed())
    }
}

impl RngCore for RecipeRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}
