// src/layout/noise.rs
//
// Seeded Perlin noise used by the chaos layout.
// Sampling is pure and continuous in both inputs, so time can be fed in
// directly as the second coordinate.

use nannou::noise::{NoiseFn, Perlin, Seedable};

#[derive(Clone)]
pub struct NoiseField {
    seed: u64,
    perlin: Perlin,
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField").field("seed", &self.seed).finish()
    }
}

impl PartialEq for NoiseField {
    fn eq(&self, other: &Self) -> bool {
        self.seed == other.seed
    }
}

impl NoiseField {
    pub fn new(seed: u64) -> Self {
        // fold the high half in so seeds above u32::MAX still differ
        let folded = (seed ^ (seed >> 32)) as u32;
        Self {
            seed,
            perlin: Perlin::new().set_seed(folded),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Smooth noise in -1.0..=1.0.
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let value = self.perlin.get([x as f64, y as f64]);
        value.clamp(-1.0, 1.0) as f32
    }
}
