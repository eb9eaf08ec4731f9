//! Perlin noise as a stain-outline field

use morii::SmoothField;
use noise::{NoiseFn, Perlin};

/// Samples a horizontal line through 2D Perlin noise.
///
/// The line sits off the integer lattice, where Perlin noise is always zero.
pub struct PerlinField {
    noise: Perlin,
    row: f64,
}

impl PerlinField {
    pub fn new(seed: u32) -> Self {
        Self {
            noise: Perlin::new(seed),
            row: 0.371,
        }
    }
}

impl SmoothField for PerlinField {
    fn sample(&self, t: f32) -> f32 {
        let v = self.noise.get([t as f64, self.row]);
        ((v + 1.0) / 2.0).clamp(0.0, 1.0) as f32
    }
}
