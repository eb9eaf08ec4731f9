//! Smooth pseudo-random fields used to roughen stain outlines.
//!
//! A [`SmoothField`] maps a 1D coordinate to a value in `[0, 1]` that changes
//! gradually: nearby inputs give nearby outputs. The stain generator samples
//! it at evenly spaced coordinates so neighbouring outline points wobble
//! together instead of zig-zagging.

/// A coherent noise source sampled along one axis.
///
/// Implementations must be deterministic: the same input always returns the
/// same value, and every value lies in `[0, 1]`.
pub trait SmoothField {
    fn sample(&self, t: f32) -> f32;
}

impl<F: SmoothField + ?Sized> SmoothField for &F {
    fn sample(&self, t: f32) -> f32 {
        (**self).sample(t)
    }
}

/// Octave value noise over a hashed integer lattice
#[derive(Copy, Clone, Debug)]
pub struct ValueNoise {
    seed: u32,
    octaves: u32,
    falloff: f32,
}

impl ValueNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            octaves: 4,
            falloff: 0.5,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_octaves(mut self, octaves: u32, falloff: f32) -> Self {
        self.octaves = octaves.max(1);
        self.falloff = falloff.clamp(0.0, 1.0);
        self
    }

    fn lattice(&self, octave: u32, i: i32) -> f32 {
        let h = hash32((i as u32) ^ self.seed.rotate_left(octave * 7) ^ octave.wrapping_mul(0x27D4_EB2D));
        (h >> 8) as f32 / (1u32 << 24) as f32
    }

    fn octave(&self, octave: u32, t: f32) -> f32 {
        let cell = libm::floorf(t);
        let frac = t - cell;
        let i = cell as i32;
        let a = self.lattice(octave, i);
        let b = self.lattice(octave, i.wrapping_add(1));
        // smoothstep keeps the slope continuous across cells
        let s = frac * frac * (3.0 - 2.0 * frac);
        a + (b - a) * s
    }
}

impl SmoothField for ValueNoise {
    fn sample(&self, t: f32) -> f32 {
        let mut total = 0.0;
        let mut weight = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        for octave in 0..self.octaves {
            total += self.octave(octave, t * frequency) * amplitude;
            weight += amplitude;
            amplitude *= self.falloff;
            frequency *= 2.0;
        }
        if weight <= 0.0 {
            return 0.5;
        }
        (total / weight).clamp(0.0, 1.0)
    }
}

/// Field that always returns the same value
#[cfg(test)]
#[derive(Copy, Clone, Debug)]
pub struct FlatField(pub f32);

#[cfg(test)]
impl SmoothField for FlatField {
    fn sample(&self, _t: f32) -> f32 {
        self.0.clamp(0.0, 1.0)
    }
}

fn hash32(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7FEB_352D);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846C_A68B);
    x ^= x >> 16;
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_stay_in_unit_range() {
        let field = ValueNoise::new(1234);
        for i in 0..2_000 {
            let v = field.sample(i as f32 * 0.137 - 50.0);
            assert!((0.0..=1.0).contains(&v), "{v}");
        }
    }

    #[test]
    fn deterministic_for_seed() {
        let a = ValueNoise::new(5);
        let b = ValueNoise::new(5);
        for i in 0..50 {
            let t = i as f32 * 0.5;
            assert_eq!(a.sample(t).to_bits(), b.sample(t).to_bits());
        }
    }

    #[test]
    fn neighbours_are_close() {
        // Single octave: slope of smoothstep is at most 1.5 per unit
        let field = ValueNoise::new(77).with_octaves(1, 0.5);
        for i in 0..500 {
            let t = i as f32 * 0.01;
            let d = (field.sample(t + 0.01) - field.sample(t)).abs();
            assert!(d <= 0.016, "jump of {d} at {t}");
        }
    }

    #[test]
    fn flat_field_clamps() {
        assert_eq!(FlatField(2.0).sample(3.0), 1.0);
        assert_eq!(FlatField(0.25).sample(-8.0), 0.25);
    }
}
