//! xorshift32 PRNG shared by the factory, integrator and audio bridge

/// Small seeded generator; every random draw in the core goes through it
#[derive(Clone, Debug)]
pub struct StainRng {
    state: u32,
}

impl StainRng {
    pub fn new(seed: u32) -> Self {
        Self {
            // xorshift never leaves zero
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        // 24 high bits keep the result strictly below 1.0
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Float in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Uniform index in `0..len`; `len` must be non-zero
    pub fn index(&mut self, len: usize) -> usize {
        let i = (self.next_f32() * len as f32) as usize;
        i.min(len.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_stays_in_bounds() {
        let mut rng = StainRng::new(42);
        for _ in 0..10_000 {
            let v = rng.range(-1.5, 1.5);
            assert!((-1.5..1.5).contains(&v));
        }
    }

    #[test]
    fn index_covers_every_slot() {
        let mut rng = StainRng::new(7);
        let mut seen = [false; 5];
        for _ in 0..1_000 {
            seen[rng.index(5)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = StainRng::new(99);
        let mut b = StainRng::new(99);
        for _ in 0..100 {
            assert_eq!(a.next_f32().to_bits(), b.next_f32().to_bits());
        }
    }

    #[test]
    fn zero_seed_is_usable() {
        let mut rng = StainRng::new(0);
        let first = rng.next_f32();
        let second = rng.next_f32();
        assert_ne!(first.to_bits(), second.to_bits());
    }
}
