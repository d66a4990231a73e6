//! Randomness used by the audit controller

use rand::Rng;

pub trait RandomSource {
    /// A uniform draw in `[0, 1)`
    fn next_f64(&mut self) -> f64;

    /// A uniform index in `0..len`. `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Backed by the thread-local generator
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&mut self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }

    fn pick_index(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Replays fixed values, for deterministic tests
///
/// Draws cycle through `draws`; picks always return `index` clamped to the
/// available range.
#[derive(Debug, Clone)]
pub struct FixedRandom {
    draws: Vec<f64>,
    position: usize,
    index: usize,
}

impl FixedRandom {
    pub fn new(draws: Vec<f64>, index: usize) -> Self {
        Self {
            draws,
            position: 0,
            index,
        }
    }

    /// Every draw returns `value`
    pub fn always(value: f64) -> Self {
        Self::new(vec![value], 0)
    }
}

impl RandomSource for FixedRandom {
    fn next_f64(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let value = self.draws[self.position % self.draws.len()];
        self.position += 1;
        value
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.index.min(len.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_random_in_range() {
        let mut rng = ThreadRandom;
        for _ in 0..100 {
            let value = rng.next_f64();
            assert!((0.0..1.0).contains(&value));
            assert!(rng.pick_index(3) < 3);
        }
    }

    #[test]
    fn test_fixed_random_cycles() {
        let mut rng = FixedRandom::new(vec![0.05, 0.9], 7);
        assert_eq!(rng.next_f64(), 0.05);
        assert_eq!(rng.next_f64(), 0.9);
        assert_eq!(rng.next_f64(), 0.05);
        assert_eq!(rng.pick_index(2), 1);
    }
}
