/// Random source used for choice entries and chance cues
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform sampling the registry relies on
pub trait RandomSource: Send {
    /// Index in `0..len`; `len` is never zero
    fn pick(&mut self, len: usize) -> usize;

    /// True with probability `p`
    fn chance(&mut self, p: f64) -> bool;
}

/// Clamp to [0, 1]; NaN counts as never
fn probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }

    fn chance(&mut self, p: f64) -> bool {
        rand::thread_rng().gen_bool(probability(p))
    }
}

/// Reproducible RNG for tests and replays
#[derive(Debug, Clone)]
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn pick(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.0.gen_bool(probability(p))
    }
}
