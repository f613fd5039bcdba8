use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of template indices.
///
/// Production code uses [`ThreadRandom`]; tests inject [`FixedSequence`] or
/// [`SeededRandom`] to get reproducible picks.
pub trait RandomSource: Send {
    /// Returns an index in `0..upper`. `upper` is never zero.
    fn next_index(&mut self, upper: usize) -> usize;
}

/// Uniform picks from the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_index(&mut self, upper: usize) -> usize {
        rand::thread_rng().gen_range(0..upper)
    }
}

/// Uniform picks from a seeded generator.
#[derive(Debug, Clone)]
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn next_index(&mut self, upper: usize) -> usize {
        self.0.gen_range(0..upper)
    }
}

/// Replays a fixed list of indices, cycling when exhausted.
///
/// Values larger than the pool wrap around.
#[derive(Debug, Clone, Default)]
pub struct FixedSequence {
    indices: Vec<usize>,
    position: usize,
}

impl FixedSequence {
    pub fn new(indices: impl Into<Vec<usize>>) -> Self {
        Self {
            indices: indices.into(),
            position: 0,
        }
    }
}

impl RandomSource for FixedSequence {
    fn next_index(&mut self, upper: usize) -> usize {
        if self.indices.is_empty() {
            return 0;
        }
        let value = self.indices[self.position % self.indices.len()];
        self.position += 1;
        value % upper
    }
}
