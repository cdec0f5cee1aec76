use std::sync::Arc;

use parking_lot::Mutex;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Source of all randomness used when deciding what happens to a request.
///
/// When a seed is set the sequence of draws is fully reproducible across
/// runs. Without a seed the generator is seeded from OS entropy.
#[derive(Debug, Clone)]
pub struct RandomSource {
    seed: Option<u64>,
    rng: ChaCha8Rng,
}

impl RandomSource {
    pub fn seeded(seed: u64) -> Self {
        RandomSource {
            seed: Some(seed),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        RandomSource {
            seed: None,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// Replaces the generator state. `None` reverts to non-reproducible mode.
    pub fn set_seed(&mut self, seed: Option<u64>) {
        *self = Self::new(seed);
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Draws a value in `[0, 1)`.
    pub fn next_float(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Draws an integer in `[min, max]`, both ends inclusive.
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        let span = max as f64 - min as f64 + 1.0;
        ((self.next_float() * span).floor() as i64).saturating_add(min)
    }

    /// Returns whether an event with probability `rate` happens. Rates at or
    /// below 0 never trigger and rates at or above 1 always do; neither
    /// consumes a draw.
    pub fn trigger(&mut self, rate: f64) -> bool {
        if rate <= 0.0 {
            return false;
        }
        if rate >= 1.0 {
            return true;
        }
        self.next_float() < rate
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Handle to the single random source of a run. Clones share state and
/// every access is serialized by the lock.
#[derive(Debug, Clone, Default)]
pub struct SharedRandom {
    inner: Arc<Mutex<RandomSource>>,
}

impl SharedRandom {
    pub fn new(source: RandomSource) -> Self {
        SharedRandom {
            inner: Arc::new(Mutex::new(source)),
        }
    }

    /// Runs `f` while holding the lock, so all draws made by `f` are
    /// contiguous in the sequence.
    pub fn with<R>(&self, f: impl FnOnce(&mut RandomSource) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    pub fn set_seed(&self, seed: Option<u64>) {
        self.inner.lock().set_seed(seed);
    }
}

impl From<RandomSource> for SharedRandom {
    fn from(source: RandomSource) -> Self {
        Self::new(source)
    }
}
