use crate::RandomSource;

/// Runs the timeout check, returning how long the request should hang.
pub fn check_timeout(timeout_rate: f64, timeout_ms: u64, rng: &mut RandomSource) -> Option<u64> {
    rng.trigger(timeout_rate).then_some(timeout_ms)
}
