use crate::RandomSource;

/// Computes how long to hold a request: `latency_ms` plus a symmetric
/// variance of up to `jitter_ms`, never below zero.
///
/// With both inputs at zero no draw is made, so a run without latency does
/// not shift the random sequence.
pub fn compute_delay(latency_ms: u64, jitter_ms: u64, rng: &mut RandomSource) -> u64 {
    if latency_ms == 0 && jitter_ms == 0 {
        return 0;
    }

    let jitter = i64::try_from(jitter_ms).unwrap_or(i64::MAX);
    let variance = if jitter > 0 {
        rng.next_int(-jitter, jitter)
    } else {
        0
    };
    let base = i64::try_from(latency_ms).unwrap_or(i64::MAX);

    u64::try_from(base.saturating_add(variance).max(0)).unwrap_or(0)
}
