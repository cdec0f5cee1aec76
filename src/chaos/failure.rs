use crate::RandomSource;

/// Marker carried by every injected failure message.
pub const CHAOS_PREFIX: &str = "[laggy chaos]";

/// Codes used when a configuration provides none.
pub const DEFAULT_FAIL_CODES: [u16; 3] = [500, 502, 503];

/// Returns whether `message` came from an injected failure.
pub fn is_injected(message: &str) -> bool {
    message.starts_with(CHAOS_PREFIX)
}

pub fn status_reason(status: u16) -> String {
    match status {
        500 => "Internal Server Error".to_owned(),
        502 => "Bad Gateway".to_owned(),
        503 => "Service Unavailable".to_owned(),
        504 => "Gateway Timeout".to_owned(),
        other => format!("HTTP Error {other}"),
    }
}

/// Runs the failure check. On a hit, picks one of `fail_codes` uniformly and
/// returns it with its message.
pub fn check_failure(
    fail_rate: f64,
    fail_codes: &[u16],
    rng: &mut RandomSource,
) -> Option<(u16, String)> {
    if !rng.trigger(fail_rate) {
        return None;
    }

    let codes = if fail_codes.is_empty() {
        &DEFAULT_FAIL_CODES[..]
    } else {
        fail_codes
    };
    let idx = rng.next_int(0, codes.len() as i64 - 1);
    let status = codes[usize::try_from(idx).unwrap_or(0).min(codes.len() - 1)];

    Some((status, failure_message(status)))
}

fn failure_message(status: u16) -> String {
    if status == 0 {
        return format!("{CHAOS_PREFIX} Network error: simulated offline");
    }
    format!("{CHAOS_PREFIX} {} (simulated failure)", status_reason(status))
}
