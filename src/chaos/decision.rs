use std::fmt;

use derive_more::derive::IsVariant;

/// What should happen to a single intercepted request.
#[derive(Debug, Clone, PartialEq, Eq, IsVariant)]
pub enum Decision {
    /// Forward the request unmodified.
    Passthrough,
    /// Wait `ms` milliseconds, then forward the request unmodified.
    Delay { ms: u64 },
    /// Do not forward; after `delay_ms` report the injected failure.
    Fail(Failure),
    /// Do not forward and do not complete the call for `hold_ms`
    /// (or until the caller gives up).
    Timeout { hold_ms: u64 },
}

/// A synthetic failure. Status `0` is a connection-level error rather than
/// an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub status: u16,
    pub message: String,
    pub delay_ms: u64,
}

impl Failure {
    pub fn is_network_error(&self) -> bool {
        self.status == 0
    }
}

impl Decision {
    /// Milliseconds the caller waits before the outcome becomes observable.
    pub fn wait_ms(&self) -> u64 {
        match self {
            Decision::Passthrough => 0,
            Decision::Delay { ms } => *ms,
            Decision::Fail(failure) => failure.delay_ms,
            Decision::Timeout { hold_ms } => *hold_ms,
        }
    }

    /// Short action text used in request logs.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Passthrough => write!(f, "passthrough"),
            Decision::Delay { ms } => write!(f, "delay {ms}ms"),
            Decision::Fail(failure) => write!(f, "fail {}", failure.status),
            Decision::Timeout { hold_ms } => write!(f, "timeout (hanging for {hold_ms}ms)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_matches_request_log_wording() {
        assert_eq!(Decision::Passthrough.describe(), "passthrough");
        assert_eq!(Decision::Delay { ms: 120 }.describe(), "delay 120ms");
        assert_eq!(
            Decision::Timeout { hold_ms: 30000 }.describe(),
            "timeout (hanging for 30000ms)"
        );
        let fail = Decision::Fail(Failure {
            status: 503,
            message: String::new(),
            delay_ms: 0,
        });
        assert_eq!(fail.describe(), "fail 503");
    }

    #[test]
    fn wait_ms_per_variant() {
        assert_eq!(Decision::Passthrough.wait_ms(), 0);
        assert_eq!(Decision::Delay { ms: 5 }.wait_ms(), 5);
        assert_eq!(Decision::Timeout { hold_ms: 9 }.wait_ms(), 9);
        let failure = Failure {
            status: 0,
            message: String::new(),
            delay_ms: 7,
        };
        assert!(failure.is_network_error());
        assert_eq!(Decision::Fail(failure).wait_ms(), 7);
    }
}
