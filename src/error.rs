use std::path::PathBuf;

use thiserror::Error;

use crate::chaos::CHAOS_PREFIX;

/// Problems building or transporting a configuration. These surface at
/// startup, never while handling a request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("failed to encode configuration: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode configuration: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures produced on purpose by the interceptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectedError {
    /// Connection-level failure; no HTTP response exists.
    #[error("{message}")]
    Network { message: String },

    #[error("{prefix} Request timed out after {after_ms}ms", prefix = CHAOS_PREFIX)]
    TimedOut { after_ms: u64 },

    #[error("{prefix} Request cancelled while hanging", prefix = CHAOS_PREFIX)]
    Cancelled,
}

/// Error returned by an intercepted call: either injected chaos or a real
/// error from the wrapped transport.
#[derive(Debug, Error)]
pub enum InterceptError<E> {
    #[error(transparent)]
    Injected(InjectedError),

    #[error("transport error: {0}")]
    Transport(#[source] E),
}

impl<E> InterceptError<E> {
    pub fn is_injected(&self) -> bool {
        matches!(self, Self::Injected(_))
    }

    pub fn injected(&self) -> Option<&InjectedError> {
        match self {
            Self::Injected(err) => Some(err),
            Self::Transport(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chaos::is_injected;

    #[test]
    fn unknown_preset_message() {
        let err = ConfigError::UnknownPreset("5.5g".to_owned());
        assert_eq!(err.to_string(), "Unknown preset: 5.5g");
    }

    #[test]
    fn injected_errors_carry_the_marker() {
        let errors = [
            InjectedError::Network {
                message: format!("{CHAOS_PREFIX} Network error: simulated offline"),
            },
            InjectedError::TimedOut { after_ms: 30_000 },
            InjectedError::Cancelled,
        ];
        for err in errors {
            assert!(is_injected(&err.to_string()), "{err}");
        }
    }

    #[test]
    fn transport_errors_are_not_injected() {
        let err: InterceptError<std::io::Error> =
            InterceptError::Transport(std::io::Error::other("reset"));
        assert!(!err.is_injected());
        assert!(err.injected().is_none());
        assert!(!is_injected(&err.to_string()));
    }
}
