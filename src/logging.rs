use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::ChaosConfig;

/// Maximum level to log at: errors only when silent, every intercepted
/// request when verbose.
pub fn max_level(config: &ChaosConfig) -> Level {
    if config.silent {
        Level::ERROR
    } else if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Installs the global subscriber. Calling it again is a no-op.
pub fn init(config: &ChaosConfig) {
    let _ = FmtSubscriber::builder()
        .with_max_level(max_level(config))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_wins_over_verbose() {
        let cfg = ChaosConfig {
            verbose: true,
            silent: true,
            ..ChaosConfig::default()
        };
        assert_eq!(max_level(&cfg), Level::ERROR);
    }

    #[test]
    fn verbose_shows_requests() {
        let cfg = ChaosConfig {
            verbose: true,
            ..ChaosConfig::default()
        };
        assert_eq!(max_level(&cfg), Level::DEBUG);
        assert_eq!(max_level(&ChaosConfig::default()), Level::INFO);
    }
}
