use tracing::trace;

use crate::{ChaosConfig, RandomSource};

use super::{check_failure, check_timeout, compute_delay, Decision, Failure};

/// Decides what happens to one in-scope request.
///
/// The checks run in a fixed order and stop at the first hit: timeout,
/// then failure, then plain delay. Each check only draws from `rng` when it
/// is reached, so for a given seed the draw sequence depends only on the
/// outcomes of earlier checks.
pub fn decide(
    target: &str,
    method: &str,
    config: &ChaosConfig,
    rng: &mut RandomSource,
) -> Decision {
    let decision = decide_inner(config, rng);
    trace!(method, target, action = %decision, "Chaos decision");
    decision
}

fn decide_inner(config: &ChaosConfig, rng: &mut RandomSource) -> Decision {
    if let Some(hold_ms) = check_timeout(config.timeout_rate, config.timeout_ms, rng) {
        return Decision::Timeout { hold_ms };
    }

    if let Some((status, message)) = check_failure(config.fail_rate, &config.fail_codes, rng) {
        return Decision::Fail(Failure {
            status,
            message,
            delay_ms: compute_delay(config.latency_ms, config.jitter_ms, rng),
        });
    }

    match compute_delay(config.latency_ms, config.jitter_ms, rng) {
        0 => Decision::Passthrough,
        ms => Decision::Delay { ms },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: &str = "https://api.example.com/users";

    fn config() -> ChaosConfig {
        ChaosConfig::default()
    }

    #[test]
    fn default_config_passes_through_without_drawing() {
        let mut rng = RandomSource::seeded(42);
        let mut reference = RandomSource::seeded(42);
        assert_eq!(decide(TARGET, "GET", &config(), &mut rng), Decision::Passthrough);
        assert_eq!(rng.next_float().to_bits(), reference.next_float().to_bits());
    }

    #[test]
    fn seeded_latency_is_deterministic_on_first_call() {
        let cfg = ChaosConfig {
            latency_ms: 100,
            ..config()
        };
        let mut rng = RandomSource::seeded(42);
        assert_eq!(decide(TARGET, "GET", &cfg, &mut rng), Decision::Delay { ms: 100 });
    }

    #[test]
    fn full_fail_rate_always_fails_with_configured_code() {
        let cfg = ChaosConfig {
            fail_rate: 1.0,
            fail_codes: vec![500],
            ..config()
        };
        let mut rng = RandomSource::seeded(3);
        for _ in 0..100 {
            match decide(TARGET, "POST", &cfg, &mut rng) {
                Decision::Fail(failure) => {
                    assert_eq!(failure.status, 500);
                    assert_eq!(failure.delay_ms, 0);
                }
                other => panic!("expected failure, got {other:?}"),
            }
        }
    }

    #[test]
    fn code_zero_fails_at_connection_level() {
        let cfg = ChaosConfig {
            fail_rate: 1.0,
            fail_codes: vec![0],
            ..config()
        };
        let mut rng = RandomSource::from_entropy();
        for _ in 0..100 {
            match decide(TARGET, "GET", &cfg, &mut rng) {
                Decision::Fail(failure) => assert!(failure.is_network_error()),
                other => panic!("expected failure, got {other:?}"),
            }
        }
    }

    #[test]
    fn failure_carries_the_delay_before_it_is_observed() {
        let cfg = ChaosConfig {
            latency_ms: 250,
            fail_rate: 1.0,
            fail_codes: vec![502],
            ..config()
        };
        let mut rng = RandomSource::seeded(5);
        match decide(TARGET, "GET", &cfg, &mut rng) {
            Decision::Fail(failure) => {
                assert_eq!(failure.status, 502);
                assert_eq!(failure.delay_ms, 250);
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn timeout_wins_over_failure() {
        let cfg = ChaosConfig {
            latency_ms: 100,
            fail_rate: 1.0,
            timeout_rate: 1.0,
            timeout_ms: 5_000,
            ..config()
        };
        let mut rng = RandomSource::seeded(5);
        assert_eq!(
            decide(TARGET, "GET", &cfg, &mut rng),
            Decision::Timeout { hold_ms: 5_000 }
        );
    }

    #[test]
    fn draw_order_is_timeout_failure_delay() {
        let cfg = ChaosConfig {
            latency_ms: 100,
            jitter_ms: 50,
            fail_rate: 0.5,
            fail_codes: vec![500, 503],
            timeout_rate: 0.5,
            ..config()
        };

        for seed in 0..50 {
            let mut rng = RandomSource::seeded(seed);
            let mut replay = RandomSource::seeded(seed);
            let decision = decide(TARGET, "GET", &cfg, &mut rng);

            let expected = if replay.next_float() < 0.5 {
                Decision::Timeout { hold_ms: cfg.timeout_ms }
            } else if replay.next_float() < 0.5 {
                let status = [500, 503][replay.next_int(0, 1) as usize];
                let delay_ms = (100 + replay.next_int(-50, 50)) as u64;
                match decision {
                    Decision::Fail(ref failure) => {
                        assert_eq!(failure.status, status);
                        assert_eq!(failure.delay_ms, delay_ms);
                    }
                    ref other => panic!("expected failure, got {other:?}"),
                }
                decision.clone()
            } else {
                Decision::Delay {
                    ms: (100 + replay.next_int(-50, 50)) as u64,
                }
            };
            assert_eq!(decision, expected, "seed {seed}");
        }
    }

    #[test]
    fn same_seed_same_decisions() {
        let cfg = ChaosConfig {
            latency_ms: 500,
            jitter_ms: 1500,
            fail_rate: 0.2,
            timeout_rate: 0.1,
            ..config()
        };
        let mut a = RandomSource::seeded(99);
        let mut b = RandomSource::seeded(99);
        for _ in 0..500 {
            assert_eq!(decide(TARGET, "GET", &cfg, &mut a), decide(TARGET, "GET", &cfg, &mut b));
        }
    }
}
