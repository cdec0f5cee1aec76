use std::sync::LazyLock;

use itertools::Itertools;

use crate::ConfigOverrides;

/// A named bundle of settings approximating a real-world network.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub config: ConfigOverrides,
}

impl Preset {
    fn new(
        name: &'static str,
        description: &'static str,
        (latency_ms, jitter_ms): (u64, u64),
        fail_rate: f64,
        timeout_rate: f64,
    ) -> Self {
        let nonzero = |v: f64| (v > 0.0).then_some(v);
        Preset {
            name,
            description,
            config: ConfigOverrides {
                latency_ms: (latency_ms > 0).then_some(latency_ms),
                jitter_ms: (jitter_ms > 0).then_some(jitter_ms),
                fail_rate: nonzero(fail_rate),
                timeout_rate: nonzero(timeout_rate),
                ..ConfigOverrides::default()
            },
        }
    }

    fn with_fail_codes(mut self, codes: &[u16]) -> Self {
        self.config.fail_codes = Some(codes.to_vec());
        self
    }

    /// One-line rendering of the non-zero settings, e.g.
    /// `latency: 400ms, jitter: 100ms, fail: 2%, timeout: 1%`.
    pub fn summary(&self) -> String {
        let cfg = &self.config;
        let percent = |rate: f64| format!("{:.0}%", rate * 100.0);

        [
            cfg.latency_ms.filter(|v| *v > 0).map(|v| format!("latency: {v}ms")),
            cfg.jitter_ms.filter(|v| *v > 0).map(|v| format!("jitter: {v}ms")),
            cfg.fail_rate.filter(|v| *v > 0.0).map(|v| format!("fail: {}", percent(v))),
            cfg.timeout_rate.filter(|v| *v > 0.0).map(|v| format!("timeout: {}", percent(v))),
        ]
        .into_iter()
        .flatten()
        .join(", ")
    }
}

// Rough figures from browser throttling profiles and public measurements.
static PRESETS: LazyLock<Vec<Preset>> = LazyLock::new(|| {
    vec![
        Preset::new("5g", "Fast 5G connection", (10, 5), 0.0, 0.0),
        Preset::new("4g", "Standard 4G/LTE", (50, 20), 0.0, 0.0),
        Preset::new("fast-3g", "Fast 3G connection", (150, 50), 0.01, 0.0),
        Preset::new("slow-3g", "Slow 3G connection", (400, 100), 0.02, 0.01),
        Preset::new("edge", "EDGE/2G network", (800, 200), 0.05, 0.02),
        Preset::new("wifi", "Home WiFi", (20, 10), 0.0, 0.0),
        Preset::new("wifi-poor", "Coffee shop WiFi", (100, 80), 0.03, 0.01),
        Preset::new("offline", "No network connection", (0, 0), 1.0, 0.0).with_fail_codes(&[0]),
        Preset::new(
            "flaky",
            "Unreliable connection with random failures",
            (200, 300),
            0.3,
            0.1,
        ),
        Preset::new("chaos", "Maximum chaos for stress testing", (500, 1500), 0.2, 0.1),
        Preset::new("lie-fi", "Connected but barely usable", (2000, 500), 0.1, 0.3),
    ]
});

pub fn get_preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name == name)
}

/// All presets in catalog order.
pub fn list_presets() -> &'static [Preset] {
    &PRESETS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_order_and_names() {
        let names: Vec<&str> = list_presets().iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            [
                "5g", "4g", "fast-3g", "slow-3g", "edge", "wifi", "wifi-poor", "offline", "flaky",
                "chaos", "lie-fi"
            ]
        );
    }

    #[test]
    fn slow_3g_values() {
        let preset = get_preset("slow-3g").unwrap();
        assert_eq!(preset.description, "Slow 3G connection");
        assert_eq!(preset.config.latency_ms, Some(400));
        assert_eq!(preset.config.jitter_ms, Some(100));
        assert_eq!(preset.config.fail_rate, Some(0.02));
        assert_eq!(preset.config.timeout_rate, Some(0.01));
        assert_eq!(preset.config.fail_codes, None);
    }

    #[test]
    fn offline_fails_everything_at_connection_level() {
        let preset = get_preset("offline").unwrap();
        assert_eq!(preset.config.fail_rate, Some(1.0));
        assert_eq!(preset.config.fail_codes, Some(vec![0]));
        assert_eq!(preset.config.latency_ms, None);
    }

    #[test]
    fn presets_never_touch_scope_or_seed() {
        for preset in list_presets() {
            assert_eq!(preset.config.include, None, "{}", preset.name);
            assert_eq!(preset.config.exclude, None, "{}", preset.name);
            assert_eq!(preset.config.seed, None, "{}", preset.name);
        }
    }

    #[test]
    fn unknown_names_are_not_found() {
        assert!(get_preset("3g").is_none());
        assert!(get_preset("SLOW-3G").is_none());
    }

    #[test]
    fn summaries_skip_zero_fields() {
        assert_eq!(
            get_preset("slow-3g").unwrap().summary(),
            "latency: 400ms, jitter: 100ms, fail: 2%, timeout: 1%"
        );
        assert_eq!(get_preset("4g").unwrap().summary(), "latency: 50ms, jitter: 20ms");
        assert_eq!(get_preset("offline").unwrap().summary(), "fail: 100%");
    }
}
