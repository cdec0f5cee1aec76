use std::{env, fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    chaos::DEFAULT_FAIL_CODES, error::ConfigError, presets::get_preset, TargetFilter,
};

/// Variable through which a spawned command learns where its configuration
/// file lives.
pub const CONFIG_FILE_ENV: &str = "LAGGY_CONFIG_FILE";

/// Parameters of a chaos run. Built once at startup and not changed
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChaosConfig {
    pub latency_ms: u64,
    /// Symmetric bound of the random variance added to `latency_ms`.
    pub jitter_ms: u64,
    pub fail_rate: f64,
    /// Status codes picked from on failure. `0` is a connection-level error.
    pub fail_codes: Vec<u16>,
    pub timeout_rate: f64,
    pub timeout_ms: u64,
    #[serde(rename = "includePatterns")]
    pub include: Vec<String>,
    #[serde(rename = "excludePatterns")]
    pub exclude: Vec<String>,
    /// `None` means non-reproducible randomness.
    pub seed: Option<u64>,
    pub verbose: bool,
    pub silent: bool,
}

impl Default for ChaosConfig {
    fn default() -> Self {
        ChaosConfig {
            latency_ms: 0,
            jitter_ms: 0,
            fail_rate: 0.0,
            fail_codes: DEFAULT_FAIL_CODES.to_vec(),
            timeout_rate: 0.0,
            timeout_ms: 30_000,
            include: Vec::new(),
            exclude: Vec::new(),
            seed: None,
            verbose: false,
            silent: false,
        }
    }
}

/// A partial configuration. Presets and command-line options are both
/// expressed this way; `None` leaves the lower layer in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigOverrides {
    pub latency_ms: Option<u64>,
    pub jitter_ms: Option<u64>,
    pub fail_rate: Option<f64>,
    pub fail_codes: Option<Vec<u16>>,
    pub timeout_rate: Option<f64>,
    pub timeout_ms: Option<u64>,
    #[serde(rename = "includePatterns")]
    pub include: Option<Vec<String>>,
    #[serde(rename = "excludePatterns")]
    pub exclude: Option<Vec<String>>,
    pub seed: Option<u64>,
    pub verbose: Option<bool>,
    pub silent: Option<bool>,
}

macro_rules! merge_fields {
    ($merged:ident, $preset:ident, $overrides:ident, {$($field:ident),+ $(,)?}) => {
        $(
            if let Some(value) = &$overrides.$field {
                debug!(field = stringify!($field), ?value, "Use override");
                $merged.$field = value.clone().into();
            } else if let Some(value) = $preset.and_then(|p| p.$field.as_ref()) {
                debug!(field = stringify!($field), ?value, "Use preset");
                $merged.$field = value.clone().into();
            }
        )+
    };
}

/// Layers `preset` and `overrides` on top of `base`, field by field.
/// Overrides win over the preset, which wins over the base.
///
/// Rates are clamped to `[0, 1]` and an empty code list falls back to the
/// default codes.
pub fn merge_config(
    base: ChaosConfig,
    preset: Option<&ConfigOverrides>,
    overrides: &ConfigOverrides,
) -> ChaosConfig {
    let mut merged = base;

    merge_fields!(
        merged, preset, overrides,
        {
            latency_ms,
            jitter_ms,
            fail_rate,
            fail_codes,
            timeout_rate,
            timeout_ms,
            include,
            exclude,
            seed,
            verbose,
            silent,
        }
    );

    merged.normalized()
}

fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 1.0)
    }
}

impl ChaosConfig {
    /// Builds the run configuration from an optional preset name and
    /// explicit overrides.
    pub fn from_args(preset: Option<&str>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let preset = preset
            .map(|name| get_preset(name).ok_or_else(|| ConfigError::UnknownPreset(name.to_owned())))
            .transpose()?;

        Ok(merge_config(
            ChaosConfig::default(),
            preset.map(|p| &p.config),
            overrides,
        ))
    }

    pub fn normalized(mut self) -> Self {
        self.fail_rate = clamp_rate(self.fail_rate);
        self.timeout_rate = clamp_rate(self.timeout_rate);
        if self.fail_codes.is_empty() {
            self.fail_codes = DEFAULT_FAIL_CODES.to_vec();
        }
        self
    }

    pub fn filter(&self) -> TargetFilter {
        TargetFilter::new(&self.include, &self.exclude)
    }

    /// Whether any chaos would be applied at all.
    pub fn is_active(&self) -> bool {
        self.latency_ms > 0 || self.jitter_ms > 0 || self.fail_rate > 0.0 || self.timeout_rate > 0.0
    }

    pub fn encode(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(ConfigError::Encode)
    }

    /// Parses an encoded configuration. Missing keys take default values.
    pub fn decode(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(ConfigError::Decode)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), ConfigError> {
        fs::write(path, self.encode()?).map_err(|err| ConfigError::io(path, err))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|err| ConfigError::io(path, err))?;
        Self::decode(&raw)
    }

    /// Loads the configuration a parent `laggy` process handed down, if any.
    pub fn from_env_file() -> Result<Option<Self>, ConfigError> {
        match env::var_os(CONFIG_FILE_ENV) {
            Some(path) => Self::load(Path::new(&path)).map(Some),
            None => Ok(None),
        }
    }
}
