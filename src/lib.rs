mod chaos;
mod config;
mod error;
mod filter;
mod interceptor;
mod model;
mod presets;
mod random;

pub mod cli;
pub mod logging;
pub mod runner;

pub use chaos::*;
pub use config::{merge_config, ChaosConfig, ConfigOverrides, CONFIG_FILE_ENV};
pub use error::{ConfigError, InjectedError, InterceptError};
pub use filter::{in_scope, Pattern, TargetFilter};
pub use interceptor::Interceptor;
pub use model::*;
pub use presets::{get_preset, list_presets, Preset};
pub use random::{RandomSource, SharedRandom};
