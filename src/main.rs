use std::process::ExitCode;

use itertools::Itertools;
use laggy::{cli::Invocation, logging, runner, ChaosConfig, ConfigError};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Invocation::parse_from(std::env::args_os()) {
        Ok(Invocation::Run(cli)) => cli,
        Ok(Invocation::Help) => {
            print!("{}", laggy::cli::render_help());
            return ExitCode::SUCCESS;
        }
        Ok(Invocation::Version) => {
            print!("{}", laggy::cli::render_version());
            return ExitCode::SUCCESS;
        }
        Err(err) => err.exit(),
    };

    if cli.list_presets {
        println!("{}", laggy::cli::render_presets());
        return ExitCode::SUCCESS;
    }

    let config = match ChaosConfig::from_args(cli.preset.as_deref(), &cli.overrides()) {
        Ok(config) => config,
        Err(err) => {
            logging::init(&ChaosConfig::default());
            error!("{err}");
            if matches!(err, ConfigError::UnknownPreset(_)) {
                info!("Run `laggy --list-presets` to see available presets.");
            }
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config);

    if cli.command.is_empty() {
        error!("No command specified. Run `laggy --help` for usage.");
        return ExitCode::FAILURE;
    }

    if let Some(preset) = &cli.preset {
        info!("Using preset: {preset}");
    }
    if config.latency_ms > 0 || config.jitter_ms > 0 {
        info!("Latency: {}ms (±{}ms)", config.latency_ms, config.jitter_ms);
    }
    if config.fail_rate > 0.0 {
        info!("Failure rate: {:.0}%", config.fail_rate * 100.0);
    }
    if config.timeout_rate > 0.0 {
        info!("Timeout rate: {:.0}%", config.timeout_rate * 100.0);
    }
    info!("Running: {}", cli.command.iter().join(" "));

    match runner::run(&cli.command, &config).await {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
