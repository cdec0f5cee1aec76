use std::ffi::OsString;

use clap::{CommandFactory, Parser};
use itertools::Itertools;

use crate::{presets::list_presets, ConfigOverrides};

/// Simulate bad networks. Break your app before users do.
#[derive(Debug, Parser)]
#[command(name = "laggy", version, after_help = after_help())]
#[command(override_usage = "laggy [OPTIONS] <COMMAND>...")]
pub struct Cli {
    /// Use a network preset
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Base latency in milliseconds [default: 0]
    #[arg(long, value_name = "MS")]
    pub latency: Option<u64>,

    /// Random latency variance +/- in milliseconds [default: 0]
    #[arg(long, value_name = "MS")]
    pub jitter: Option<u64>,

    /// Share of requests that fail, 0-1 [default: 0]
    #[arg(long, value_name = "RATE")]
    pub fail_rate: Option<f64>,

    /// Comma-separated failure status codes, 0 for a network error [default: 500,502,503]
    #[arg(long, value_name = "CODES", value_delimiter = ',')]
    pub fail_codes: Option<Vec<u16>>,

    /// Share of requests that hang, 0-1 [default: 0]
    #[arg(long, value_name = "RATE")]
    pub timeout_rate: Option<f64>,

    /// How long a hanging request is held in milliseconds [default: 30000]
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Only affect URLs matching pattern (`*` is a wildcard); repeatable
    #[arg(long, value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Skip URLs matching pattern (`*` is a wildcard); repeatable
    #[arg(long, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Seed for reproducible randomness
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log every intercepted request
    #[arg(long)]
    pub verbose: bool,

    /// Suppress laggy output
    #[arg(long)]
    pub silent: bool,

    /// Show all available presets
    #[arg(long)]
    pub list_presets: bool,

    /// Command to run; everything from the first non-option argument on
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl Cli {
    /// Options given explicitly on the command line.
    pub fn overrides(&self) -> ConfigOverrides {
        let non_empty = |patterns: &Vec<String>| (!patterns.is_empty()).then(|| patterns.clone());
        ConfigOverrides {
            latency_ms: self.latency,
            jitter_ms: self.jitter,
            fail_rate: self.fail_rate,
            fail_codes: self.fail_codes.clone(),
            timeout_rate: self.timeout_rate,
            timeout_ms: self.timeout_ms,
            include: non_empty(&self.include),
            exclude: non_empty(&self.exclude),
            seed: self.seed,
            verbose: self.verbose.then_some(true),
            silent: self.silent.then_some(true),
        }
    }
}

/// What a command line asks for.
#[derive(Debug)]
pub enum Invocation {
    /// No arguments at all.
    Help,
    /// A leading `-v`, accepted next to clap's `-V` and `--version`.
    Version,
    Run(Cli),
}

impl Invocation {
    /// Parses `args`, program name included.
    pub fn parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        match args.get(1) {
            None => Ok(Invocation::Help),
            Some(first) if first == "-v" => Ok(Invocation::Version),
            Some(_) => Cli::try_parse_from(args).map(Invocation::Run),
        }
    }
}

/// Full help text, as printed for `--help`.
pub fn render_help() -> String {
    Cli::command().render_long_help().to_string()
}

pub fn render_version() -> String {
    Cli::command().render_version()
}

fn after_help() -> String {
    let presets = list_presets()
        .iter()
        .map(|p| format!("  {:<12}{}", p.name, p.description))
        .join("\n");

    format!(
        "Examples:\n  laggy cargo test\n  laggy --preset slow-3g cargo test\n  \
         laggy --latency 500 --fail-rate 0.2 ./run-e2e.sh\n\nPresets:\n{presets}"
    )
}

/// Text printed by `--list-presets`.
pub fn render_presets() -> String {
    let mut out = String::from("\nAvailable presets:\n\n");
    for preset in list_presets() {
        out.push_str(&format!("  {:<12} {}\n", preset.name, preset.description));
        let summary = preset.summary();
        if !summary.is_empty() {
            out.push_str(&format!("               {summary}\n"));
        }
    }
    out
}
