use std::process::Stdio;

use itertools::Itertools;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::{config::CONFIG_FILE_ENV, error::ConfigError, ChaosConfig};

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to start command: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Failed to prepare configuration: {0}")]
    TempDir(#[source] std::io::Error),
}

/// Runs `command` through the platform shell with `config` handed down in a
/// file, and returns the command's exit code.
pub async fn run(command: &[String], config: &ChaosConfig) -> Result<i32, RunError> {
    let dir = tempfile::tempdir().map_err(RunError::TempDir)?;
    let path = dir.path().join("laggy.json");
    config.write_to(&path)?;
    debug!(path = %path.display(), "Wrote configuration");

    let status = shell(&command.iter().join(" "))
        .env(CONFIG_FILE_ENV, &path)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(RunError::Spawn)?;

    Ok(status.code().unwrap_or(0))
}

#[cfg(unix)]
fn shell(line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(line);
    cmd
}

#[cfg(windows)]
fn shell(line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(line);
    cmd
}
