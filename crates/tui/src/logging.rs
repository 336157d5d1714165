use std::{fs::OpenOptions, sync::Mutex};

use crate::{
    config::AppConfig,
    error::{AppError, Result},
};

/// Sends `tracing` output to the configured log file.
///
/// The terminal is owned by the dashboard, so nothing is written to stdout.
pub fn init(config: &AppConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "ledgerdash_tui={level},ledgerdash={level}",
            level = config.log_level
        ))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))
}
