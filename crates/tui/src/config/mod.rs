use std::time::Duration;

use chrono_tz::Tz;
use clap::Parser;
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/ledgerdash.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub token: String,
    pub timezone: String,
    pub page_size: u32,
    pub lazy_load_ceiling: u32,
    pub lazy_load_delay_ms: u64,
    pub notification_ttl_secs: u64,
    pub log_file: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            token: String::new(),
            timezone: "Europe/Rome".to_string(),
            page_size: 100,
            lazy_load_ceiling: 10,
            lazy_load_delay_ms: 500,
            notification_ttl_secs: 5,
            log_file: "ledgerdash.log".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| AppError::Timezone(self.timezone.clone()))
    }

    pub fn lazy_load_delay(&self) -> Duration {
        Duration::from_millis(self.lazy_load_delay_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_ttl_secs)
    }
}

#[derive(Debug, Parser)]
#[command(name = "ledgerdash", version)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. https://budget.example.com).
    #[arg(long)]
    base_url: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
    /// Override log file path.
    #[arg(long)]
    log_file: Option<String>,
    /// Override log level (error, warn, info, debug, trace).
    #[arg(long)]
    log_level: Option<String>,
}

/// Loads the config file, then `LEDGERDASH_*` env vars, then CLI flags.
///
/// The access token is only read from the file or the environment.
pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("LEDGERDASH"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve() {
        let config = AppConfig::default();
        assert!(config.tz().is_ok());
        assert_eq!(config.lazy_load_delay(), Duration::from_millis(500));
        assert_eq!(config.notification_ttl(), Duration::from_secs(5));
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let config = AppConfig {
            timezone: "Mars/Olympus".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(config.tz(), Err(AppError::Timezone(_))));
    }
}
