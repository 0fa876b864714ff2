//! Configuration management for the warehouse backend
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with WMS_ prefix

use chrono::NaiveTime;
use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Telegram alert channel configuration
    pub telegram: TelegramConfig,

    /// Expiry scan schedule
    pub scheduler: SchedulerConfig,

    /// Business code generation
    pub codes: CodesConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    /// Bot API base URL
    pub api_base: String,

    /// Bot token; alerts are logged instead of sent when empty
    pub bot_token: String,

    /// Chat that receives expiry alerts. Also the channel identity used for
    /// alert deduplication.
    pub chat_id: String,

    /// Upper bound for one send, in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SchedulerConfig {
    /// Run the daily expiry scan
    pub enabled: bool,

    /// Local time of day the scan fires, `HH:MM:SS`
    pub run_at: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CodesConfig {
    /// Candidates tried before giving up on a unique business code
    pub max_attempts: u32,
}

impl SchedulerConfig {
    pub fn run_at_time(&self) -> Result<NaiveTime, ConfigError> {
        NaiveTime::parse_from_str(&self.run_at, "%H:%M:%S")
            .map_err(|e| ConfigError::Message(format!("scheduler.run_at: {e}")))
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("WMS_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8080)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("telegram.api_base", "https://api.telegram.org")?
            .set_default("telegram.bot_token", "")?
            .set_default("telegram.chat_id", "")?
            .set_default("telegram.timeout_secs", 10)?
            .set_default("scheduler.enabled", true)?
            .set_default("scheduler.run_at", "09:00:00")?
            .set_default("codes.max_attempts", 5)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WMS_ prefix)
            .add_source(
                Environment::with_prefix("WMS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.scheduler.run_at_time()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_at_parses_clock_time() {
        let scheduler = SchedulerConfig {
            enabled: true,
            run_at: "09:00:00".into(),
        };
        assert_eq!(
            scheduler.run_at_time().unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
    }

    #[test]
    fn malformed_run_at_is_rejected() {
        let scheduler = SchedulerConfig {
            enabled: true,
            run_at: "9am".into(),
        };
        assert!(scheduler.run_at_time().is_err());
    }
}
