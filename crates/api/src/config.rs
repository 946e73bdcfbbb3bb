//! Service Configuration

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Server configuration, loaded from an optional `sensors.toml` layered
/// under `SENSORS_`-prefixed environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// SQLite URL (`sqlite://sensors.db`). Absent selects the in-memory
    /// store.
    pub database_url: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8080, database_url: None }
    }
}

impl ServiceConfig {
    /// Load configuration from file and environment.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("sensors").required(false))
            .add_source(Environment::with_prefix("SENSORS"))
            .build()?
            .try_deserialize()
    }
}
