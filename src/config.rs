use std::{str::FromStr, time::Duration};

use thiserror::Error;

/// Largest inbound payload, for HTTP bodies and websocket frames alike.
pub const MAX_PAYLOAD_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Process configuration, read once at start-up.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub values_url: String,
    pub values_timeout: Duration,
    pub rosbridge_host: String,
    pub rosbridge_port: u16,
    pub request_topic: String,
    pub response_topic: String,
    /// Serve Swagger UI and the OpenAPI document.
    pub api_docs: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Unset or blank
    /// keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            host: get("HOST", "0.0.0.0"),
            port: parse("PORT", get("PORT", "8000"))?,
            values_url: get("CELL_VALUES_URL", "http://localhost:8001/values"),
            values_timeout: Duration::from_secs(parse(
                "CELL_VALUES_TIMEOUT_SECS",
                get("CELL_VALUES_TIMEOUT_SECS", "5"),
            )?),
            rosbridge_host: get("ROSBRIDGE_HOST", "localhost"),
            rosbridge_port: parse("ROSBRIDGE_PORT", get("ROSBRIDGE_PORT", "9090"))?,
            request_topic: get("PLAN_REQUEST_TOPIC", "/getPlan"),
            response_topic: get("PLANNED_GRID_TOPIC", "/planned_grid"),
            api_docs: flag("API_DOCS", get("API_DOCS", "false"))?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn rosbridge_url(&self) -> String {
        format!("ws://{}:{}", self.rosbridge_host, self.rosbridge_port)
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid { key, value })
}

fn flag(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value }),
    }
}
