use axum::http::HeaderValue;
use std::time::Duration;
use thiserror::Error;

use crate::presence::PresenceConfig;
use crate::websockets::KeepaliveConfig;

const DEFAULT_PORT: u16 = 10000;
const DEFAULT_FRONTEND_URL: &str = "https://pluse-connect.vercel.app";
const DEFAULT_PRESENCE_DEBOUNCE_MS: u64 = 1000;
const DEFAULT_PING_INTERVAL_MS: u64 = 25_000;
const DEFAULT_PONG_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("FRONTEND_URL is not a valid origin: {0:?}")]
    InvalidOrigin(String),
}

/// Process configuration, read from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Postgres connection string; without one rooms live in memory
    pub database_url: Option<String>,
    pub frontend_origin: HeaderValue,
    pub presence: PresenceConfig,
    /// Sockets silent for longer than `pong_timeout` are dropped
    pub keepalive: KeepaliveConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(value) => parse_number("PORT", &value)?,
            None => DEFAULT_PORT,
        };

        let debounce_ms = match lookup("PRESENCE_DEBOUNCE_MS") {
            Some(value) => parse_number("PRESENCE_DEBOUNCE_MS", &value)?,
            None => DEFAULT_PRESENCE_DEBOUNCE_MS,
        };

        let ping_interval_ms = positive_ms(&lookup, "PING_INTERVAL_MS", DEFAULT_PING_INTERVAL_MS)?;
        let pong_timeout_ms = positive_ms(&lookup, "PONG_TIMEOUT_MS", DEFAULT_PONG_TIMEOUT_MS)?;

        let frontend_url = lookup("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string());
        let frontend_origin = HeaderValue::from_str(&frontend_url)
            .map_err(|_| ConfigError::InvalidOrigin(frontend_url.clone()))?;

        Ok(Self {
            port,
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            frontend_origin,
            presence: PresenceConfig {
                departure_debounce: Duration::from_millis(debounce_ms),
            },
            keepalive: KeepaliveConfig {
                ping_interval: Duration::from_millis(ping_interval_ms),
                pong_timeout: Duration::from_millis(pong_timeout_ms),
            },
        })
    }
}

fn positive_ms<F>(lookup: &F, name: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = match lookup(name) {
        Some(value) => parse_number(name, &value)?,
        None => default,
    };
    if value == 0 {
        return Err(ConfigError::Zero(name));
    }
    Ok(value)
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: value.to_string(),
    })
}
