//! API Configuration Module
//!
//! Configuration for binding, CORS, seeding and log output. Values are loaded
//! from environment variables with defaults suitable for development.

use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{
    DEFAULT_BIND_HOST, DEFAULT_CORS_MAX_AGE_SECS, DEFAULT_PORT, DEFAULT_SEED_AGENTS,
    DEFAULT_SEED_CASES,
};

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid bind address {0}")]
    InvalidBindAddr(String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(()),
        }
    }
}

// ============================================================================
// API CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    // ========================================================================
    // Server
    // ========================================================================
    pub bind_host: String,
    pub port: u16,

    // ========================================================================
    // CORS Configuration
    // ========================================================================
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins.
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    // ========================================================================
    // Seeding
    // ========================================================================
    /// Mock agents generated at startup.
    pub seed_agents: usize,

    /// Mock cases generated at startup.
    pub seed_cases: usize,

    /// RNG seed for reproducible mock data. Random when unset.
    pub seed: Option<u64>,

    // ========================================================================
    // Logging
    // ========================================================================
    pub log_format: LogFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_host: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: Vec::new(),
            cors_max_age_secs: DEFAULT_CORS_MAX_AGE_SECS,
            seed_agents: DEFAULT_SEED_AGENTS,
            seed_cases: DEFAULT_SEED_CASES,
            seed: None,
            log_format: LogFormat::default(),
        }
    }
}

fn parse_var<T: FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(default),
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `PRECINCT_API_BIND`: Bind host (default: 0.0.0.0)
    /// - `PORT` or `PRECINCT_API_PORT`: Listen port (default: 3000)
    /// - `PRECINCT_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `PRECINCT_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `PRECINCT_SEED_AGENTS`: Mock agents at startup (default: 1000)
    /// - `PRECINCT_SEED_CASES`: Mock cases at startup (default: 25)
    /// - `PRECINCT_SEED`: u64 RNG seed for reproducible mock data
    /// - `PRECINCT_LOG_FORMAT`: "json" or "pretty" (default: pretty)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_host = lookup("PRECINCT_API_BIND").unwrap_or(defaults.bind_host);

        let (port_key, port_value) = match lookup("PORT") {
            Some(value) => ("PORT", Some(value)),
            None => ("PRECINCT_API_PORT", lookup("PRECINCT_API_PORT")),
        };
        let port = parse_var(port_key, port_value, defaults.port)?;

        let cors_origins = lookup("PRECINCT_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_max_age_secs = parse_var(
            "PRECINCT_CORS_MAX_AGE_SECS",
            lookup("PRECINCT_CORS_MAX_AGE_SECS"),
            defaults.cors_max_age_secs,
        )?;

        let seed_agents = parse_var(
            "PRECINCT_SEED_AGENTS",
            lookup("PRECINCT_SEED_AGENTS"),
            defaults.seed_agents,
        )?;
        let seed_cases = parse_var(
            "PRECINCT_SEED_CASES",
            lookup("PRECINCT_SEED_CASES"),
            defaults.seed_cases,
        )?;
        let seed = lookup("PRECINCT_SEED")
            .map(|raw| {
                raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "PRECINCT_SEED",
                    value: raw,
                })
            })
            .transpose()?;

        let log_format = parse_var(
            "PRECINCT_LOG_FORMAT",
            lookup("PRECINCT_LOG_FORMAT"),
            defaults.log_format,
        )?;

        Ok(Self {
            bind_host,
            port,
            cors_origins,
            cors_max_age_secs,
            seed_agents,
            seed_cases,
            seed,
            log_format,
        })
    }

    /// Socket address the server listens on.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidBindAddr(addr))
    }
}
