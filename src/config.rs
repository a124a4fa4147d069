//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection settings
    pub database: PgConnectOptions,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Deadline applied to every HTTP request
    pub request_timeout: Duration,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = match lookup("DATABASE_URL") {
            Some(url) => PgConnectOptions::from_str(&url)
                .map_err(|_| ConfigError::InvalidValue("DATABASE_URL"))?,
            None => postgres_options_from_parts(&lookup)?,
        };

        let database_max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?;

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = parse_or(&lookup, "PORT", 8080)?;

        let timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 5)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("REQUEST_TIMEOUT_SECS"));
        }

        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        Ok(Self {
            database,
            database_max_connections,
            host,
            port,
            request_timeout: Duration::from_secs(timeout_secs),
            environment,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue(key)),
        None => Ok(default),
    }
}

/// Build connection options from discrete `POSTGRES_*` variables
///
/// Values are passed through as-is, so credentials may contain URL
/// reserved characters.
fn postgres_options_from_parts<F>(lookup: &F) -> Result<PgConnectOptions, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // Without a user the discrete form is not in use at all
    let user = lookup("POSTGRES_USER").ok_or(ConfigError::MissingEnv("DATABASE_URL"))?;
    let database = lookup("POSTGRES_DB").ok_or(ConfigError::MissingEnv("POSTGRES_DB"))?;
    let host = lookup("POSTGRES_HOST").unwrap_or_else(|| "localhost".to_string());
    let port: u16 = parse_or(lookup, "POSTGRES_PORT", 5432)?;

    let options = PgConnectOptions::new()
        .host(&host)
        .port(port)
        .username(&user)
        .database(&database)
        .ssl_mode(PgSslMode::Disable);

    Ok(match lookup("POSTGRES_PASSWORD") {
        Some(password) => options.password(&password),
        None => options,
    })
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
