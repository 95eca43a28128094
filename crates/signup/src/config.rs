//! Signup service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SIGNUP_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   the generic `DATABASE_URL`)
//!
//! ## Optional
//! - `SIGNUP_HOST` - Bind address (default: 127.0.0.1)
//! - `SIGNUP_PORT` - Listen port (default: 3000)
//! - `SIGNUP_BCRYPT_COST` - bcrypt work factor (default: 10, range 4-31)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Default bcrypt work factor; roughly tens of milliseconds per hash.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

// bcrypt's valid cost range.
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Signup service configuration.
#[derive(Debug, Clone)]
pub struct SignupConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// bcrypt work factor for password hashing
    pub bcrypt_cost: u32,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl SignupConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or any
    /// variable fails to parse or falls outside its valid range.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("SIGNUP_DATABASE_URL")?;
        let host = get_env_or_default("SIGNUP_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SIGNUP_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SIGNUP_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SIGNUP_PORT".to_string(), e.to_string()))?;
        let bcrypt_cost = get_env_or_default("SIGNUP_BCRYPT_COST", "10")
            .parse::<u32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SIGNUP_BCRYPT_COST".to_string(), e.to_string())
            })?;
        validate_bcrypt_cost(bcrypt_cost, "SIGNUP_BCRYPT_COST")?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            bcrypt_cost,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a bcrypt cost is within the algorithm's supported range.
fn validate_bcrypt_cost(cost: u32, var_name: &str) -> Result<(), ConfigError> {
    if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("cost must be between {MIN_BCRYPT_COST} and {MAX_BCRYPT_COST} (got {cost})"),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_bcrypt_cost_range() {
        assert!(validate_bcrypt_cost(4, "TEST").is_ok());
        assert!(validate_bcrypt_cost(10, "TEST").is_ok());
        assert!(validate_bcrypt_cost(31, "TEST").is_ok());
        assert!(validate_bcrypt_cost(3, "TEST").is_err());
        assert!(validate_bcrypt_cost(32, "TEST").is_err());
    }

    #[test]
    fn test_validate_bcrypt_cost_error_names_variable() {
        let err = validate_bcrypt_cost(0, "SIGNUP_BCRYPT_COST").unwrap_err();
        assert!(err.to_string().contains("SIGNUP_BCRYPT_COST"));
    }

    #[test]
    fn test_socket_addr() {
        let config = SignupConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
