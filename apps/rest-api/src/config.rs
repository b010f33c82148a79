//! API server configuration module.
//!
//! Configuration is loaded from environment variables. Values with a safe
//! default fall back to it; the JWT signing secret has NO fallback and the
//! server refuses to start without it. A silently-substituted development
//! secret would sign real tokens.

use serde::{Deserialize, Serialize};
use std::env;

/// REST API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// SQLite database file path
    pub database_path: String,

    /// JWT signing secret. Required, no default.
    #[serde(skip_serializing)]
    pub jwt_secret: String,

    /// JWT token lifetime in seconds (default: 2 days)
    pub jwt_lifetime_secs: i64,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// ## Variables
    /// - `KITAB_JWT_SECRET` - REQUIRED, signing secret
    /// - `HTTP_PORT` - listen port (default 3081)
    /// - `DATABASE_PATH` - SQLite file (default ./kitabcart.db)
    /// - `JWT_LIFETIME_SECS` - token lifetime (default 172800 = 2 days)
    pub fn load() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("KITAB_JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingRequired("KITAB_JWT_SECRET".to_string()))?;

        let config = ApiConfig {
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "3081".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./kitabcart.db".to_string()),

            jwt_secret,

            jwt_lifetime_secs: env::var("JWT_LIFETIME_SECS")
                .unwrap_or_else(|_| "172800".to_string()) // 2 days
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_LIFETIME_SECS".to_string()))?,
        };

        if config.jwt_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("JWT_LIFETIME_SECS".to_string()));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests mutate process state; keep them in one test so they
    // cannot race each other.
    #[test]
    fn test_load_requires_secret_and_applies_defaults() {
        env::remove_var("KITAB_JWT_SECRET");
        env::remove_var("HTTP_PORT");
        env::remove_var("DATABASE_PATH");
        env::remove_var("JWT_LIFETIME_SECS");

        let err = ApiConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired(_)));

        env::set_var("KITAB_JWT_SECRET", "   ");
        assert!(ApiConfig::load().is_err());

        env::set_var("KITAB_JWT_SECRET", "unit-test-secret");
        let config = ApiConfig::load().unwrap();
        assert_eq!(config.http_port, 3081);
        assert_eq!(config.database_path, "./kitabcart.db");
        assert_eq!(config.jwt_lifetime_secs, 172_800);

        env::set_var("HTTP_PORT", "not-a-port");
        assert!(matches!(
            ApiConfig::load().unwrap_err(),
            ConfigError::InvalidValue(_)
        ));
        env::remove_var("HTTP_PORT");
        env::remove_var("KITAB_JWT_SECRET");
    }
}
