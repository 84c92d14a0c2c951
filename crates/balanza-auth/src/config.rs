//! Identity configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults.

/// Identity layer configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT secret key for signing session tokens.
    pub jwt_secret: String,

    /// Session token lifetime in seconds. Default: 24 hours.
    pub session_lifetime_secs: i64,
}

impl AuthConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = AuthConfig {
            jwt_secret: std::env::var("JWT_SECRET").unwrap_or_else(|_| {
                // Development fallback only; production MUST set JWT_SECRET
                "balanza-dev-secret-change-in-production".to_string()
            }),

            session_lifetime_secs: std::env::var("JWT_SESSION_LIFETIME_SECS")
                .unwrap_or_else(|_| "86400".to_string()) // 24 hours
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_SESSION_LIFETIME_SECS".to_string()))?,
        };

        if config.jwt_secret.is_empty() {
            return Err(ConfigError::MissingRequired("JWT_SECRET".to_string()));
        }

        Ok(config)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            jwt_secret: "balanza-dev-secret-change-in-production".to_string(),
            session_lifetime_secs: 86400,
        }
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
