//! Storefront server configuration

use std::time::Duration;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Storefront server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT secret shared with the account service
    pub jwt_secret: String,
    /// Upper bound for one checkout transaction
    pub checkout_timeout: Duration,
    /// Maximum pooled database connections
    pub db_max_connections: u32,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: parse_env("HTTP_PORT", 8080),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            checkout_timeout: Duration::from_millis(parse_env("CHECKOUT_TIMEOUT_MS", 5000)),
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", 10),
            environment,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_secret_dev_fallback() {
        let val = Config::require_secret("STOREFRONT_TEST_UNSET_SECRET", "development").unwrap();
        assert_eq!(val, "dev-STOREFRONT_TEST_UNSET_SECRET-not-for-production");
    }

    #[test]
    fn test_require_secret_rejects_missing_in_production() {
        let err = Config::require_secret("STOREFRONT_TEST_UNSET_SECRET", "production").unwrap_err();
        assert!(err.to_string().contains("must be set in production"));
    }

    #[test]
    fn test_parse_env_default() {
        assert_eq!(parse_env("STOREFRONT_TEST_UNSET_PORT", 8080u16), 8080);
    }
}
