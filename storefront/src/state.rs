//! Application state for the storefront

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// JWT secret for user authentication
    pub jwt_secret: String,
    /// Upper bound for one checkout transaction
    pub checkout_timeout: Duration,
}

impl AppState {
    /// Connect to PostgreSQL, run embedded migrations and build the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self::with_pool(
            pool,
            config.jwt_secret.clone(),
            config.checkout_timeout,
        ))
    }

    /// Build state around an existing pool (tests, embedding)
    pub fn with_pool(
        pool: PgPool,
        jwt_secret: impl Into<String>,
        checkout_timeout: Duration,
    ) -> Self {
        Self {
            pool,
            jwt_secret: jwt_secret.into(),
            checkout_timeout,
        }
    }
}
