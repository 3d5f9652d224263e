//! Game catalog pricing (read-only)

use shared::models::GamePrice;
use sqlx::PgExecutor;

/// Authoritative prices for the given games.
///
/// Games that do not exist are simply absent from the result.
pub async fn find_prices(
    executor: impl PgExecutor<'_>,
    app_ids: &[i64],
) -> Result<Vec<GamePrice>, sqlx::Error> {
    sqlx::query_as(
        "SELECT app_id, price_final, discount_percent FROM games WHERE app_id = ANY($1)",
    )
    .bind(app_ids)
    .fetch_all(executor)
    .await
}

pub async fn exists(executor: impl PgExecutor<'_>, app_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM games WHERE app_id = $1)")
        .bind(app_id)
        .fetch_one(executor)
        .await
}
