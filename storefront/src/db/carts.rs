//! Carts and cart items
//!
//! `carts.total_price` is only ever written by [`recompute_total`], which
//! every mutation path calls before committing.

use rust_decimal::Decimal;
use shared::models::{Cart, CartLine};
use sqlx::{PgConnection, PgExecutor};

pub async fn find_by_user(
    executor: impl PgExecutor<'_>,
    user_id: i64,
) -> Result<Option<Cart>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM carts WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(executor)
        .await
}

/// Load the user's cart and take a row lock until the transaction ends
pub async fn lock_by_user(
    executor: impl PgExecutor<'_>,
    user_id: i64,
) -> Result<Option<Cart>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM carts WHERE user_id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(executor)
        .await
}

/// Create the user's cart on first use, then lock it
pub async fn get_or_create_locked(
    conn: &mut PgConnection,
    user_id: i64,
    now: i64,
) -> Result<Cart, sqlx::Error> {
    sqlx::query(
        "INSERT INTO carts (user_id, total_price, updated_at) VALUES ($1, 0, $2)
         ON CONFLICT (user_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    sqlx::query_as("SELECT * FROM carts WHERE user_id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await
}

/// Games in the cart, oldest first
pub async fn list_app_ids(
    executor: impl PgExecutor<'_>,
    cart_id: i64,
) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT app_id FROM cart_items WHERE cart_id = $1 ORDER BY added_at, id")
        .bind(cart_id)
        .fetch_all(executor)
        .await
}

/// Cart items joined with their live catalog price
pub async fn list_lines(
    executor: impl PgExecutor<'_>,
    cart_id: i64,
) -> Result<Vec<CartLine>, sqlx::Error> {
    sqlx::query_as(
        "SELECT ci.app_id, g.name, g.price_final, g.discount_percent, ci.added_at
         FROM cart_items ci
         JOIN games g ON g.app_id = ci.app_id
         WHERE ci.cart_id = $1
         ORDER BY ci.added_at, ci.id",
    )
    .bind(cart_id)
    .fetch_all(executor)
    .await
}

/// Returns `false` when the game was already in the cart
pub async fn add_item(
    executor: impl PgExecutor<'_>,
    cart_id: i64,
    app_id: i64,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO cart_items (cart_id, app_id, added_at) VALUES ($1, $2, $3)
         ON CONFLICT (cart_id, app_id) DO NOTHING",
    )
    .bind(cart_id)
    .bind(app_id)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Returns `false` when the game was not in the cart
pub async fn remove_item(
    executor: impl PgExecutor<'_>,
    cart_id: i64,
    app_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND app_id = $2")
        .bind(cart_id)
        .bind(app_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn remove_items(
    executor: impl PgExecutor<'_>,
    cart_id: i64,
    app_ids: &[i64],
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND app_id = ANY($2)")
        .bind(cart_id)
        .bind(app_ids)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

pub async fn clear(executor: impl PgExecutor<'_>, cart_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
        .bind(cart_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Recompute the cached total from the live prices of the remaining items
pub async fn recompute_total(
    executor: impl PgExecutor<'_>,
    cart_id: i64,
    now: i64,
) -> Result<Decimal, sqlx::Error> {
    sqlx::query_scalar(
        "UPDATE carts SET
             total_price = COALESCE((
                 SELECT SUM(g.price_final)
                 FROM cart_items ci
                 JOIN games g ON g.app_id = ci.app_id
                 WHERE ci.cart_id = $1
             ), 0),
             updated_at = $2
         WHERE id = $1
         RETURNING total_price",
    )
    .bind(cart_id)
    .bind(now)
    .fetch_one(executor)
    .await
}
