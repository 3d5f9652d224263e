//! Cart mutations
//!
//! The only writers of `carts.total_price`. Each mutation locks the cart
//! row, changes the items and recomputes the cached total in a single
//! transaction.

use shared::error::{AppError, ErrorCode};
use shared::models::CartView;
use shared::util::now_millis;
use sqlx::{PgConnection, PgPool};

use crate::db::{carts, catalog};
use crate::error::ServiceResult;

/// Current cart of a user. Reads never create a cart.
pub async fn view(pool: &PgPool, user_id: i64) -> ServiceResult<CartView> {
    let Some(cart) = carts::find_by_user(pool, user_id).await? else {
        return Ok(CartView::empty());
    };
    let items = carts::list_lines(pool, cart.id).await?;
    Ok(CartView {
        cart_id: Some(cart.id),
        total_price: cart.total_price,
        items,
    })
}

/// Add a game. Adding a game that is already in the cart changes nothing.
pub async fn add_item(pool: &PgPool, user_id: i64, app_id: i64) -> ServiceResult<CartView> {
    let mut tx = pool.begin().await?;
    let now = now_millis();

    if !catalog::exists(&mut *tx, app_id).await? {
        return Err(AppError::new(ErrorCode::GameNotFound)
            .with_detail("app_id", app_id)
            .into());
    }

    let cart = carts::get_or_create_locked(&mut tx, user_id, now).await?;
    let added = carts::add_item(&mut *tx, cart.id, app_id, now).await?;
    let view = recompute_and_view(&mut tx, cart.id, now).await?;
    tx.commit().await?;

    tracing::debug!(user_id, app_id, added, "Cart item added");
    Ok(view)
}

pub async fn remove_item(pool: &PgPool, user_id: i64, app_id: i64) -> ServiceResult<CartView> {
    let mut tx = pool.begin().await?;
    let now = now_millis();

    let cart = carts::lock_by_user(&mut *tx, user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CartItemNotFound).with_detail("app_id", app_id))?;

    if !carts::remove_item(&mut *tx, cart.id, app_id).await? {
        return Err(AppError::new(ErrorCode::CartItemNotFound)
            .with_detail("app_id", app_id)
            .into());
    }

    let view = recompute_and_view(&mut tx, cart.id, now).await?;
    tx.commit().await?;

    tracing::debug!(user_id, app_id, "Cart item removed");
    Ok(view)
}

/// Remove every item. A user without a cart gets an empty view.
pub async fn clear(pool: &PgPool, user_id: i64) -> ServiceResult<CartView> {
    let mut tx = pool.begin().await?;
    let now = now_millis();

    let Some(cart) = carts::lock_by_user(&mut *tx, user_id).await? else {
        return Ok(CartView::empty());
    };

    let removed = carts::clear(&mut *tx, cart.id).await?;
    let view = recompute_and_view(&mut tx, cart.id, now).await?;
    tx.commit().await?;

    tracing::debug!(user_id, removed, "Cart cleared");
    Ok(view)
}

async fn recompute_and_view(
    conn: &mut PgConnection,
    cart_id: i64,
    now: i64,
) -> Result<CartView, sqlx::Error> {
    let total_price = carts::recompute_total(&mut *conn, cart_id, now).await?;
    let items = carts::list_lines(&mut *conn, cart_id).await?;
    Ok(CartView {
        cart_id: Some(cart_id),
        total_price,
        items,
    })
}
