//! Order writer: the checkout transaction

use std::time::Duration;

use shared::models::{OrderItem, OrderWithItems};
use shared::util::now_millis;
use sqlx::PgPool;

use super::{CheckoutError, CheckoutOptions, cart_snapshot, coupon, pricing};
use crate::db::{self, addresses, carts, catalog, coupons, orders};

/// Run a checkout for `user_id` as one atomic transaction.
///
/// The transaction is bounded twice by `timeout`: PostgreSQL cancels any
/// statement that runs longer (`statement_timeout`), and the whole future
/// is dropped (rolling the transaction back) once the deadline passes.
/// Both surface as [`CheckoutError::TransactionTimeout`].
pub async fn create_order(
    pool: &PgPool,
    user_id: i64,
    options: &CheckoutOptions,
    timeout: Duration,
) -> Result<OrderWithItems, CheckoutError> {
    match tokio::time::timeout(timeout, run(pool, user_id, options, timeout)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                user_id,
                timeout_ms = timeout.as_millis() as u64,
                "Checkout transaction timed out"
            );
            Err(CheckoutError::TransactionTimeout)
        }
    }
}

/// `statement_timeout` in whole milliseconds; PostgreSQL treats 0 as "no limit"
fn statement_timeout_ms(timeout: Duration) -> u128 {
    timeout.as_millis().max(1)
}

async fn run(
    pool: &PgPool,
    user_id: i64,
    options: &CheckoutOptions,
    timeout: Duration,
) -> Result<OrderWithItems, CheckoutError> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT set_config('statement_timeout', $1, true)")
        .bind(statement_timeout_ms(timeout).to_string())
        .execute(&mut *tx)
        .await?;

    // 1. Lock the cart and resolve the selection
    let snapshot = cart_snapshot::load(&mut tx, user_id, options.app_ids.as_deref()).await?;

    // 2-3. Authoritative prices, read inside the transaction
    let prices = catalog::find_prices(&mut *tx, &snapshot.app_ids).await?;
    let lines = pricing::price_lines(&snapshot.app_ids, &prices)
        .map_err(|missing| CheckoutError::GameNotFound { missing })?;

    // 4. Coupon
    let coupon = match coupon::normalize_code(options.discount_code.as_deref()) {
        Some(code) => Some(coupon::validate(&mut tx, user_id, &code).await?),
        None => None,
    };
    let quote = pricing::evaluate(&lines, coupon.as_ref());

    if let Some(address_id) = options.billing_address_id {
        addresses::find_owned(&mut *tx, address_id, user_id)
            .await?
            .ok_or(CheckoutError::BillingAddressNotFound(address_id))?;
    }

    // 5. Order header
    let now = now_millis();
    let order = orders::insert(
        &mut *tx,
        &orders::NewOrder {
            user_id,
            order_status: options.order_status.unwrap_or_default(),
            total_price: quote.total,
            discount_code: coupon.as_ref().map(|c| c.code.as_str()),
            discount_order: quote.discount,
            billing_address_id: options.billing_address_id,
            now,
        },
    )
    .await?;

    // 6. Redemption record, the authoritative single-use check
    if let Some(coupon) = &coupon {
        coupons::insert_usage(&mut *tx, user_id, coupon.id, order.id, now)
            .await
            .map_err(|e| {
                if db::is_unique_violation(&e, coupons::USAGE_UNIQUE_CONSTRAINT) {
                    CheckoutError::CouponAlreadyUsed {
                        code: coupon.code.clone(),
                    }
                } else {
                    e.into()
                }
            })?;
    }

    // 7. Price snapshots
    let mut items: Vec<OrderItem> = Vec::with_capacity(lines.len());
    for line in &lines {
        let item = orders::insert_item(
            &mut *tx,
            order.id,
            line.app_id,
            line.unit_price,
            line.discount_percent,
        )
        .await?;
        items.push(item);
    }

    // 8. Purchased items leave the cart
    carts::remove_items(&mut *tx, snapshot.cart.id, &snapshot.app_ids).await?;
    let cart_total = carts::recompute_total(&mut *tx, snapshot.cart.id, now).await?;

    // 9. Commit
    tx.commit().await?;

    tracing::info!(
        user_id,
        order_id = order.id,
        items = items.len(),
        subtotal = %quote.subtotal,
        discount = %quote.discount,
        total = %quote.total,
        coupon_code = order.discount_code.as_deref().unwrap_or(""),
        remaining_cart_total = %cart_total,
        "Order created"
    );

    Ok(OrderWithItems { order, items })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_timeout_never_disables_limit() {
        assert_eq!(statement_timeout_ms(Duration::ZERO), 1);
        assert_eq!(statement_timeout_ms(Duration::from_micros(500)), 1);
        assert_eq!(statement_timeout_ms(Duration::from_secs(5)), 5000);
    }
}
