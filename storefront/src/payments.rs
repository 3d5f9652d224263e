//! Payment status updates and their effect on order status
//!
//! Runs independently of checkout, in a transaction of its own: the
//! payment row is always written, the order row only when the payment
//! status maps to something other than `pending`.

use rust_decimal::Decimal;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{OrderStatus, Payment, PaymentStatus};
use shared::util::now_millis;
use sqlx::PgPool;

use crate::db::{orders, payments};
use crate::error::ServiceResult;

/// Order status a payment status drives the order into.
///
/// `None` means "leave the order as it is" (an `initiated` payment).
pub fn order_transition(status: PaymentStatus) -> Option<OrderStatus> {
    match status.order_status() {
        OrderStatus::Pending => None,
        next => Some(next),
    }
}

/// Outcome of a payment status update
#[derive(Debug, Clone, Serialize)]
pub struct PaymentUpdate {
    pub payment: Payment,
    /// Order status after the update
    pub order_status: OrderStatus,
    /// Whether the order row was written
    pub order_updated: bool,
}

/// Record a new payment attempt for an order
pub async fn create_payment(
    pool: &PgPool,
    order_id: i64,
    amount: Option<Decimal>,
    provider: Option<&str>,
) -> ServiceResult<Payment> {
    let order = orders::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id))?;

    let amount = amount.unwrap_or(order.total_price);
    if amount < Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "Payment amount must not be negative",
        )
        .into());
    }

    let payment = payments::insert(pool, order_id, amount, provider, now_millis()).await?;
    tracing::info!(
        payment_id = payment.id,
        order_id,
        amount = %payment.amount,
        "Payment created"
    );
    Ok(payment)
}

/// Set a payment's status and, per [`order_transition`], its order's status
pub async fn update_payment_status(
    pool: &PgPool,
    payment_id: i64,
    status: PaymentStatus,
) -> ServiceResult<PaymentUpdate> {
    let mut tx = pool.begin().await?;
    let now = now_millis();

    let payment = payments::update_status(&mut *tx, payment_id, status, now)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::PaymentNotFound).with_detail("payment_id", payment_id)
        })?;

    let order_updated = match order_transition(status) {
        Some(next) => orders::update_status(&mut *tx, payment.order_id, next, now).await?,
        None => false,
    };

    let order = orders::find_by_id(&mut *tx, payment.order_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", payment.order_id)
        })?;

    tx.commit().await?;

    tracing::info!(
        payment_id,
        order_id = order.id,
        payment_status = status.as_db(),
        order_status = order.order_status.as_db(),
        order_updated,
        "Payment status updated"
    );

    Ok(PaymentUpdate {
        payment,
        order_status: order.order_status,
        order_updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initiated_leaves_order_untouched() {
        assert_eq!(order_transition(PaymentStatus::Initiated), None);
    }

    #[test]
    fn test_transition_table() {
        assert_eq!(
            order_transition(PaymentStatus::Authorized),
            Some(OrderStatus::Paid)
        );
        assert_eq!(
            order_transition(PaymentStatus::Captured),
            Some(OrderStatus::Paid)
        );
        assert_eq!(
            order_transition(PaymentStatus::Canceled),
            Some(OrderStatus::Canceled)
        );
        assert_eq!(
            order_transition(PaymentStatus::Failed),
            Some(OrderStatus::Failed)
        );
        assert_eq!(
            order_transition(PaymentStatus::Refunded),
            Some(OrderStatus::Refunded)
        );
    }
}
