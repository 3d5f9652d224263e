//! Admin payment endpoints

use axum::extract::{Path, State};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::ApiResponse;
use shared::error::{AppError, ErrorCode};
use shared::models::{Payment, PaymentStatus};
use validator::Validate;

use super::ApiResult;
use super::extract::ValidatedJson;
use crate::auth::UserIdentity;
use crate::db;
use crate::payments::{self, PaymentUpdate};
use crate::state::AppState;

/// POST /api/admin/orders/{id}/payments
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreatePaymentRequest {
    /// Defaults to the order total
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    #[validate(length(min = 1, max = 64))]
    pub provider: Option<String>,
}

pub async fn create_payment(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(order_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<CreatePaymentRequest>,
) -> ApiResult<Payment> {
    let payment =
        payments::create_payment(&state.pool, order_id, req.amount, req.provider.as_deref())
            .await?;
    tracing::info!(
        admin = %identity.username,
        payment_id = payment.id,
        order_id,
        "Admin created payment"
    );
    Ok(ApiResponse::success_with_message("Payment created", payment))
}

/// GET /api/admin/payments/{id}
pub async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<i64>,
) -> ApiResult<Payment> {
    let payment = db::payments::find_by_id(&state.pool, payment_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::PaymentNotFound).with_detail("payment_id", payment_id)
        })?;
    Ok(ApiResponse::success(payment))
}

/// PUT /api/admin/payments/{id}/status
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePaymentStatusRequest {
    #[validate(length(min = 1, max = 32))]
    pub payment_status: String,
}

pub async fn update_payment_status(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(payment_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdatePaymentStatusRequest>,
) -> ApiResult<PaymentUpdate> {
    let status = PaymentStatus::from_db(&req.payment_status).ok_or_else(|| {
        AppError::new(ErrorCode::InvalidPaymentStatus)
            .with_detail("payment_status", req.payment_status.as_str())
    })?;

    let update = payments::update_payment_status(&state.pool, payment_id, status).await?;
    tracing::info!(
        admin = %identity.username,
        payment_id,
        payment_status = status.as_db(),
        "Admin updated payment status"
    );
    Ok(ApiResponse::success_with_message("Payment status updated", update))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_payment_request_amount_optional() {
        let req: CreatePaymentRequest = serde_json::from_str("{}").unwrap();
        assert!(req.amount.is_none());
        assert!(req.provider.is_none());

        let req: CreatePaymentRequest =
            serde_json::from_str(r#"{"amount": 12.5, "provider": "stripe"}"#).unwrap();
        assert_eq!(req.amount, Some(Decimal::new(125, 1)));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_blank_provider_rejected() {
        let req = CreatePaymentRequest {
            provider: Some(String::new()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
