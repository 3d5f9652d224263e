//! Order endpoints: checkout, order list, order detail

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use shared::ApiResponse;
use shared::error::{AppError, ErrorCode};
use shared::models::{OrderDetail, OrderItem, OrderWithItems};
use validator::Validate;

use super::extract::ValidatedJson;
use crate::auth::UserIdentity;
use crate::checkout::{self, CheckoutOptions};
use crate::db::addresses;
use crate::db::orders::{self, OrderSortKey, SortDirection};
use crate::error::ServiceError;
use crate::state::AppState;

use super::ApiResult;

const DEFAULT_PER_PAGE: i64 = 20;
const MAX_PER_PAGE: i64 = 100;

/// POST /api/orders
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CheckoutRequest {
    /// Games to buy; the whole cart when absent
    #[validate(length(max = 500))]
    pub app_ids: Option<Vec<i64>>,
    #[validate(length(max = 64))]
    pub discount_code: Option<String>,
    pub billing_address_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order: OrderWithItems,
}

pub async fn checkout(
    State(state): State<AppState>,
    identity: UserIdentity,
    ValidatedJson(req): ValidatedJson<CheckoutRequest>,
) -> Result<(StatusCode, ApiResponse<CheckoutResponse>), ServiceError> {
    let options = CheckoutOptions {
        app_ids: req.app_ids,
        discount_code: req.discount_code,
        order_status: None,
        billing_address_id: req.billing_address_id,
    };

    let order = checkout::create_order(
        &state.pool,
        identity.user_id,
        &options,
        state.checkout_timeout,
    )
    .await
    .map_err(AppError::from)?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message("Order created", CheckoutResponse { order }),
    ))
}

/// GET /api/orders
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Validated listing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams {
    pub sort: OrderSortKey,
    pub direction: SortDirection,
    pub page: i64,
    pub per_page: i64,
}

impl ListParams {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl TryFrom<&OrdersQuery> for ListParams {
    type Error = AppError;

    fn try_from(query: &OrdersQuery) -> Result<Self, Self::Error> {
        let sort = match query.sort.as_deref() {
            Some(key) => OrderSortKey::parse(key).ok_or_else(|| {
                AppError::invalid_request(format!("Unsupported sort key: {key}"))
                    .with_detail("sort", key)
            })?,
            None => OrderSortKey::default(),
        };
        let direction = match query.order.as_deref() {
            Some(dir) => SortDirection::parse(dir).ok_or_else(|| {
                AppError::invalid_request(format!("Unsupported sort order: {dir}"))
                    .with_detail("order", dir)
            })?,
            None => SortDirection::default(),
        };

        let page = query.page.unwrap_or(1).max(1);
        let per_page = query
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        if (page - 1).checked_mul(per_page).is_none() {
            return Err(AppError::invalid_request(format!("Page out of range: {page}"))
                .with_detail("page", page));
        }

        Ok(Self {
            sort,
            direction,
            page,
            per_page,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct OrderPage {
    pub orders: Vec<OrderWithItems>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

pub async fn list_orders(
    State(state): State<AppState>,
    identity: UserIdentity,
    Query(query): Query<OrdersQuery>,
) -> ApiResult<OrderPage> {
    let params = ListParams::try_from(&query)?;

    let headers = orders::list_for_user(
        &state.pool,
        identity.user_id,
        params.sort,
        params.direction,
        params.per_page,
        params.offset(),
    )
    .await?;
    let total = orders::count_for_user(&state.pool, identity.user_id).await?;

    let ids: Vec<i64> = headers.iter().map(|o| o.id).collect();
    let mut items_by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for item in orders::list_items_for_orders(&state.pool, &ids).await? {
        items_by_order.entry(item.order_id).or_default().push(item);
    }

    let orders = headers
        .into_iter()
        .map(|order| OrderWithItems {
            items: items_by_order.remove(&order.id).unwrap_or_default(),
            order,
        })
        .collect();

    Ok(ApiResponse::success(OrderPage {
        orders,
        page: params.page,
        per_page: params.per_page,
        total,
    }))
}

/// GET /api/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(order_id): Path<i64>,
) -> ApiResult<OrderDetail> {
    let order = orders::find_for_user(&state.pool, order_id, identity.user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id))?;

    let items = orders::list_items(&state.pool, order.id).await?;

    // Enrichment only: a failed lookup degrades to null
    let billing_address = match order.billing_address_id {
        Some(address_id) => {
            match addresses::find_owned(&state.pool, address_id, identity.user_id).await {
                Ok(address) => address,
                Err(e) => {
                    tracing::warn!(
                        order_id,
                        address_id,
                        error = %e,
                        "Failed to load billing address"
                    );
                    None
                }
            }
        }
        None => None,
    };

    Ok(ApiResponse::success(OrderDetail {
        order,
        items,
        billing_address,
    }))
}
