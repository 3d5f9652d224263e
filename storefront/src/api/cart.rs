//! Cart endpoints

use axum::extract::{Path, State};
use serde::Deserialize;
use shared::ApiResponse;
use shared::models::CartView;
use validator::Validate;

use super::ApiResult;
use super::extract::ValidatedJson;
use crate::auth::UserIdentity;
use crate::cart;
use crate::state::AppState;

/// POST /api/cart/items
#[derive(Debug, Deserialize, Validate)]
pub struct AddCartItemRequest {
    #[validate(range(min = 1))]
    pub app_id: i64,
}

/// GET /api/cart
pub async fn get_cart(
    State(state): State<AppState>,
    identity: UserIdentity,
) -> ApiResult<CartView> {
    let view = cart::view(&state.pool, identity.user_id).await?;
    Ok(ApiResponse::success(view))
}

pub async fn add_item(
    State(state): State<AppState>,
    identity: UserIdentity,
    ValidatedJson(req): ValidatedJson<AddCartItemRequest>,
) -> ApiResult<CartView> {
    let view = cart::add_item(&state.pool, identity.user_id, req.app_id).await?;
    Ok(ApiResponse::success_with_message("Item added to cart", view))
}

/// DELETE /api/cart/items/{app_id}
pub async fn remove_item(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(app_id): Path<i64>,
) -> ApiResult<CartView> {
    let view = cart::remove_item(&state.pool, identity.user_id, app_id).await?;
    Ok(ApiResponse::success_with_message("Item removed from cart", view))
}

/// DELETE /api/cart
pub async fn clear_cart(
    State(state): State<AppState>,
    identity: UserIdentity,
) -> ApiResult<CartView> {
    let view = cart::clear(&state.pool, identity.user_id).await?;
    Ok(ApiResponse::success_with_message("Cart cleared", view))
}
