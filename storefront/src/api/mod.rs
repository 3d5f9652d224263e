//! API routes for the storefront

pub mod admin;
pub mod cart;
pub mod extract;
pub mod health;
pub mod orders;

use axum::routing::{delete, get, post, put};
use axum::{Router, middleware};
use shared::ApiResponse;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{admin_middleware, user_auth_middleware};
use crate::error::ServiceError;
use crate::state::AppState;

/// Handler result: success envelope or an error rendered as the error envelope
pub type ApiResult<T> = Result<ApiResponse<T>, ServiceError>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Back-office (JWT + admin role)
    let admin = Router::new()
        .route(
            "/api/admin/orders/{id}/payments",
            post(admin::create_payment),
        )
        .route("/api/admin/payments/{id}", get(admin::get_payment))
        .route(
            "/api/admin/payments/{id}/status",
            put(admin::update_payment_status),
        )
        .layer(middleware::from_fn(admin_middleware));

    // Signed-in users (JWT). Layered last so it runs before the admin check.
    let user = Router::new()
        .route("/api/cart", get(cart::get_cart).delete(cart::clear_cart))
        .route("/api/cart/items", post(cart::add_item))
        .route("/api/cart/items/{app_id}", delete(cart::remove_item))
        .route("/api/orders", get(orders::list_orders).post(orders::checkout))
        .route("/api/orders/{id}", get(orders::get_order))
        .merge(admin)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            user_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(user)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
