//! HTTP round trips against a real PostgreSQL.
//!
//! Run with `DATABASE_URL=postgres://... cargo test -- --ignored`.

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use storefront::AppState;
use storefront::auth::{Role, create_token};
use tower::ServiceExt;

const SECRET: &str = "orders-api-secret";

async fn seed(pool: &PgPool) {
    sqlx::raw_sql(
        "INSERT INTO users (id, username, email, role, created_at) VALUES
             (1, 'alice', 'alice@example.com', 'user', 0),
             (2, 'bob', 'bob@example.com', 'user', 0),
             (3, 'root', 'root@example.com', 'admin', 0);
         INSERT INTO games (app_id, name, price_final, discount_percent) VALUES
             (1, 'Alpha', 20.00, 0),
             (2, 'Beta', 30.00, 0);
         INSERT INTO coupons (code, discount_type, value) VALUES ('SAVE10', 'percentage', 10);
         INSERT INTO billing_addresses (id, user_id, full_name, line1, city, postal_code, country) VALUES
             (10, 1, 'Alice Example', '1 Main St', 'Springfield', '12345', 'US');",
    )
    .execute(pool)
    .await
    .unwrap();
}

fn token(user_id: i64, role: Role) -> String {
    format!(
        "Bearer {}",
        create_token(user_id, "tester", role, SECRET).unwrap()
    )
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    auth: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, auth);
    let body = match body {
        Some(json) => {
            builder = builder.header(http::header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL DATABASE_URL"]
async fn checkout_then_read_orders(pool: PgPool) {
    seed(&pool).await;
    let app = storefront::api::create_router(AppState::with_pool(
        pool,
        SECRET,
        Duration::from_secs(5),
    ));
    let alice = token(1, Role::User);

    for app_id in [1, 2] {
        let body = json!({ "app_id": app_id });
        let (status, _) = call(&app, "POST", "/api/cart/items", &alice, Some(body)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = call(
        &app,
        "POST",
        "/api/orders",
        &alice,
        Some(json!({ "discount_code": "save10", "billing_address_id": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Order created");
    let order = &body["data"]["order"];
    assert_eq!(order["total_price"], json!(45.0));
    assert_eq!(order["discount_order"], json!(5.0));
    assert_eq!(order["order_status"], "pending");
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    let order_id = order["id"].as_i64().unwrap();

    let (status, body) = call(&app, "GET", &format!("/api/orders/{order_id}"), &alice, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["billing_address"]["city"], "Springfield");

    let uri = "/api/orders?sort=total_price&order=asc";
    let (status, body) = call(&app, "GET", uri, &alice, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["orders"][0]["id"], order_id);

    // Someone else's order is invisible
    let bob = token(2, Role::User);
    let (status, body) = call(&app, "GET", &format!("/api/orders/{order_id}"), &bob, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 4001);

    // Reusing the coupon conflicts
    call(&app, "POST", "/api/cart/items", &alice, Some(json!({ "app_id": 1 }))).await;
    let body = json!({ "discount_code": "SAVE10" });
    let (status, body) = call(&app, "POST", "/api/orders", &alice, Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], 5002);

    // Admin captures a payment and the order becomes paid
    let root = token(3, Role::Admin);
    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/admin/orders/{order_id}/payments"),
        &root,
        Some(json!({ "provider": "stripe" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let payment_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = call(
        &app,
        "PUT",
        &format!("/api/admin/payments/{payment_id}/status"),
        &root,
        Some(json!({ "payment_status": "captured" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order_status"], "paid");
    assert_eq!(body["data"]["payment"]["payment_status"], "captured");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL DATABASE_URL"]
async fn selection_outside_cart_returns_envelope(pool: PgPool) {
    seed(&pool).await;
    let app = storefront::api::create_router(AppState::with_pool(
        pool,
        SECRET,
        Duration::from_secs(5),
    ));
    let alice = token(1, Role::User);
    call(&app, "POST", "/api/cart/items", &alice, Some(json!({ "app_id": 1 }))).await;

    let body = json!({ "app_ids": [99] });
    let (status, body) = call(&app, "POST", "/api/orders", &alice, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], 3004);
    assert_eq!(body["error"]["details"]["missing_app_ids"], json!([99]));
}
