//! Orders and order items

use rust_decimal::Decimal;
use shared::models::{Order, OrderItem, OrderStatus};
use sqlx::PgExecutor;

/// Whitelisted sort keys for order listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderSortKey {
    #[default]
    CreatedAt,
    TotalPrice,
    OrderStatus,
    Id,
}

impl OrderSortKey {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created_at" => Some(Self::CreatedAt),
            "total_price" => Some(Self::TotalPrice),
            "order_status" => Some(Self::OrderStatus),
            "id" => Some(Self::Id),
            _ => None,
        }
    }

    /// Column identifier. Only these literals ever reach the SQL text.
    pub fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::TotalPrice => "total_price",
            Self::OrderStatus => "order_status",
            Self::Id => "id",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Case-insensitive `asc` / `desc`
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Order header to insert
#[derive(Debug, Clone)]
pub struct NewOrder<'a> {
    pub user_id: i64,
    pub order_status: OrderStatus,
    pub total_price: Decimal,
    pub discount_code: Option<&'a str>,
    pub discount_order: Decimal,
    pub billing_address_id: Option<i64>,
    pub now: i64,
}

pub async fn insert(
    executor: impl PgExecutor<'_>,
    order: &NewOrder<'_>,
) -> Result<Order, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO orders
             (user_id, order_status, total_price, discount_code, discount_order,
              billing_address_id, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
         RETURNING *",
    )
    .bind(order.user_id)
    .bind(order.order_status.as_db())
    .bind(order.total_price)
    .bind(order.discount_code)
    .bind(order.discount_order)
    .bind(order.billing_address_id)
    .bind(order.now)
    .fetch_one(executor)
    .await
}

pub async fn insert_item(
    executor: impl PgExecutor<'_>,
    order_id: i64,
    app_id: i64,
    unit_price_paid: Decimal,
    discount_percent_applied: i32,
) -> Result<OrderItem, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO order_items (order_id, app_id, unit_price_paid, discount_percent_applied)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(order_id)
    .bind(app_id)
    .bind(unit_price_paid)
    .bind(discount_percent_applied)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id(
    executor: impl PgExecutor<'_>,
    order_id: i64,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE id = $1")
        .bind(order_id)
        .fetch_optional(executor)
        .await
}

/// Find an order only if it belongs to `user_id`
pub async fn find_for_user(
    executor: impl PgExecutor<'_>,
    order_id: i64,
    user_id: i64,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE id = $1 AND user_id = $2")
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await
}

pub async fn list_items(
    executor: impl PgExecutor<'_>,
    order_id: i64,
) -> Result<Vec<OrderItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id")
        .bind(order_id)
        .fetch_all(executor)
        .await
}

/// Items of several orders in one round trip
pub async fn list_items_for_orders(
    executor: impl PgExecutor<'_>,
    order_ids: &[i64],
) -> Result<Vec<OrderItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_items WHERE order_id = ANY($1) ORDER BY order_id, id")
        .bind(order_ids)
        .fetch_all(executor)
        .await
}

/// One page of a user's orders.
///
/// The ORDER BY clause is assembled from whitelisted identifiers only.
pub async fn list_for_user(
    executor: impl PgExecutor<'_>,
    user_id: i64,
    sort: OrderSortKey,
    direction: SortDirection,
    limit: i64,
    offset: i64,
) -> Result<Vec<Order>, sqlx::Error> {
    let sql = format!(
        "SELECT * FROM orders WHERE user_id = $1 ORDER BY {} {}, id {} LIMIT $2 OFFSET $3",
        sort.column(),
        direction.keyword(),
        direction.keyword(),
    );
    sqlx::query_as(&sql)
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await
}

pub async fn count_for_user(
    executor: impl PgExecutor<'_>,
    user_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(executor)
        .await
}

/// Returns `false` when the order does not exist
pub async fn update_status(
    executor: impl PgExecutor<'_>,
    order_id: i64,
    status: OrderStatus,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE orders SET order_status = $1, updated_at = $2 WHERE id = $3")
        .bind(status.as_db())
        .bind(now)
        .bind(order_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_whitelist() {
        assert_eq!(OrderSortKey::parse("total_price"), Some(OrderSortKey::TotalPrice));
        assert_eq!(OrderSortKey::parse("created_at").unwrap().column(), "created_at");
        assert_eq!(OrderSortKey::parse("total_price; DROP TABLE orders"), None);
        assert_eq!(OrderSortKey::parse("TOTAL_PRICE"), None);
        assert_eq!(OrderSortKey::default(), OrderSortKey::CreatedAt);
    }

    #[test]
    fn test_sort_direction() {
        assert_eq!(SortDirection::parse("ASC"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::parse("desc"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("sideways"), None);
        assert_eq!(SortDirection::default().keyword(), "DESC");
    }
}
