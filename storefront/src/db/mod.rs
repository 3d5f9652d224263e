//! Database access layer
//!
//! Free functions over `sqlx` executors. Single-statement helpers accept any
//! [`sqlx::PgExecutor`] so they run equally on the pool or inside a
//! transaction (`&mut *tx`).

pub mod addresses;
pub mod carts;
pub mod catalog;
pub mod coupons;
pub mod orders;
pub mod payments;

/// SQLSTATE for `unique_violation`
pub const UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE for `query_canceled` (raised by `statement_timeout`)
pub const QUERY_CANCELED: &str = "57014";

/// Whether `err` is a unique violation on the named constraint
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
                && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

/// Whether `err` reports a statement cancelled by `statement_timeout`
pub fn is_query_canceled(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(QUERY_CANCELED),
        _ => false,
    }
}

/// Whether `err` is a timeout: no pooled connection in time, or a cancelled statement
pub fn is_timeout(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::PoolTimedOut) || is_query_canceled(err)
}
