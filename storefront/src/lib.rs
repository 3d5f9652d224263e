//! storefront: cart, checkout and order service for the game store
//!
//! - Cart mutations (the only writers of the cached cart total)
//! - Atomic checkout with coupon redemption and price snapshots
//! - Order reads for the signed-in user
//! - Admin payment updates driving order status

pub mod api;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod db;
pub mod error;
pub mod payments;
pub mod state;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use state::AppState;
