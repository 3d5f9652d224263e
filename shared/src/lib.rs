//! Shared types for the storefront
//!
//! Wire-level types used by the server and its clients: the error code
//! taxonomy, the JSON response envelope and the checkout domain models.

pub mod error;
pub mod models;
pub mod util;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
