//! Authentication middleware for storefront users and administrators

pub mod user_auth;

pub use user_auth::{
    Claims, Role, UserIdentity, admin_middleware, create_token, user_auth_middleware,
};
