//! User JWT authentication
//!
//! Tokens are issued by the account service (HS256, shared secret). The
//! middleware verifies them and stores a [`UserIdentity`] in the request
//! extensions; handlers take it as an extractor.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::state::AppState;

/// User role carried in the token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// JWT claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (decimal string)
    pub sub: String,
    pub username: String,
    pub role: Role,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated user extracted from JWT
#[derive(Debug, Clone)]
pub struct UserIdentity {
    pub user_id: i64,
    pub username: String,
    pub is_admin: bool,
}

impl TryFrom<Claims> for UserIdentity {
    type Error = std::num::ParseIntError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: claims.sub.parse()?,
            username: claims.username,
            is_admin: claims.role == Role::Admin,
        })
    }
}

const JWT_EXPIRY_HOURS: i64 = 24;

/// Create a JWT token for a user
pub fn create_token(
    user_id: i64,
    username: &str,
    role: Role,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        role,
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify a token and turn its claims into an identity
pub fn verify_token(token: &str, secret: &str) -> Result<UserIdentity, AppError> {
    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            ErrorKind::ExpiredSignature => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    UserIdentity::try_from(token_data.claims)
        .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {e}")))
}

/// Middleware that extracts and verifies the user JWT from the Authorization header
pub async fn user_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::NotAuthenticated, "Missing Authorization header")
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::invalid_token("Invalid Authorization format"))?;

    let identity = verify_token(token, &state.jwt_secret)?;
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Middleware that only lets administrators through.
///
/// Must be layered inside [`user_auth_middleware`].
pub async fn admin_middleware(request: Request, next: Next) -> Result<Response, AppError> {
    let is_admin = request
        .extensions()
        .get::<UserIdentity>()
        .map(|identity| identity.is_admin)
        .ok_or_else(AppError::not_authenticated)?;

    if !is_admin {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    Ok(next.run(request).await)
}

impl<S: Send + Sync> FromRequestParts<S> for UserIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserIdentity>()
            .cloned()
            .ok_or_else(AppError::not_authenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_round_trip() {
        let token = create_token(42, "alice", Role::User, SECRET).unwrap();
        let identity = verify_token(&token, SECRET).unwrap();
        assert_eq!(identity.user_id, 42);
        assert_eq!(identity.username, "alice");
        assert!(!identity.is_admin);
    }

    #[test]
    fn test_admin_role() {
        let token = create_token(1, "root", Role::Admin, SECRET).unwrap();
        assert!(verify_token(&token, SECRET).unwrap().is_admin);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = create_token(42, "alice", Role::User, SECRET).unwrap();
        let err = verify_token(&token, "other-secret").unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn test_expired_token() {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "42".into(),
            username: "alice".into(),
            role: Role::User,
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        let err = verify_token(&token, SECRET).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenExpired);
    }

    #[test]
    fn test_non_numeric_subject_rejected() {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "not-a-number".into(),
            username: "alice".into(),
            role: Role::User,
            exp: now + 3600,
            iat: now,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        let err = verify_token(&token, SECRET).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }
}
