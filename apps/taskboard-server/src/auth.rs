//! Authenticated principal extraction.
//!
//! The external auth layer verifies the session and injects the user id in
//! the `x-user-id` header; the server trusts that id once present. A missing
//! or malformed header is an authentication failure, distinct from the
//! authorization failures raised by membership checks.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use taskboard_storage::UserId;
use uuid::Uuid;

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The verified principal for the current request.
#[derive(Clone, Debug)]
pub struct AuthUser(pub UserId);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthenticated("Unauthorized"))?;

        let user_id = Uuid::parse_str(value)
            .map_err(|_| ApiError::unauthenticated("Invalid principal id"))?;

        Ok(AuthUser(UserId(user_id)))
    }
}
