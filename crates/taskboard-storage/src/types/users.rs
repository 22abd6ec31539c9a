//! User types.

use chrono::{DateTime, Utc};

use super::UserId;

/// User record.
///
/// `password_hash` belongs to the external auth layer; it is stored here so
/// account deletion can cascade, but it never crosses the API boundary.
#[derive(Clone, Debug)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating a user.
#[derive(Clone, Debug)]
pub struct CreateUserParams {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub image: Option<String>,
}
