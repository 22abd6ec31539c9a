//! Handler functions organized by domain:
//! - workspaces: CRUD, invite codes, join flow
//! - members: listing, role changes, removal (role invariants live here)
//! - projects: CRUD scoped by workspace
//! - tasks: CRUD, filtered listing, board move batch (ordering engine)
//! - users: current-user profile operations
//! - reports: month-over-month performance counts

pub mod members;
pub mod projects;
pub mod reports;
pub mod tasks;
pub mod users;
pub mod workspaces;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ApiError;

/// Parse a UUID path/query/body field, rejecting garbage as a validation error.
pub(crate) fn parse_id(value: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(value).map_err(|_| ApiError::invalid(format!("Invalid {what} ID")))
}

/// Names must be non-empty after trimming.
pub(crate) fn require_name(name: &str) -> Result<String, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::invalid("Minimum 1 character required"));
    }
    Ok(trimmed.to_string())
}

/// Wire instants are unix seconds.
pub(crate) fn parse_instant(secs: i64, what: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| ApiError::invalid(format!("Invalid {what}")))
}
