//! Current-user handlers: get, update profile, delete account.

use axum::extract::State;
use axum::Json;
use taskboard_storage::{Store, StoreError};

use crate::api::{ApiUser, Payload, UpdateUserRequest};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::require_name;
use crate::server::AppServer;

pub async fn get_current_user(
    State(server): State<AppServer>,
    auth: AuthUser,
) -> Result<Json<Payload<ApiUser>>, ApiError> {
    let user = server.store.get_user(&auth.0).await.map_err(|e| match e {
        StoreError::NotFound => ApiError::not_found("User not found"),
        other => ApiError::internal(format!("Failed to get user: {other}")),
    })?;

    Ok(Json(Payload::new(user.into())))
}

pub async fn update_current_user(
    State(server): State<AppServer>,
    auth: AuthUser,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<Payload<ApiUser>>, ApiError> {
    let existing = server.store.get_user(&auth.0).await.map_err(|e| match e {
        StoreError::NotFound => ApiError::not_found("User not found"),
        other => ApiError::internal(format!("Failed to get user: {other}")),
    })?;

    let name = require_name(&req.name)?;
    let image = req.image.or(existing.image);

    server
        .store
        .update_user(&auth.0, &name, image)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("User not found"),
            other => ApiError::internal(format!("Failed to update user: {other}")),
        })?;

    let user = server
        .store
        .get_user(&auth.0)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to get user: {e}")))?;

    Ok(Json(Payload::with_message(
        user.into(),
        "User has been updated",
    )))
}

/// Account deletion cascades through owned workspaces and memberships.
pub async fn delete_current_user(
    State(server): State<AppServer>,
    auth: AuthUser,
) -> Result<Json<Payload<ApiUser>>, ApiError> {
    let existing = server.store.get_user(&auth.0).await.map_err(|e| match e {
        StoreError::NotFound => ApiError::not_found("User not found"),
        other => ApiError::internal(format!("Failed to get user: {other}")),
    })?;

    server
        .store
        .delete_user(&auth.0)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::not_found("User not found"),
            other => ApiError::internal(format!("Failed to delete user: {other}")),
        })?;

    Ok(Json(Payload::with_message(
        existing.into(),
        "User and associated data have been deleted",
    )))
}
