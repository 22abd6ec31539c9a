//! Current-user handler tests.

use axum::extract::State;
use axum::Json;
use taskboard_storage::{Store, StoreError, UserId};
use uuid::Uuid;

use super::super::common::*;
use crate::api::UpdateUserRequest;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::users::*;

#[tokio::test]
async fn get_current_user_returns_profile() {
    let server = create_test_server().await;
    let user = create_test_user(&server, "owner@example.com").await;

    let payload = get_current_user(State(server.clone()), auth_as(&user))
        .await
        .unwrap()
        .0;
    assert_eq!(payload.data.email, "owner@example.com");
    assert_eq!(payload.data.name, "owner");
}

#[tokio::test]
async fn unknown_principal_is_not_found() {
    let server = create_test_server().await;

    let err = get_current_user(State(server.clone()), AuthUser(UserId(Uuid::now_v7())))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn update_current_user_changes_name() {
    let server = create_test_server().await;
    let user = create_test_user(&server, "owner@example.com").await;

    let payload = update_current_user(
        State(server.clone()),
        auth_as(&user),
        Json(UpdateUserRequest {
            name: "New Name".to_string(),
            image: None,
        }),
    )
    .await
    .unwrap()
    .0;
    assert_eq!(payload.data.name, "New Name");

    let err = update_current_user(
        State(server.clone()),
        auth_as(&user),
        Json(UpdateUserRequest {
            name: "  ".to_string(),
            image: None,
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Invalid(_)));
}

#[tokio::test]
async fn delete_current_user_cascades_owned_data() {
    let server = create_test_server().await;
    let user = create_test_user(&server, "owner@example.com").await;
    let workspace = create_test_workspace(&server, &user.id, "acme").await;
    let member = owner_member(&server, &workspace).await;

    delete_current_user(State(server.clone()), auth_as(&user))
        .await
        .unwrap();

    assert!(matches!(
        server.store.get_user(&user.id).await.unwrap_err(),
        StoreError::NotFound
    ));
    assert!(matches!(
        server.store.get_workspace(&workspace.id).await.unwrap_err(),
        StoreError::NotFound
    ));
    assert!(matches!(
        server.store.get_member(&member.id).await.unwrap_err(),
        StoreError::NotFound
    ));
}
