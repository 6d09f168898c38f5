//! User management endpoints - /api/users
//!
//! Registration is public; the remaining operations sit behind the auth
//! middleware, with listing and deletion reserved for admins. Route wiring
//! lives in [`crate::app`] because of that split.

use crate::api::ApiError;
use crate::auth::models::{CreateUserRequest, Role, UpdateUserRequest, UserResponse};
use crate::auth::user_store::UserStore;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Register a new user - POST /api/users
pub async fn create(
    State(store): State<Arc<UserStore>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    if store
        .get_user_by_email(&payload.email)
        .map_err(ApiError::internal)?
        .is_some()
    {
        return Err(ApiError::EmailTaken);
    }

    let role = payload.role.unwrap_or(Role::User);
    let user = store
        .create_user(&payload.name, &payload.email, &payload.password, role)
        .map_err(ApiError::internal)?;

    info!("user registered: {}", user.email);

    Ok((StatusCode::CREATED, Json(UserResponse::from_user(&user))))
}

/// List all users - GET /api/users (admin only)
pub async fn list(State(store): State<Arc<UserStore>>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = store.list_users().map_err(ApiError::internal)?;
    if users.is_empty() {
        return Err(ApiError::NoneRegistered("No users registered yet"));
    }

    let response = users.iter().map(UserResponse::from_user).collect();
    Ok(Json(response))
}

/// Get a user by ID - GET /api/users/:id
pub async fn get_one(
    State(store): State<Arc<UserStore>>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = store
        .get_user(id)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("User not found"))?;
    Ok(Json(UserResponse::from_user(&user)))
}

/// Update a user - PATCH /api/users/:id
pub async fn update(
    State(store): State<Arc<UserStore>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = store
        .update_user(id, &payload)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("User not found"))?;
    Ok(Json(UserResponse::from_user(&user)))
}

/// Delete a user - DELETE /api/users/:id (admin only)
pub async fn remove(
    State(store): State<Arc<UserStore>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !store.delete_user(id).map_err(ApiError::internal)? {
        return Err(ApiError::NotFound("User not found"));
    }
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
