//! Client endpoints - /api/clients

use crate::api::ApiError;
use crate::models::{Client, NewClient, UpdateClient};
use crate::storage::Database;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

pub fn router(db: Arc<Database>) -> Router {
    Router::new()
        .route("/api/clients", post(create).get(list))
        .route("/api/clients/:id", get(get_one).patch(update).delete(remove))
        .with_state(db)
}

async fn create(
    State(db): State<Arc<Database>>,
    Json(payload): Json<NewClient>,
) -> Result<(StatusCode, Json<Client>), ApiError> {
    let client = db.create_client(&payload).map_err(ApiError::internal)?;
    Ok((StatusCode::CREATED, Json(client)))
}

async fn list(State(db): State<Arc<Database>>) -> Result<Json<Vec<Client>>, ApiError> {
    let clients = db.list_clients().map_err(ApiError::internal)?;
    if clients.is_empty() {
        return Err(ApiError::NoneRegistered("No clients registered yet"));
    }
    Ok(Json(clients))
}

async fn get_one(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
) -> Result<Json<Client>, ApiError> {
    let client = db
        .get_client(id)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("Client not found"))?;
    Ok(Json(client))
}

async fn update(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateClient>,
) -> Result<Json<Client>, ApiError> {
    let client = db
        .update_client(id, &payload)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("Client not found"))?;
    Ok(Json(client))
}

async fn remove(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !db.delete_client(id).map_err(ApiError::internal)? {
        return Err(ApiError::NotFound("Client not found"));
    }
    Ok(Json(json!({ "message": "Client deleted successfully" })))
}
