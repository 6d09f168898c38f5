//! Prescription history endpoints - /api/histories

use crate::api::ApiError;
use crate::models::{HistoryEntry, NewHistoryEntry, UpdateHistoryEntry};
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
        .route("/api/histories", post(create).get(list))
        .route(
            "/api/histories/:id",
            get(get_one).patch(update).delete(remove),
        )
        .with_state(db)
}

/// Creation checks that the referenced prescription exists.
async fn create(
    State(db): State<Arc<Database>>,
    Json(payload): Json<NewHistoryEntry>,
) -> Result<(StatusCode, Json<HistoryEntry>), ApiError> {
    if db
        .get_prescription(payload.prescription_id)
        .map_err(ApiError::internal)?
        .is_none()
    {
        return Err(ApiError::NotFound("Prescription not found"));
    }

    let entry = db
        .create_history_entry(&payload)
        .map_err(ApiError::internal)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn list(State(db): State<Arc<Database>>) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let entries = db.list_history_entries().map_err(ApiError::internal)?;
    if entries.is_empty() {
        return Err(ApiError::NoneRegistered("No history entries registered yet"));
    }
    Ok(Json(entries))
}

async fn get_one(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
) -> Result<Json<HistoryEntry>, ApiError> {
    let entry = db
        .get_history_entry(id)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("History entry not found"))?;
    Ok(Json(entry))
}

async fn update(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateHistoryEntry>,
) -> Result<Json<HistoryEntry>, ApiError> {
    let entry = db
        .update_history_entry(id, &payload)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("History entry not found"))?;
    Ok(Json(entry))
}

async fn remove(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !db.delete_history_entry(id).map_err(ApiError::internal)? {
        return Err(ApiError::NotFound("History entry not found"));
    }
    Ok(Json(
        json!({ "message": "History entry deleted successfully" }),
    ))
}
