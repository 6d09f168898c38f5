//! Customization endpoints - /api/customizations

use crate::api::ApiError;
use crate::models::{Customization, NewCustomization, UpdateCustomization};
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
        .route("/api/customizations", post(create).get(list))
        .route(
            "/api/customizations/:id",
            get(get_one).patch(update).delete(remove),
        )
        .with_state(db)
}

async fn create(
    State(db): State<Arc<Database>>,
    Json(payload): Json<NewCustomization>,
) -> Result<(StatusCode, Json<Customization>), ApiError> {
    let customization = db
        .create_customization(&payload)
        .map_err(ApiError::internal)?;
    Ok((StatusCode::CREATED, Json(customization)))
}

async fn list(State(db): State<Arc<Database>>) -> Result<Json<Vec<Customization>>, ApiError> {
    let customizations = db.list_customizations().map_err(ApiError::internal)?;
    if customizations.is_empty() {
        return Err(ApiError::NoneRegistered("No customizations registered yet"));
    }
    Ok(Json(customizations))
}

async fn get_one(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
) -> Result<Json<Customization>, ApiError> {
    let customization = db
        .get_customization(id)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("Customization not found"))?;
    Ok(Json(customization))
}

async fn update(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCustomization>,
) -> Result<Json<Customization>, ApiError> {
    let customization = db
        .update_customization(id, &payload)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("Customization not found"))?;
    Ok(Json(customization))
}

async fn remove(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !db.delete_customization(id).map_err(ApiError::internal)? {
        return Err(ApiError::NotFound("Customization not found"));
    }
    Ok(Json(
        json!({ "message": "Customization deleted successfully" }),
    ))
}
