//! Image endpoints - /api/images

use crate::api::ApiError;
use crate::models::{Image, NewImage, UpdateImage};
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
        .route("/api/images", post(create).get(list))
        .route("/api/images/:id", get(get_one).patch(update).delete(remove))
        .with_state(db)
}

async fn create(
    State(db): State<Arc<Database>>,
    Json(payload): Json<NewImage>,
) -> Result<(StatusCode, Json<Image>), ApiError> {
    let image = db.create_image(&payload).map_err(ApiError::internal)?;
    Ok((StatusCode::CREATED, Json(image)))
}

/// Unlike the other collections, an empty image list is an ordinary `[]`.
async fn list(State(db): State<Arc<Database>>) -> Result<Json<Vec<Image>>, ApiError> {
    let images = db.list_images().map_err(ApiError::internal)?;
    Ok(Json(images))
}

async fn get_one(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
) -> Result<Json<Image>, ApiError> {
    let image = db
        .get_image(id)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("Image not found"))?;
    Ok(Json(image))
}

async fn update(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateImage>,
) -> Result<Json<Image>, ApiError> {
    let image = db
        .update_image(id, &payload)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("Image not found"))?;
    Ok(Json(image))
}

async fn remove(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !db.delete_image(id).map_err(ApiError::internal)? {
        return Err(ApiError::NotFound("Image not found"));
    }
    Ok(Json(json!({ "message": "Image deleted successfully" })))
}
