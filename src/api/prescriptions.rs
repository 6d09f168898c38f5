//! Prescription endpoints - /api/prescriptions

use crate::api::ApiError;
use crate::models::{NewPrescription, Prescription, UpdatePrescription};
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
        .route("/api/prescriptions", post(create).get(list))
        .route(
            "/api/prescriptions/:id",
            get(get_one).patch(update).delete(remove),
        )
        .with_state(db)
}

async fn create(
    State(db): State<Arc<Database>>,
    Json(payload): Json<NewPrescription>,
) -> Result<(StatusCode, Json<Prescription>), ApiError> {
    if db
        .get_client(payload.client_id)
        .map_err(ApiError::internal)?
        .is_none()
    {
        return Err(ApiError::NotFound("Client not found"));
    }

    let prescription = db
        .create_prescription(&payload)
        .map_err(ApiError::internal)?;
    Ok((StatusCode::CREATED, Json(prescription)))
}

async fn list(State(db): State<Arc<Database>>) -> Result<Json<Vec<Prescription>>, ApiError> {
    let prescriptions = db.list_prescriptions().map_err(ApiError::internal)?;
    if prescriptions.is_empty() {
        return Err(ApiError::NoneRegistered("No prescriptions registered yet"));
    }
    Ok(Json(prescriptions))
}

async fn get_one(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
) -> Result<Json<Prescription>, ApiError> {
    let prescription = db
        .get_prescription(id)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("Prescription not found"))?;
    Ok(Json(prescription))
}

async fn update(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePrescription>,
) -> Result<Json<Prescription>, ApiError> {
    let prescription = db
        .update_prescription(id, &payload)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("Prescription not found"))?;
    Ok(Json(prescription))
}

async fn remove(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !db.delete_prescription(id).map_err(ApiError::internal)? {
        return Err(ApiError::NotFound("Prescription not found"));
    }
    Ok(Json(
        json!({ "message": "Prescription deleted successfully" }),
    ))
}
