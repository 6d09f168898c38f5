//! Product endpoints - /api/products

use crate::api::ApiError;
use crate::models::{NewProduct, Product, UpdateProduct};
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
        .route("/api/products", post(create).get(list))
        .route(
            "/api/products/:id",
            get(get_one).patch(update).delete(remove),
        )
        .with_state(db)
}

async fn create(
    State(db): State<Arc<Database>>,
    Json(payload): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = db.create_product(&payload).map_err(ApiError::internal)?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn list(State(db): State<Arc<Database>>) -> Result<Json<Vec<Product>>, ApiError> {
    let products = db.list_products().map_err(ApiError::internal)?;
    if products.is_empty() {
        return Err(ApiError::NoneRegistered("No products registered yet"));
    }
    Ok(Json(products))
}

async fn get_one(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
) -> Result<Json<Product>, ApiError> {
    let product = db
        .get_product(id)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("Product not found"))?;
    Ok(Json(product))
}

async fn update(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateProduct>,
) -> Result<Json<Product>, ApiError> {
    let product = db
        .update_product(id, &payload)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("Product not found"))?;
    Ok(Json(product))
}

async fn remove(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !db.delete_product(id).map_err(ApiError::internal)? {
        return Err(ApiError::NotFound("Product not found"));
    }
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
