//! Order item endpoints - /api/order-items

use crate::api::ApiError;
use crate::models::{NewOrderItem, OrderItem, UpdateOrderItem};
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
        .route("/api/order-items", post(create).get(list))
        .route(
            "/api/order-items/:id",
            get(get_one).patch(update).delete(remove),
        )
        .with_state(db)
}

/// Creation checks that the referenced order and product both exist.
async fn create(
    State(db): State<Arc<Database>>,
    Json(payload): Json<NewOrderItem>,
) -> Result<(StatusCode, Json<OrderItem>), ApiError> {
    if db
        .get_order(payload.order_id)
        .map_err(ApiError::internal)?
        .is_none()
    {
        return Err(ApiError::NotFound("Order not found"));
    }

    if db
        .get_product(payload.product_id)
        .map_err(ApiError::internal)?
        .is_none()
    {
        return Err(ApiError::NotFound("Product not found"));
    }

    let item = db.create_order_item(&payload).map_err(ApiError::internal)?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn list(State(db): State<Arc<Database>>) -> Result<Json<Vec<OrderItem>>, ApiError> {
    let items = db.list_order_items().map_err(ApiError::internal)?;
    if items.is_empty() {
        return Err(ApiError::NoneRegistered("No order items registered yet"));
    }
    Ok(Json(items))
}

async fn get_one(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
) -> Result<Json<OrderItem>, ApiError> {
    let item = db
        .get_order_item(id)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("Order item not found"))?;
    Ok(Json(item))
}

async fn update(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateOrderItem>,
) -> Result<Json<OrderItem>, ApiError> {
    let item = db
        .update_order_item(id, &payload)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("Order item not found"))?;
    Ok(Json(item))
}

async fn remove(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !db.delete_order_item(id).map_err(ApiError::internal)? {
        return Err(ApiError::NotFound("Order item not found"));
    }
    Ok(Json(json!({ "message": "Order item deleted successfully" })))
}
