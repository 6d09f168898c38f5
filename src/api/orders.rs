//! Order endpoints - /api/orders

use crate::api::ApiError;
use crate::models::{NewOrder, Order, OrderItem, UpdateOrder};
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
        .route("/api/orders", post(create).get(list))
        .route("/api/orders/:id", get(get_one).patch(update).delete(remove))
        .route("/api/orders/:id/items", get(list_items))
        .with_state(db)
}

async fn create(
    State(db): State<Arc<Database>>,
    Json(payload): Json<NewOrder>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    if db
        .get_client(payload.client_id)
        .map_err(ApiError::internal)?
        .is_none()
    {
        return Err(ApiError::NotFound("Client not found"));
    }

    let order = db.create_order(&payload).map_err(ApiError::internal)?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn list(State(db): State<Arc<Database>>) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = db.list_orders().map_err(ApiError::internal)?;
    if orders.is_empty() {
        return Err(ApiError::NoneRegistered("No orders registered yet"));
    }
    Ok(Json(orders))
}

async fn get_one(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
) -> Result<Json<Order>, ApiError> {
    let order = db
        .get_order(id)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("Order not found"))?;
    Ok(Json(order))
}

/// Items of one order. 404s when the order itself is unknown.
async fn list_items(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<OrderItem>>, ApiError> {
    if db.get_order(id).map_err(ApiError::internal)?.is_none() {
        return Err(ApiError::NotFound("Order not found"));
    }

    let items = db.list_items_for_order(id).map_err(ApiError::internal)?;
    Ok(Json(items))
}

async fn update(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateOrder>,
) -> Result<Json<Order>, ApiError> {
    let order = db
        .update_order(id, &payload)
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound("Order not found"))?;
    Ok(Json(order))
}

async fn remove(
    State(db): State<Arc<Database>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !db.delete_order(id).map_err(ApiError::internal)? {
        return Err(ApiError::NotFound("Order not found"));
    }
    Ok(Json(json!({ "message": "Order deleted successfully" })))
}
