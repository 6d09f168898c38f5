//! Resource API Endpoints
//! Mission: CRUD handlers for the order and prescription domains

pub mod clients;
pub mod customizations;
pub mod histories;
pub mod images;
pub mod order_items;
pub mod orders;
pub mod prescriptions;
pub mod products;
pub mod users;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

/// Resource API errors
#[derive(Debug)]
pub enum ApiError {
    /// Row lookup by id came up empty
    NotFound(&'static str),
    /// Listing of a collection with no rows yet
    NoneRegistered(&'static str),
    EmailTaken,
    Internal,
}

impl ApiError {
    /// Log the underlying failure and collapse it to a generic 500.
    pub fn internal(err: anyhow::Error) -> Self {
        warn!("database error: {err:#}");
        ApiError::Internal
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::NoneRegistered(message) => (StatusCode::NOT_FOUND, message),
            ApiError::EmailTaken => (StatusCode::BAD_REQUEST, "Email already registered"),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_responses() {
        let not_found = ApiError::NotFound("client not found").into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let empty = ApiError::NoneRegistered("no clients registered yet").into_response();
        assert_eq!(empty.status(), StatusCode::NOT_FOUND);

        let taken = ApiError::EmailTaken.into_response();
        assert_eq!(taken.status(), StatusCode::BAD_REQUEST);

        let internal = ApiError::Internal.into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
