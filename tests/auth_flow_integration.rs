//! Integration tests for the authentication flow
//!
//! Exercises the assembled router end to end: login, protected resource
//! access, role gating, and logout revocation, against a throwaway SQLite
//! database.

use atelier_backend::{
    app::{build_router, AppState},
    auth::{JwtHandler, TokenBlacklist, UserStore},
    storage::Database,
};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tower::ServiceExt;

const TEST_SECRET: &str = "integration-test-secret";

fn build_test_app() -> (Router, NamedTempFile) {
    let db_file = NamedTempFile::new().unwrap();
    let path = db_file.path().to_str().unwrap();

    let blacklist = Arc::new(TokenBlacklist::new());
    let jwt = Arc::new(JwtHandler::new(TEST_SECRET.to_string(), blacklist.clone()).unwrap());

    let state = AppState {
        db: Arc::new(Database::new(path).unwrap()),
        users: Arc::new(UserStore::new(path).unwrap()),
        jwt,
        blacklist,
    };

    (build_router(state), db_file)
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn bare_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn login_as(router: &Router, email: &str, password: &str) -> String {
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": email, "password": password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn full_resource_flow_behind_auth() {
    let (router, _db) = build_test_app();
    let token = login_as(&router, "admin@atelier.local", "admin123").await;

    // Create a client
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/clients",
            Some(&token),
            json!({ "name": "Ana", "contact": "ana@example.com", "address": "Main St 1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let client = read_json(response).await;
    let client_id = client["id"].as_i64().unwrap();

    // Create a product
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/products",
            Some(&token),
            json!({
                "name": "Mug",
                "kind": "ceramic",
                "base_cost": 5.0,
                "profit_margin": 0.5,
                "main_material": "clay"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let product = read_json(response).await;
    let product_id = product["id"].as_i64().unwrap();

    // Create an order with an inline item
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/orders",
            Some(&token),
            json!({
                "client_id": client_id,
                "total_value": 20.0,
                "status": "pending",
                "items": [
                    { "product_id": product_id, "quantity": 2, "unit_price": 10.0 }
                ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let order = read_json(response).await;
    let order_id = order["id"].as_i64().unwrap();

    // Items are visible under the order
    let response = router
        .clone()
        .oneshot(bare_request(
            "GET",
            &format!("/api/orders/{order_id}/items"),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let items = read_json(response).await;
    assert_eq!(items.as_array().unwrap().len(), 1);

    // Prescription + history for the same client
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/prescriptions",
            Some(&token),
            json!({
                "client_id": client_id,
                "medication": "Amoxicillin",
                "dosage": "500mg",
                "start_date": "2025-06-01"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let prescription = read_json(response).await;
    let prescription_id = prescription["id"].as_i64().unwrap();

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/histories",
            Some(&token),
            json!({ "prescription_id": prescription_id, "note": "first dose" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Partial update keeps untouched fields
    let response = router
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/clients/{client_id}"),
            Some(&token),
            json!({ "address": "New St 2" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = read_json(response).await;
    assert_eq!(updated["name"], "Ana");
    assert_eq!(updated["address"], "New St 2");
}

#[tokio::test]
async fn order_item_creation_validates_references() {
    let (router, _db) = build_test_app();
    let token = login_as(&router, "admin@atelier.local", "admin123").await;

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/order-items",
            Some(&token),
            json!({ "order_id": 999, "product_id": 999, "quantity": 1, "unit_price": 1.0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Order not found");
}

#[tokio::test]
async fn every_resource_route_is_sealed_without_a_token() {
    let (router, _db) = build_test_app();

    for uri in [
        "/api/users",
        "/api/clients",
        "/api/products",
        "/api/orders",
        "/api/order-items",
        "/api/customizations",
        "/api/images",
        "/api/prescriptions",
        "/api/histories",
    ] {
        let response = router
            .clone()
            .oneshot(bare_request("GET", uri, None))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "route {uri} must require a token"
        );
    }
}

#[tokio::test]
async fn registration_and_login_roundtrip() {
    let (router, _db) = build_test_app();

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users",
            None,
            json!({ "name": "Maria", "email": "maria@example.com", "password": "password123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let user = read_json(response).await;
    assert_eq!(user["role"], "user");
    assert!(user.get("password_hash").is_none());

    let token = login_as(&router, "maria@example.com", "password123").await;

    // A fresh user can reach regular protected routes
    let response = router
        .clone()
        .oneshot(bare_request("GET", "/api/images", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // But not the admin-only user listing
    let response = router
        .clone()
        .oneshot(bare_request("GET", "/api/users", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn logout_revokes_for_every_subsequent_request() {
    let (router, _db) = build_test_app();
    let token = login_as(&router, "admin@atelier.local", "admin123").await;

    let response = router
        .clone()
        .oneshot(bare_request("POST", "/api/auth/logout", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    for uri in ["/api/clients", "/api/orders", "/api/users"] {
        let response = router
            .clone()
            .oneshot(bare_request("GET", uri, Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    // Logging in again issues a fresh, unrevoked token. Claims carry
    // second-resolution timestamps, so step past the issuing second to
    // guarantee the new token differs from the revoked one.
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    let new_token = login_as(&router, "admin@atelier.local", "admin123").await;
    assert_ne!(new_token, token);

    let response = router
        .clone()
        .oneshot(bare_request("GET", "/api/images", Some(&new_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn logout_without_header_is_rejected() {
    let (router, _db) = build_test_app();

    let response = router
        .clone()
        .oneshot(bare_request("POST", "/api/auth/logout", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
