//! Authentication API Endpoints
//! Mission: Provide login and logout endpoints

use crate::auth::{
    blacklist::TokenBlacklist,
    jwt::JwtHandler,
    middleware::bearer_token,
    models::{LoginRequest, LoginResponse},
    user_store::UserStore,
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub user_store: Arc<UserStore>,
    pub jwt_handler: Arc<JwtHandler>,
    pub blacklist: Arc<TokenBlacklist>,
}

impl AuthState {
    pub fn new(
        user_store: Arc<UserStore>,
        jwt_handler: Arc<JwtHandler>,
        blacklist: Arc<TokenBlacklist>,
    ) -> Self {
        Self {
            user_store,
            jwt_handler,
            blacklist,
        }
    }
}

/// Login endpoint - POST /api/auth/login
///
/// A wrong password and an unknown email produce the same response; the
/// caller learns nothing about which one failed.
pub async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthApiError> {
    let valid = state
        .user_store
        .verify_password(&payload.email, &payload.password)
        .map_err(|e| {
            warn!("credential check failed: {e:#}");
            AuthApiError::InternalError
        })?;

    if !valid {
        warn!("failed login attempt: {}", payload.email);
        return Err(AuthApiError::InvalidCredentials);
    }

    let user = state
        .user_store
        .get_user_by_email(&payload.email)
        .map_err(|_| AuthApiError::InternalError)?
        .ok_or(AuthApiError::InvalidCredentials)?;

    let token = state.jwt_handler.issue(&user).map_err(|e| {
        warn!("token issuance failed: {e:#}");
        AuthApiError::InternalError
    })?;

    if let Err(e) = state.user_store.touch_last_login(user.id) {
        warn!("failed to record last login for {}: {e:#}", user.id);
    }

    info!("login successful: {} ({})", user.email, user.role.as_str());

    Ok(Json(LoginResponse { token }))
}

/// Logout endpoint - POST /api/auth/logout
///
/// Adds the presented token to the revocation store. Succeeds even for a
/// token that is already expired or revoked; revoking an invalid token is
/// harmless.
pub async fn logout(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AuthApiError> {
    let token = bearer_token(&headers).ok_or(AuthApiError::MissingToken)?;

    state.blacklist.revoke(token);

    info!("logout: token revoked");

    Ok(Json(json!({ "message": "Logout successful" })))
}

/// Auth API errors
#[derive(Debug)]
pub enum AuthApiError {
    InvalidCredentials,
    MissingToken,
    InternalError,
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            AuthApiError::MissingToken => {
                (StatusCode::UNAUTHORIZED, "Authentication token not provided")
            }
            AuthApiError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_api_error_responses() {
        let invalid_creds = AuthApiError::InvalidCredentials.into_response();
        assert_eq!(invalid_creds.status(), StatusCode::UNAUTHORIZED);

        let missing = AuthApiError::MissingToken.into_response();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let internal = AuthApiError::InternalError.into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
