//! Authentication Middleware
//! Mission: Protect API endpoints with token validation and role checks

use crate::auth::jwt::{JwtHandler, TokenError};
use crate::auth::models::{Claims, Role};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Auth middleware that validates bearer tokens.
///
/// On success the decoded claims are inserted into the request extensions so
/// downstream layers and handlers can read the authenticated identity. On
/// failure the request is rejected before it reaches any handler.
pub async fn auth_middleware(
    State(jwt_handler): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(req.headers()).ok_or(AuthError::MissingToken)?;

    let claims = jwt_handler.validate(token).map_err(|e| match e {
        TokenError::Expired => AuthError::ExpiredToken,
        // Revoked and bad-signature tokens get the same response; the
        // distinction only reaches the logs.
        TokenError::Revoked => {
            debug!("rejected revoked token");
            AuthError::InvalidToken
        }
        TokenError::InvalidSignature => {
            debug!("rejected token with invalid signature");
            AuthError::InvalidToken
        }
    })?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Role-check layer for selected routes. Must be layered inside
/// [`auth_middleware`] so it always runs after a successful validation.
pub async fn require_role(required: Role, req: Request, next: Next) -> Result<Response, AuthError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or(AuthError::MissingToken)?;

    if !claims.role.grants(required) {
        warn!(
            subject = %claims.sub,
            role = claims.role.as_str(),
            required = required.as_str(),
            "insufficient role for route"
        );
        return Err(AuthError::InsufficientRole);
    }

    Ok(next.run(req).await)
}

/// Auth error types
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    InsufficientRole,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Authentication token not provided"),
            AuthError::InvalidToken => (StatusCode::FORBIDDEN, "Invalid token"),
            AuthError::ExpiredToken => (StatusCode::UNAUTHORIZED, "Token expired"),
            AuthError::InsufficientRole => (StatusCode::FORBIDDEN, "Insufficient permissions"),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_rejects_malformed_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("abc.def.ghi"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_auth_error_responses() {
        let missing = AuthError::MissingToken.into_response();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let invalid = AuthError::InvalidToken.into_response();
        assert_eq!(invalid.status(), StatusCode::FORBIDDEN);

        let expired = AuthError::ExpiredToken.into_response();
        assert_eq!(expired.status(), StatusCode::UNAUTHORIZED);

        let forbidden = AuthError::InsufficientRole.into_response();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
    }
}
