//! Application wiring
//! Mission: Assemble stores, auth, and routers into the serving app

use crate::api;
use crate::auth::{
    self, auth_middleware, models::Role, require_role, AuthState, JwtHandler, TokenBlacklist,
    UserStore,
};
use crate::storage::Database;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state, Next},
    routing::{delete, get, patch, post},
    Router,
};
use std::env;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across request tasks
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub users: Arc<UserStore>,
    pub jwt: Arc<JwtHandler>,
    pub blacklist: Arc<TokenBlacklist>,
}

/// Build the full application router.
///
/// Layer ordering matters: the auth middleware wraps every protected route,
/// and the role layers sit inside it, so a role check can only ever run on a
/// request that already carries validated claims.
pub fn build_router(state: AppState) -> Router {
    let AppState {
        db,
        users,
        jwt,
        blacklist,
    } = state;

    let auth_state = AuthState::new(users.clone(), jwt.clone(), blacklist);

    let auth_routes = Router::new()
        .route("/api/auth/login", post(auth::api::login))
        .route("/api/auth/logout", post(auth::api::logout))
        .with_state(auth_state);

    // Registration stays public
    let registration = Router::new()
        .route("/api/users", post(api::users::create))
        .with_state(users.clone());

    let user_admin = Router::new()
        .route("/api/users", get(api::users::list))
        .route("/api/users/:id", delete(api::users::remove))
        .route_layer(from_fn(|req: Request, next: Next| {
            require_role(Role::Admin, req, next)
        }))
        .with_state(users.clone());

    let user_detail = Router::new()
        .route("/api/users/:id", get(api::users::get_one))
        .route_layer(from_fn(|req: Request, next: Next| {
            require_role(Role::User, req, next)
        }))
        .with_state(users.clone());

    let user_update = Router::new()
        .route("/api/users/:id", patch(api::users::update))
        .with_state(users);

    let protected = Router::new()
        .merge(user_admin)
        .merge(user_detail)
        .merge(user_update)
        .merge(api::clients::router(db.clone()))
        .merge(api::products::router(db.clone()))
        .merge(api::orders::router(db.clone()))
        .merge(api::order_items::router(db.clone()))
        .merge(api::customizations::router(db.clone()))
        .merge(api::images::router(db.clone()))
        .merge(api::prescriptions::router(db.clone()))
        .merge(api::histories::router(db))
        .route_layer(from_fn_with_state(jwt, auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .merge(auth_routes)
        .merge(registration)
        .merge(protected)
        .layer(from_fn(crate::middleware::logging::request_logging))
        .layer(cors_layer())
}

async fn health_check() -> &'static str {
    "atelier backend operational"
}

fn cors_layer() -> CorsLayer {
    let origin =
        env::var("ALLOWED_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::PATCH,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true),
        Err(_) => CorsLayer::permissive(),
    }
}
