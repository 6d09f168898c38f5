//! Atelier Backend - Orders & Prescriptions API
//! Mission: Serve the atelier's REST API with token-secured access

use anyhow::{Context, Result};
use atelier_backend::{
    app::{build_router, AppState},
    auth::{JwtHandler, TokenBlacklist, UserStore},
    storage::Database,
};
use dotenv::dotenv;
use std::path::{Path, PathBuf};
use std::{env, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    init_tracing();

    info!("Atelier backend starting");

    // The signing secret is the one piece of config with no default; a
    // missing value must stop startup, not surface per request.
    let jwt_secret = env::var("JWT_SECRET")
        .context("JWT_SECRET environment variable is not set")?;

    let db_path = resolve_data_path(env::var("DATABASE_PATH").ok(), "atelier.db");

    let blacklist = Arc::new(TokenBlacklist::new());
    let jwt = Arc::new(JwtHandler::new(jwt_secret, blacklist.clone())?);
    let users = Arc::new(UserStore::new(&db_path)?);
    let db = Arc::new(Database::new(&db_path)?);

    info!("Database initialized at: {}", db_path);

    let app = build_router(AppState {
        db,
        users,
        jwt,
        blacklist,
    });

    let port = env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .context("Invalid PORT")?;

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atelier_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    // Standard dotenv search (cwd + parents)
    let _ = dotenv();

    // Also try the manifest-dir .env (common when running with
    // --manifest-path from elsewhere)
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let candidate = manifest_dir.join(".env");
    if candidate.exists() {
        let _ = dotenv::from_path(&candidate);
    }
}

fn resolve_data_path(env_value: Option<String>, default_filename: &str) -> String {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let Some(raw) = env_value.filter(|v| !v.trim().is_empty()) else {
        return base.join(default_filename).to_string_lossy().to_string();
    };

    let p = PathBuf::from(raw);
    if p.is_absolute() {
        return p.to_string_lossy().to_string();
    }

    // Treat relative paths as relative to the manifest dir, not the cwd.
    base.join(p).to_string_lossy().to_string()
}
