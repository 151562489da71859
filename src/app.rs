use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};
use std::path::Path;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

/// API routes plus the static frontend bundle with SPA index fallback.
/// This is a public, unauthenticated endpoint; CORS is wide open.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let frontend = ServeDir::new(static_dir)
        .not_found_service(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/track", post(handlers::track))
        .route("/stats", get(handlers::stats))
        .fallback_service(frontend)
        .layer(cors)
        .with_state(state)
}
