pub mod api_routes;

use std::path::Path;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::service::relay_service::RelayService;
use api_routes::{chat_handler, health_handler};

/// Builds the relay router: the JSON API plus the widget's static assets
/// for every other path.
pub fn router(svc: RelayService, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/health", get(health_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(svc)
}
