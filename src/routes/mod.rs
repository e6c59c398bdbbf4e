//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `POST /upload` - Multipart file upload
//! - `GET /file/{file_id}` - Stream a stored file back
//! - `POST /upload-base64` - JSON upload with base64-encoded contents
//! - `POST /generate-video` - Forward scene data to the render service
//! - `GET /api/health` - Health check

pub mod files;
pub mod health;
pub mod render;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    Router::new()
        .merge(files::router(state.clone()))
        .merge(render::router(state))
        .merge(health::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
