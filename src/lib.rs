// Clipvault - media asset storage and video render dispatch backend

pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod routes;
pub mod storage;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
