use std::sync::Arc;

use crate::config::Config;
use crate::render::RenderClient;
use crate::storage::BlobStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BlobStore>,
    pub render: Arc<RenderClient>,
    pub config: Config,
}

// API Request/Response types

#[derive(Debug, serde::Serialize)]
pub struct UploadResponse {
    pub file_id: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct Base64UploadRequest {
    pub filename: String,
    /// Base64-encoded file contents.
    pub file_data: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct GenerateVideoRequest {
    /// Opaque template modifications, forwarded to the renderer untouched.
    pub scene_data: serde_json::Value,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub database: String,
}
