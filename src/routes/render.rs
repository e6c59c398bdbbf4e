use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tracing::info;

use crate::error::AppResult;
use crate::models::{AppState, GenerateVideoRequest};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/generate-video", post(generate_video))
        .with_state(state)
}

/// Forward scene data to the render service and relay its reply, status
/// included. The scene payload is opaque; its schema belongs to the
/// third-party template.
async fn generate_video(
    State(state): State<AppState>,
    Json(payload): Json<GenerateVideoRequest>,
) -> AppResult<Response> {
    info!("Video generation request received");

    let outcome = state.render.render(&payload.scene_data).await?;

    Ok((outcome.status, Json(outcome.body)).into_response())
}
