use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use mongodb::bson::oid::ObjectId;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{AppState, Base64UploadRequest, UploadResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/upload", post(upload_file))
        .route("/upload-base64", post(upload_base64))
        .route("/file/{file_id}", get(download_file))
        // Uploads are buffered whole with no size cap.
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

/// Streamed multipart upload. The part is read fully into memory, then
/// written through an open-write-close channel; there is no partial-upload
/// recovery.
async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("malformed multipart body: {}", e)))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let contents = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidRequest(format!("failed to read upload: {}", e)))?;

        info!(filename = %filename, size = contents.len(), "File upload request received");

        let mut writer = state.store.open_write(&filename).await?;
        let file_id = writer.id();
        let written = match writer.write(&contents).await {
            Ok(()) => writer.close().await,
            Err(err) => Err(err),
        };
        if let Err(err) = written {
            if let Err(abort_err) = writer.abort().await {
                warn!(file_id = %file_id, "Failed to release upload channel: {}", abort_err);
            }
            return Err(err.into());
        }

        return Ok(Json(UploadResponse {
            file_id: file_id.to_hex(),
        }));
    }

    Err(AppError::InvalidRequest(
        "no file field in multipart body".to_string(),
    ))
}

/// JSON upload carrying base64-encoded contents. Decoding happens before any
/// storage write, so a bad payload never creates an object.
async fn upload_base64(
    State(state): State<AppState>,
    Json(payload): Json<Base64UploadRequest>,
) -> AppResult<Json<UploadResponse>> {
    let binary = BASE64
        .decode(payload.file_data.as_bytes())
        .map_err(|e| AppError::InvalidEncoding(e.to_string()))?;

    info!(filename = %payload.filename, size = binary.len(), "Base64 upload request received");

    let file_id = state.store.put(&payload.filename, &binary).await?;

    Ok(Json(UploadResponse {
        file_id: file_id.to_hex(),
    }))
}

/// Stream a stored file back. Chunks are pulled from the store on demand, so
/// large objects are never buffered whole.
async fn download_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> AppResult<Response> {
    let id =
        ObjectId::parse_str(&file_id).map_err(|_| AppError::InvalidIdentifier(file_id))?;

    let stream = state.store.open_read(id).await?;

    Ok((
        [(header::CONTENT_TYPE, mime::APPLICATION_OCTET_STREAM.as_ref())],
        Body::from_stream(stream),
    )
        .into_response())
}
