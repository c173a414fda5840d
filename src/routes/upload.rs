// SPDX-License-Identifier: MIT

//! Clip upload route.
//!
//! Receives the recorded clip as a multipart body, streams it into blob
//! storage at a path namespaced by user id and capture timestamp, and
//! returns the path plus the durable URL for the title flow.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::services::StorageService;
use crate::AppState;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, HeaderMap},
    routing::post,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

pub fn routes(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/videos/upload", post(upload_video))
        // Multipart framing adds some overhead on top of the clip itself
        .layer(DefaultBodyLimit::max(max_upload_bytes + 64 * 1024))
}

#[derive(Serialize)]
pub struct UploadResponse {
    /// Storage path, to be referenced when creating the video record
    pub path: String,
    /// Durable download URL
    pub url: String,
}

/// Accept a recorded clip and upload it to blob storage.
async fn upload_video(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
        .ok_or_else(|| AppError::BadRequest("Missing video field".to_string()))?;

    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    // Whole-request length, used only for fractional progress reporting
    let total_bytes: Option<usize> = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());

    let data = read_clip(field, state.config.max_upload_bytes, total_bytes).await?;

    if data.is_empty() {
        return Err(AppError::BadRequest("Empty video upload".to_string()));
    }

    let path = StorageService::object_path(
        &user.uid,
        &content_type,
        chrono::Utc::now().timestamp_millis(),
    );

    let url = state.storage.upload(&path, &content_type, data).await?;

    tracing::info!(uid = %user.uid, %path, "Clip upload complete");

    Ok(Json(UploadResponse { path, url }))
}

/// Read the clip body chunk by chunk, enforcing the size cap and logging
/// fractional progress when the total is known.
async fn read_clip(
    mut field: axum::extract::multipart::Field<'_>,
    max_bytes: usize,
    total_bytes: Option<usize>,
) -> Result<Vec<u8>> {
    let mut data = Vec::new();

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::BadRequest(format!("Upload interrupted: {}", e)))?
    {
        if data.len() + chunk.len() > max_bytes {
            return Err(AppError::BadRequest(format!(
                "Clip exceeds the {} byte upload limit",
                max_bytes
            )));
        }

        data.extend_from_slice(&chunk);

        match total_bytes {
            Some(total) if total > 0 => {
                let progress = data.len() as f64 / total as f64;
                tracing::debug!(
                    bytes_received = data.len(),
                    progress = format!("{:.0}%", progress * 100.0),
                    "Upload in progress"
                );
            }
            _ => tracing::debug!(bytes_received = data.len(), "Upload in progress"),
        }
    }

    Ok(data)
}
