// SPDX-License-Identifier: MIT

//! Comment routes: append, ordered fetch, and the live websocket feed.
//!
//! The websocket delivers the full ordered comment set on connect and again
//! whenever it changes, mirroring a document-store live query. The
//! subscription lasts exactly as long as the socket.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::Comment;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::Response,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/videos/{id}/comments",
            get(list_comments).post(add_comment),
        )
        .route("/api/videos/{id}/comments/ws", get(comments_ws))
}

#[derive(Serialize)]
pub struct CommentsResponse {
    pub comments: Vec<Comment>,
}

/// Full ordered comment set for a video.
async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<Json<CommentsResponse>> {
    ensure_video_exists(&state, &video_id).await?;

    let comments = state.db.list_comments(&video_id).await?;
    Ok(Json(CommentsResponse { comments }))
}

#[derive(Deserialize, Validate)]
pub struct AddCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "comment text is required"))]
    pub comment: String,
}

/// Append a comment with a server-assigned timestamp, then publish the
/// refreshed set to live subscribers.
async fn add_comment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(video_id): Path<String>,
    Json(payload): Json<AddCommentRequest>,
) -> Result<(StatusCode, Json<Comment>)> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let text = payload.comment.trim().to_string();
    if text.is_empty() {
        return Err(AppError::BadRequest("comment text is required".to_string()));
    }

    ensure_video_exists(&state, &video_id).await?;

    // Name captured at write time; comments are immutable afterwards.
    let user_name = state
        .db
        .get_user(&user.uid)
        .await?
        .map(|u| u.comment_name())
        .unwrap_or_else(|| user.uid.clone());

    let comment = Comment {
        id: Uuid::new_v4().to_string(),
        user_id: user.uid.clone(),
        user_name,
        comment: text,
        created_at: now_rfc3339(),
    };

    state.db.add_comment(&video_id, &comment).await?;

    tracing::info!(%video_id, comment_id = %comment.id, "Comment appended");

    // Re-read the ordered set and fan out to live subscribers. A failure
    // here only affects liveness; the comment itself is already durable.
    match state.db.list_comments(&video_id).await {
        Ok(comments) => state.comment_hub.publish(&video_id, comments),
        Err(e) => tracing::warn!(%video_id, error = %e, "Failed to refresh comment set for live feed"),
    }

    Ok((StatusCode::CREATED, Json(comment)))
}

/// Live comment subscription over websocket.
async fn comments_ws(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(video_id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<Response> {
    ensure_video_exists(&state, &video_id).await?;

    tracing::debug!(%video_id, uid = %user.uid, "Comment subscription opened");

    Ok(ws.on_upgrade(move |socket| handle_comment_socket(state, video_id, socket)))
}

async fn handle_comment_socket(state: Arc<AppState>, video_id: String, mut socket: WebSocket) {
    // Subscribe before the initial read so no append is missed in between.
    let mut rx = state.comment_hub.subscribe(&video_id);

    match state.db.list_comments(&video_id).await {
        Ok(comments) => {
            if send_snapshot(&mut socket, &comments).await.is_err() {
                state.comment_hub.release(&video_id);
                return;
            }
        }
        Err(e) => {
            tracing::warn!(%video_id, error = %e, "Failed to load initial comment set");
            state.comment_hub.release(&video_id);
            return;
        }
    }

    loop {
        tokio::select! {
            update = rx.recv() => match update {
                Ok(comments) => {
                    if send_snapshot(&mut socket, &comments).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Missed snapshots are harmless: each one is the full
                    // set, so resync from the store.
                    tracing::debug!(%video_id, skipped, "Subscriber lagged, resyncing");
                    match state.db.list_comments(&video_id).await {
                        Ok(comments) => {
                            if send_snapshot(&mut socket, &comments).await.is_err() {
                                break;
                            }
                        }
                        Err(_) => break,
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            msg = socket.recv() => match msg {
                // The feed is one-way; client frames are ignored.
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    // Scoped release: drop the receiver, then clean up an idle channel.
    drop(rx);
    state.comment_hub.release(&video_id);

    tracing::debug!(%video_id, "Comment subscription closed");
}

async fn send_snapshot(socket: &mut WebSocket, comments: &[Comment]) -> Result<()> {
    let payload = serde_json::to_string(comments)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize comments: {}", e)))?;

    socket
        .send(Message::Text(payload.into()))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Websocket send failed: {}", e)))
}

async fn ensure_video_exists(state: &AppState, video_id: &str) -> Result<()> {
    state
        .db
        .get_video(video_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))
}
