// SPDX-License-Identifier: MIT

//! API routes for authenticated users: profile, video records, ratings.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Rating, Video};
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/videos", get(list_videos).post(create_video))
        .route("/api/videos/{id}", get(get_video).delete(delete_video))
        .route("/api/videos/{id}/rating", put(save_rating))
        .route("/api/videos/{id}/ratings", get(get_ratings))
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
pub struct UserResponse {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let profile = state
        .db
        .get_user(&user.uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.uid)))?;

    Ok(Json(UserResponse {
        uid: profile.uid,
        email: profile.email,
        display_name: profile.display_name,
    }))
}

// ─── Videos ──────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct CreateVideoRequest {
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,
    /// Storage path returned by the upload endpoint
    pub video_path: String,
}

#[derive(Serialize)]
pub struct VideoResponse {
    pub id: String,
    pub title: String,
    pub video_url: String,
    pub creator_id: String,
    pub created_at: String,
    pub ratings: Vec<Rating>,
}

impl From<Video> for VideoResponse {
    fn from(video: Video) -> Self {
        Self {
            id: video.id,
            title: video.title,
            video_url: video.video_url,
            creator_id: video.creator_id,
            created_at: video.created_at,
            ratings: video.ratings,
        }
    }
}

/// Title flow: write a new video record referencing an uploaded clip.
async fn create_video(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateVideoRequest>,
) -> Result<(StatusCode, Json<VideoResponse>)> {
    payload.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    let title = payload.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::BadRequest("title is required".to_string()));
    }

    if !payload.video_path.starts_with("videos/") {
        return Err(AppError::BadRequest(
            "video_path must be a storage path returned by the upload endpoint".to_string(),
        ));
    }

    let video = Video {
        id: Uuid::new_v4().to_string(),
        title,
        video_url: state.storage.public_url(&payload.video_path),
        video_path: payload.video_path,
        creator_id: user.uid.clone(),
        created_at: now_rfc3339(),
        ratings: Vec::new(),
    };

    state.db.create_video(&video).await?;

    tracing::info!(video_id = %video.id, creator = %user.uid, "Video record created");

    Ok((StatusCode::CREATED, Json(video.into())))
}

#[derive(Serialize)]
pub struct VideoListResponse {
    pub videos: Vec<VideoSummary>,
}

#[derive(Serialize)]
pub struct VideoSummary {
    pub id: String,
    pub title: String,
    pub video_url: String,
    pub creator_id: String,
    pub created_at: String,
    pub rating_count: usize,
}

/// Listing flow: all video records, one summary per record, newest first.
async fn list_videos(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<VideoListResponse>> {
    tracing::debug!(uid = %user.uid, "Fetching video list");

    let videos = state.db.list_videos().await?;

    let summaries = videos
        .into_iter()
        .map(|v| VideoSummary {
            id: v.id,
            title: v.title,
            video_url: v.video_url,
            creator_id: v.creator_id,
            created_at: v.created_at,
            rating_count: v.ratings.len(),
        })
        .collect();

    Ok(Json(VideoListResponse { videos: summaries }))
}

/// Get a single video record with its embedded ratings.
async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<Json<VideoResponse>> {
    let video = state
        .db
        .get_video(&video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

    Ok(Json(video.into()))
}

#[derive(Serialize)]
pub struct DeleteVideoResponse {
    pub success: bool,
    pub message: String,
}

/// Delete a video record. Creator only.
async fn delete_video(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(video_id): Path<String>,
) -> Result<Json<DeleteVideoResponse>> {
    let video = state
        .db
        .get_video(&video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

    if video.creator_id != user.uid {
        return Err(AppError::Forbidden(
            "Only the creator can delete a video".to_string(),
        ));
    }

    state.db.delete_video(&video_id).await?;

    tracing::info!(%video_id, uid = %user.uid, "Video deleted by creator");

    Ok(Json(DeleteVideoResponse {
        success: true,
        message: "Video deleted".to_string(),
    }))
}

// ─── Ratings ─────────────────────────────────────────────────

/// Rating values as submitted. 1-5 by convention; stored as-is.
#[derive(Deserialize)]
pub struct RatingRequest {
    pub voice_speed: u32,
    pub posture: u32,
    pub ending_evaluation: u32,
}

#[derive(Serialize)]
pub struct SaveRatingResponse {
    pub success: bool,
}

/// Reconcile the caller's rating into the video's rating list.
async fn save_rating(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(video_id): Path<String>,
    Json(payload): Json<RatingRequest>,
) -> Result<Json<SaveRatingResponse>> {
    let rating = Rating {
        user_id: user.uid.clone(),
        voice_speed: payload.voice_speed,
        posture: payload.posture,
        ending_evaluation: payload.ending_evaluation,
    };

    state.db.save_rating(&video_id, rating).await?;

    Ok(Json(SaveRatingResponse { success: true }))
}

#[derive(Serialize)]
pub struct RatingsResponse {
    pub ratings: Vec<Rating>,
}

/// All ratings for a video (the rating detail screen).
async fn get_ratings(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<Json<RatingsResponse>> {
    let video = state
        .db
        .get_video(&video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

    Ok(Json(RatingsResponse {
        ratings: video.ratings,
    }))
}
