// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile storage) and credentials (password hashes)
//! - Videos (records with an embedded ratings array)
//! - Comments (ordered sub-collection under each video)

use crate::db::collections;
use crate::error::AppError;
use crate::models::video::upsert_rating;
use crate::models::{Comment, Rating, User, UserCredentials, Video};
use futures_util::{stream, FutureExt, StreamExt};

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing async-trait
        // or a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user profile by uid.
    pub async fn get_user(&self, uid: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by email address (unique per account).
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        let mut matches: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("email").eq(email.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(matches.pop())
    }

    /// Create or update a user profile.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.uid)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get a user's password credentials.
    pub async fn get_credentials(&self, uid: &str) -> Result<Option<UserCredentials>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::CREDENTIALS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a user's password credentials.
    pub async fn set_credentials(
        &self,
        uid: &str,
        credentials: &UserCredentials,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::CREDENTIALS)
            .document_id(uid)
            .object(credentials)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Video Operations ────────────────────────────────────────

    /// Store a new video record.
    pub async fn create_video(&self, video: &Video) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::VIDEOS)
            .document_id(&video.id)
            .object(video)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get a video by ID.
    pub async fn get_video(&self, video_id: &str) -> Result<Option<Video>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::VIDEOS)
            .obj()
            .one(video_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all video records, newest first.
    pub async fn list_videos(&self) -> Result<Vec<Video>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::VIDEOS)
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a video record and its comment sub-collection.
    ///
    /// Firestore does not cascade sub-collection deletes, so the comments
    /// are queried and removed first. Returns the number of documents deleted.
    pub async fn delete_video(&self, video_id: &str) -> Result<usize, AppError> {
        let client = self.get_client()?;

        let comments = self.list_comments(video_id).await?;
        let count = comments.len();

        let parent_path = client
            .parent_path(collections::VIDEOS, video_id)
            .map_err(|e| AppError::Database(e.to_string()))?;

        stream::iter(comments)
            .map(|comment| {
                let parent_path = parent_path.clone();
                async move {
                    client
                        .fluent()
                        .delete()
                        .from(collections::COMMENTS)
                        .parent(&parent_path)
                        .document_id(&comment.id)
                        .execute()
                        .await
                        .map_err(|e| AppError::Database(e.to_string()))
                }
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>, AppError>>()?;

        client
            .fluent()
            .delete()
            .from(collections::VIDEOS)
            .document_id(video_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(video_id, comments_deleted = count, "Video deleted");

        Ok(count + 1)
    }

    // ─── Rating Reconciliation ───────────────────────────────────

    /// Reconcile a user's rating into a video's embedded rating list.
    ///
    /// Loads the record, replaces the caller's existing entry in place if
    /// present (else appends), and writes the record back inside
    /// `run_transaction`. The read goes through the transaction-scoped
    /// client handed to the closure, so it joins the transaction's read set:
    /// if another writer commits to the same video first, this commit fails
    /// validation and the closure re-runs against the fresh document. A
    /// rating saved by a different user is therefore never silently
    /// discarded; for the same user, last-write-wins with exactly one
    /// surviving entry.
    ///
    /// Returns the updated rating list, or `NotFound` if the video is gone.
    pub async fn save_rating(
        &self,
        video_id: &str,
        rating: Rating,
    ) -> Result<Vec<Rating>, AppError> {
        let client = self.get_client()?;

        let updated = client
            .run_transaction(|db, transaction| {
                let video_id = video_id.to_string();
                let rating = rating.clone();
                async move {
                    // `db` carries the transaction consistency selector;
                    // reads outside it would not be conflict-checked.
                    let video: Option<Video> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::VIDEOS)
                        .obj()
                        .one(&video_id)
                        .await?;

                    let Some(mut video) = video else {
                        return Ok(None);
                    };

                    upsert_rating(&mut video.ratings, rating);

                    db.fluent()
                        .update()
                        .in_col(collections::VIDEOS)
                        .document_id(&video_id)
                        .object(&video)
                        .add_to_transaction(transaction)?;

                    Ok(Some(video.ratings))
                }
                .boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("Rating transaction failed: {}", e)))?;

        let ratings = updated
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

        tracing::info!(video_id, rating_count = ratings.len(), "Rating reconciled");

        Ok(ratings)
    }

    // ─── Comment Operations ──────────────────────────────────────

    /// List a video's comments, ordered by creation time ascending.
    pub async fn list_comments(&self, video_id: &str) -> Result<Vec<Comment>, AppError> {
        let client = self.get_client()?;

        let parent_path = client
            .parent_path(collections::VIDEOS, video_id)
            .map_err(|e| AppError::Database(e.to_string()))?;

        client
            .fluent()
            .select()
            .from(collections::COMMENTS)
            .parent(&parent_path)
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Append a comment to a video's comment sub-collection.
    pub async fn add_comment(&self, video_id: &str, comment: &Comment) -> Result<(), AppError> {
        let client = self.get_client()?;

        let parent_path = client
            .parent_path(collections::VIDEOS, video_id)
            .map_err(|e| AppError::Database(e.to_string()))?;

        let _: () = client
            .fluent()
            .update()
            .in_col(collections::COMMENTS)
            .document_id(&comment.id)
            .parent(&parent_path)
            .object(comment)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
