// SPDX-License-Identifier: MIT

//! Blob storage client (Google Cloud Storage JSON API).
//!
//! Uploaded clips are addressed by path and served from durable public
//! URLs. Like the Firestore wrapper, this service has an offline mock mode
//! for tests where every upload succeeds without touching the network.

use crate::error::AppError;
use std::sync::Arc;

/// Scope required for object uploads.
const STORAGE_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_write";

/// Blob storage client.
#[derive(Clone)]
pub struct StorageService {
    client: Option<GcsClient>,
    bucket: String,
}

#[derive(Clone)]
struct GcsClient {
    http: reqwest::Client,
    token_generator: Arc<gcloud_sdk::GoogleAuthTokenGenerator>,
}

impl StorageService {
    /// Create a storage client using ambient GCP credentials.
    pub async fn new(bucket: &str) -> Result<Self, AppError> {
        let token_generator = gcloud_sdk::GoogleAuthTokenGenerator::new(
            gcloud_sdk::TokenSourceType::Default,
            vec![STORAGE_SCOPE.to_string()],
        )
        .await
        .map_err(|e| AppError::Storage(format!("Failed to initialize GCS credentials: {}", e)))?;

        tracing::info!(bucket, "Storage service initialized");

        Ok(Self {
            client: Some(GcsClient {
                http: reqwest::Client::new(),
                token_generator: Arc::new(token_generator),
            }),
            bucket: bucket.to_string(),
        })
    }

    /// Create a mock storage client for testing (offline mode).
    ///
    /// Uploads succeed without any network call and resolve the same public
    /// URL a real upload would.
    pub fn new_mock(bucket: &str) -> Self {
        Self {
            client: None,
            bucket: bucket.to_string(),
        }
    }

    /// The storage path for a new clip: `videos/{uid}/{timestamp_millis}.{ext}`.
    ///
    /// Extension follows the recording platform: iOS clips arrive as
    /// `video/quicktime` (.mov), everything else is treated as .mp4.
    pub fn object_path(uid: &str, content_type: &str, timestamp_millis: i64) -> String {
        let extension = if content_type == "video/quicktime" {
            "mov"
        } else {
            "mp4"
        };
        format!("videos/{}/{}.{}", uid, timestamp_millis, extension)
    }

    /// Durable download URL for an uploaded object.
    pub fn public_url(&self, path: &str) -> String {
        format!("https://storage.googleapis.com/{}/{}", self.bucket, path)
    }

    /// Upload a clip to the given path and resolve its durable URL.
    ///
    /// Single-shot media upload; clips are bounded-duration recordings, so
    /// the whole body fits in memory under the configured size cap.
    pub async fn upload(
        &self,
        path: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, AppError> {
        let total_bytes = data.len();

        let Some(client) = &self.client else {
            tracing::debug!(path, total_bytes, "Mock upload (offline mode)");
            return Ok(self.public_url(path));
        };

        let token = client
            .token_generator
            .create_token()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to obtain access token: {}", e)))?;

        let upload_url = format!(
            "https://storage.googleapis.com/upload/storage/v1/b/{}/o?uploadType=media&name={}",
            self.bucket,
            urlencoding::encode(path)
        );

        let response = client
            .http
            .post(&upload_url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token.token.as_sensitive_str()),
            )
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Upload request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Storage(format!(
                "Upload rejected with status {}: {}",
                status, body
            )));
        }

        tracing::info!(path, total_bytes, "Clip uploaded");

        Ok(self.public_url(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_path_quicktime_gets_mov() {
        let path = StorageService::object_path("u1", "video/quicktime", 1728196210601);
        assert_eq!(path, "videos/u1/1728196210601.mov");
    }

    #[test]
    fn test_object_path_defaults_to_mp4() {
        let path = StorageService::object_path("u1", "video/mp4", 1728196210601);
        assert_eq!(path, "videos/u1/1728196210601.mp4");

        let path = StorageService::object_path("u1", "application/octet-stream", 1);
        assert_eq!(path, "videos/u1/1.mp4");
    }

    #[test]
    fn test_public_url() {
        let storage = StorageService::new_mock("clips-bucket");
        assert_eq!(
            storage.public_url("videos/u1/1.mp4"),
            "https://storage.googleapis.com/clips-bucket/videos/u1/1.mp4"
        );
    }

    #[tokio::test]
    async fn test_mock_upload_resolves_url() {
        let storage = StorageService::new_mock("clips-bucket");
        let url = storage
            .upload("videos/u1/1.mp4", "video/mp4", vec![0u8; 16])
            .await
            .unwrap();
        assert_eq!(
            url,
            "https://storage.googleapis.com/clips-bucket/videos/u1/1.mp4"
        );
    }
}
