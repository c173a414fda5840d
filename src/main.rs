// SPDX-License-Identifier: MIT

//! Podium API Server
//!
//! Backend for the Podium practice-clip app: authentication, clip uploads,
//! video records with peer ratings, and live comment feeds.

use podium_api::{
    config::Config,
    db::FirestoreDb,
    services::{CommentHub, StorageService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Podium API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Initialize blob storage
    let storage = StorageService::new(&config.storage_bucket)
        .await
        .expect("Failed to initialize storage service");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        storage,
        comment_hub: CommentHub::new(),
    });

    // Build router
    let app = podium_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("podium_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
