// SPDX-License-Identifier: MIT

//! Podium: record short practice clips, share them, and collect peer feedback
//!
//! This crate provides the backend API for the Podium app: clip upload to
//! blob storage, video records with embedded peer ratings, and a live
//! comment feed per video.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{CommentHub, StorageService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub storage: StorageService,
    pub comment_hub: CommentHub,
}
