// SPDX-License-Identifier: MIT

//! Comment model for the per-video comment sub-collection.

use serde::{Deserialize, Serialize};

/// A comment on a video, stored in `videos/{id}/comments`.
///
/// Comments are append-only: never updated or deleted once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Document ID (assigned at creation)
    pub id: String,
    /// UID of the commenting user
    pub user_id: String,
    /// Display name captured at write time
    pub user_name: String,
    /// Free-text comment body
    pub comment: String,
    /// Server-assigned creation time (ISO 8601); the sub-collection sort key
    pub created_at: String,
}
