//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Opaque user ID (also used as document ID)
    pub uid: String,
    /// Email address, unique per account
    pub email: String,
    /// Display name shown on comments (may be None if never set)
    pub display_name: Option<String>,
    /// When the account was created (ISO 8601)
    pub created_at: String,
}

impl User {
    /// Name to attach to comments: display name if set, else the local part
    /// of the email address.
    pub fn comment_name(&self) -> String {
        match &self.display_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => self
                .email
                .split('@')
                .next()
                .unwrap_or(&self.email)
                .to_string(),
        }
    }
}

/// Password credentials, stored in a separate collection so profile reads
/// never carry the hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCredentials {
    /// Argon2 PHC-format password hash
    pub password_hash: String,
}
