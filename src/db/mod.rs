//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Password hashes, keyed by uid (kept out of the profile documents)
    pub const CREDENTIALS: &str = "credentials";
    pub const VIDEOS: &str = "videos";
    /// Comment sub-collection under `videos/{id}`
    pub const COMMENTS: &str = "comments";
}
