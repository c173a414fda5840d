// SPDX-License-Identifier: MIT

//! Video record and embedded rating models.

use serde::{Deserialize, Serialize};

/// Video record stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    /// Document ID (assigned at creation)
    pub id: String,
    /// User-supplied title
    pub title: String,
    /// Storage path of the uploaded clip (e.g. `videos/{uid}/{ts}.mp4`)
    pub video_path: String,
    /// Durable download URL resolved from the storage path
    pub video_url: String,
    /// UID of the user who uploaded the clip
    pub creator_id: String,
    /// When the record was created (ISO 8601)
    pub created_at: String,
    /// Peer ratings, embedded; at most one entry per user
    #[serde(default)]
    pub ratings: Vec<Rating>,
}

/// A per-user structured evaluation of a video.
///
/// Values are 1-5 by convention but are stored as-is; the write path does
/// not reject out-of-range values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// UID of the rating user
    pub user_id: String,
    /// How well-paced the speech was
    pub voice_speed: u32,
    /// Posture evaluation
    pub posture: u32,
    /// How strong the closing was
    pub ending_evaluation: u32,
}

/// Reconcile a user's rating into the embedded list.
///
/// Replaces the existing entry for `rating.user_id` in place if present,
/// otherwise appends. List order stays insertion order except for the
/// in-place overwrite, so the invariant "at most one rating per user"
/// holds after every call.
pub fn upsert_rating(ratings: &mut Vec<Rating>, rating: Rating) {
    match ratings.iter_mut().find(|r| r.user_id == rating.user_id) {
        Some(existing) => *existing = rating,
        None => ratings.push(rating),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(user_id: &str, voice_speed: u32, posture: u32, ending_evaluation: u32) -> Rating {
        Rating {
            user_id: user_id.to_string(),
            voice_speed,
            posture,
            ending_evaluation,
        }
    }

    #[test]
    fn test_upsert_appends_new_user() {
        let mut ratings = vec![rating("u1", 3, 3, 3)];
        upsert_rating(&mut ratings, rating("u2", 4, 5, 3));

        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[1], rating("u2", 4, 5, 3));
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut ratings = vec![rating("u1", 3, 3, 3), rating("u2", 2, 2, 2)];
        upsert_rating(&mut ratings, rating("u1", 5, 1, 4));

        // Position preserved, value replaced, no duplicate entry
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[0], rating("u1", 5, 1, 4));
        assert_eq!(ratings[1], rating("u2", 2, 2, 2));
    }

    #[test]
    fn test_upsert_twice_keeps_second_value() {
        let mut ratings = Vec::new();
        upsert_rating(&mut ratings, rating("u2", 1, 1, 1));
        upsert_rating(&mut ratings, rating("u2", 4, 5, 3));

        assert_eq!(ratings, vec![rating("u2", 4, 5, 3)]);
    }

    #[test]
    fn test_out_of_range_values_are_kept() {
        // The write path accepts values outside 1-5 as-is.
        let mut ratings = Vec::new();
        upsert_rating(&mut ratings, rating("u1", 0, 7, 100));

        assert_eq!(ratings[0].ending_evaluation, 100);
    }

    #[test]
    fn test_video_deserializes_without_ratings_field() {
        // Older records may lack the ratings array entirely.
        let json = serde_json::json!({
            "id": "v1",
            "title": "Intro",
            "video_path": "videos/u1/1728196210601.mp4",
            "video_url": "https://storage.googleapis.com/b/videos/u1/1728196210601.mp4",
            "creator_id": "u1",
            "created_at": "2026-01-01T00:00:00Z",
        });

        let video: Video = serde_json::from_value(json).unwrap();
        assert!(video.ratings.is_empty());
    }
}
