// SPDX-License-Identifier: MIT

//! In-process fan-out for live comment subscriptions.
//!
//! Every comment write goes through this API server, so live delivery does
//! not need a Firestore listener: the append path re-reads the ordered
//! comment set and publishes it here, and each websocket subscriber
//! receives the full set again. Subscriptions are scoped: a receiver lives
//! only as long as its socket, and a video's channel is dropped once the
//! last subscriber disconnects.

use crate::models::Comment;
use dashmap::DashMap;
use tokio::sync::broadcast;

/// Buffered snapshots per channel. A slow subscriber that falls further
/// behind than this observes a `Lagged` error and should resync by
/// re-reading the store.
const CHANNEL_CAPACITY: usize = 16;

/// Per-video broadcast channels for comment set snapshots.
#[derive(Default)]
pub struct CommentHub {
    channels: DashMap<String, broadcast::Sender<Vec<Comment>>>,
}

impl CommentHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a video's comment updates.
    ///
    /// The returned receiver yields the full ordered comment set on every
    /// change. Dropping the receiver releases the subscription.
    pub fn subscribe(&self, video_id: &str) -> broadcast::Receiver<Vec<Comment>> {
        self.channels
            .entry(video_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Publish a new comment set snapshot to all subscribers of a video.
    ///
    /// A channel with no remaining subscribers is removed so idle videos
    /// hold no standing state.
    pub fn publish(&self, video_id: &str, comments: Vec<Comment>) {
        let Some(sender) = self.channels.get(video_id).map(|e| e.value().clone()) else {
            return;
        };

        if sender.send(comments).is_err() || sender.receiver_count() == 0 {
            // Last subscriber is gone; drop the channel unless someone
            // re-subscribed in the meantime.
            self.channels
                .remove_if(video_id, |_, s| s.receiver_count() == 0);
        }
    }

    /// Drop a video's channel if it has no subscribers (called on disconnect).
    pub fn release(&self, video_id: &str) {
        self.channels
            .remove_if(video_id, |_, s| s.receiver_count() == 0);
    }

    /// Number of live channels (for tests and introspection).
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
