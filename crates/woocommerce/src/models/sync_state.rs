//! Sync state carried between runs
//!
//! Serialized as the Singer state document:
//! `{"bookmarks": {"orders": {"last_update": "..."}}, "currently_syncing": null}`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bookmarks of one stream, keyed by bookmark name
pub type StreamBookmarks = BTreeMap<String, String>;

/// Resumable progress for all streams
///
/// A value type: updates return a new state rather than mutating one that
/// may already have been emitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    /// Stream id -> bookmark key -> bookmark value
    #[serde(default)]
    pub bookmarks: BTreeMap<String, StreamBookmarks>,
    /// Stream being synced when the state was written, if any
    #[serde(default)]
    pub currently_syncing: Option<String>,
}

impl SyncState {
    /// Create an empty state (first run)
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a bookmark value
    pub fn bookmark(&self, stream_id: &str, key: &str) -> Option<&str> {
        self.bookmarks
            .get(stream_id)
            .and_then(|b| b.get(key))
            .map(String::as_str)
    }

    /// Return a copy with one bookmark replaced
    pub fn with_bookmark(mut self, stream_id: &str, key: &str, value: impl Into<String>) -> Self {
        self.bookmarks
            .entry(stream_id.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
        self
    }

    /// Return a copy with the currently-syncing marker set or cleared
    pub fn with_currently_syncing(mut self, stream_id: Option<&str>) -> Self {
        self.currently_syncing = stream_id.map(str::to_string);
        self
    }
}
