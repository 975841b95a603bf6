//! Bookmark lookup and update

use crate::config::TapConfig;
use crate::models::SyncState;

/// Bookmark key holding a stream's high-water mark
pub const LAST_UPDATE: &str = "last_update";

/// Lower bound for a run: the stored bookmark, else the configured start date
pub fn get_start(state: &SyncState, stream_id: &str, bookmark_key: &str, config: &TapConfig) -> String {
    state
        .bookmark(stream_id, bookmark_key)
        .map(str::to_string)
        .unwrap_or_else(|| config.start_date.clone())
}

/// Return `state` with one bookmark replaced; every other bookmark is kept
pub fn set_bookmark(state: SyncState, stream_id: &str, bookmark_key: &str, value: &str) -> SyncState {
    state.with_bookmark(stream_id, bookmark_key, value)
}

/// Return `state` with the currently-syncing marker set (or cleared with `None`)
pub fn set_currently_syncing(state: SyncState, stream_id: Option<&str>) -> SyncState {
    state.with_currently_syncing(stream_id)
}
