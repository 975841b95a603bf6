//! Stream selection and sync orchestration

use anyhow::{Context, Result};
use log::info;

use super::checkpoint::set_currently_syncing;
use super::orders::{PageSource, SyncStats, sync_orders};
use crate::config::TapConfig;
use crate::error::UnknownStreamError;
use crate::models::{Catalog, SyncState};
use crate::sink::RecordSink;
use crate::woo::ORDERS;

/// Sync function shared by every stream
pub type SyncFn =
    fn(&dyn PageSource, &mut dyn RecordSink, &TapConfig, SyncState) -> Result<(SyncState, SyncStats)>;

/// A stream the connector can extract
#[derive(Debug)]
pub struct Stream {
    pub tap_stream_id: &'static str,
    pub sync: SyncFn,
}

/// All streams, in sync order
pub const STREAMS: &[Stream] = &[Stream {
    tap_stream_id: ORDERS,
    sync: sync_orders,
}];

/// Streams still to sync, resuming at the one recorded as currently syncing
///
/// # Errors
/// Returns [`UnknownStreamError`] if the state names a stream not in `streams`.
pub fn streams_to_sync<'a>(streams: &'a [Stream], state: &SyncState) -> Result<&'a [Stream]> {
    match state.currently_syncing.as_deref() {
        None => Ok(streams),
        Some(current) => streams
            .iter()
            .position(|s| s.tap_stream_id == current)
            .map(|pos| &streams[pos..])
            .ok_or_else(|| UnknownStreamError(current.to_string()).into()),
    }
}

/// Keep the streams the catalog marks as selected
pub fn selected_streams<'a>(streams: &'a [Stream], catalog: &Catalog) -> Vec<&'a Stream> {
    streams
        .iter()
        .filter(|s| catalog.is_selected(s.tap_stream_id))
        .collect()
}

/// Sync every selected stream in order
///
/// Before each stream the currently-syncing marker is written to state and
/// emitted. The first failing stream aborts the batch; streams that already
/// completed keep the state they emitted. When all streams finish the
/// marker is cleared and a final state is emitted.
pub fn do_sync(
    source: &dyn PageSource,
    sink: &mut dyn RecordSink,
    config: &TapConfig,
    state: SyncState,
    catalog: &Catalog,
) -> Result<SyncState> {
    let remaining = streams_to_sync(STREAMS, &state)?;
    let selected = selected_streams(remaining, catalog);
    if selected.is_empty() {
        info!("No Streams selected, please check that you have a schema selected in your catalog");
        return Ok(state);
    }

    let ids: Vec<&str> = selected.iter().map(|s| s.tap_stream_id).collect();
    info!("Starting sync. Will sync these streams: {:?}", ids);

    let mut state = state;
    for stream in selected {
        info!("Syncing {}", stream.tap_stream_id);
        state = set_currently_syncing(state, Some(stream.tap_stream_id));
        sink.write_state(&state)?;

        let (next, stats) = (stream.sync)(source, sink, config, state)
            .with_context(|| format!("Failed to sync stream {}", stream.tap_stream_id))?;
        info!(
            "Synced {}: {} records, bookmark {} ({} ms)",
            stream.tap_stream_id, stats.records_emitted, stats.bookmark, stats.duration_ms
        );
        state = next;
    }

    let state = set_currently_syncing(state, None);
    sink.write_state(&state)?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogEntry, CatalogStream};
    use crate::sink::InMemorySink;
    use crate::sync::ScriptedPages;
    use serde_json::json;

    fn config() -> TapConfig {
        TapConfig::from_value(&json!({
            "url": "https://shop.example.com",
            "consumer_key": "ck",
            "consumer_secret": "cs",
            "start_date": "2020-01-01T00:00:00+00:00"
        }))
        .unwrap()
    }

    fn catalog(selected: bool) -> Catalog {
        let stream = CatalogStream {
            stream: "orders".to_string(),
            tap_stream_id: "orders".to_string(),
            schema: json!({ "type": "object", "selected": selected }),
            key_properties: vec![],
            metadata: vec![],
        };
        Catalog::new(vec![CatalogEntry::from(stream)])
    }

    #[test]
    fn test_streams_to_sync_without_marker() {
        let streams = streams_to_sync(STREAMS, &SyncState::new()).unwrap();
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].tap_stream_id, "orders");
    }

    #[test]
    fn test_streams_to_sync_resumes() {
        let state = SyncState::new().with_currently_syncing(Some("orders"));
        let streams = streams_to_sync(STREAMS, &state).unwrap();
        assert_eq!(streams[0].tap_stream_id, "orders");
    }

    #[test]
    fn test_streams_to_sync_unknown_stream() {
        let state = SyncState::new().with_currently_syncing(Some("refunds"));
        let err = streams_to_sync(STREAMS, &state).unwrap_err();
        assert_eq!(err.to_string(), "Unknown stream refunds in state");
        assert!(err.downcast_ref::<UnknownStreamError>().is_some());
    }

    #[test]
    fn test_selected_streams() {
        assert_eq!(selected_streams(STREAMS, &catalog(true)).len(), 1);
        assert!(selected_streams(STREAMS, &catalog(false)).is_empty());
        assert!(selected_streams(STREAMS, &Catalog::default()).is_empty());
    }

    #[test]
    fn test_nothing_selected_is_a_no_op() {
        let source = ScriptedPages::new(vec![]);
        let mut sink = InMemorySink::new();

        let state = do_sync(&source, &mut sink, &config(), SyncState::new(), &catalog(false)).unwrap();
        assert_eq!(state, SyncState::new());
        assert!(sink.messages().is_empty());
        assert!(source.requested_urls().is_empty());
    }

    #[test]
    fn test_marker_written_before_stream_and_cleared_after() {
        let source = ScriptedPages::new(vec![vec![]]);
        let mut sink = InMemorySink::new();

        let state = do_sync(&source, &mut sink, &config(), SyncState::new(), &catalog(true)).unwrap();

        let states = sink.states();
        assert_eq!(states.len(), 3);
        assert_eq!(states[0].currently_syncing.as_deref(), Some("orders"));
        assert!(states[0].bookmark("orders", "last_update").is_none());
        assert_eq!(states[1].currently_syncing.as_deref(), Some("orders"));
        assert_eq!(
            states[1].bookmark("orders", "last_update"),
            Some("2020-01-01T00:00:00+00:00")
        );
        assert!(states[2].currently_syncing.is_none());
        assert_eq!(&state, states[2]);
    }

    #[test]
    fn test_stream_failure_aborts() {
        let source = ScriptedPages::with_results(vec![Err(anyhow::anyhow!("boom"))]);
        let mut sink = InMemorySink::new();

        let err = do_sync(&source, &mut sink, &config(), SyncState::new(), &catalog(true)).unwrap_err();
        assert_eq!(err.to_string(), "Failed to sync stream orders");
        assert_eq!(err.root_cause().to_string(), "boom");

        // Only the currently-syncing marker was emitted
        let states = sink.states();
        assert_eq!(states.len(), 1);
        assert!(states[0].bookmarks.is_empty());
    }
}
