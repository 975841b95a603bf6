//! In-memory sink
//!
//! Records every message in order. Used by tests to assert on exactly what
//! a sync emitted.

use anyhow::Result;
use serde_json::Value;

use super::RecordSink;
use crate::models::{NormalizedOrder, SyncState};

/// A captured Singer message
#[derive(Debug, Clone, PartialEq)]
pub enum SinkMessage {
    Schema {
        stream: String,
        schema: Value,
        key_properties: Vec<String>,
    },
    Record {
        stream: String,
        record: NormalizedOrder,
    },
    State(SyncState),
}

#[derive(Debug, Default)]
pub struct InMemorySink {
    messages: Vec<SinkMessage>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in emission order
    pub fn messages(&self) -> &[SinkMessage] {
        &self.messages
    }

    /// Records emitted for a stream, in order
    pub fn records(&self, stream: &str) -> Vec<&NormalizedOrder> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                SinkMessage::Record { stream: s, record } if s == stream => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Every state emitted, in order
    pub fn states(&self) -> Vec<&SyncState> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                SinkMessage::State(state) => Some(state),
                _ => None,
            })
            .collect()
    }

    /// The most recently emitted state
    pub fn last_state(&self) -> Option<&SyncState> {
        self.states().into_iter().last()
    }
}

impl RecordSink for InMemorySink {
    fn write_schema(&mut self, stream: &str, schema: &Value, key_properties: &[&str]) -> Result<()> {
        self.messages.push(SinkMessage::Schema {
            stream: stream.to_string(),
            schema: schema.clone(),
            key_properties: key_properties.iter().map(|k| k.to_string()).collect(),
        });
        Ok(())
    }

    fn write_record(&mut self, stream: &str, record: &NormalizedOrder) -> Result<()> {
        self.messages.push(SinkMessage::Record {
            stream: stream.to_string(),
            record: record.clone(),
        });
        Ok(())
    }

    fn write_state(&mut self, state: &SyncState) -> Result<()> {
        self.messages.push(SinkMessage::State(state.clone()));
        Ok(())
    }
}
