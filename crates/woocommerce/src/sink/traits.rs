//! Sink trait definition

use anyhow::Result;
use serde_json::Value;

use crate::models::{NormalizedOrder, SyncState};

/// Destination for the schema/record/state message sequence
pub trait RecordSink {
    /// Declare a stream's schema and primary key before its records
    fn write_schema(&mut self, stream: &str, schema: &Value, key_properties: &[&str]) -> Result<()>;

    /// Emit one normalized record
    fn write_record(&mut self, stream: &str, record: &NormalizedOrder) -> Result<()>;

    /// Emit a state checkpoint
    fn write_state(&mut self, state: &SyncState) -> Result<()>;
}
