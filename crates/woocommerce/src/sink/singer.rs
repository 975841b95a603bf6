//! Singer JSON-lines writer

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::io::Write;

use super::RecordSink;
use crate::models::{NormalizedOrder, SyncState};

/// One line of Singer output
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
enum Message<'a> {
    Schema {
        stream: &'a str,
        schema: &'a Value,
        key_properties: &'a [&'a str],
    },
    Record {
        stream: &'a str,
        record: &'a NormalizedOrder,
    },
    State {
        value: &'a SyncState,
    },
}

/// Writes Singer messages as JSON lines
///
/// Output is flushed after every state message so a consumer never sees a
/// checkpoint before the records it covers.
pub struct SingerWriter<W: Write> {
    out: W,
}

impl<W: Write> SingerWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_message(&mut self, message: &Message<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.out, message).context("Failed to serialize message")?;
        self.out
            .write_all(b"\n")
            .context("Failed to write message")?;
        Ok(())
    }
}

impl SingerWriter<std::io::Stdout> {
    /// Writer on the process standard output
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> RecordSink for SingerWriter<W> {
    fn write_schema(&mut self, stream: &str, schema: &Value, key_properties: &[&str]) -> Result<()> {
        self.write_message(&Message::Schema {
            stream,
            schema,
            key_properties,
        })
    }

    fn write_record(&mut self, stream: &str, record: &NormalizedOrder) -> Result<()> {
        self.write_message(&Message::Record { stream, record })
    }

    fn write_state(&mut self, state: &SyncState) -> Result<()> {
        self.write_message(&Message::State { value: state })?;
        self.out.flush().context("Failed to flush output")?;
        Ok(())
    }
}
