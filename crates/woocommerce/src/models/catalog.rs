//! Singer catalog model
//!
//! Selection is decided once when the catalog is loaded; later code matches
//! on [`CatalogEntry`] instead of probing the schema for a `selected` flag.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stream description as it appears in a catalog document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStream {
    pub stream: String,
    pub tap_stream_id: String,
    pub schema: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_properties: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<Value>,
}

impl CatalogStream {
    /// Whether the schema or the root metadata entry marks this stream selected
    fn is_marked_selected(&self) -> bool {
        let schema_selected = self.schema.get("selected").and_then(Value::as_bool) == Some(true);

        let metadata_selected = self.metadata.iter().any(|entry| {
            let is_root = entry
                .get("breadcrumb")
                .and_then(Value::as_array)
                .is_some_and(|b| b.is_empty());
            is_root
                && entry
                    .get("metadata")
                    .and_then(|m| m.get("selected"))
                    .and_then(Value::as_bool)
                    == Some(true)
        });

        schema_selected || metadata_selected
    }
}

/// A catalog stream tagged with its selection
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEntry {
    Selected(CatalogStream),
    NotSelected(CatalogStream),
}

impl CatalogEntry {
    pub fn stream(&self) -> &CatalogStream {
        match self {
            CatalogEntry::Selected(s) | CatalogEntry::NotSelected(s) => s,
        }
    }

    pub fn tap_stream_id(&self) -> &str {
        &self.stream().tap_stream_id
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, CatalogEntry::Selected(_))
    }
}

impl From<CatalogStream> for CatalogEntry {
    fn from(stream: CatalogStream) -> Self {
        if stream.is_marked_selected() {
            CatalogEntry::Selected(stream)
        } else {
            CatalogEntry::NotSelected(stream)
        }
    }
}

/// Catalog document: `{"streams": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub streams: Vec<CatalogStream>,
}

/// A loaded catalog with selection resolved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Parse a catalog from its JSON document
    pub fn from_value(value: Value) -> anyhow::Result<Self> {
        let doc: CatalogDocument = serde_json::from_value(value)?;
        Ok(doc.into())
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Find the entry for a stream by its tap stream id
    pub fn get(&self, tap_stream_id: &str) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|e| e.tap_stream_id() == tap_stream_id)
    }

    /// Whether a stream is present and selected
    pub fn is_selected(&self, tap_stream_id: &str) -> bool {
        self.get(tap_stream_id).is_some_and(CatalogEntry::is_selected)
    }
}

impl From<CatalogDocument> for Catalog {
    fn from(doc: CatalogDocument) -> Self {
        Self::new(doc.streams.into_iter().map(CatalogEntry::from).collect())
    }
}
