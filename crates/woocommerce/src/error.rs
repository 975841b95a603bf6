//! Typed errors that callers need to recognise
//!
//! Most operations return `anyhow::Result` with context attached. The types
//! here are the ones the orchestrator, retry policy and tests inspect via
//! `anyhow::Error::downcast_ref`.

/// Connector configuration is missing or invalid
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config is missing required keys: {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    #[error("Config key '{key}' is invalid: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// A URL was requested for a resource the connector does not define
#[derive(Debug, thiserror::Error)]
#[error("Invalid endpoint {0}")]
pub struct InvalidEndpoint(pub String);

/// Failure while fetching one page from the API
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// Network or transport level failure (DNS, connect, timeout, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("HTTP status {code}")]
    Status { code: u16 },

    /// The body could not be decoded as a JSON array of orders
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Transient failures persisted past the retry bound
    #[error("Giving up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<FetchError> },
}

impl FetchError {
    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { code } => Some(*code),
            FetchError::RetriesExhausted { last, .. } => last.status(),
            _ => None,
        }
    }
}

/// A raw order field could not be coerced to its declared type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Cannot coerce field '{field}' to {expected}: found {found}")]
pub struct TypeCoercionError {
    /// Dotted path of the offending field (e.g. `line_items[2].price`)
    pub field: String,
    /// Declared type name
    pub expected: &'static str,
    /// Short description of the value that was found
    pub found: String,
}

/// A resumed state names a stream the connector does not know
#[derive(Debug, thiserror::Error)]
#[error("Unknown stream {0} in state")]
pub struct UnknownStreamError(pub String);
