//! Connector configuration
//!
//! Built once at startup from the JSON config document and passed by
//! reference to every component. Nothing reads configuration from a global.

use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::time::parse_timestamp;

/// Keys that must be present in the config document
pub const REQUIRED_CONFIG_KEYS: &[&str] = &["url", "consumer_key", "consumer_secret", "start_date"];

/// Default config filename in the tap config directory
pub const CONFIG_FILE: &str = "config.json";

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_RETRIES: u32 = 8;

/// Validated connector configuration
#[derive(Debug, Clone)]
pub struct TapConfig {
    /// Shop base URL, always ending with `/`
    pub url: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    /// Floor for the first run, exactly as configured
    pub start_date: String,
    /// `start_date` parsed; its offset is the timezone orders are restamped with
    pub start_at: DateTime<FixedOffset>,
    /// Optional User-Agent header for API requests
    pub user_agent: Option<String>,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Maximum attempts per page before giving up on transient errors
    pub max_retries: u32,
}

impl TapConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let value: Value = config::load_json_file(path)?;
        Self::from_value(&value)
    }

    /// Load from the default location (~/.config/tap-woocommerce/config.json)
    pub fn load_default() -> Result<Self> {
        let value: Value = config::load_json(CONFIG_FILE)?;
        Self::from_value(&value)
    }

    /// Validate a parsed config document
    ///
    /// All missing required keys are reported together.
    pub fn from_value(value: &Value) -> Result<Self> {
        let missing: Vec<String> = REQUIRED_CONFIG_KEYS
            .iter()
            .filter(|key| value.get(**key).is_none_or(Value::is_null))
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingKeys(missing).into());
        }

        let url = required_string(value, "url")?;
        let parsed = url::Url::parse(&url).map_err(|e| ConfigError::InvalidValue {
            key: "url",
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                key: "url",
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            }
            .into());
        }

        let start_date = required_string(value, "start_date")?;
        let start_at = parse_timestamp(&start_date).ok_or_else(|| ConfigError::InvalidValue {
            key: "start_date",
            reason: format!("'{}' is not an ISO 8601 timestamp", start_date),
        })?;

        let request_timeout = value
            .get("request_timeout_secs")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let max_retries = value
            .get("max_retries")
            .and_then(Value::as_u64)
            .map(|n| n.clamp(1, u32::MAX as u64) as u32)
            .unwrap_or(DEFAULT_MAX_RETRIES);

        Ok(Self {
            url: with_trailing_slash(url),
            consumer_key: required_string(value, "consumer_key")?,
            consumer_secret: required_string(value, "consumer_secret")?,
            start_date,
            start_at,
            user_agent: value
                .get("user_agent")
                .and_then(Value::as_str)
                .map(str::to_string),
            request_timeout: Duration::from_secs(request_timeout),
            max_retries,
        })
    }

    /// Timezone that order timestamps are restamped with
    pub fn effective_tz(&self) -> FixedOffset {
        *self.start_at.offset()
    }
}

fn required_string(value: &Value, key: &'static str) -> Result<String, ConfigError> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ConfigError::InvalidValue {
            key,
            reason: "expected a string".to_string(),
        })
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}
