//! WooCommerce API HTTP client
//!
//! Fetches pages of orders with HTTP Basic auth. Every attempt passes the
//! rate limiter, and transient failures are retried by the [`RetryPolicy`].
//! Uses synchronous HTTP (ureq); the rate limiter is the only place the
//! calling thread blocks besides the request itself.

use anyhow::{Context, Result};
use base64::prelude::*;
use log::debug;
use serde_json::Value;

use super::api::RawOrder;
use super::{RateLimiter, RetryPolicy};
use crate::config::TapConfig;
use crate::error::FetchError;
use crate::metrics::HttpRequestTimer;

/// WooCommerce API client
pub struct WooClient {
    agent: ureq::Agent,
    authorization: String,
    user_agent: Option<String>,
    limiter: RateLimiter,
    retry: RetryPolicy,
}

impl WooClient {
    /// Create a client from the connector config with default policies
    pub fn new(config: &TapConfig) -> Self {
        Self::with_policies(config, RateLimiter::default(), RetryPolicy::new(config.max_retries))
    }

    /// Create a client with explicit rate-limit and retry policies
    pub fn with_policies(config: &TapConfig, limiter: RateLimiter, retry: RetryPolicy) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(config.request_timeout))
            .build()
            .into();

        Self {
            agent,
            authorization: basic_auth(&config.consumer_key, &config.consumer_secret),
            user_agent: config.user_agent.clone(),
            limiter,
            retry,
        }
    }

    /// Fetch one page of orders
    ///
    /// # Arguments
    /// * `stream_id` - Stream the request belongs to (metric tag)
    /// * `url` - Fully built page URL
    pub fn fetch_page(&self, stream_id: &str, url: &str) -> Result<Vec<RawOrder>> {
        let orders = self
            .retry
            .run(|attempt| {
                let waited = self.limiter.acquire();
                debug!("GET attempt {} (rate limit wait {:?})", attempt, waited);
                self.get_once(stream_id, url)
            })
            .with_context(|| format!("Failed to fetch {}", url))?;

        Ok(orders)
    }

    /// One authenticated GET, without retries
    fn get_once(&self, stream_id: &str, url: &str) -> Result<Vec<RawOrder>, FetchError> {
        let timer = HttpRequestTimer::start(stream_id);

        let mut request = self
            .agent
            .get(url)
            .header("Authorization", &self.authorization)
            .header("Accept", "application/json");
        if let Some(user_agent) = &self.user_agent {
            request = request.header("User-Agent", user_agent);
        }

        let mut response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(code)) => {
                timer.finish(Some(code), false);
                return Err(FetchError::Status { code });
            }
            Err(e) => {
                timer.finish(None, false);
                return Err(FetchError::Transport(e.to_string()));
            }
        };

        let status = response.status().as_u16();
        let body = response.body_mut().read_json::<Value>();
        timer.finish(Some(status), body.is_ok());

        let body = body.map_err(|e| FetchError::Decode(e.to_string()))?;
        parse_page(body)
    }
}

/// Value of the `Authorization` header for HTTP Basic auth
fn basic_auth(key: &str, secret: &str) -> String {
    format!("Basic {}", BASE64_STANDARD.encode(format!("{}:{}", key, secret)))
}

/// Check that a response body is an array of order objects
fn parse_page(body: Value) -> Result<Vec<RawOrder>, FetchError> {
    let items = match body {
        Value::Array(items) => items,
        other => {
            return Err(FetchError::Decode(format!(
                "expected a JSON array of orders, found {}",
                json_kind(&other)
            )));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(order) => Ok(order),
            other => Err(FetchError::Decode(format!(
                "page element {} is {}, not an order object",
                i,
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
