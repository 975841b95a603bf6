//! WooCommerce REST API integration
//!
//! This module provides:
//! - Endpoint construction for the orders resource
//! - A rate-limited, retrying HTTP client
//! - Response normalization to domain models

mod client;
mod endpoint;
mod normalize;
pub mod rate_limit;
pub mod retry;

pub use client::WooClient;
pub use endpoint::{ORDERS, PAGE_SIZE, get_endpoint};
pub use normalize::normalize_order;
pub use rate_limit::RateLimiter;
pub use retry::{Disposition, RetryPolicy, classify};

/// WooCommerce API response types
pub mod api {
    use serde_json::{Map, Value};

    /// One order as returned by the API, before normalization
    pub type RawOrder = Map<String, Value>;
}
