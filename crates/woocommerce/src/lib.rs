//! WooCommerce crate - Incremental order extraction
//!
//! This crate provides the engine behind the `tap-woocommerce` Singer tap:
//! - Connector configuration and the resumable sync state
//! - WooCommerce REST client with rate limiting and retries
//! - Order normalization to the canonical record shape
//! - The incremental sync loop and stream orchestration
//! - Singer output (schema, record and state messages) and discovery
//!
//! Everything is synchronous; the rate limiter is the only place a sync
//! waits besides the HTTP request itself.

pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod schema;
pub mod sink;
pub mod sync;
pub mod time;
pub mod woo;

pub use self::config::{REQUIRED_CONFIG_KEYS, TapConfig};
pub use error::{ConfigError, FetchError, InvalidEndpoint, TypeCoercionError, UnknownStreamError};
pub use models::{Catalog, CatalogEntry, Coupon, LineItem, NormalizedOrder, OrderId, ShippingLine, SyncState};
pub use schema::{discover, orders_schema};
pub use sink::{InMemorySink, RecordSink, SingerWriter, SinkMessage};
pub use sync::{
    LAST_UPDATE, PageSource, ScriptedPages, SyncStats, do_sync, get_start, set_bookmark,
    set_currently_syncing, sync_orders,
};
pub use woo::{ORDERS, PAGE_SIZE, RateLimiter, RetryPolicy, WooClient, get_endpoint, normalize_order};
