//! Orders stream sync

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, FixedOffset};
use log::info;
use std::time::Instant;

use super::checkpoint::{LAST_UPDATE, get_start, set_bookmark};
use crate::config::TapConfig;
use crate::metrics::{InternalEvent, RecordsCounted};
use crate::models::SyncState;
use crate::schema::{ORDER_KEY_PROPERTIES, orders_schema};
use crate::sink::RecordSink;
use crate::time::parse_timestamp;
use crate::woo::api::RawOrder;
use crate::woo::{ORDERS, PAGE_SIZE, WooClient, get_endpoint, normalize_order};

/// Something that can fetch one page of raw orders for a URL
pub trait PageSource {
    fn fetch_page(&self, stream_id: &str, url: &str) -> Result<Vec<RawOrder>>;
}

impl PageSource for WooClient {
    fn fetch_page(&self, stream_id: &str, url: &str) -> Result<Vec<RawOrder>> {
        WooClient::fetch_page(self, stream_id, url)
    }
}

/// Statistics from one stream sync
#[derive(Debug, Default, Clone)]
pub struct SyncStats {
    /// Number of pages requested
    pub pages_fetched: usize,
    /// Number of records written to the sink
    pub records_emitted: u64,
    /// Bookmark value written at the end of the run
    pub bookmark: String,
    /// Duration of the sync operation
    pub duration_ms: u64,
}

/// Running high-water mark; only ever moves forward
struct Bookmark {
    value: String,
    at: DateTime<FixedOffset>,
}

impl Bookmark {
    fn new(start: &str) -> Result<Self> {
        let at = parse_timestamp(start)
            .ok_or_else(|| anyhow!("Bookmark '{}' is not a valid timestamp", start))?;
        Ok(Self {
            value: start.to_string(),
            at,
        })
    }

    fn observe(&mut self, candidate: &str) {
        if let Some(at) = parse_timestamp(candidate)
            && at > self.at
        {
            self.at = at;
            self.value = candidate.to_string();
        }
    }
}

/// Sync the orders stream
///
/// Every page is requested with the same `after` bound (the run's start);
/// only the page number advances. A page shorter than [`PAGE_SIZE`] ends
/// the run. A page containing an order that fails normalization aborts the
/// run before any of that page's records are written, and no state is
/// emitted.
///
/// # Arguments
/// * `source` - Page fetcher (the API client in production)
/// * `sink` - Destination for schema, records and the final state
/// * `config` - Connector configuration
/// * `state` - State at the start of the run
pub fn sync_orders(
    source: &dyn PageSource,
    sink: &mut dyn RecordSink,
    config: &TapConfig,
    state: SyncState,
) -> Result<(SyncState, SyncStats)> {
    let started = Instant::now();
    let mut stats = SyncStats::default();

    sink.write_schema(ORDERS, &orders_schema(), ORDER_KEY_PROPERTIES)?;

    let start = get_start(&state, ORDERS, LAST_UPDATE, config);
    info!("Only syncing orders updated since {}", start);

    let tz = config.effective_tz();
    let mut last_update = Bookmark::new(&start)?;
    let mut page: u32 = 1;

    loop {
        let url = get_endpoint(&config.url, ORDERS, &start, page)?;
        info!("GET {}", url);

        let raw_orders = source.fetch_page(ORDERS, &url)?;
        stats.pages_fetched += 1;

        let orders = raw_orders
            .iter()
            .map(|raw| normalize_order(raw, tz))
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to normalize an order on page {}", page))?;

        for order in &orders {
            last_update.observe(&order.date_created);
            sink.write_record(ORDERS, order)?;
            stats.records_emitted += 1;
        }

        if raw_orders.len() < PAGE_SIZE {
            break;
        }
        page += 1;
    }

    RecordsCounted {
        endpoint: ORDERS.to_string(),
        count: stats.records_emitted,
    }
    .emit();

    let state = set_bookmark(state, ORDERS, LAST_UPDATE, &last_update.value);
    sink.write_state(&state)?;

    stats.bookmark = last_update.value;
    stats.duration_ms = started.elapsed().as_millis() as u64;
    info!(
        "Completed Orders Sync: {} records from {} pages",
        stats.records_emitted, stats.pages_fetched
    );
    Ok((state, stats))
}
