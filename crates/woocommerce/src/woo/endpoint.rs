//! Resource URL construction

use crate::error::InvalidEndpoint;

/// Orders requested per page; a shorter page ends the sync
pub const PAGE_SIZE: usize = 100;

/// Stream id and resource name of the orders endpoint
pub const ORDERS: &str = "orders";

/// Resource path relative to the shop base URL
fn resource_path(resource: &str) -> Option<&'static str> {
    match resource {
        ORDERS => Some("wp-json/wc/v2/orders"),
        _ => None,
    }
}

/// Build the URL for one page of a resource, filtered to records after `after`
///
/// # Arguments
/// * `base_url` - Shop base URL, with or without a trailing slash
/// * `resource` - Resource name (only `"orders"` is defined)
/// * `after` - Lower-bound timestamp, percent-encoded into the query
/// * `page` - 1-based page number
pub fn get_endpoint(
    base_url: &str,
    resource: &str,
    after: &str,
    page: u32,
) -> Result<String, InvalidEndpoint> {
    let path = resource_path(resource).ok_or_else(|| InvalidEndpoint(resource.to_string()))?;

    Ok(format!(
        "{}/{}?after={}&orderby=date&order=asc&per_page={}&page={}",
        base_url.trim_end_matches('/'),
        path,
        urlencoding::encode(after),
        PAGE_SIZE,
        page
    ))
}
