//! Domain models for the orders stream

mod catalog;
mod order;
mod sync_state;

pub use catalog::{Catalog, CatalogDocument, CatalogEntry, CatalogStream};
pub use order::{Coupon, LineItem, NormalizedOrder, OrderId, ShippingLine};
pub use sync_state::{StreamBookmarks, SyncState};
