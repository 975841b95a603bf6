//! Order record model
//!
//! The canonical shape emitted for every WooCommerce order. Field names
//! match the `orders` stream schema.

use serde::{Deserialize, Serialize};

/// Unique identifier for an order (WooCommerce order ID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub i64);

impl OrderId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for OrderId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A normalized order record
///
/// Timestamps are ISO 8601 strings already restamped with the connector's
/// effective timezone. Sub-collections are `None` when the raw order had no
/// entries, never an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedOrder {
    pub order_id: OrderId,
    pub order_key: String,
    /// Order status (`processing`, `completed`, ...), passed through as-is
    pub status: String,
    pub date_created: String,
    pub date_modified: String,
    pub discount_total: f64,
    pub shipping_total: f64,
    pub total: f64,
    pub line_items: Option<Vec<LineItem>>,
    pub coupon_lines: Option<Vec<Coupon>>,
    pub shipping_lines: Option<Vec<ShippingLine>>,
}

/// One product line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: i64,
    pub name: String,
    pub product_id: i64,
    pub variation_id: i64,
    pub quantity: i64,
    pub subtotal: f64,
    pub subtotal_tax: f64,
    pub total: f64,
    pub sku: String,
    pub price: f64,
}

/// A coupon applied to an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: i64,
    pub code: String,
    pub discount: f64,
}

/// A shipping method charged on an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingLine {
    pub id: i64,
    pub method_title: String,
    pub method_id: String,
    pub total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_id() {
        let id = OrderId::new(727);
        assert_eq!(id.get(), 727);
        assert_eq!(id.to_string(), "727");
        assert_eq!(OrderId::from(727), id);
    }

    #[test]
    fn test_absent_collections_serialize_as_null() {
        let order = NormalizedOrder {
            order_id: OrderId::new(1),
            order_key: "wc_order_abc".to_string(),
            status: "processing".to_string(),
            date_created: "2020-01-01T00:00:00+00:00".to_string(),
            date_modified: "2020-01-02T00:00:00+00:00".to_string(),
            discount_total: 0.0,
            shipping_total: 5.0,
            total: 25.5,
            line_items: None,
            coupon_lines: None,
            shipping_lines: None,
        };

        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["order_id"], json!(1));
        assert_eq!(value["line_items"], json!(null));
        assert_eq!(value["total"], json!(25.5));
    }
}
