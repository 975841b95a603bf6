//! Stream schemas and discovery
//!
//! The orders schema describes [`NormalizedOrder`](crate::models::NormalizedOrder)
//! and is what the SCHEMA message declares before any record is written.

use serde_json::{Value, json};

use crate::models::{CatalogDocument, CatalogStream};
use crate::woo::ORDERS;

/// Primary key of the orders stream
pub const ORDER_KEY_PROPERTIES: &[&str] = &["order_id"];

fn nullable(kind: &str) -> Value {
    json!({ "type": ["null", kind] })
}

fn timestamp() -> Value {
    json!({ "type": ["null", "string"], "format": "date-time" })
}

fn array_of(properties: Value) -> Value {
    json!({
        "type": ["null", "array"],
        "items": { "type": ["null", "object"], "properties": properties }
    })
}

/// JSON schema of the orders stream
pub fn orders_schema() -> Value {
    json!({
        "type": ["null", "object"],
        "properties": {
            "order_id": { "type": "integer" },
            "order_key": nullable("string"),
            "status": nullable("string"),
            "date_created": timestamp(),
            "date_modified": timestamp(),
            "discount_total": nullable("number"),
            "shipping_total": nullable("number"),
            "total": nullable("number"),
            "line_items": array_of(json!({
                "id": nullable("integer"),
                "name": nullable("string"),
                "product_id": nullable("integer"),
                "variation_id": nullable("integer"),
                "quantity": nullable("integer"),
                "subtotal": nullable("number"),
                "subtotal_tax": nullable("number"),
                "total": nullable("number"),
                "sku": nullable("string"),
                "price": nullable("number")
            })),
            "coupon_lines": array_of(json!({
                "id": nullable("integer"),
                "code": nullable("string"),
                "discount": nullable("number")
            })),
            "shipping_lines": array_of(json!({
                "id": nullable("integer"),
                "method_title": nullable("string"),
                "method_id": nullable("string"),
                "total": nullable("number")
            }))
        }
    })
}

/// Schema for a stream id, if the connector defines it
pub fn load_schema(stream_id: &str) -> Option<Value> {
    match stream_id {
        ORDERS => Some(orders_schema()),
        _ => None,
    }
}

/// Mark every top-level property as always included
fn with_automatic_inclusion(mut schema: Value) -> Value {
    if let Some(properties) = schema.get_mut("properties").and_then(Value::as_object_mut) {
        for property in properties.values_mut() {
            if let Some(property) = property.as_object_mut() {
                property.insert("inclusion".to_string(), json!("automatic"));
            }
        }
    }
    schema
}

/// Build the catalog printed in discovery mode
pub fn discover() -> CatalogDocument {
    let streams = [ORDERS]
        .into_iter()
        .filter_map(|stream_id| {
            log::info!("Loading schema for {}", stream_id);
            let schema = load_schema(stream_id)?;
            Some(CatalogStream {
                stream: stream_id.to_string(),
                tap_stream_id: stream_id.to_string(),
                schema: with_automatic_inclusion(schema),
                key_properties: ORDER_KEY_PROPERTIES.iter().map(|k| k.to_string()).collect(),
                metadata: vec![json!({
                    "breadcrumb": [],
                    "metadata": {
                        "table-key-properties": ORDER_KEY_PROPERTIES,
                        "valid-replication-keys": ["date_created"],
                        "forced-replication-method": "INCREMENTAL"
                    }
                })],
            })
        })
        .collect();

    CatalogDocument { streams }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Catalog;

    #[test]
    fn test_orders_schema_has_all_record_fields() {
        let schema = orders_schema();
        let properties = schema["properties"].as_object().unwrap();
        for field in [
            "order_id",
            "order_key",
            "status",
            "date_created",
            "date_modified",
            "discount_total",
            "shipping_total",
            "total",
            "line_items",
            "coupon_lines",
            "shipping_lines",
        ] {
            assert!(properties.contains_key(field), "missing {}", field);
        }
        assert_eq!(schema["properties"]["date_created"]["format"], "date-time");
    }

    #[test]
    fn test_unknown_schema() {
        assert!(load_schema("customers").is_none());
        assert!(load_schema(ORDERS).is_some());
    }

    #[test]
    fn test_discover_marks_inclusion() {
        let doc = discover();
        assert_eq!(doc.streams.len(), 1);

        let stream = &doc.streams[0];
        assert_eq!(stream.tap_stream_id, "orders");
        assert_eq!(stream.key_properties, vec!["order_id".to_string()]);
        for (name, property) in stream.schema["properties"].as_object().unwrap() {
            assert_eq!(property["inclusion"], "automatic", "{}", name);
        }
    }

    #[test]
    fn test_discovered_catalog_is_not_selected_by_default() {
        let value = serde_json::to_value(discover()).unwrap();
        let catalog = Catalog::from_value(value).unwrap();
        assert!(!catalog.is_selected("orders"));
    }
}
