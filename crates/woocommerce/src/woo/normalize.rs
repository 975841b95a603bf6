//! WooCommerce order normalization
//!
//! Converts a raw order object into a [`NormalizedOrder`]. Every field is
//! coerced to its declared type; one bad field rejects the whole order.

use chrono::FixedOffset;
use serde_json::{Map, Value};

use super::api::RawOrder;
use crate::error::TypeCoercionError;
use crate::models::{Coupon, LineItem, NormalizedOrder, OrderId, ShippingLine};
use crate::time::{format_timestamp, restamp};

type Fields = Map<String, Value>;

/// Normalize a raw order
///
/// `tz` is the offset of the configured start date. Order timestamps keep
/// their wall-clock time and take this offset in place of their own.
pub fn normalize_order(raw: &RawOrder, tz: FixedOffset) -> Result<NormalizedOrder, TypeCoercionError> {
    let f = FieldReader::new(raw, "");

    Ok(NormalizedOrder {
        order_id: OrderId::new(f.int("id")?),
        order_key: f.string("order_key")?,
        status: f.string("status")?,
        date_created: f.timestamp("date_created", tz)?,
        date_modified: f.timestamp("date_modified", tz)?,
        discount_total: f.decimal("discount_total")?,
        shipping_total: f.decimal("shipping_total")?,
        total: f.decimal("total")?,
        line_items: sub_list(raw, "line_items", normalize_line_item)?,
        coupon_lines: sub_list(raw, "coupon_lines", normalize_coupon)?,
        shipping_lines: sub_list(raw, "shipping_lines", normalize_shipping_line)?,
    })
}

fn normalize_line_item(f: &FieldReader) -> Result<LineItem, TypeCoercionError> {
    Ok(LineItem {
        id: f.int("id")?,
        name: f.string("name")?,
        product_id: f.int("product_id")?,
        variation_id: f.int("variation_id")?,
        quantity: f.int("quantity")?,
        subtotal: f.decimal("subtotal")?,
        subtotal_tax: f.decimal("subtotal_tax")?,
        total: f.decimal("total")?,
        sku: f.string("sku")?,
        price: f.decimal("price")?,
    })
}

fn normalize_coupon(f: &FieldReader) -> Result<Coupon, TypeCoercionError> {
    Ok(Coupon {
        id: f.int("id")?,
        code: f.string("code")?,
        discount: f.decimal("discount")?,
    })
}

fn normalize_shipping_line(f: &FieldReader) -> Result<ShippingLine, TypeCoercionError> {
    Ok(ShippingLine {
        id: f.int("id")?,
        method_title: f.string("method_title")?,
        method_id: f.string("method_id")?,
        total: f.decimal("total")?,
    })
}

/// Normalize a nested collection
///
/// Missing, null and empty collections all become `None`.
fn sub_list<T>(
    raw: &Fields,
    key: &str,
    normalize: fn(&FieldReader) -> Result<T, TypeCoercionError>,
) -> Result<Option<Vec<T>>, TypeCoercionError> {
    let items = match raw.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) if items.is_empty() => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(other) => return Err(mismatch(key, "array", Some(other))),
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let path = format!("{}[{}]", key, i);
            match item {
                Value::Object(fields) => normalize(&FieldReader::new(fields, &path)),
                other => Err(mismatch(&path, "object", Some(other))),
            }
        })
        .collect::<Result<Vec<T>, _>>()
        .map(Some)
}

/// Typed access to the fields of one JSON object
struct FieldReader<'a> {
    fields: &'a Fields,
    prefix: &'a str,
}

impl<'a> FieldReader<'a> {
    fn new(fields: &'a Fields, prefix: &'a str) -> Self {
        Self { fields, prefix }
    }

    fn path(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.prefix, key)
        }
    }

    fn fail(&self, key: &str, expected: &'static str) -> TypeCoercionError {
        mismatch(&self.path(key), expected, self.fields.get(key))
    }

    fn int(&self, key: &str) -> Result<i64, TypeCoercionError> {
        match self.fields.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
            Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
        .ok_or_else(|| self.fail(key, "integer"))
    }

    fn decimal(&self, key: &str) -> Result<f64, TypeCoercionError> {
        match self.fields.get(key) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        // NaN and infinities would serialize as null
        .filter(|v| v.is_finite())
        .ok_or_else(|| self.fail(key, "decimal"))
    }

    fn string(&self, key: &str) -> Result<String, TypeCoercionError> {
        match self.fields.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            _ => None,
        }
        .ok_or_else(|| self.fail(key, "string"))
    }

    fn timestamp(&self, key: &str, tz: FixedOffset) -> Result<String, TypeCoercionError> {
        match self.fields.get(key) {
            Some(Value::String(s)) => restamp(s, tz).map(|dt| format_timestamp(&dt)),
            _ => None,
        }
        .ok_or_else(|| self.fail(key, "timestamp"))
    }
}

fn mismatch(field: &str, expected: &'static str, found: Option<&Value>) -> TypeCoercionError {
    TypeCoercionError {
        field: field.to_string(),
        expected,
        found: describe(found),
    }
}

fn describe(value: Option<&Value>) -> String {
    match value {
        None => "missing".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => format!("boolean {}", b),
        Some(Value::Number(n)) => format!("number {}", n),
        Some(Value::String(s)) => format!("string {:?}", s),
        Some(Value::Array(_)) => "array".to_string(),
        Some(Value::Object(_)) => "object".to_string(),
    }
}
