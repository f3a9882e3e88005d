//! Field accessors tolerant of heterogeneous payloads
//!
//! Backends and CSV imports disagree on key names (`totalAmount` vs `montant`,
//! `quantity` vs `quantite`) and on value types (numbers vs numeric strings).
//! Each accessor tries a list of keys in order and takes the first non-null
//! value. Dotted keys such as `product.id` descend into nested objects.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::models::Id;

pub const SALE_AMOUNT_KEYS: &[&str] = &["totalAmount", "total", "montant", "amount"];
pub const SALE_DATE_KEYS: &[&str] = &["saleDate", "createdAt", "date", "dateVente"];
pub const SALE_LINES_KEYS: &[&str] = &["lignes", "lignesVente", "saleLines", "items"];
pub const SALE_CUSTOMER_KEYS: &[&str] = &["userId", "clientId"];
pub const LINE_PRODUCT_ID_KEYS: &[&str] = &["productId", "product.id"];
pub const LINE_TITLE_KEYS: &[&str] = &["productTitle", "product.title", "product.name"];
pub const LINE_QUANTITY_KEYS: &[&str] = &["quantity", "quantite"];
pub const LINE_UNIT_PRICE_KEYS: &[&str] = &["unitPrice", "prixUnitaire"];
pub const PRODUCT_STOCK_KEYS: &[&str] = &["stock", "stockQuantity", "quantity"];
pub const PRODUCT_TITLE_KEYS: &[&str] = &["title", "name"];
pub const PRODUCT_PRICE_KEYS: &[&str] = &["price", "prix"];
pub const PRODUCT_CATEGORY_KEYS: &[&str] = &["categoryId", "category.id"];
pub const CATEGORY_NAME_KEYS: &[&str] = &["name", "nom", "title"];

/// Resolve a possibly dotted key inside an object
fn lookup<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.')
        .try_fold(value, |current, segment| current.get(segment))
}

/// First non-null value among `keys`
pub fn first_present<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| lookup(value, key))
        .find(|v| !v.is_null())
}

/// Number from a JSON number or a numeric string. NaN and infinities are rejected.
pub fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Numeric field, coerced to 0 when missing or malformed
pub fn number_or_zero(value: &Value, keys: &[&str]) -> f64 {
    first_present(value, keys).and_then(as_number).unwrap_or(0.0)
}

/// Integral identifier from a number or a numeric string
pub fn as_id(value: &Value) -> Option<Id> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as Id)
        }),
        Value::String(s) => s.trim().parse::<Id>().ok(),
        _ => None,
    }
}

pub fn id_field(value: &Value, keys: &[&str]) -> Option<Id> {
    first_present(value, keys).and_then(as_id)
}

/// Non-empty text; numbers are rendered as text
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn text_field(value: &Value, keys: &[&str]) -> Option<String> {
    first_present(value, keys).and_then(as_text)
}

/// Parse a timestamp in any of the shapes the sales backend emits
///
/// Offsets are dropped: the wall-clock time as written is what the
/// dashboards bucket by.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Date field from a string or an epoch-milliseconds number
pub fn date_field(value: &Value, keys: &[&str]) -> Option<NaiveDateTime> {
    match first_present(value, keys)? {
        Value::String(s) => parse_datetime(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.naive_utc()),
        _ => None,
    }
}

/// Array field, empty when missing or not an array
pub fn array_field<'a>(value: &'a Value, keys: &[&str]) -> &'a [Value] {
    keys.iter()
        .filter_map(|key| lookup(value, key))
        .find_map(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
