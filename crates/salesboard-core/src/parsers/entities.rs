//! Typed entities from raw JSON payloads
//!
//! Payloads are either a bare array or a wrapper object holding the array
//! under `data` or `content` (paged responses). Records that cannot be
//! salvaged are skipped and counted in the [`LoadReport`].

use serde_json::Value;
use tracing::warn;

use super::lenient::*;
use crate::error::LoadReport;
use crate::models::{Category, Dataset, Product, Sale, SaleLine};

/// Borrow the record array out of a payload
fn records<'a>(payload: &'a Value, source: &str, report: &mut LoadReport) -> &'a [Value] {
    let array = match payload {
        Value::Array(items) => Some(items.as_slice()),
        Value::Object(_) => array_field_opt(payload, &["data", "content"]),
        _ => None,
    };

    match array {
        Some(items) => items,
        None => {
            warn!(source, "Payload is not an array, treating as empty");
            report.add_warning(source, "payload is not an array");
            &[]
        }
    }
}

fn array_field_opt<'a>(payload: &'a Value, keys: &[&str]) -> Option<&'a [Value]> {
    keys.iter()
        .find_map(|k| payload.get(*k).and_then(Value::as_array))
        .map(Vec::as_slice)
}

fn skip(report: &mut LoadReport, source: &str, index: usize, reason: &str) {
    report.records_skipped += 1;
    report.add_warning(source, format!("record {}: {}", index, reason));
}

fn parse_line(raw: &Value) -> SaleLine {
    SaleLine {
        product_id: id_field(raw, LINE_PRODUCT_ID_KEYS),
        product_title: text_field(raw, LINE_TITLE_KEYS),
        quantity: number_or_zero(raw, LINE_QUANTITY_KEYS),
        unit_price: number_or_zero(raw, LINE_UNIT_PRICE_KEYS),
    }
}

/// Parse a single sale object. Every field is optional.
pub fn parse_sale(raw: &Value) -> Sale {
    Sale {
        id: id_field(raw, &["id"]),
        sale_date: date_field(raw, SALE_DATE_KEYS),
        total_amount: number_or_zero(raw, SALE_AMOUNT_KEYS),
        lines: array_field(raw, SALE_LINES_KEYS)
            .iter()
            .filter(|l| l.is_object())
            .map(parse_line)
            .collect(),
        user_id: text_field(raw, SALE_CUSTOMER_KEYS),
    }
}

/// Parse sales. Non-object elements are skipped; undated sales are kept
/// and counted.
pub fn parse_sales(payload: &Value, report: &mut LoadReport) -> Vec<Sale> {
    let mut sales = Vec::new();
    for (index, raw) in records(payload, "sales", report).iter().enumerate() {
        if !raw.is_object() {
            skip(report, "sales", index, "not an object");
            continue;
        }
        sales.push(parse_sale(raw));
    }
    let undated = sales.iter().filter(|s| s.sale_date.is_none()).count();
    if undated > 0 {
        warn!(undated, "Sales missing a date, leaving them out of time buckets");
    }
    report.sales_loaded += sales.len();
    report.undated_sales += undated;
    sales
}

/// Parse products. Records without a usable id are skipped.
pub fn parse_products(payload: &Value, report: &mut LoadReport) -> Vec<Product> {
    let mut products = Vec::new();
    for (index, raw) in records(payload, "products", report).iter().enumerate() {
        let Some(id) = id_field(raw, &["id"]) else {
            skip(report, "products", index, "missing id");
            continue;
        };
        products.push(Product {
            id,
            title: text_field(raw, PRODUCT_TITLE_KEYS).unwrap_or_else(|| format!("Product {}", id)),
            stock: number_or_zero(raw, PRODUCT_STOCK_KEYS),
            price: number_or_zero(raw, PRODUCT_PRICE_KEYS),
            category_id: id_field(raw, PRODUCT_CATEGORY_KEYS),
        });
    }
    report.products_loaded += products.len();
    products
}

/// Parse categories. Records without a usable id are skipped.
pub fn parse_categories(payload: &Value, report: &mut LoadReport) -> Vec<Category> {
    let mut categories = Vec::new();
    for (index, raw) in records(payload, "categories", report).iter().enumerate() {
        let Some(id) = id_field(raw, &["id"]) else {
            skip(report, "categories", index, "missing id");
            continue;
        };
        categories.push(Category {
            id,
            name: text_field(raw, CATEGORY_NAME_KEYS).unwrap_or_else(|| "Other".to_string()),
        });
    }
    report.categories_loaded += categories.len();
    categories
}

/// Parse all three payloads into a dataset
pub fn parse_dataset(
    sales: &Value,
    products: &Value,
    categories: &Value,
    report: &mut LoadReport,
) -> Dataset {
    Dataset::new(
        parse_sales(sales, report),
        parse_products(products, report),
        parse_categories(categories, report),
    )
}
