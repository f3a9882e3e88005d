//! Parsers for raw sales, product and category payloads

pub mod entities;
pub mod lenient;

pub use entities::{parse_categories, parse_dataset, parse_products, parse_sale, parse_sales};
