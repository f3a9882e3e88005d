//! Data models for sales analytics
//!
//! All entities are transient: built from a payload, aggregated, then dropped.

pub mod catalog;
pub mod kpi;
pub mod sale;

pub use catalog::{Category, Product};
pub use kpi::{ForecastPoint, KpiBundle, SeriesPoint};
pub use sale::{Sale, SaleLine};

/// Entity identifier as issued by the sales backend
pub type Id = i64;

use std::collections::HashMap;

/// Raw entities a fallback computation runs over
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub sales: Vec<Sale>,
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
}

impl Dataset {
    pub fn new(sales: Vec<Sale>, products: Vec<Product>, categories: Vec<Category>) -> Self {
        Self {
            sales,
            products,
            categories,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty() && self.products.is_empty() && self.categories.is_empty()
    }

    /// Products keyed by id (first occurrence wins)
    pub fn product_index(&self) -> HashMap<Id, &Product> {
        let mut index = HashMap::with_capacity(self.products.len());
        for product in &self.products {
            index.entry(product.id).or_insert(product);
        }
        index
    }

    /// Categories keyed by id (first occurrence wins)
    pub fn category_index(&self) -> HashMap<Id, &Category> {
        let mut index = HashMap::with_capacity(self.categories.len());
        for category in &self.categories {
            index.entry(category.id).or_insert(category);
        }
        index
    }
}
