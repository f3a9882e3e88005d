//! Product catalog models

use super::Id;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Id,
    pub title: String,
    pub stock: f64,
    pub price: f64,
    #[serde(default)]
    pub category_id: Option<Id>,
}

impl Product {
    /// Stock strictly below `threshold`
    pub fn is_low_stock(&self, threshold: f64) -> bool {
        self.stock < threshold
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Id,
    pub name: String,
}
