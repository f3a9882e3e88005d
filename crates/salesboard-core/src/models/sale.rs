//! Sale and sale line models

use super::Id;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A recorded sale with its lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Option<Id>,
    /// Wall-clock time of the sale, as written by the backend
    pub sale_date: Option<NaiveDateTime>,
    pub total_amount: f64,
    #[serde(default)]
    pub lines: Vec<SaleLine>,
    /// Customer (or seller) who placed the sale
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Sale {
    /// Calendar day as `YYYY-MM-DD`, if the sale is dated
    pub fn day_key(&self) -> Option<String> {
        self.sale_date.map(|d| d.format("%Y-%m-%d").to_string())
    }

    /// Sum of quantities across lines
    pub fn units(&self) -> f64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

/// One product line of a sale
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub product_id: Option<Id>,
    #[serde(default)]
    pub product_title: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
}

impl SaleLine {
    /// quantity × unit price
    pub fn revenue(&self) -> f64 {
        self.quantity * self.unit_price
    }
}
