//! Derived KPI and time-series models

use serde::{Deserialize, Serialize};

/// Headline numbers shown on every analytics page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KpiBundle {
    pub total_revenue: f64,
    pub total_sales: usize,
    pub average_basket: f64,
    pub low_stock_count: usize,
    pub total_products: usize,
    /// Products with stock > 0
    pub active_products: usize,
}

/// Input point for forecasting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub date: String,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }
}

/// Projected point produced by the forecaster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub date: String,
    pub value: f64,
    #[serde(default = "forecast_flag")]
    pub is_forecast: bool,
}

fn forecast_flag() -> bool {
    true
}
