//! Remote analytics access with local fallback
//!
//! [`AnalyticsApi`] serves pre-aggregated figures, [`EntitySource`] serves
//! raw entities. [`Dashboard`] asks the former first and recomputes a page
//! from the latter when any request of the page fails.

pub mod dashboard;
pub mod http;
pub mod json_dir;

pub use dashboard::{Dashboard, Loaded};
pub use http::HttpClient;
pub use json_dir::JsonDirSource;

use serde_json::Value;
use std::future::Future;

use crate::analytics::{
    BestSeller, CategoryKpi, CategoryRevenue, DailyRevenue, HistogramBin, MonthlyRevenue,
    TreemapNode,
};
use crate::error::CoreError;
use crate::models::{ForecastPoint, KpiBundle};

/// Pre-aggregated analytics endpoints
pub trait AnalyticsApi {
    fn kpis(&self) -> impl Future<Output = Result<KpiBundle, CoreError>> + Send;

    fn daily_sales(&self) -> impl Future<Output = Result<Vec<DailyRevenue>, CoreError>> + Send;

    fn monthly_sales(&self) -> impl Future<Output = Result<Vec<MonthlyRevenue>, CoreError>> + Send;

    fn best_sellers(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<BestSeller>, CoreError>> + Send;

    /// Revenue per category, as shown on the overview
    fn category_stats(&self)
    -> impl Future<Output = Result<Vec<CategoryRevenue>, CoreError>> + Send;

    /// Full per-category KPIs, as shown on the category page
    fn category_kpis(&self) -> impl Future<Output = Result<Vec<CategoryKpi>, CoreError>> + Send;

    fn category_treemap(&self)
    -> impl Future<Output = Result<Vec<TreemapNode>, CoreError>> + Send;

    fn sales_forecast(
        &self,
        days: usize,
    ) -> impl Future<Output = Result<Vec<ForecastPoint>, CoreError>> + Send;

    fn sales_distribution(
        &self,
    ) -> impl Future<Output = Result<Vec<HistogramBin>, CoreError>> + Send;
}

/// Raw entity payloads, parsed leniently by [`crate::parsers`]
pub trait EntitySource {
    fn sales(&self) -> impl Future<Output = Result<Value, CoreError>> + Send;

    fn products(&self) -> impl Future<Output = Result<Value, CoreError>> + Send;

    fn categories(&self) -> impl Future<Output = Result<Value, CoreError>> + Send;
}
