//! Fallback aggregation engine
//!
//! Recomputes what the analytics API would have served (KPIs, time buckets,
//! forecasts, BCG classification, cohorts, distributions) from raw sales,
//! products and categories. Every function is a stateless pass over
//! in-memory slices and degrades to zero-filled or empty output on missing
//! data instead of failing.

pub mod bcg;
pub mod category;
pub mod cohorts;
pub mod forecasting;
pub mod insights;
pub mod kpi;
pub mod overview;
pub mod periods;
pub mod products;
pub mod rollups;
pub mod sales;
pub mod statistics;


pub use bcg::{aggregate_product_sales, build_bcg_matrix, BcgMatrix, BcgQuadrant, ProductMetric};
pub use category::{
    category_fallback, category_kpis, category_rankings, CategoryKpi, CategoryRanking,
    CategoryReport, CategorySummary, TreemapNode,
};
pub use cohorts::{build_cohort_analysis, Cohort};
pub use forecasting::{
    generate_forecast, generate_forecast_from, generate_forecast_stepped, ForecastStep,
};
pub use insights::{generate_insights, Insight, InsightKind};
pub use kpi::{
    calculate_aov, calculate_growth_rate, compute_kpis, month_over_month_growth, revenue_on,
};
pub use overview::{overview_fallback, OverviewReport, RemoteOverview};
pub use periods::{
    build_heatmap, calculate_seasonality, daily_revenue, group_sales_by_period, monthly_revenue,
    DailyRevenue, MonthlyRevenue, Period, PeriodBucket,
};
pub use products::{
    product_matrix, product_metrics, products_fallback, recommendations, Priority, ProductMetrics,
    ProductReport, ProductRow, Recommendation, RecommendationKind, RemoteProducts,
};
pub use rollups::{
    best_sellers, category_revenue, recent_sales, top_clients, BestSeller, CategoryRevenue,
    TopClient,
};
pub use sales::{sales_fallback, SalesKpis, SalesReport};
pub use statistics::{build_histogram, calculate_statistics, HistogramBin, Statistics};

/// Round half away from zero to `decimals` places
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
