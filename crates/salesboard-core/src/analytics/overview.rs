//! Overview page

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::forecasting::{generate_forecast_stepped, ForecastStep};
use super::insights::{generate_insights, Insight};
use super::kpi::{compute_kpis, revenue_on};
use super::periods::{
    build_heatmap, daily_revenue, group_sales_by_period, monthly_revenue, DailyRevenue,
    MonthlyRevenue, Period, PeriodBucket,
};
use super::rollups::{best_sellers, category_revenue, recent_sales, BestSeller, CategoryRevenue};
use crate::config::Thresholds;
use crate::error::DataOrigin;
use crate::models::{Dataset, ForecastPoint, KpiBundle, Sale, SeriesPoint};

const RECENT_SALES: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewReport {
    #[serde(default)]
    pub origin: DataOrigin,
    pub kpis: KpiBundle,
    pub daily: Vec<DailyRevenue>,
    pub monthly: Vec<MonthlyRevenue>,
    pub monthly_forecast: Vec<ForecastPoint>,
    pub categories: Vec<CategoryRevenue>,
    pub best_sellers: Vec<BestSeller>,
    pub hourly: Vec<PeriodBucket>,
    /// Weekday (Sunday = 0) × hour revenue
    pub heatmap: Vec<[f64; 24]>,
    pub recent_sales: Vec<Sale>,
    pub insights: Vec<Insight>,
    pub today_revenue: f64,
}

/// Pre-aggregated figures served by the analytics API
#[derive(Debug, Clone, Default)]
pub struct RemoteOverview {
    pub kpis: KpiBundle,
    pub daily: Vec<DailyRevenue>,
    pub monthly: Vec<MonthlyRevenue>,
    pub categories: Vec<CategoryRevenue>,
    pub best_sellers: Vec<BestSeller>,
}

impl OverviewReport {
    /// Complete remote figures with what only raw sales can give
    /// (hourly buckets, heatmap, recent sales)
    pub fn from_remote(
        remote: RemoteOverview,
        sales: &[Sale],
        thresholds: &Thresholds,
        today: NaiveDate,
    ) -> Self {
        let hourly = group_sales_by_period(sales, Period::Hour);
        let insights = generate_insights(
            &remote.kpis,
            &hourly,
            &remote.categories,
            thresholds.low_stock_alert,
        );

        Self {
            origin: DataOrigin::Remote,
            monthly_forecast: monthly_forecast(
                &remote.monthly,
                thresholds.monthly_forecast_periods,
                today,
            ),
            kpis: remote.kpis,
            daily: remote.daily,
            monthly: remote.monthly,
            categories: remote.categories,
            best_sellers: remote.best_sellers,
            hourly,
            heatmap: build_heatmap(sales).to_vec(),
            recent_sales: recent_sales(sales, RECENT_SALES),
            insights,
            today_revenue: revenue_on(sales, today),
        }
    }
}

/// Forecast over monthly revenue, one point per following month
fn monthly_forecast(
    monthly: &[MonthlyRevenue],
    periods: usize,
    today: NaiveDate,
) -> Vec<ForecastPoint> {
    if monthly.is_empty() {
        return Vec::new();
    }
    let series: Vec<SeriesPoint> = monthly
        .iter()
        .map(|m| SeriesPoint::new(format!("{}-01", m.month), m.revenue))
        .collect();
    generate_forecast_stepped(&series, periods, today, ForecastStep::Month)
}

/// Local computation of the whole overview page
pub fn overview_fallback(
    dataset: &Dataset,
    thresholds: &Thresholds,
    today: NaiveDate,
) -> OverviewReport {
    let remote = RemoteOverview {
        kpis: compute_kpis(&dataset.sales, &dataset.products, thresholds.low_stock),
        daily: daily_revenue(&dataset.sales),
        monthly: monthly_revenue(&dataset.sales),
        categories: category_revenue(dataset),
        best_sellers: best_sellers(dataset, thresholds.best_sellers_limit),
    };
    OverviewReport {
        origin: DataOrigin::Local,
        ..OverviewReport::from_remote(remote, &dataset.sales, thresholds, today)
    }
}
