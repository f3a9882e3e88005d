//! Sales page: revenue KPIs, trend with forecast, distribution and clients

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cohorts::{build_cohort_analysis, Cohort};
use super::forecasting::generate_forecast_from;
use super::kpi::{calculate_aov, month_over_month_growth, total_revenue};
use super::periods::{
    calculate_seasonality, daily_revenue, group_sales_by_period, monthly_revenue, DailyRevenue,
    MonthlyRevenue, Period, PeriodBucket,
};
use super::rollups::{recent_sales, top_clients, TopClient};
use super::statistics::{build_histogram, calculate_statistics, HistogramBin, Statistics};
use crate::config::Thresholds;
use crate::error::DataOrigin;
use crate::models::{Dataset, ForecastPoint, Sale, SeriesPoint};

const RECENT_SALES: usize = 15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesKpis {
    pub total_revenue: f64,
    pub total_orders: usize,
    pub aov: f64,
    /// Month-over-month revenue growth, percent
    pub mom_growth: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    #[serde(default)]
    pub origin: DataOrigin,
    pub kpis: SalesKpis,
    pub trend: Vec<DailyRevenue>,
    pub forecast: Vec<ForecastPoint>,
    pub distribution: Vec<HistogramBin>,
    /// Statistics over daily revenue
    pub distribution_stats: Statistics,
    pub hourly: Vec<PeriodBucket>,
    pub by_weekday: Vec<PeriodBucket>,
    pub by_month: Vec<PeriodBucket>,
    /// Months that had sales, calendar order
    pub seasonality: Vec<PeriodBucket>,
    pub monthly: Vec<MonthlyRevenue>,
    pub cohorts: Vec<Cohort>,
    pub top_clients: Vec<TopClient>,
    pub recent_sales: Vec<Sale>,
}

impl SalesReport {
    /// Build the page from the trend, forecast and distribution served
    /// remotely, completed with the per-sale breakdowns
    pub fn from_remote(
        trend: Vec<DailyRevenue>,
        forecast: Vec<ForecastPoint>,
        distribution: Vec<HistogramBin>,
        sales: &[Sale],
        thresholds: &Thresholds,
        today: NaiveDate,
    ) -> Self {
        let mut report = sales_report(sales, thresholds, today);
        report.distribution_stats = daily_statistics(&trend);
        report.trend = trend;
        report.forecast = forecast;
        report.distribution = distribution;
        report
    }
}

fn daily_statistics(trend: &[DailyRevenue]) -> Statistics {
    let values: Vec<f64> = trend.iter().map(|d| d.revenue).collect();
    calculate_statistics(&values)
}

/// Local computation of the whole sales page
pub fn sales_fallback(dataset: &Dataset, thresholds: &Thresholds, today: NaiveDate) -> SalesReport {
    SalesReport {
        origin: DataOrigin::Local,
        ..sales_report(&dataset.sales, thresholds, today)
    }
}

fn sales_report(sales: &[Sale], thresholds: &Thresholds, today: NaiveDate) -> SalesReport {
    let trend = daily_revenue(sales);
    let series: Vec<SeriesPoint> = trend
        .iter()
        .map(|d| SeriesPoint::new(d.date.clone(), d.revenue))
        .collect();
    let amounts: Vec<f64> = sales.iter().map(|s| s.total_amount).collect();

    SalesReport {
        origin: DataOrigin::Remote,
        kpis: SalesKpis {
            total_revenue: total_revenue(sales),
            total_orders: sales.len(),
            aov: calculate_aov(sales),
            mom_growth: month_over_month_growth(sales, today),
        },
        forecast: generate_forecast_from(&series, thresholds.forecast_periods, today),
        distribution: build_histogram(&amounts, thresholds.histogram_bins),
        distribution_stats: daily_statistics(&trend),
        trend,
        hourly: group_sales_by_period(sales, Period::Hour),
        by_weekday: group_sales_by_period(sales, Period::DayOfWeek),
        by_month: group_sales_by_period(sales, Period::Month),
        seasonality: calculate_seasonality(sales),
        monthly: monthly_revenue(sales),
        cohorts: build_cohort_analysis(sales),
        top_clients: top_clients(sales, thresholds.top_clients_limit),
        recent_sales: recent_sales(sales, RECENT_SALES),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::lenient::parse_datetime;

    fn sale(date: &str, amount: f64, user: &str) -> Sale {
        Sale {
            sale_date: parse_datetime(date),
            total_amount: amount,
            user_id: Some(user.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_sales_fallback() {
        let sales = vec![
            sale("2024-04-01T10:00:00", 100.0, "a"),
            sale("2024-04-01T11:00:00", 50.0, "b"),
            sale("2024-04-02T10:00:00", 200.0, "a"),
            sale("2024-05-03T10:00:00", 350.0, "c"),
        ];
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();

        let dataset = Dataset::new(sales, vec![], vec![]);
        let report = sales_fallback(&dataset, &Thresholds::default(), today);

        assert_eq!(report.kpis.total_revenue, 700.0);
        assert_eq!(report.kpis.total_orders, 4);
        assert_eq!(report.kpis.aov, 175.0);
        assert_eq!(report.kpis.mom_growth, 0.0);
        assert_eq!(report.trend.len(), 3);
        assert_eq!(report.trend[0].orders, 2);
        assert_eq!(report.forecast.len(), 7);
        assert_eq!(report.distribution.len(), 8);
        assert_eq!(report.hourly[10].count, 3);
        assert_eq!(report.by_weekday.len(), 7);
        assert_eq!(report.by_month[4].revenue, 350.0);
        assert_eq!(report.top_clients[0].id, "c");
        assert_eq!(report.top_clients[1].revenue, 300.0);
        assert_eq!(report.distribution_stats.max, 350.0);
        assert_eq!(report.origin, DataOrigin::Local);

        let months: Vec<&str> = report.seasonality.iter().map(|b| b.period.as_str()).collect();
        assert_eq!(months, vec!["Apr", "May"]);
        assert_eq!(report.cohorts.len(), 2);
        assert_eq!(report.cohorts[0].cohort, "2024-04");
        assert_eq!(report.cohorts[0].users, 2);
        assert_eq!(report.cohorts[0].orders, 3);
        assert_eq!(report.cohorts[1].revenue, 350.0);
    }

    #[test]
    fn test_from_remote_keeps_remote_trend() {
        let trend = vec![DailyRevenue {
            date: "2024-01-01".into(),
            revenue: 42.0,
            orders: 0,
        }];
        let today = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        let report = SalesReport::from_remote(
            trend.clone(),
            vec![],
            vec![],
            &[],
            &Thresholds::default(),
            today,
        );

        assert_eq!(report.trend, trend);
        assert!(report.forecast.is_empty());
        assert_eq!(report.distribution_stats.mean, 42.0);
        assert_eq!(report.hourly.len(), 24);
    }
}
