//! Time bucketing of sales
//!
//! Hour, weekday, week-of-month and month groupings always return their full
//! calendar (zero-filled) in calendar order, whatever order the sales came in.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::models::Sale;

/// Weekday labels, Sunday first
pub const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Bucketing granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Period {
    /// 24 buckets, hour of day
    Hour,
    /// 7 buckets, Sunday first
    DayOfWeek,
    /// 5 buckets, week = ceil(day of month / 7)
    WeekOfMonth,
    /// 12 buckets, January first
    Month,
    /// One bucket per calendar day present, ascending
    Date,
}

impl Period {
    /// Number of buckets for calendar periods, `None` for `Date`
    pub fn bucket_count(&self) -> Option<usize> {
        match self {
            Period::Hour => Some(24),
            Period::DayOfWeek => Some(7),
            Period::WeekOfMonth => Some(5),
            Period::Month => Some(12),
            Period::Date => None,
        }
    }

    fn label(&self, slot: usize) -> String {
        match self {
            Period::Hour => format!("{}:00", slot),
            Period::DayOfWeek => DAY_NAMES[slot].to_string(),
            Period::WeekOfMonth => format!("Week {}", slot + 1),
            Period::Month => MONTH_NAMES[slot].to_string(),
            Period::Date => String::new(),
        }
    }

    fn slot(&self, at: &NaiveDateTime) -> usize {
        match self {
            Period::Hour => at.hour() as usize,
            Period::DayOfWeek => at.weekday().num_days_from_sunday() as usize,
            Period::WeekOfMonth => ((at.day() as usize - 1) / 7).min(4),
            Period::Month => at.month0() as usize,
            Period::Date => 0,
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hour" => Ok(Period::Hour),
            "day" | "weekday" => Ok(Period::DayOfWeek),
            "week" => Ok(Period::WeekOfMonth),
            "month" => Ok(Period::Month),
            "date" | "daily" => Ok(Period::Date),
            other => Err(format!(
                "unknown period '{}' (expected hour, day, week, month or date)",
                other
            )),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Period::Hour => "hour",
            Period::DayOfWeek => "day",
            Period::WeekOfMonth => "week",
            Period::Month => "month",
            Period::Date => "date",
        };
        f.write_str(name)
    }
}

/// Revenue and sale count for one bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodBucket {
    pub period: String,
    pub revenue: f64,
    pub count: usize,
}

impl PeriodBucket {
    fn empty(period: String) -> Self {
        Self {
            period,
            revenue: 0.0,
            count: 0,
        }
    }
}

/// Dated sales only. Undated ones are reported by the parser.
fn dated(sales: &[Sale]) -> impl Iterator<Item = (&Sale, NaiveDateTime)> {
    sales
        .iter()
        .filter_map(|s| s.sale_date.map(|d| (s, d)))
}

/// Group sales into calendar buckets
///
/// Calendar periods return a fixed-size, zero-filled sequence. `Date`
/// returns only the days that have sales, ascending.
pub fn group_sales_by_period(sales: &[Sale], period: Period) -> Vec<PeriodBucket> {
    let Some(count) = period.bucket_count() else {
        return daily_revenue(sales)
            .into_iter()
            .map(|d| PeriodBucket {
                period: d.date,
                revenue: d.revenue,
                count: d.orders,
            })
            .collect();
    };

    let mut buckets: Vec<PeriodBucket> = (0..count)
        .map(|slot| PeriodBucket::empty(period.label(slot)))
        .collect();

    for (sale, at) in dated(sales) {
        let bucket = &mut buckets[period.slot(&at)];
        bucket.revenue += sale.total_amount;
        bucket.count += 1;
    }

    buckets
}

/// Revenue per calendar month name, months without sales omitted
pub fn calculate_seasonality(sales: &[Sale]) -> Vec<PeriodBucket> {
    group_sales_by_period(sales, Period::Month)
        .into_iter()
        .filter(|b| b.count > 0)
        .collect()
}

/// Revenue and order count for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenue {
    pub date: String,
    pub revenue: f64,
    #[serde(default)]
    pub orders: usize,
}

/// Daily revenue, ascending by date
pub fn daily_revenue(sales: &[Sale]) -> Vec<DailyRevenue> {
    let mut days: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for (sale, at) in dated(sales) {
        let entry = days.entry(at.date()).or_default();
        entry.0 += sale.total_amount;
        entry.1 += 1;
    }

    days.into_iter()
        .map(|(date, (revenue, orders))| DailyRevenue {
            date: date.format("%Y-%m-%d").to_string(),
            revenue,
            orders,
        })
        .collect()
}

/// Revenue for one year-month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    /// `YYYY-MM`
    pub month: String,
    /// `Jan 2024`
    #[serde(default)]
    pub label: String,
    pub revenue: f64,
}

/// Monthly revenue, ascending by year-month
pub fn monthly_revenue(sales: &[Sale]) -> Vec<MonthlyRevenue> {
    let mut months: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for (sale, at) in dated(sales) {
        *months.entry((at.year(), at.month0())).or_default() += sale.total_amount;
    }

    months
        .into_iter()
        .map(|((year, month0), revenue)| MonthlyRevenue {
            month: format!("{}-{:02}", year, month0 + 1),
            label: format!("{} {}", MONTH_NAMES[month0 as usize], year),
            revenue,
        })
        .collect()
}

/// Weekday (Sunday = 0) × hour revenue matrix
pub fn build_heatmap(sales: &[Sale]) -> [[f64; 24]; 7] {
    let mut matrix = [[0.0; 24]; 7];
    for (sale, at) in dated(sales) {
        let day = at.weekday().num_days_from_sunday() as usize;
        matrix[day][at.hour() as usize] += sale.total_amount;
    }
    matrix
}
