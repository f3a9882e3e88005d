//! Rule-based insights for the overview page

use serde::{Deserialize, Serialize};

use super::periods::PeriodBucket;
use super::rollups::CategoryRevenue;
use crate::models::KpiBundle;
use crate::view::format_currency;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InsightKind {
    Warning,
    Peak,
    Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
}

/// Insights derived from real figures only
///
/// - stock warning when more than `low_stock_alert` products are low
/// - busiest hour of the day, when any hour sold something
/// - category with the most revenue
pub fn generate_insights(
    kpis: &KpiBundle,
    hourly: &[PeriodBucket],
    categories: &[CategoryRevenue],
    low_stock_alert: usize,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    if kpis.low_stock_count > low_stock_alert {
        insights.push(Insight {
            kind: InsightKind::Warning,
            title: "Stock alert".to_string(),
            message: format!("{} products need restocking.", kpis.low_stock_count),
        });
    }

    let peak = hourly
        .iter()
        .filter(|b| b.revenue > 0.0)
        .fold(None::<&PeriodBucket>, |best, b| match best {
            Some(p) if p.revenue >= b.revenue => Some(p),
            _ => Some(b),
        });
    if let Some(peak) = peak {
        insights.push(Insight {
            kind: InsightKind::Peak,
            title: "Peak hour".to_string(),
            message: format!(
                "Sales peak at {} with {}.",
                peak.period,
                format_currency(peak.revenue)
            ),
        });
    }

    let top = categories
        .iter()
        .fold(None::<&CategoryRevenue>, |best, c| match best {
            Some(b) if b.total_revenue >= c.total_revenue => Some(b),
            _ => Some(c),
        });
    if let Some(top) = top {
        insights.push(Insight {
            kind: InsightKind::Trend,
            title: "Top category".to_string(),
            message: format!(
                "\"{}\" brings the most revenue with {}.",
                top.category_name,
                format_currency(top.total_revenue)
            ),
        });
    }

    insights
}
