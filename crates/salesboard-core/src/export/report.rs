//! Sheets for a full analytics export

use serde::Serialize;

use super::{Cell, Table};
use crate::analytics::{CategoryKpi, DailyRevenue, ProductRow};
use crate::error::ExportError;
use crate::models::{Id, KpiBundle, Sale};

/// Everything a full export can contain. Absent or empty parts produce no sheet.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsExport<'a> {
    pub kpis: Option<&'a KpiBundle>,
    pub daily: &'a [DailyRevenue],
    pub products: &'a [ProductRow],
    pub categories: &'a [CategoryKpi],
    pub sales: &'a [Sale],
}

/// Flat view of a sale; lines are summarized
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaleDetail {
    id: Option<Id>,
    date: Option<String>,
    amount: f64,
    customer: Option<String>,
    items: usize,
    units: f64,
}

impl From<&Sale> for SaleDetail {
    fn from(sale: &Sale) -> Self {
        Self {
            id: sale.id,
            date: sale
                .sale_date
                .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string()),
            amount: sale.total_amount,
            customer: sale.user_id.clone(),
            items: sale.lines.len(),
            units: sale.units(),
        }
    }
}

fn kpi_summary(kpis: &KpiBundle) -> Table {
    let mut table = Table::new("KPI Summary", vec!["Metric".into(), "Value".into()]);
    let rows = [
        ("Total Revenue", kpis.total_revenue),
        ("Total Sales", kpis.total_sales as f64),
        ("Average Basket", kpis.average_basket),
        ("Low Stock Count", kpis.low_stock_count as f64),
    ];
    for (metric, value) in rows {
        table.push_row(vec![Cell::from(metric), Cell::Number(value)]);
    }
    table
}

/// Sheets `KPI Summary`, `Daily Sales`, `Products`, `Categories` and
/// `Sales Details`, in that order, skipping the empty ones
pub fn prepare_analytics_export(data: AnalyticsExport<'_>) -> Result<Vec<Table>, ExportError> {
    let details: Vec<SaleDetail> = data.sales.iter().map(SaleDetail::from).collect();

    let tables = vec![
        data.kpis.map(kpi_summary),
        Some(Table::from_serialize("Daily Sales", data.daily)?),
        Some(Table::from_serialize("Products", data.products)?),
        Some(Table::from_serialize("Categories", data.categories)?),
        Some(Table::from_serialize("Sales Details", &details)?),
    ];

    Ok(tables.into_iter().flatten().filter(|t| !t.is_empty()).collect())
}
