//! Terminal rendering of report pages
//!
//! Every page renders to a `String`; printing is left to `main`.

use comfy_table::{Cell, Color, ContentArrangement, Row, Table};
use salesboard_core::analytics::{
    BcgQuadrant, CategoryKpi, CategoryReport, InsightKind, OverviewReport, Priority, ProductMetric,
    ProductReport, ProductRow, SalesReport,
};
use salesboard_core::models::Sale;
use salesboard_core::view::{
    format_currency, format_number, format_percentage, StockBadge, TableView, TrendBadge,
};
use salesboard_core::{DataOrigin, LoadReport};

const TREND_DAYS: usize = 14;

// ============================================================================
// Building blocks
// ============================================================================

fn new_table(headers: &[&str], no_color: bool) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    if no_color {
        table.set_header(headers.to_vec());
    } else {
        table.set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    }
    table
}

fn colored(text: String, color: Color, no_color: bool) -> Cell {
    if no_color {
        Cell::new(text)
    } else {
        Cell::new(text).fg(color)
    }
}

fn heading(lines: &mut Vec<String>, title: &str) {
    lines.push(String::new());
    lines.push(title.to_string());
    lines.push("-".repeat(title.chars().count()));
}

/// One-line statement of where the figures came from
pub fn origin_banner(origin: &DataOrigin) -> String {
    match origin {
        DataOrigin::Remote => "Source: analytics API".to_string(),
        DataOrigin::Local => "Source: computed locally from raw data".to_string(),
        DataOrigin::Fallback { reason } => format!(
            "Source: computed locally (analytics API unavailable: {})",
            reason
        ),
    }
}

/// Problems met while loading raw entities, if any
pub fn load_warnings(report: &LoadReport) -> Option<String> {
    if !report.has_errors() && report.undated_sales == 0 {
        return None;
    }
    let (_, errors) = report.error_count();
    let mut lines = vec![format!(
        "Data warnings ({} skipped records, {} failed sources):",
        report.records_skipped, errors
    )];
    lines.extend(
        report
            .errors
            .iter()
            .map(|e| format!("  - {}: {}", e.source, e.message)),
    );
    if report.undated_sales > 0 {
        lines.push(format!(
            "  - sales: {} without a date, left out of time buckets",
            report.undated_sales
        ));
    }
    Some(lines.join("\n"))
}

fn sales_table(sales: &[Sale], no_color: bool) -> Table {
    let mut table = new_table(&["ID", "Date", "Customer", "Items", "Amount"], no_color);
    for sale in sales {
        table.add_row(Row::from(vec![
            sale.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
            sale.sale_date
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            sale.user_id.clone().unwrap_or_else(|| "-".to_string()),
            sale.lines.len().to_string(),
            format_currency(sale.total_amount),
        ]));
    }
    table
}

// ============================================================================
// Pages
// ============================================================================

pub fn overview(page: &OverviewReport, no_color: bool) -> String {
    let kpis = &page.kpis;
    let mut lines = vec![
        "salesboard - Overview".to_string(),
        "=====================".to_string(),
        origin_banner(&page.origin),
        String::new(),
        format!("Total Revenue:    {}", format_currency(kpis.total_revenue)),
        format!("Sales:            {}", kpis.total_sales),
        format!("Average Basket:   {}", format_currency(kpis.average_basket)),
        format!("Today:            {}", format_currency(page.today_revenue)),
        format!(
            "Products:         {} active / {} total",
            kpis.active_products, kpis.total_products
        ),
        format!("Low Stock:        {}", kpis.low_stock_count),
    ];

    if !page.monthly.is_empty() || !page.monthly_forecast.is_empty() {
        heading(&mut lines, "Monthly revenue");
        let mut table = new_table(&["Month", "Revenue", ""], no_color);
        for month in &page.monthly {
            let label = if month.label.is_empty() { &month.month } else { &month.label };
            table.add_row(Row::from(vec![
                label.clone(),
                format_currency(month.revenue),
                String::new(),
            ]));
        }
        for point in &page.monthly_forecast {
            table.add_row(vec![
                Cell::new(&point.date),
                Cell::new(format_currency(point.value)),
                colored("forecast".to_string(), Color::DarkGrey, no_color),
            ]);
        }
        lines.push(table.to_string());
    }

    if !page.best_sellers.is_empty() {
        heading(&mut lines, "Best sellers");
        let mut table = new_table(&["#", "Product", "Units"], no_color);
        for (rank, seller) in page.best_sellers.iter().enumerate() {
            table.add_row(Row::from(vec![
                (rank + 1).to_string(),
                seller.product_title.clone(),
                format_number(seller.total_quantity),
            ]));
        }
        lines.push(table.to_string());
    }

    if !page.categories.is_empty() {
        heading(&mut lines, "Revenue by category");
        let total: f64 = page.categories.iter().map(|c| c.total_revenue).sum();
        let mut table = new_table(&["Category", "Revenue", "Share"], no_color);
        for category in &page.categories {
            let share = if total > 0.0 {
                category.total_revenue / total * 100.0
            } else {
                0.0
            };
            table.add_row(Row::from(vec![
                category.category_name.clone(),
                format_currency(category.total_revenue),
                format_percentage(share),
            ]));
        }
        lines.push(table.to_string());
    }

    if !page.insights.is_empty() {
        heading(&mut lines, "Insights");
        for insight in &page.insights {
            let marker = match insight.kind {
                InsightKind::Warning => "!",
                InsightKind::Peak => "*",
                InsightKind::Trend => ">",
            };
            lines.push(format!("{} {}: {}", marker, insight.title, insight.message));
        }
    }

    if !page.recent_sales.is_empty() {
        heading(&mut lines, "Recent sales");
        lines.push(sales_table(&page.recent_sales, no_color).to_string());
    }

    lines.join("\n")
}

pub fn sales(page: &SalesReport, no_color: bool) -> String {
    let kpis = &page.kpis;
    let stats = &page.distribution_stats;
    let mut lines = vec![
        "salesboard - Sales".to_string(),
        "==================".to_string(),
        origin_banner(&page.origin),
        String::new(),
        format!("Total Revenue:    {}", format_currency(kpis.total_revenue)),
        format!("Orders:           {}", kpis.total_orders),
        format!("Average Order:    {}", format_currency(kpis.aov)),
        format!("Month over Month: {}", TrendBadge::new(kpis.mom_growth)),
        String::new(),
        format!(
            "Daily revenue:    mean {} / median {} / std {}",
            format_currency(stats.mean),
            format_currency(stats.median),
            format_currency(stats.std)
        ),
        format!(
            "                  min {} / q1 {} / q3 {} / max {}",
            format_currency(stats.min),
            format_currency(stats.q1),
            format_currency(stats.q3),
            format_currency(stats.max)
        ),
    ];

    if !page.trend.is_empty() || !page.forecast.is_empty() {
        heading(&mut lines, "Daily trend");
        let mut table = new_table(&["Date", "Revenue", "Orders"], no_color);
        let skip = page.trend.len().saturating_sub(TREND_DAYS);
        for day in page.trend.iter().skip(skip) {
            table.add_row(Row::from(vec![
                day.date.clone(),
                format_currency(day.revenue),
                day.orders.to_string(),
            ]));
        }
        for point in &page.forecast {
            table.add_row(vec![
                Cell::new(&point.date),
                Cell::new(format_currency(point.value)),
                colored("forecast".to_string(), Color::DarkGrey, no_color),
            ]);
        }
        lines.push(table.to_string());
    }

    if !page.distribution.is_empty() {
        heading(&mut lines, "Order amounts");
        let mut table = new_table(&["Range", "Orders", "Share"], no_color);
        for bin in &page.distribution {
            table.add_row(Row::from(vec![
                bin.range.clone(),
                bin.count.to_string(),
                format_percentage(bin.percentage),
            ]));
        }
        lines.push(table.to_string());
    }

    let peak = page
        .hourly
        .iter()
        .filter(|b| b.revenue > 0.0)
        .max_by(|a, b| a.revenue.total_cmp(&b.revenue));
    if let Some(peak) = peak {
        lines.push(String::new());
        lines.push(format!(
            "Busiest hour:     {} ({}, {} orders)",
            peak.period,
            format_currency(peak.revenue),
            peak.count
        ));
    }

    if !page.top_clients.is_empty() {
        heading(&mut lines, "Top clients");
        let mut table = new_table(
            &["#", "Client", "Orders", "Revenue", "Avg order", "Share"],
            no_color,
        );
        for client in &page.top_clients {
            table.add_row(Row::from(vec![
                client.rank.to_string(),
                client.id.clone(),
                client.orders.to_string(),
                format_currency(client.revenue),
                format_currency(client.avg_order),
                format_percentage(client.contribution),
            ]));
        }
        lines.push(table.to_string());
    }

    if !page.cohorts.is_empty() {
        heading(&mut lines, "Monthly cohorts");
        let mut table = new_table(&["Month", "Customers", "Orders", "Revenue"], no_color);
        for cohort in &page.cohorts {
            table.add_row(Row::from(vec![
                cohort.cohort.clone(),
                cohort.users.to_string(),
                cohort.orders.to_string(),
                format_currency(cohort.revenue),
            ]));
        }
        lines.push(table.to_string());
    }

    if !page.seasonality.is_empty() {
        let months: Vec<String> = page
            .seasonality
            .iter()
            .map(|b| format!("{} {}", b.period, format_currency(b.revenue)))
            .collect();
        lines.push(String::new());
        lines.push(format!("Seasonality:      {}", months.join(", ")));
    }

    if !page.recent_sales.is_empty() {
        heading(&mut lines, "Recent sales");
        lines.push(sales_table(&page.recent_sales, no_color).to_string());
    }

    lines.join("\n")
}

pub fn products(
    page: &ProductReport,
    view: &TableView<ProductRow>,
    low_stock: f64,
    no_color: bool,
) -> String {
    let metrics = &page.metrics;
    let mut lines = vec![
        "salesboard - Products".to_string(),
        "=====================".to_string(),
        origin_banner(&page.origin),
        String::new(),
        format!("Revenue:          {}", format_currency(metrics.revenue)),
        format!("Units sold:       {}", format_number(metrics.units_sold)),
        format!("Average stock:    {:.1}", metrics.avg_stock),
        format!("Products sold:    {}", metrics.product_count),
        format!("Low Stock:        {}", page.kpis.low_stock_count),
    ];

    heading(&mut lines, "Products");
    let rows = view.visible_rows();
    if rows.is_empty() {
        lines.push("No products found.".to_string());
    } else {
        let mut table = new_table(
            &["ID", "Product", "Units", "Revenue", "Price", "Stock", "Segment"],
            no_color,
        );
        for row in rows {
            let badge = StockBadge::classify(row.stock, low_stock);
            let color = match badge {
                StockBadge::OutOfStock | StockBadge::Low => Color::Red,
                StockBadge::Watch => Color::Yellow,
                StockBadge::Ok => Color::Green,
            };
            let segment = page
                .bcg
                .quadrant_of(row.id)
                .map(|q| q.label())
                .unwrap_or("-");
            table.add_row(vec![
                Cell::new(row.id),
                Cell::new(&row.title),
                Cell::new(format_number(row.quantity)),
                Cell::new(format_currency(row.revenue)),
                Cell::new(format_currency(row.price)),
                colored(format!("{} ({})", row.stock, badge), color, no_color),
                Cell::new(segment),
            ]);
        }
        lines.push(table.to_string());
        lines.push(format!(
            "Page {}/{} ({} products)",
            view.page() + 1,
            view.page_count(),
            view.filtered_rows().len()
        ));
    }

    if !page.bcg.is_empty() {
        heading(&mut lines, "BCG matrix");
        for quadrant in [
            BcgQuadrant::Star,
            BcgQuadrant::CashCow,
            BcgQuadrant::QuestionMark,
            BcgQuadrant::Dog,
        ] {
            let titles: Vec<&str> = page
                .bcg
                .quadrant(quadrant)
                .iter()
                .map(|m| m.title.as_str())
                .collect();
            lines.push(format!(
                "{:<16}{}",
                format!("{}:", quadrant.label()),
                if titles.is_empty() { "-".to_string() } else { titles.join(", ") }
            ));
        }
    }

    if !page.recommendations.is_empty() {
        heading(&mut lines, "Recommendations");
        for recommendation in &page.recommendations {
            let priority = match recommendation.priority {
                Priority::High => "HIGH",
                Priority::Medium => "MED ",
                Priority::Low => "LOW ",
            };
            lines.push(format!(
                "[{}] {}: {}",
                priority, recommendation.product, recommendation.message
            ));
        }
    }

    lines.join("\n")
}

pub fn categories(page: &CategoryReport, view: &TableView<CategoryKpi>, no_color: bool) -> String {
    let summary = &page.summary;
    let mut lines = vec![
        "salesboard - Categories".to_string(),
        "=======================".to_string(),
        origin_banner(&page.origin),
        String::new(),
        format!("Total Revenue:    {}", format_currency(summary.total_revenue)),
        format!("Units sold:       {}", format_number(summary.total_quantity)),
        format!("Avg share:        {}", format_percentage(summary.avg_market_share)),
        format!(
            "Top category:     {}",
            summary.top_category.as_deref().unwrap_or("-")
        ),
    ];

    heading(&mut lines, "Categories");
    let rows = view.visible_rows();
    if rows.is_empty() {
        lines.push("No categories found.".to_string());
    } else {
        let mut table = new_table(
            &["Category", "Revenue", "Units", "Products", "Avg price", "Stock", "Share"],
            no_color,
        );
        for kpi in rows {
            table.add_row(Row::from(vec![
                kpi.name.clone(),
                format_currency(kpi.revenue),
                format_number(kpi.quantity),
                kpi.products_count.to_string(),
                format_currency(kpi.avg_price),
                format_number(kpi.total_stock),
                format_percentage(kpi.market_share),
            ]));
        }
        lines.push(table.to_string());
    }

    for ranking in page.rankings.iter().filter(|r| !r.top.is_empty()) {
        let names = |items: &[ProductMetric]| {
            items
                .iter()
                .map(|m| format!("{} ({})", m.title, format_currency(m.revenue)))
                .collect::<Vec<_>>()
                .join(", ")
        };
        heading(&mut lines, &ranking.category);
        lines.push(format!("Top:  {}", names(&ranking.top)));
        lines.push(format!("Flop: {}", names(&ranking.flop)));
    }

    lines.join("\n")
}
