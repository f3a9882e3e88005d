//! salesboard - Sales analytics dashboard for the terminal

mod render;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use salesboard_core::analytics::{CategoryKpi, ProductRow};
use salesboard_core::config::ExportConfig;
use salesboard_core::export::{
    prepare_analytics_export, write_csv, write_xlsx, AnalyticsExport, PdfReport, Table,
};
use salesboard_core::view::{SortDirection, TableRow, TableView};
use salesboard_core::{
    Dashboard, EntitySource, ExportError, HttpClient, JsonDirSource, LoadReport, SalesboardConfig,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "salesboard",
    version,
    about = "Sales analytics dashboard for the terminal",
    long_about = "KPIs, trends, forecasts, BCG matrix and category breakdowns for a sales backend.\n\
                  \n\
                  Figures come from the backend analytics API. When any request of a page fails,\n\
                  the whole page is recomputed locally from raw sales, products and categories.\n\
                  \n\
                  Examples:\n\
                    salesboard overview                          # KPIs, best sellers, insights\n\
                    salesboard sales --json                      # Sales page as JSON\n\
                    salesboard products --search desk --sort revenue\n\
                    salesboard --data-dir ./dump categories      # Raw entities from JSON files\n\
                    salesboard export products --format xlsx     # Workbook in the export directory\n\
                  \n\
                  Environment Variables:\n\
                    SALESBOARD_API_URL               # Analytics API base URL\n\
                    SALESBOARD_DATA_DIR              # Directory with sales/products/categories.json\n\
                    SALESBOARD_CONFIG                # Config file path\n\
                    SALESBOARD_NO_COLOR              # Disable ANSI colors (log-friendly)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Analytics API base URL (default from config: http://localhost:8080/api)
    #[arg(long, global = true, env = "SALESBOARD_API_URL")]
    api_url: Option<String>,

    /// Read raw entities from JSON files in this directory instead of the API
    #[arg(long, global = true, env = "SALESBOARD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Config file (default: <config dir>/salesboard/config.toml)
    #[arg(long, global = true, env = "SALESBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Print pages as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Disable ANSI colors (log-friendly)
    #[arg(long, global = true, env = "SALESBOARD_NO_COLOR")]
    no_color: bool,

    /// Debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// KPIs, monthly revenue, best sellers, categories and insights
    Overview,
    /// Trend, forecast, order distribution and top clients
    Sales,
    /// Product matrix, BCG segments and recommendations
    Products {
        #[command(flatten)]
        table: TableArgs,
    },
    /// Category KPIs and top/flop products
    Categories {
        #[command(flatten)]
        table: TableArgs,
    },
    /// Export a page to CSV, XLSX or PDF
    Export {
        #[arg(value_enum)]
        page: Page,
        #[arg(long, short, value_enum, default_value = "xlsx")]
        format: ExportFormat,
        /// Output file, or directory for CSV (default: export.output_dir from config)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration, or write it with --init
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

#[derive(clap::Args)]
struct TableArgs {
    /// Case-insensitive filter on names
    #[arg(long, short)]
    search: Option<String>,
    /// Column to sort by (e.g. revenue, quantity, stock, title)
    #[arg(long)]
    sort: Option<String>,
    /// Sort ascending instead of descending
    #[arg(long)]
    asc: bool,
    /// Page to show, starting at 1
    #[arg(long, default_value = "1")]
    page: usize,
    /// Rows per page (0 shows everything)
    #[arg(long, default_value = "20")]
    page_size: usize,
}

impl TableArgs {
    fn view<T: TableRow>(&self, rows: Vec<T>) -> TableView<T> {
        let mut view = TableView::new(rows, self.page_size);
        if let Some(query) = &self.search {
            view.search(query.as_str());
        }
        if let Some(column) = &self.sort {
            let direction = if self.asc {
                SortDirection::Asc
            } else {
                SortDirection::Desc
            };
            view.set_sort(column, direction);
        }
        view.go_to_page(self.page.saturating_sub(1));
        view
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Page {
    Overview,
    Sales,
    Products,
    Categories,
}

impl Page {
    fn name(self) -> &'static str {
        match self {
            Page::Overview => "overview",
            Page::Sales => "sales",
            Page::Products => "products",
            Page::Categories => "categories",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
}

const KPI_SUMMARY: &str = "KPI Summary";

struct Output {
    json: bool,
    no_color: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.clone().or_else(SalesboardConfig::default_path);
    let mut config = match &config_path {
        Some(path) => SalesboardConfig::load(path),
        None => SalesboardConfig::default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    if let Command::Config { init } = cli.command {
        return run_config(&config, config_path.as_deref(), init);
    }

    let api = HttpClient::new(&config.api).context("Invalid analytics API settings")?;
    let output = Output {
        json: cli.json,
        no_color: cli.no_color,
    };

    match &cli.data_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "Reading raw entities from JSON files");
            let dashboard = Dashboard::new(api, JsonDirSource::new(dir), config.thresholds.clone());
            run(cli.command, &dashboard, &config.export, &output).await
        }
        None => {
            let dashboard = Dashboard::new(api.clone(), api, config.thresholds.clone());
            run(cli.command, &dashboard, &config.export, &output).await
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let filter = EnvFilter::from_default_env().add_directive(level.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run<E: EntitySource>(
    command: Command,
    dashboard: &Dashboard<HttpClient, E>,
    export: &ExportConfig,
    output: &Output,
) -> Result<()> {
    let thresholds = dashboard.thresholds();

    match command {
        Command::Overview => {
            let loaded = dashboard.overview().await;
            print_page(&loaded.page, output, |p| render::overview(p, output.no_color))?;
            print_warnings(&loaded.load);
        }
        Command::Sales => {
            let loaded = dashboard.sales().await;
            print_page(&loaded.page, output, |p| render::sales(p, output.no_color))?;
            print_warnings(&loaded.load);
        }
        Command::Products { table } => {
            let loaded = dashboard.products().await;
            let view: TableView<ProductRow> = table.view(loaded.page.matrix.clone());
            print_page(&loaded.page, output, |p| {
                render::products(p, &view, thresholds.low_stock, output.no_color)
            })?;
            print_warnings(&loaded.load);
        }
        Command::Categories { table } => {
            let loaded = dashboard.categories().await;
            let view: TableView<CategoryKpi> = table.view(loaded.page.kpis.clone());
            print_page(&loaded.page, output, |p| {
                render::categories(p, &view, output.no_color)
            })?;
            print_warnings(&loaded.load);
        }
        Command::Export {
            page,
            format,
            output: target,
        } => {
            let (title, tables, load) = export_tables(dashboard, page).await?;
            print_warnings(&load);
            let path = write_export(&title, page, &tables, format, target, export)
                .with_context(|| format!("Export of the {} page failed", page.name()))?;
            println!("Exported to {}", path.display());
        }
        // Handled in main, before any client is built
        Command::Config { .. } => {}
    }

    Ok(())
}

fn print_page<T: Serialize>(
    page: &T,
    output: &Output,
    render: impl FnOnce(&T) -> String,
) -> Result<()> {
    if output.json {
        let json = serde_json::to_string_pretty(page).context("Failed to serialize page")?;
        println!("{}", json);
    } else {
        println!("{}", render(page));
    }
    Ok(())
}

fn print_warnings(load: &LoadReport) {
    if let Some(text) = render::load_warnings(load) {
        eprintln!();
        eprintln!("{}", text);
    }
}

fn run_config(config: &SalesboardConfig, path: Option<&Path>, init: bool) -> Result<()> {
    if init {
        let path = path.context("Could not determine config directory, pass --config")?;
        config.save(path)?;
        println!("Config written to {}", path.display());
    } else {
        let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
        print!("{}", content);
    }
    Ok(())
}

// ============================================================================
// Export
// ============================================================================

async fn export_tables<E: EntitySource>(
    dashboard: &Dashboard<HttpClient, E>,
    page: Page,
) -> Result<(String, Vec<Table>, LoadReport)> {
    let result = match page {
        Page::Overview => {
            let loaded = dashboard.overview().await;
            let p = &loaded.page;
            let mut tables = prepare_analytics_export(AnalyticsExport {
                kpis: Some(&p.kpis),
                daily: &p.daily,
                sales: &p.recent_sales,
                ..Default::default()
            })?;
            tables.push(Table::from_serialize("Monthly Sales", &p.monthly)?);
            tables.push(Table::from_serialize("Best Sellers", &p.best_sellers)?);
            tables.push(Table::from_serialize("Category Revenue", &p.categories)?);
            ("Sales overview", tables, loaded.load)
        }
        Page::Sales => {
            let loaded = dashboard.sales().await;
            let p = &loaded.page;
            let tables = vec![
                Table::from_serialize("Daily Sales", &p.trend)?,
                Table::from_serialize("Forecast", &p.forecast)?,
                Table::from_serialize("Distribution", &p.distribution)?,
                Table::from_serialize("Top Clients", &p.top_clients)?,
                Table::from_serialize("Monthly Sales", &p.monthly)?,
                Table::from_serialize("Cohorts", &p.cohorts)?,
            ];
            ("Sales analysis", tables, loaded.load)
        }
        Page::Products => {
            let loaded = dashboard.products().await;
            let p = &loaded.page;
            let mut tables = prepare_analytics_export(AnalyticsExport {
                kpis: Some(&p.kpis),
                daily: &p.daily,
                products: &p.matrix,
                ..Default::default()
            })?;
            tables.push(Table::from_serialize("Best Sellers", &p.best_sellers)?);
            tables.push(Table::from_serialize("Recommendations", &p.recommendations)?);
            ("Product analysis", tables, loaded.load)
        }
        Page::Categories => {
            let loaded = dashboard.categories().await;
            let p = &loaded.page;
            let tables = prepare_analytics_export(AnalyticsExport {
                categories: &p.kpis,
                ..Default::default()
            })?;
            ("Category analysis", tables, loaded.load)
        }
    };

    let (title, tables, load) = result;
    let tables = tables.into_iter().filter(|t| !t.is_empty()).collect();
    Ok((title.to_string(), tables, load))
}

fn slug(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn write_export(
    title: &str,
    page: Page,
    tables: &[Table],
    format: ExportFormat,
    target: Option<PathBuf>,
    export: &ExportConfig,
) -> Result<PathBuf> {
    if tables.is_empty() {
        warn!(page = page.name(), "Nothing to export");
        return Err(ExportError::Empty.into());
    }
    let stem = format!("salesboard-{}-{}", page.name(), Local::now().format("%Y%m%d"));

    match format {
        ExportFormat::Csv => {
            let dir = target.unwrap_or_else(|| export.output_dir.clone());
            for table in tables {
                let path = dir.join(format!("{}-{}.csv", stem, slug(&table.name)));
                write_csv(table, &path)?;
            }
            Ok(dir)
        }
        ExportFormat::Xlsx => {
            let path = target.unwrap_or_else(|| export.output_dir.join(format!("{}.xlsx", stem)));
            write_xlsx(tables, &path)?;
            Ok(path)
        }
        ExportFormat::Pdf => {
            let path = target.unwrap_or_else(|| export.output_dir.join(format!("{}.pdf", stem)));
            let mut report = PdfReport::new(title);
            for table in tables {
                report = if table.name == KPI_SUMMARY {
                    report.kpis(KPI_SUMMARY, kpi_items(table))
                } else {
                    report.table(table.clone())
                };
            }
            report.render_to_file(export, &path)?;
            Ok(path)
        }
    }
}

/// `Metric | Value` rows as `label: value` pairs
fn kpi_items(table: &Table) -> Vec<(String, String)> {
    table
        .rows
        .iter()
        .filter_map(|row| match row.as_slice() {
            [label, value] => Some((label.to_string(), value.to_string())),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(slug("KPI Summary"), "kpi-summary");
        assert_eq!(slug("Sales Details"), "sales-details");
        assert_eq!(slug("  Top / Flop "), "top-flop");
    }

    #[test]
    fn test_cli_parses_export() {
        let cli = Cli::try_parse_from([
            "salesboard",
            "--data-dir",
            "dump",
            "export",
            "products",
            "--format",
            "csv",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, Some(PathBuf::from("dump")));
        match cli.command {
            Command::Export { page, format, output } => {
                assert!(page == Page::Products);
                assert!(format == ExportFormat::Csv);
                assert!(output.is_none());
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_table_args_view() {
        let args = TableArgs {
            search: Some("desk".into()),
            sort: Some("revenue".into()),
            asc: true,
            page: 0,
            page_size: 10,
        };
        let rows = vec![
            ProductRow {
                id: 1,
                title: "Desk".into(),
                quantity: 1.0,
                revenue: 50.0,
                price: 50.0,
                stock: 2.0,
            },
            ProductRow {
                id: 2,
                title: "Desk lamp".into(),
                quantity: 1.0,
                revenue: 20.0,
                price: 20.0,
                stock: 9.0,
            },
            ProductRow {
                id: 3,
                title: "Chair".into(),
                quantity: 1.0,
                revenue: 10.0,
                price: 10.0,
                stock: 9.0,
            },
        ];

        let view = args.view(rows);
        let ids: Vec<i64> = view.visible_rows().iter().map(|r| r.id).collect();

        assert_eq!(ids, vec![2, 1]);
    }
}
