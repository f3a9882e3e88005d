//! Page loading: remote analytics first, local recomputation on failure
//!
//! Every page fans out its API requests concurrently. A single failing
//! request switches the whole page to the fallback engine; remote and local
//! figures are never mixed within one page's aggregates.

use chrono::{Local, NaiveDate};
use serde_json::Value;
use tracing::{info, warn};

use super::{AnalyticsApi, EntitySource};
use crate::analytics::{
    category_fallback, overview_fallback, products_fallback, sales_fallback, CategoryReport,
    OverviewReport, ProductReport, RemoteOverview, RemoteProducts, SalesReport,
};
use crate::config::Thresholds;
use crate::error::{CoreError, DataOrigin, LoadError, LoadReport};
use crate::models::{Dataset, Sale};
use crate::parsers::{parse_dataset, parse_products, parse_sales};

/// A page together with the problems met while loading raw entities
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub page: T,
    pub load: LoadReport,
}

impl<T> Loaded<T> {
    fn new(page: T, load: LoadReport) -> Self {
        Self { page, load }
    }
}

pub struct Dashboard<A, E> {
    api: A,
    entities: E,
    thresholds: Thresholds,
    today: Option<NaiveDate>,
}

impl<A: AnalyticsApi, E: EntitySource> Dashboard<A, E> {
    pub fn new(api: A, entities: E, thresholds: Thresholds) -> Self {
        Self {
            api,
            entities,
            thresholds,
            today: None,
        }
    }

    /// Pin the reference day used by "today" figures and forecasts
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub async fn overview(&self) -> Loaded<OverviewReport> {
        let remote = tokio::try_join!(
            self.api.kpis(),
            self.api.daily_sales(),
            self.api.monthly_sales(),
            self.api.category_stats(),
            self.api.best_sellers(self.thresholds.best_sellers_limit),
        );

        match remote {
            Ok((kpis, daily, monthly, categories, best_sellers)) => {
                info!("Overview loaded from analytics API");
                let mut load = LoadReport::new();
                let sales = self.raw_sales(&mut load).await;
                let remote = RemoteOverview {
                    kpis,
                    daily,
                    monthly,
                    categories,
                    best_sellers,
                };
                let page =
                    OverviewReport::from_remote(remote, &sales, &self.thresholds, self.today());
                Loaded::new(page, load)
            }
            Err(e) => {
                let reason = fallback_reason("overview", &e);
                let (dataset, load) = self.dataset().await;
                let mut page = overview_fallback(&dataset, &self.thresholds, self.today());
                page.origin = DataOrigin::Fallback { reason };
                Loaded::new(page, load)
            }
        }
    }

    pub async fn sales(&self) -> Loaded<SalesReport> {
        let remote = tokio::try_join!(
            self.api.daily_sales(),
            self.api.sales_forecast(self.thresholds.forecast_periods),
            self.api.sales_distribution(),
        );

        match remote {
            Ok((trend, forecast, distribution)) => {
                info!("Sales page loaded from analytics API");
                let mut load = LoadReport::new();
                let sales = self.raw_sales(&mut load).await;
                let page = SalesReport::from_remote(
                    trend,
                    forecast,
                    distribution,
                    &sales,
                    &self.thresholds,
                    self.today(),
                );
                Loaded::new(page, load)
            }
            Err(e) => {
                let reason = fallback_reason("sales", &e);
                let (dataset, load) = self.dataset().await;
                let mut page = sales_fallback(&dataset, &self.thresholds, self.today());
                page.origin = DataOrigin::Fallback { reason };
                Loaded::new(page, load)
            }
        }
    }

    pub async fn categories(&self) -> Loaded<CategoryReport> {
        let remote = tokio::try_join!(self.api.category_kpis(), self.api.category_treemap());

        match remote {
            Ok((kpis, treemap)) => {
                info!("Category page loaded from analytics API");
                Loaded::new(CategoryReport::from_remote(kpis, treemap), LoadReport::new())
            }
            Err(e) => {
                let reason = fallback_reason("categories", &e);
                let (dataset, load) = self.dataset().await;
                let mut page = category_fallback(&dataset);
                page.origin = DataOrigin::Fallback { reason };
                Loaded::new(page, load)
            }
        }
    }

    /// The product page needs raw sales and products either way, so they
    /// are part of the remote fan-out.
    pub async fn products(&self) -> Loaded<ProductReport> {
        let remote = tokio::try_join!(
            self.api.kpis(),
            self.api.daily_sales(),
            self.api.category_stats(),
            self.api.best_sellers(self.thresholds.best_sellers_limit),
            self.entities.sales(),
            self.entities.products(),
        );

        match remote {
            Ok((kpis, daily, categories, best_sellers, raw_sales, raw_products)) => {
                info!("Product page loaded from analytics API");
                let mut load = LoadReport::new();
                let sales = parse_sales(&raw_sales, &mut load);
                let products = parse_products(&raw_products, &mut load);
                let remote = RemoteProducts {
                    kpis,
                    daily,
                    categories,
                    best_sellers,
                };
                let page = ProductReport::from_remote(remote, &sales, &products, &self.thresholds);
                Loaded::new(page, load)
            }
            Err(e) => {
                let reason = fallback_reason("products", &e);
                let (dataset, load) = self.dataset().await;
                let mut page = products_fallback(&dataset, &self.thresholds);
                page.origin = DataOrigin::Fallback { reason };
                Loaded::new(page, load)
            }
        }
    }

    /// Load and parse every raw entity. A failed load leaves that entity
    /// empty and is recorded in the report.
    pub async fn dataset(&self) -> (Dataset, LoadReport) {
        let (sales, products, categories) = tokio::join!(
            self.entities.sales(),
            self.entities.products(),
            self.entities.categories(),
        );

        let mut load = LoadReport::new();
        let sales = or_empty("sales", sales, &mut load);
        let products = or_empty("products", products, &mut load);
        let categories = or_empty("categories", categories, &mut load);
        let dataset = parse_dataset(&sales, &products, &categories, &mut load);

        info!(
            sales = load.sales_loaded,
            products = load.products_loaded,
            categories = load.categories_loaded,
            skipped = load.records_skipped,
            "Raw entities loaded"
        );
        (dataset, load)
    }

    /// Raw sales used to complete remote pages, empty when unavailable
    async fn raw_sales(&self, load: &mut LoadReport) -> Vec<Sale> {
        match self.entities.sales().await {
            Ok(raw) => parse_sales(&raw, load),
            Err(e) => {
                warn!(error = %e, "Raw sales unavailable, hourly and recent sections left empty");
                load.add_error(LoadError::warning("sales", e.chain()));
                Vec::new()
            }
        }
    }
}

fn fallback_reason(page: &str, error: &CoreError) -> String {
    let reason = error.chain();
    warn!(page, reason = %reason, "Analytics API unavailable, computing page locally");
    reason
}

fn or_empty(source: &str, result: Result<Value, CoreError>, load: &mut LoadReport) -> Value {
    result.unwrap_or_else(|e| {
        warn!(source, error = %e, "Entity load failed, continuing without it");
        load.add_error(LoadError::error(source, e.chain()));
        Value::Array(Vec::new())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{HttpClient, JsonDirSource};
    use crate::config::ApiConfig;
    use tempfile::tempdir;

    fn offline_client() -> HttpClient {
        HttpClient::new(&ApiConfig {
            base_url: "http://127.0.0.1:1/api".to_string(),
            timeout_secs: 5,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_missing_entities_degrade_to_empty() {
        let dir = tempdir().unwrap();
        let dashboard = Dashboard::new(
            offline_client(),
            JsonDirSource::new(dir.path()),
            Thresholds::default(),
        );

        let loaded = dashboard.categories().await;

        assert!(loaded.page.origin.is_fallback());
        assert!(loaded.page.kpis.is_empty());
        assert_eq!(loaded.load.error_count(), (0, 3));
    }

    #[tokio::test]
    async fn test_dataset_counts() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("sales.json"),
            r#"[{"id": 1, "montant": 10}, "garbage"]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("products.json"), "[]").unwrap();
        std::fs::write(dir.path().join("categories.json"), "[]").unwrap();

        let dashboard = Dashboard::new(
            offline_client(),
            JsonDirSource::new(dir.path()),
            Thresholds::default(),
        );
        let (dataset, load) = dashboard.dataset().await;

        assert_eq!(dataset.sales.len(), 1);
        assert_eq!(load.sales_loaded, 1);
        assert_eq!(load.records_skipped, 1);
        assert_eq!(load.undated_sales, 1);
        assert_eq!(load.error_count(), (1, 0));
    }
}
