//! Page loading through the remote API and the local fallback

use chrono::NaiveDate;
use salesboard_core::analytics::{
    BestSeller, CategoryKpi, CategoryRevenue, DailyRevenue, HistogramBin, MonthlyRevenue,
    TreemapNode,
};
use salesboard_core::config::{ApiConfig, Thresholds};
use salesboard_core::models::{ForecastPoint, KpiBundle};
use salesboard_core::{
    AnalyticsApi, CoreError, Dashboard, DataOrigin, EntitySource, HttpClient, JsonDirSource,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;

/// Analytics API answering from fixed figures, optionally failing one endpoint
#[derive(Default)]
struct FixedApi {
    failing_forecast: bool,
}

fn missing(endpoint: &str) -> CoreError {
    CoreError::FileNotFound {
        path: PathBuf::from(endpoint),
    }
}

impl AnalyticsApi for FixedApi {
    async fn kpis(&self) -> Result<KpiBundle, CoreError> {
        Ok(KpiBundle {
            total_revenue: 9000.0,
            total_sales: 30,
            average_basket: 300.0,
            ..Default::default()
        })
    }

    async fn daily_sales(&self) -> Result<Vec<DailyRevenue>, CoreError> {
        Ok(vec![DailyRevenue {
            date: "2024-03-01".into(),
            revenue: 9000.0,
            orders: 30,
        }])
    }

    async fn monthly_sales(&self) -> Result<Vec<MonthlyRevenue>, CoreError> {
        Ok(vec![MonthlyRevenue {
            month: "2024-03".into(),
            label: "Mar 2024".into(),
            revenue: 9000.0,
        }])
    }

    async fn best_sellers(&self, limit: usize) -> Result<Vec<BestSeller>, CoreError> {
        Ok(vec![
            BestSeller {
                product_id: 1,
                product_title: "Hammer".into(),
                total_quantity: 40.0,
            };
            limit.min(1)
        ])
    }

    async fn category_stats(&self) -> Result<Vec<CategoryRevenue>, CoreError> {
        Ok(vec![CategoryRevenue {
            category_name: "Tools".into(),
            total_revenue: 9000.0,
        }])
    }

    async fn category_kpis(&self) -> Result<Vec<CategoryKpi>, CoreError> {
        Ok(vec![CategoryKpi {
            id: 1,
            name: "Tools".into(),
            revenue: 9000.0,
            market_share: 100.0,
            ..Default::default()
        }])
    }

    async fn category_treemap(&self) -> Result<Vec<TreemapNode>, CoreError> {
        Ok(vec![TreemapNode {
            name: "Tools".into(),
            value: 9000.0,
        }])
    }

    async fn sales_forecast(&self, days: usize) -> Result<Vec<ForecastPoint>, CoreError> {
        if self.failing_forecast {
            return Err(missing("/analytics/sales/forecast"));
        }
        Ok((1..=days)
            .map(|d| ForecastPoint {
                date: format!("2024-03-{:02}", d + 1),
                value: 300.0,
                is_forecast: true,
            })
            .collect())
    }

    async fn sales_distribution(&self) -> Result<Vec<HistogramBin>, CoreError> {
        Ok(Vec::new())
    }
}

/// Raw entities held in memory; `None` fails the load
struct MemoryEntities {
    sales: Option<Value>,
    products: Option<Value>,
    categories: Option<Value>,
}

impl MemoryEntities {
    fn sample() -> Self {
        Self {
            sales: Some(sample_sales()),
            products: Some(json!([{"id": 1, "title": "Hammer", "stock": 12, "categoryId": 1}])),
            categories: Some(json!([{"id": 1, "name": "Tools"}])),
        }
    }
}

fn take(value: &Option<Value>, name: &str) -> Result<Value, CoreError> {
    value.clone().ok_or_else(|| missing(name))
}

impl EntitySource for MemoryEntities {
    async fn sales(&self) -> Result<Value, CoreError> {
        take(&self.sales, "sales")
    }

    async fn products(&self) -> Result<Value, CoreError> {
        take(&self.products, "products")
    }

    async fn categories(&self) -> Result<Value, CoreError> {
        take(&self.categories, "categories")
    }
}

fn sample_sales() -> Value {
    json!([
        {"id": 1, "montant": 100, "dateVente": "2024-03-01T10:00:00",
         "lignesVente": [{"product": {"id": 1}, "quantite": 2, "prixUnitaire": 50}], "clientId": 7},
        {"id": 2, "montant": 150, "dateVente": "2024-03-02T10:30:00",
         "lignesVente": [{"product": {"id": 1}, "quantite": 3, "prixUnitaire": 50}], "clientId": 8},
        {"id": 3, "montant": 50, "dateVente": "2024-03-03T16:00:00",
         "lignesVente": [{"product": {"id": 1}, "quantite": 1, "prixUnitaire": 50}]}
    ])
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 3).unwrap()
}

#[tokio::test]
async fn test_remote_overview_keeps_api_figures() {
    let dashboard = Dashboard::new(
        FixedApi::default(),
        MemoryEntities::sample(),
        Thresholds::default(),
    )
    .with_today(today());

    let loaded = dashboard.overview().await;
    let page = loaded.page;

    assert_eq!(page.origin, DataOrigin::Remote);
    assert_eq!(page.kpis.total_revenue, 9000.0);
    assert_eq!(page.categories[0].category_name, "Tools");
    // Hourly buckets come from the raw sales
    assert_eq!(page.hourly.len(), 24);
    assert_eq!(page.hourly[10].revenue, 250.0);
    assert_eq!(page.hourly[16].revenue, 50.0);
    assert_eq!(page.recent_sales.len(), 3);
    assert!(!loaded.load.has_errors());
}

#[tokio::test]
async fn test_one_failing_request_switches_the_whole_page() {
    let api = FixedApi {
        failing_forecast: true,
    };
    let dashboard =
        Dashboard::new(api, MemoryEntities::sample(), Thresholds::default()).with_today(today());

    let page = dashboard.sales().await.page;

    match &page.origin {
        DataOrigin::Fallback { reason } => assert!(reason.contains("forecast")),
        other => panic!("expected fallback, got {:?}", other),
    }
    // Every figure is recomputed, including the endpoints that succeeded
    let trend: Vec<f64> = page.trend.iter().map(|d| d.revenue).collect();
    assert_eq!(trend, vec![100.0, 150.0, 50.0]);
    assert_eq!(page.kpis.total_revenue, 300.0);
    assert_eq!(page.forecast.len(), Thresholds::default().forecast_periods);
    assert!(page.forecast.iter().all(|p| p.is_forecast && p.value >= 0.0));
}

#[tokio::test]
async fn test_product_page_needs_raw_entities() {
    let entities = MemoryEntities {
        products: None,
        ..MemoryEntities::sample()
    };
    let dashboard = Dashboard::new(FixedApi::default(), entities, Thresholds::default());

    let loaded = dashboard.products().await;

    assert!(loaded.page.origin.is_fallback());
    assert_eq!(loaded.page.kpis.total_revenue, 300.0);
    assert_eq!(loaded.load.error_count(), (0, 1));
    // Unknown products still appear in the matrix with no stock
    assert_eq!(loaded.page.matrix.len(), 1);
    assert_eq!(loaded.page.matrix[0].stock, 0.0);
}

#[tokio::test]
async fn test_offline_api_with_json_dumps() {
    let temp_dir = TempDir::new().unwrap();
    let write = |name: &str, value: Value| {
        std::fs::write(temp_dir.path().join(name), value.to_string()).unwrap();
    };
    write("sales.json", sample_sales());
    write(
        "products.json",
        json!({"content": [
            {"id": 1, "name": "Hammer", "stockQuantity": 3, "category": {"id": 1}}
        ]}),
    );
    write("categories.json", json!([{"id": 1, "nom": "Tools"}]));

    let api = HttpClient::new(&ApiConfig {
        base_url: "http://127.0.0.1:1/api".to_string(),
        timeout_secs: 5,
        ..Default::default()
    })
    .unwrap();
    let dashboard = Dashboard::new(api, JsonDirSource::new(temp_dir.path()), Thresholds::default());

    let loaded = dashboard.categories().await;
    let page = loaded.page;

    assert!(page.origin.is_fallback());
    assert_eq!(page.kpis.len(), 1);
    assert_eq!(page.kpis[0].name, "Tools");
    assert_eq!(page.kpis[0].revenue, 300.0);
    assert_eq!(page.kpis[0].quantity, 6.0);
    assert_eq!(page.kpis[0].market_share, 100.0);
    assert_eq!(page.kpis[0].total_stock, 3.0);
    assert_eq!(loaded.load.sales_loaded, 3);
    assert!(!loaded.load.has_errors());
}
