//! reqwest client for the analytics REST API

use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{AnalyticsApi, EntitySource};
use crate::analytics::{
    BestSeller, CategoryKpi, CategoryRevenue, DailyRevenue, HistogramBin, MonthlyRevenue,
    TreemapNode,
};
use crate::config::ApiConfig;
use crate::error::CoreError;
use crate::models::{ForecastPoint, KpiBundle};

const USER_ID_HEADER: &str = "X-User-Id";
const USER_ROLE_HEADER: &str = "X-User-Role";

/// Client for `<base_url>/analytics/*` and the raw entity endpoints
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &ApiConfig) -> Result<Self, CoreError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        let valid = reqwest::Url::parse(&base_url)
            .map(|url| matches!(url.scheme(), "http" | "https"))
            .unwrap_or(false);
        if !valid {
            return Err(CoreError::InvalidBaseUrl {
                url: config.base_url.clone(),
            });
        }

        let mut headers = HeaderMap::new();
        if let Some(user_id) = &config.user_id {
            headers.insert(USER_ID_HEADER, header_value(USER_ID_HEADER, user_id)?);
        }
        if let Some(role) = &config.user_role {
            headers.insert(USER_ROLE_HEADER, header_value(USER_ROLE_HEADER, role)?);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|source| CoreError::Http {
            endpoint: base_url.clone(),
            source,
        })?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CoreError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");

        let http_error = |source| CoreError::Http {
            endpoint: path.to_string(),
            source,
        };
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(http_error)?;

        response.json::<T>().await.map_err(http_error)
    }
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, CoreError> {
    HeaderValue::from_str(value).map_err(|_| CoreError::InvalidHeader { name })
}

impl AnalyticsApi for HttpClient {
    async fn kpis(&self) -> Result<KpiBundle, CoreError> {
        self.get_json("/analytics/kpi", &[]).await
    }

    async fn daily_sales(&self) -> Result<Vec<DailyRevenue>, CoreError> {
        self.get_json("/analytics/sales/daily", &[]).await
    }

    async fn monthly_sales(&self) -> Result<Vec<MonthlyRevenue>, CoreError> {
        self.get_json("/analytics/sales/monthly", &[]).await
    }

    async fn best_sellers(&self, limit: usize) -> Result<Vec<BestSeller>, CoreError> {
        self.get_json(
            "/analytics/products/best-sellers",
            &[("limit", limit.to_string())],
        )
        .await
    }

    async fn category_stats(&self) -> Result<Vec<CategoryRevenue>, CoreError> {
        self.get_json("/analytics/categories", &[]).await
    }

    async fn category_kpis(&self) -> Result<Vec<CategoryKpi>, CoreError> {
        self.get_json("/analytics/categories", &[]).await
    }

    async fn category_treemap(&self) -> Result<Vec<TreemapNode>, CoreError> {
        self.get_json("/analytics/categories/treemap", &[]).await
    }

    async fn sales_forecast(&self, days: usize) -> Result<Vec<ForecastPoint>, CoreError> {
        self.get_json("/analytics/sales/forecast", &[("days", days.to_string())])
            .await
    }

    async fn sales_distribution(&self) -> Result<Vec<HistogramBin>, CoreError> {
        self.get_json("/analytics/sales/distribution", &[]).await
    }
}

impl EntitySource for HttpClient {
    async fn sales(&self) -> Result<Value, CoreError> {
        self.get_json("/sales", &[]).await
    }

    async fn products(&self) -> Result<Value, CoreError> {
        self.get_json("/products", &[]).await
    }

    async fn categories(&self) -> Result<Value, CoreError> {
        self.get_json("/categories", &[]).await
    }
}
