//! Product page: product matrix, BCG quadrants and stock recommendations

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::bcg::{build_bcg_matrix, BcgMatrix};
use super::kpi::{compute_kpis, total_revenue};
use super::periods::{daily_revenue, DailyRevenue};
use super::rollups::{best_sellers, category_revenue, sort_desc_by, BestSeller, CategoryRevenue};
use crate::config::Thresholds;
use crate::error::DataOrigin;
use crate::models::{Dataset, Id, KpiBundle, Product, Sale};

const MAX_RECOMMENDATIONS: usize = 10;
/// Quantity sold above which a low-stock product is in high demand
const HIGH_DEMAND_QUANTITY: f64 = 10.0;
/// Share of the mean quantity below which a product rotates slowly
const SLOW_ROTATION_RATIO: f64 = 0.3;
const OVERSTOCK_LEVEL: f64 = 20.0;
const TOP_PERFORMERS: usize = 3;

/// One sold product with its stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRow {
    pub id: Id,
    pub title: String,
    pub quantity: f64,
    pub revenue: f64,
    /// Unit price of the first line seen for this product
    pub price: f64,
    /// 0 when the product is not in the catalog
    pub stock: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecommendationKind {
    Restock,
    Promotion,
    Maintain,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub product: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMetrics {
    pub revenue: f64,
    pub units_sold: f64,
    pub avg_stock: f64,
    pub product_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReport {
    #[serde(default)]
    pub origin: DataOrigin,
    pub kpis: KpiBundle,
    pub daily: Vec<DailyRevenue>,
    pub categories: Vec<CategoryRevenue>,
    pub best_sellers: Vec<BestSeller>,
    pub matrix: Vec<ProductRow>,
    pub bcg: BcgMatrix,
    pub recommendations: Vec<Recommendation>,
    pub metrics: ProductMetrics,
}

/// Pre-aggregated figures served by the analytics API
#[derive(Debug, Clone, Default)]
pub struct RemoteProducts {
    pub kpis: KpiBundle,
    pub daily: Vec<DailyRevenue>,
    pub categories: Vec<CategoryRevenue>,
    pub best_sellers: Vec<BestSeller>,
}

impl ProductReport {
    /// Complete remote figures with the per-product analysis of raw entities
    pub fn from_remote(
        remote: RemoteProducts,
        sales: &[Sale],
        products: &[Product],
        thresholds: &Thresholds,
    ) -> Self {
        let matrix = product_matrix(sales, products);
        Self {
            origin: DataOrigin::Remote,
            kpis: remote.kpis,
            daily: remote.daily,
            categories: remote.categories,
            best_sellers: remote.best_sellers,
            bcg: build_bcg_matrix(products, sales),
            recommendations: recommendations(&matrix, thresholds.low_stock),
            metrics: product_metrics(sales, products),
            matrix,
        }
    }
}

/// Sold products ordered by id
pub fn product_matrix(sales: &[Sale], products: &[Product]) -> Vec<ProductRow> {
    let catalog: BTreeMap<Id, &Product> = products.iter().rev().map(|p| (p.id, p)).collect();

    let mut rows: BTreeMap<Id, ProductRow> = BTreeMap::new();
    for line in sales.iter().flat_map(|s| s.lines.iter()) {
        let Some(id) = line.product_id else {
            continue;
        };
        let row = rows.entry(id).or_insert_with(|| {
            let product = catalog.get(&id);
            ProductRow {
                id,
                title: line
                    .product_title
                    .clone()
                    .or_else(|| product.map(|p| p.title.clone()))
                    .unwrap_or_else(|| format!("Product {}", id)),
                quantity: 0.0,
                revenue: 0.0,
                price: line.unit_price,
                stock: product.map(|p| p.stock).unwrap_or(0.0),
            }
        });
        row.quantity += line.quantity;
        row.revenue += line.revenue();
    }

    rows.into_values().collect()
}

/// Restock, promotion and maintain advice, at most ten, in that order
pub fn recommendations(matrix: &[ProductRow], low_stock: f64) -> Vec<Recommendation> {
    if matrix.is_empty() {
        return Vec::new();
    }
    let mut recs = Vec::new();

    for row in matrix {
        if row.stock < low_stock && row.quantity > HIGH_DEMAND_QUANTITY {
            recs.push(Recommendation {
                kind: RecommendationKind::Restock,
                priority: Priority::High,
                product: row.title.clone(),
                message: format!(
                    "Critical stock ({} units) with strong demand. Restock now.",
                    row.stock
                ),
            });
        }
    }

    let mean_quantity = matrix.iter().map(|r| r.quantity).sum::<f64>() / matrix.len() as f64;
    for row in matrix {
        if row.quantity < mean_quantity * SLOW_ROTATION_RATIO && row.stock > OVERSTOCK_LEVEL {
            recs.push(Recommendation {
                kind: RecommendationKind::Promotion,
                priority: Priority::Medium,
                product: row.title.clone(),
                message: "Slow rotation with high stock. Consider a promotion.".to_string(),
            });
        }
    }

    let mut by_revenue: Vec<&ProductRow> = matrix.iter().collect();
    sort_desc_by(&mut by_revenue, |r| r.revenue);
    for row in by_revenue.into_iter().take(TOP_PERFORMERS) {
        recs.push(Recommendation {
            kind: RecommendationKind::Maintain,
            priority: Priority::Low,
            product: row.title.clone(),
            message: "Top performer. Keep stock and visibility up.".to_string(),
        });
    }

    recs.truncate(MAX_RECOMMENDATIONS);
    recs
}

pub fn product_metrics(sales: &[Sale], products: &[Product]) -> ProductMetrics {
    ProductMetrics {
        revenue: total_revenue(sales),
        units_sold: sales.iter().map(Sale::units).sum(),
        avg_stock: if products.is_empty() {
            0.0
        } else {
            products.iter().map(|p| p.stock).sum::<f64>() / products.len() as f64
        },
        product_count: products.len(),
    }
}

/// Local computation of the whole product page
pub fn products_fallback(dataset: &Dataset, thresholds: &Thresholds) -> ProductReport {
    let remote = RemoteProducts {
        kpis: compute_kpis(&dataset.sales, &dataset.products, thresholds.low_stock),
        daily: daily_revenue(&dataset.sales),
        categories: category_revenue(dataset),
        best_sellers: best_sellers(dataset, thresholds.best_sellers_limit),
    };
    ProductReport {
        origin: DataOrigin::Local,
        ..ProductReport::from_remote(remote, &dataset.sales, &dataset.products, thresholds)
    }
}
