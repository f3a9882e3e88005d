//! Category page: per-category KPIs, treemap and top/flop products
//!
//! Sale lines reach a category through their product. Lines whose product
//! or category is unknown do not count toward any category.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::bcg::ProductMetric;
use super::rollups::{for_each_categorized_line, sort_desc_by};
use crate::error::DataOrigin;
use crate::models::{Dataset, Id};

const RANKING_SIZE: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryKpi {
    pub id: Id,
    #[serde(alias = "categoryName")]
    pub name: String,
    #[serde(alias = "totalRevenue")]
    pub revenue: f64,
    pub quantity: f64,
    /// Distinct products sold in this category
    pub products_count: usize,
    /// revenue / quantity
    pub avg_price: f64,
    /// Stock of every product in the category, sold or not
    pub total_stock: f64,
    /// Share of the summed category revenue, 0-100
    pub market_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreemapNode {
    pub name: String,
    pub value: f64,
}

/// Best and worst products of one category by revenue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRanking {
    pub category: String,
    /// Highest revenue first
    pub top: Vec<ProductMetric>,
    /// Lowest revenue first
    pub flop: Vec<ProductMetric>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub total_revenue: f64,
    pub total_quantity: f64,
    pub avg_market_share: f64,
    pub top_category: Option<String>,
}

impl CategorySummary {
    pub fn from_kpis(kpis: &[CategoryKpi]) -> Self {
        if kpis.is_empty() {
            return Self::default();
        }
        let top_category = kpis
            .iter()
            .filter(|k| k.revenue > 0.0)
            .fold(None::<&CategoryKpi>, |best, k| match best {
                Some(b) if b.revenue >= k.revenue => Some(b),
                _ => Some(k),
            })
            .map(|k| k.name.clone());

        Self {
            total_revenue: kpis.iter().map(|k| k.revenue).sum(),
            total_quantity: kpis.iter().map(|k| k.quantity).sum(),
            avg_market_share: kpis.iter().map(|k| k.market_share).sum::<f64>() / kpis.len() as f64,
            top_category,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryReport {
    #[serde(default)]
    pub origin: DataOrigin,
    pub kpis: Vec<CategoryKpi>,
    pub treemap: Vec<TreemapNode>,
    pub rankings: Vec<CategoryRanking>,
    pub summary: CategorySummary,
}

impl CategoryReport {
    /// Assemble a report from pre-aggregated KPIs and treemap
    pub fn from_remote(kpis: Vec<CategoryKpi>, treemap: Vec<TreemapNode>) -> Self {
        let summary = CategorySummary::from_kpis(&kpis);
        Self {
            origin: DataOrigin::Remote,
            kpis,
            treemap,
            rankings: Vec::new(),
            summary,
        }
    }
}

#[derive(Default)]
struct CategoryAcc {
    name: String,
    revenue: f64,
    quantity: f64,
    products: BTreeSet<Id>,
}

/// Per-category KPIs, ordered by category id
pub fn category_kpis(dataset: &Dataset) -> Vec<CategoryKpi> {
    let mut metrics: BTreeMap<Id, CategoryAcc> = BTreeMap::new();
    for_each_categorized_line(dataset, |category, product, line| {
        let acc = metrics.entry(category.id).or_insert_with(|| CategoryAcc {
            name: category.name.clone(),
            ..Default::default()
        });
        acc.revenue += line.revenue();
        acc.quantity += line.quantity;
        acc.products.insert(product.id);
    });

    let mut stock_by_category: HashMap<Id, f64> = HashMap::new();
    for product in &dataset.products {
        if let Some(category_id) = product.category_id {
            *stock_by_category.entry(category_id).or_default() += product.stock;
        }
    }

    let total_revenue: f64 = metrics.values().map(|m| m.revenue).sum();

    metrics
        .into_iter()
        .map(|(id, acc)| CategoryKpi {
            id,
            avg_price: if acc.quantity > 0.0 {
                acc.revenue / acc.quantity
            } else {
                0.0
            },
            total_stock: stock_by_category.get(&id).copied().unwrap_or(0.0),
            market_share: if total_revenue > 0.0 {
                acc.revenue / total_revenue * 100.0
            } else {
                0.0
            },
            products_count: acc.products.len(),
            name: acc.name,
            revenue: acc.revenue,
            quantity: acc.quantity,
        })
        .collect()
}

/// Top and flop products for every known category, in category list order
pub fn category_rankings(dataset: &Dataset) -> Vec<CategoryRanking> {
    let mut per_category: HashMap<Id, BTreeMap<Id, ProductMetric>> = HashMap::new();
    for_each_categorized_line(dataset, |category, product, line| {
        let metric = per_category
            .entry(category.id)
            .or_default()
            .entry(product.id)
            .or_insert_with(|| ProductMetric {
                id: product.id,
                title: line
                    .product_title
                    .clone()
                    .unwrap_or_else(|| product.title.clone()),
                revenue: 0.0,
                quantity: 0.0,
            });
        metric.revenue += line.revenue();
        metric.quantity += line.quantity;
    });

    dataset
        .categories
        .iter()
        .map(|category| {
            let mut sorted: Vec<ProductMetric> = per_category
                .remove(&category.id)
                .map(|m| m.into_values().collect())
                .unwrap_or_default();
            sort_desc_by(&mut sorted, |m| m.revenue);

            let top = sorted.iter().take(RANKING_SIZE).cloned().collect();
            let flop = sorted.iter().rev().take(RANKING_SIZE).cloned().collect();
            CategoryRanking {
                category: category.name.clone(),
                top,
                flop,
            }
        })
        .collect()
}

/// Local computation of the whole category page
pub fn category_fallback(dataset: &Dataset) -> CategoryReport {
    let kpis = category_kpis(dataset);
    let treemap = kpis
        .iter()
        .map(|k| TreemapNode {
            name: k.name.clone(),
            value: k.revenue,
        })
        .collect();
    let summary = CategorySummary::from_kpis(&kpis);

    CategoryReport {
        origin: DataOrigin::Local,
        kpis,
        treemap,
        rankings: category_rankings(dataset),
        summary,
    }
}
