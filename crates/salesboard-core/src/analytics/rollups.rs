//! Group-by rollups shared by several pages

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use super::bcg::aggregate_product_sales;
use super::kpi::total_revenue;
use crate::models::{Category, Dataset, Id, Product, Sale, SaleLine};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRevenue {
    #[serde(alias = "name")]
    pub category_name: String,
    #[serde(alias = "revenue")]
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestSeller {
    #[serde(default)]
    pub product_id: Id,
    pub product_title: String,
    pub total_quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopClient {
    pub id: String,
    pub rank: usize,
    pub revenue: f64,
    pub orders: usize,
    pub avg_order: f64,
    /// Share of the total revenue, 0-100
    pub contribution: f64,
}

/// Descending by `key`, ties keep their input order
pub(crate) fn sort_desc_by<T>(items: &mut [T], key: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
}

/// Walk every sale line to the category of its product
///
/// Lines whose product or category is unknown are skipped.
pub(crate) fn for_each_categorized_line<'a>(
    dataset: &'a Dataset,
    mut visit: impl FnMut(&'a Category, &'a Product, &'a SaleLine),
) {
    let products = dataset.product_index();
    let categories = dataset.category_index();

    for line in dataset.sales.iter().flat_map(|s| s.lines.iter()) {
        let Some(product) = line.product_id.and_then(|id| products.get(&id).copied()) else {
            continue;
        };
        let Some(category) = product.category_id.and_then(|id| categories.get(&id).copied())
        else {
            continue;
        };
        visit(category, product, line);
    }
}

/// Line revenue per category name, by category name
pub fn category_revenue(dataset: &Dataset) -> Vec<CategoryRevenue> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for_each_categorized_line(dataset, |category, _, line| {
        *totals.entry(category.name.as_str()).or_default() += line.revenue();
    });

    totals
        .into_iter()
        .map(|(name, total)| CategoryRevenue {
            category_name: name.to_string(),
            total_revenue: total,
        })
        .collect()
}

/// Products with the highest quantity sold
pub fn best_sellers(dataset: &Dataset, limit: usize) -> Vec<BestSeller> {
    let mut sellers: Vec<BestSeller> = aggregate_product_sales(&dataset.products, &dataset.sales)
        .into_iter()
        .map(|m| BestSeller {
            product_id: m.id,
            product_title: m.title,
            total_quantity: m.quantity,
        })
        .collect();
    sort_desc_by(&mut sellers, |s| s.total_quantity);
    sellers.truncate(limit);
    sellers
}

/// Customers ranked by revenue; sales without a customer are left out
pub fn top_clients(sales: &[Sale], limit: usize) -> Vec<TopClient> {
    let grand_total = total_revenue(sales);

    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, (f64, usize)> = HashMap::new();
    for sale in sales {
        let Some(client) = sale.user_id.as_deref() else {
            continue;
        };
        let entry = totals.entry(client).or_insert_with(|| {
            order.push(client);
            (0.0, 0)
        });
        entry.0 += sale.total_amount;
        entry.1 += 1;
    }

    let mut clients: Vec<(&str, f64, usize)> = order
        .into_iter()
        .map(|id| {
            let (revenue, orders) = totals[id];
            (id, revenue, orders)
        })
        .collect();
    sort_desc_by(&mut clients, |c| c.1);

    clients
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, (id, revenue, orders))| TopClient {
            id: id.to_string(),
            rank: index + 1,
            revenue,
            orders,
            avg_order: if orders > 0 { revenue / orders as f64 } else { 0.0 },
            contribution: if grand_total > 0.0 {
                revenue / grand_total * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

/// The `limit` most recent sales, newest first; undated sales sort last
pub fn recent_sales(sales: &[Sale], limit: usize) -> Vec<Sale> {
    let mut sorted: Vec<&Sale> = sales.iter().collect();
    sorted.sort_by(|a, b| b.sale_date.cmp(&a.sale_date));
    sorted.into_iter().take(limit).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::lenient::parse_datetime;

    fn line(product_id: Id, quantity: f64, unit_price: f64) -> SaleLine {
        SaleLine {
            product_id: Some(product_id),
            product_title: None,
            quantity,
            unit_price,
        }
    }

    fn dataset() -> Dataset {
        let products = vec![
            Product {
                id: 1,
                title: "Desk".into(),
                category_id: Some(10),
                ..Default::default()
            },
            Product {
                id: 2,
                title: "Pen".into(),
                category_id: Some(20),
                ..Default::default()
            },
            Product {
                id: 3,
                title: "Orphan".into(),
                category_id: None,
                ..Default::default()
            },
        ];
        let categories = vec![
            Category {
                id: 10,
                name: "Furniture".into(),
            },
            Category {
                id: 20,
                name: "Office".into(),
            },
        ];
        let sales = vec![Sale {
            lines: vec![line(1, 1.0, 200.0), line(2, 10.0, 1.5), line(3, 2.0, 9.0)],
            ..Default::default()
        }];
        Dataset::new(sales, products, categories)
    }

    #[test]
    fn test_category_revenue_skips_unknown() {
        let revenue = category_revenue(&dataset());

        assert_eq!(revenue.len(), 2);
        assert_eq!(revenue[0].category_name, "Furniture");
        assert_eq!(revenue[0].total_revenue, 200.0);
        assert_eq!(revenue[1].total_revenue, 15.0);
    }

    #[test]
    fn test_best_sellers_by_quantity() {
        let sellers = best_sellers(&dataset(), 2);

        assert_eq!(sellers.len(), 2);
        assert_eq!(sellers[0].product_title, "Pen");
        assert_eq!(sellers[1].product_title, "Orphan");
    }

    #[test]
    fn test_top_clients() {
        let sale = |user: Option<&str>, amount: f64| Sale {
            user_id: user.map(String::from),
            total_amount: amount,
            ..Default::default()
        };
        let sales = vec![
            sale(Some("a"), 100.0),
            sale(Some("b"), 200.0),
            sale(Some("a"), 50.0),
            sale(None, 50.0),
        ];

        let clients = top_clients(&sales, 10);

        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].id, "b");
        assert_eq!(clients[0].rank, 1);
        assert_eq!(clients[0].contribution, 50.0);
        assert_eq!(clients[1].orders, 2);
        assert_eq!(clients[1].avg_order, 75.0);
    }

    #[test]
    fn test_recent_sales_newest_first() {
        let sale = |date: &str| Sale {
            sale_date: parse_datetime(date),
            ..Default::default()
        };
        let sales = vec![
            sale("2024-01-02"),
            Sale::default(),
            sale("2024-03-01"),
            sale("2024-02-01"),
        ];

        let recent = recent_sales(&sales, 3);

        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].day_key().as_deref(), Some("2024-03-01"));
        assert_eq!(recent[2].day_key().as_deref(), Some("2024-01-02"));
    }
}
