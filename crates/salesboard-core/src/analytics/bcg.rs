//! BCG growth/share classification of sold products
//!
//! Share is approximated by revenue against the median revenue, growth by
//! quantity sold against the mean quantity. Only products that appear in at
//! least one sale line are classified.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::models::{Id, Product, Sale};

/// Revenue and quantity aggregated for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMetric {
    pub id: Id,
    pub title: String,
    pub revenue: f64,
    pub quantity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BcgQuadrant {
    Star,
    CashCow,
    QuestionMark,
    Dog,
}

impl BcgQuadrant {
    pub fn classify(high_share: bool, high_growth: bool) -> Self {
        match (high_share, high_growth) {
            (true, true) => BcgQuadrant::Star,
            (true, false) => BcgQuadrant::CashCow,
            (false, true) => BcgQuadrant::QuestionMark,
            (false, false) => BcgQuadrant::Dog,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BcgQuadrant::Star => "Stars",
            BcgQuadrant::CashCow => "Cash cows",
            BcgQuadrant::QuestionMark => "Question marks",
            BcgQuadrant::Dog => "Dogs",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BcgMatrix {
    pub stars: Vec<ProductMetric>,
    pub cash_cows: Vec<ProductMetric>,
    pub question_marks: Vec<ProductMetric>,
    pub dogs: Vec<ProductMetric>,
}

impl BcgMatrix {
    pub fn len(&self) -> usize {
        self.stars.len() + self.cash_cows.len() + self.question_marks.len() + self.dogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn quadrant(&self, quadrant: BcgQuadrant) -> &[ProductMetric] {
        match quadrant {
            BcgQuadrant::Star => &self.stars,
            BcgQuadrant::CashCow => &self.cash_cows,
            BcgQuadrant::QuestionMark => &self.question_marks,
            BcgQuadrant::Dog => &self.dogs,
        }
    }

    /// Quadrant holding product `id`, if it was classified
    pub fn quadrant_of(&self, id: Id) -> Option<BcgQuadrant> {
        [
            BcgQuadrant::Star,
            BcgQuadrant::CashCow,
            BcgQuadrant::QuestionMark,
            BcgQuadrant::Dog,
        ]
        .into_iter()
        .find(|q| self.quadrant(*q).iter().any(|m| m.id == id))
    }

    fn push(&mut self, quadrant: BcgQuadrant, metric: ProductMetric) {
        match quadrant {
            BcgQuadrant::Star => self.stars.push(metric),
            BcgQuadrant::CashCow => self.cash_cows.push(metric),
            BcgQuadrant::QuestionMark => self.question_marks.push(metric),
            BcgQuadrant::Dog => self.dogs.push(metric),
        }
    }
}

/// Sum revenue and quantity per product id over every sale line
///
/// Lines without a product id are skipped. Titles come from the first line
/// that carries one, then the product list, then `Product {id}`. The result
/// is ordered by product id.
pub fn aggregate_product_sales(products: &[Product], sales: &[Sale]) -> Vec<ProductMetric> {
    let catalog: HashMap<Id, &str> = products
        .iter()
        .map(|p| (p.id, p.title.as_str()))
        .collect();

    let mut metrics: BTreeMap<Id, ProductMetric> = BTreeMap::new();
    for line in sales.iter().flat_map(|s| s.lines.iter()) {
        let Some(id) = line.product_id else {
            continue;
        };
        let metric = metrics.entry(id).or_insert_with(|| ProductMetric {
            id,
            title: String::new(),
            revenue: 0.0,
            quantity: 0.0,
        });
        if metric.title.is_empty() {
            if let Some(title) = &line.product_title {
                metric.title = title.clone();
            }
        }
        metric.revenue += line.revenue();
        metric.quantity += line.quantity;
    }

    metrics
        .into_values()
        .map(|mut m| {
            if m.title.is_empty() {
                m.title = catalog
                    .get(&m.id)
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| format!("Product {}", m.id));
            }
            m
        })
        .collect()
}

/// Classify every sold product into one BCG quadrant
pub fn build_bcg_matrix(products: &[Product], sales: &[Sale]) -> BcgMatrix {
    classify(aggregate_product_sales(products, sales))
}

pub(crate) fn classify(metrics: Vec<ProductMetric>) -> BcgMatrix {
    let mut matrix = BcgMatrix::default();
    if metrics.is_empty() {
        return matrix;
    }

    let mut revenues: Vec<f64> = metrics.iter().map(|m| m.revenue).collect();
    revenues.sort_by(f64::total_cmp);
    let median_revenue = revenues[revenues.len() / 2];
    let mean_quantity = metrics.iter().map(|m| m.quantity).sum::<f64>() / metrics.len() as f64;

    tracing::debug!(
        products = metrics.len(),
        median_revenue,
        mean_quantity,
        "BCG thresholds"
    );

    for metric in metrics {
        let quadrant =
            BcgQuadrant::classify(metric.revenue > median_revenue, metric.quantity > mean_quantity);
        matrix.push(quadrant, metric);
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SaleLine;

    fn line(product_id: Id, quantity: f64, unit_price: f64) -> SaleLine {
        SaleLine {
            product_id: Some(product_id),
            product_title: None,
            quantity,
            unit_price,
        }
    }

    fn sale(lines: Vec<SaleLine>) -> Sale {
        Sale {
            lines,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_sales_give_empty_matrix() {
        let matrix = build_bcg_matrix(&[], &[]);
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_quadrants() {
        // revenues: 1 -> 1000, 2 -> 100, 3 -> 50, 4 -> 10; median = sorted[2] = 100
        // quantities: 1 -> 10, 2 -> 1, 3 -> 25, 4 -> 1; mean = 9.25
        let sales = vec![
            sale(vec![line(1, 10.0, 100.0), line(2, 1.0, 100.0)]),
            sale(vec![line(3, 25.0, 2.0), line(4, 1.0, 10.0)]),
        ];

        let matrix = build_bcg_matrix(&[], &sales);

        assert_eq!(matrix.quadrant_of(1), Some(BcgQuadrant::Star));
        assert_eq!(matrix.quadrant_of(3), Some(BcgQuadrant::QuestionMark));
        assert_eq!(matrix.quadrant_of(2), Some(BcgQuadrant::Dog));
        assert_eq!(matrix.quadrant_of(4), Some(BcgQuadrant::Dog));
        assert_eq!(matrix.len(), 4);
    }

    #[test]
    fn test_cash_cow() {
        // revenues 500, 10, 24; median 24; quantities 1, 5, 6; mean 4
        let sales = vec![sale(vec![
            line(1, 1.0, 500.0),
            line(2, 5.0, 2.0),
            line(3, 6.0, 4.0),
        ])];

        let matrix = build_bcg_matrix(&[], &sales);
        assert_eq!(matrix.quadrant_of(1), Some(BcgQuadrant::CashCow));
    }

    #[test]
    fn test_single_product_is_dog() {
        let matrix = build_bcg_matrix(&[], &[sale(vec![line(7, 3.0, 10.0)])]);
        assert_eq!(matrix.dogs.len(), 1);
        assert_eq!(matrix.dogs[0].title, "Product 7");
    }

    #[test]
    fn test_titles_and_aggregation() {
        let products = vec![Product {
            id: 2,
            title: "Lamp".into(),
            ..Default::default()
        }];
        let mut titled = line(1, 2.0, 5.0);
        titled.product_title = Some("Desk".into());
        let sales = vec![
            sale(vec![line(1, 1.0, 5.0), titled, line(2, 4.0, 3.0)]),
            sale(vec![SaleLine {
                product_id: None,
                quantity: 99.0,
                unit_price: 99.0,
                product_title: None,
            }]),
        ];

        let metrics = aggregate_product_sales(&products, &sales);

        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].title, "Desk");
        assert_eq!(metrics[0].revenue, 15.0);
        assert_eq!(metrics[0].quantity, 3.0);
        assert_eq!(metrics[1].title, "Lamp");
    }
}
