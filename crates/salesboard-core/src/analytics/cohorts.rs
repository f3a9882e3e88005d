//! Monthly purchase cohorts

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::models::Sale;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cohort {
    /// `YYYY-MM`
    pub cohort: String,
    /// Distinct customers who bought that month
    pub users: usize,
    pub revenue: f64,
    pub orders: usize,
}

#[derive(Default)]
struct CohortAcc<'a> {
    users: HashSet<&'a str>,
    revenue: f64,
    orders: usize,
}

/// Group dated sales by calendar month, ascending
pub fn build_cohort_analysis(sales: &[Sale]) -> Vec<Cohort> {
    let mut cohorts: BTreeMap<String, CohortAcc<'_>> = BTreeMap::new();

    for sale in sales {
        let Some(at) = sale.sale_date else {
            continue;
        };
        let acc = cohorts
            .entry(at.format("%Y-%m").to_string())
            .or_default();
        if let Some(user) = sale.user_id.as_deref() {
            acc.users.insert(user);
        }
        acc.revenue += sale.total_amount;
        acc.orders += 1;
    }

    cohorts
        .into_iter()
        .map(|(cohort, acc)| Cohort {
            cohort,
            users: acc.users.len(),
            revenue: acc.revenue,
            orders: acc.orders,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::lenient::parse_datetime;

    fn sale(date: &str, user: Option<&str>, amount: f64) -> Sale {
        Sale {
            sale_date: parse_datetime(date),
            total_amount: amount,
            user_id: user.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_cohorts_by_month() {
        let sales = vec![
            sale("2024-02-03", Some("a"), 10.0),
            sale("2024-01-15", Some("a"), 20.0),
            sale("2024-01-20", Some("a"), 5.0),
            sale("2024-01-21", Some("b"), 5.0),
            sale("2024-01-22", None, 1.0),
        ];

        let cohorts = build_cohort_analysis(&sales);

        assert_eq!(cohorts.len(), 2);
        assert_eq!(cohorts[0].cohort, "2024-01");
        assert_eq!(cohorts[0].users, 2);
        assert_eq!(cohorts[0].orders, 4);
        assert_eq!(cohorts[0].revenue, 31.0);
        assert_eq!(cohorts[1].cohort, "2024-02");
    }

    #[test]
    fn test_undated_sales_skipped() {
        let cohorts = build_cohort_analysis(&[Sale::default()]);
        assert!(cohorts.is_empty());
    }
}
