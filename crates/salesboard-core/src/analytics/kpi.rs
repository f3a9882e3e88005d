//! Headline KPIs and growth ratios

use chrono::{Datelike, Months, NaiveDate};

use super::round_to;
use crate::models::{KpiBundle, Product, Sale};

/// Average order value; 0 when there are no sales
pub fn calculate_aov(sales: &[Sale]) -> f64 {
    if sales.is_empty() {
        return 0.0;
    }
    total_revenue(sales) / sales.len() as f64
}

/// Percentage change from `previous` to `current`; 0 when `previous` is 0
pub fn calculate_growth_rate(current: f64, previous: f64) -> f64 {
    if previous == 0.0 || !previous.is_finite() {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

pub(crate) fn total_revenue(sales: &[Sale]) -> f64 {
    sales.iter().map(|s| s.total_amount).sum()
}

/// Revenue of the sales dated on `day`
pub fn revenue_on(sales: &[Sale], day: NaiveDate) -> f64 {
    sales
        .iter()
        .filter(|s| s.sale_date.is_some_and(|d| d.date() == day))
        .map(|s| s.total_amount)
        .sum()
}

fn revenue_in_month(sales: &[Sale], year: i32, month: u32) -> f64 {
    sales
        .iter()
        .filter(|s| {
            s.sale_date
                .is_some_and(|d| d.year() == year && d.month() == month)
        })
        .map(|s| s.total_amount)
        .sum()
}

/// Revenue growth of the month containing `today` over the previous month
///
/// Rounded to 1 decimal. With no revenue last month the growth is 100 when
/// this month sold anything and 0 otherwise.
pub fn month_over_month_growth(sales: &[Sale], today: NaiveDate) -> f64 {
    let current = revenue_in_month(sales, today.year(), today.month());
    let previous = today
        .checked_sub_months(Months::new(1))
        .map(|d| revenue_in_month(sales, d.year(), d.month()))
        .unwrap_or(0.0);

    if previous > 0.0 {
        round_to(calculate_growth_rate(current, previous), 1)
    } else if current > 0.0 {
        100.0
    } else {
        0.0
    }
}

/// KPI bundle over raw entities. A product is low on stock strictly below
/// `low_stock` and active with any stock left.
pub fn compute_kpis(sales: &[Sale], products: &[Product], low_stock: f64) -> KpiBundle {
    KpiBundle {
        total_revenue: total_revenue(sales),
        total_sales: sales.len(),
        average_basket: calculate_aov(sales),
        low_stock_count: products.iter().filter(|p| p.is_low_stock(low_stock)).count(),
        total_products: products.len(),
        active_products: products.iter().filter(|p| p.stock > 0.0).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::lenient::parse_datetime;

    fn sale(date: &str, amount: f64) -> Sale {
        Sale {
            sale_date: parse_datetime(date),
            total_amount: amount,
            ..Default::default()
        }
    }

    fn product(stock: f64) -> Product {
        Product {
            stock,
            ..Default::default()
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_aov() {
        assert_eq!(calculate_aov(&[]), 0.0);
        let sales = vec![sale("2024-01-01", 100.0), sale("2024-01-02", 50.0)];
        assert_eq!(calculate_aov(&sales), 75.0);
    }

    #[test]
    fn test_growth_rate() {
        assert_eq!(calculate_growth_rate(150.0, 100.0), 50.0);
        assert_eq!(calculate_growth_rate(50.0, 100.0), -50.0);
        assert_eq!(calculate_growth_rate(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_mom_growth() {
        let sales = vec![
            sale("2024-02-10", 100.0),
            sale("2024-03-01", 90.0),
            sale("2024-03-20", 43.0),
        ];
        assert_eq!(month_over_month_growth(&sales, day(2024, 3, 25)), 33.0);
    }

    #[test]
    fn test_mom_growth_without_previous_month() {
        let sales = vec![sale("2024-03-01", 90.0)];
        assert_eq!(month_over_month_growth(&sales, day(2024, 3, 25)), 100.0);
        assert_eq!(month_over_month_growth(&sales, day(2024, 5, 1)), 0.0);
    }

    #[test]
    fn test_mom_growth_across_year() {
        let sales = vec![sale("2023-12-15", 200.0), sale("2024-01-05", 100.0)];
        assert_eq!(month_over_month_growth(&sales, day(2024, 1, 31)), -50.0);
    }

    #[test]
    fn test_compute_kpis() {
        let sales = vec![sale("2024-01-01", 100.0), sale("2024-01-02", 200.0)];
        let products = vec![product(0.0), product(4.0), product(5.0), product(12.0)];

        let kpis = compute_kpis(&sales, &products, 5.0);

        assert_eq!(kpis.total_revenue, 300.0);
        assert_eq!(kpis.total_sales, 2);
        assert_eq!(kpis.average_basket, 150.0);
        assert_eq!(kpis.low_stock_count, 2);
        assert_eq!(kpis.total_products, 4);
        assert_eq!(kpis.active_products, 3);
    }

    #[test]
    fn test_revenue_on() {
        let sales = vec![
            sale("2024-01-01T08:00:00", 10.0),
            sale("2024-01-01T20:00:00", 5.0),
            sale("2024-01-02T08:00:00", 7.0),
        ];
        assert_eq!(revenue_on(&sales, day(2024, 1, 1)), 15.0);
    }
}
