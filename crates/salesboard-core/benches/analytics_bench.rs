//! Performance benchmarks for the fallback analytics engine
//!
//! Run with:
//! ```bash
//! cargo bench --bench analytics_bench
//! ```

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use salesboard_core::analytics::{
    build_bcg_matrix, category_fallback, generate_forecast_from, group_sales_by_period,
    overview_fallback, Period,
};
use salesboard_core::config::Thresholds;
use salesboard_core::models::{Category, Dataset, Product, Sale, SaleLine, SeriesPoint};

const PRODUCTS: i64 = 50;
const CATEGORIES: i64 = 8;

/// Generate a dataset with `count` sales spread over `days` days
fn generate_dataset(count: usize, days: usize) -> Dataset {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let sales = (0..count)
        .map(|i| {
            let date = start + chrono::Duration::days((i % days) as i64);
            let lines = (0..3)
                .map(|j| SaleLine {
                    product_id: Some(((i + j) as i64) % PRODUCTS),
                    product_title: None,
                    quantity: 1.0 + (j % 2) as f64,
                    unit_price: 10.0 + (i % 40) as f64,
                })
                .collect();
            Sale {
                id: Some(i as i64),
                sale_date: date.and_hms_opt((i % 24) as u32, (i % 60) as u32, 0),
                total_amount: 50.0 + (i % 200) as f64,
                lines,
                user_id: Some(format!("client-{}", i % 150)),
            }
        })
        .collect();

    let products = (0..PRODUCTS)
        .map(|id| Product {
            id,
            title: format!("Product {}", id),
            stock: (id % 30) as f64,
            price: 10.0 + id as f64,
            category_id: Some(id % CATEGORIES),
        })
        .collect();

    let categories = (0..CATEGORIES)
        .map(|id| Category {
            id,
            name: format!("Category {}", id),
        })
        .collect();

    Dataset::new(sales, products, categories)
}

fn period_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_sales_by_period");

    for count in [100, 1000, 10000] {
        let dataset = generate_dataset(count, 90);
        group.bench_with_input(BenchmarkId::new("hour", count), &dataset, |b, dataset| {
            b.iter(|| black_box(group_sales_by_period(&dataset.sales, Period::Hour)));
        });
        group.bench_with_input(BenchmarkId::new("date", count), &dataset, |b, dataset| {
            b.iter(|| black_box(group_sales_by_period(&dataset.sales, Period::Date)));
        });
    }

    group.finish();
}

fn forecast_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_forecast");
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    for days in [7, 30, 365] {
        let series: Vec<SeriesPoint> = (0..days)
            .map(|d| {
                let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(d);
                SeriesPoint::new(date.format("%Y-%m-%d").to_string(), 100.0 + d as f64)
            })
            .collect();
        group.bench_with_input(BenchmarkId::new("days", days), &series, |b, series| {
            b.iter(|| black_box(generate_forecast_from(series, 7, today)));
        });
    }

    group.finish();
}

fn page_benchmark(c: &mut Criterion) {
    let dataset = generate_dataset(1000, 90);
    let thresholds = Thresholds::default();
    let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();

    c.bench_function("build_bcg_matrix_1000", |b| {
        b.iter(|| black_box(build_bcg_matrix(&dataset.products, &dataset.sales)));
    });
    c.bench_function("category_fallback_1000", |b| {
        b.iter(|| black_box(category_fallback(&dataset)));
    });
    c.bench_function("overview_fallback_1000", |b| {
        b.iter(|| black_box(overview_fallback(&dataset, &thresholds, today)));
    });
}

criterion_group!(benches, period_benchmark, forecast_benchmark, page_benchmark);
criterion_main!(benches);
