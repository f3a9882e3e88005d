//! Descriptive statistics and histograms over sale amounts

use serde::{Deserialize, Serialize};

use super::round_to;
use crate::view::format_number;

/// Summary of a value distribution, every field rounded to 2 decimals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
}

/// Index-based quantiles: median = sorted[n/2], q1 = sorted[n/4],
/// q3 = sorted[3n/4]. Non-finite values are ignored.
pub fn calculate_statistics(values: &[f64]) -> Statistics {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return Statistics::default();
    }
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    let at = |fraction: f64| sorted[((n as f64 * fraction).floor() as usize).min(n - 1)];

    Statistics {
        mean: round_to(mean, 2),
        median: round_to(sorted[n / 2], 2),
        std: round_to(variance.sqrt(), 2),
        min: round_to(sorted[0], 2),
        max: round_to(sorted[n - 1], 2),
        q1: round_to(at(0.25), 2),
        q3: round_to(at(0.75), 2),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    /// Display label, e.g. `1.2K-2.5K`
    pub range: String,
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
    pub count: usize,
    /// Share of the binned amounts, 0-100
    pub percentage: f64,
}

/// Equal-width histogram over the positive amounts
///
/// Bin width is `(max - min) / bins`, or 1 when all amounts are equal. Bins
/// are half-open except the last one, which also holds the maximum.
pub fn build_histogram(amounts: &[f64], bins: usize) -> Vec<HistogramBin> {
    let positive: Vec<f64> = amounts
        .iter()
        .copied()
        .filter(|a| a.is_finite() && *a > 0.0)
        .collect();
    if positive.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = positive.iter().copied().fold(f64::INFINITY, f64::min);
    let max = positive.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = match (max - min) / bins as f64 {
        w if w > 0.0 => w,
        _ => 1.0,
    };

    let mut counts = vec![0usize; bins];
    for amount in &positive {
        let slot = (((amount - min) / width).floor() as usize).min(bins - 1);
        counts[slot] += 1;
    }

    let total = positive.len() as f64;
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let start = min + i as f64 * width;
            let end = start + width;
            HistogramBin {
                range: format!("{}-{}", format_number(start), format_number(end)),
                start,
                end,
                count,
                percentage: count as f64 / total * 100.0,
            }
        })
        .collect()
}
