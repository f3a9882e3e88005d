//! Moving-average forecast with a linear trend

use chrono::{Datelike, Days, Local, Months, NaiveDate};

use super::round_to;
use crate::models::{ForecastPoint, SeriesPoint};
use crate::parsers::lenient::parse_datetime;

const MAX_WINDOW: usize = 7;

/// Spacing of projected points after the last one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForecastStep {
    #[default]
    Day,
    /// First day of each following month
    Month,
}

impl ForecastStep {
    fn date_after(self, anchor: NaiveDate, steps: usize) -> NaiveDate {
        let date = match self {
            ForecastStep::Day => anchor.checked_add_days(Days::new(steps as u64)),
            ForecastStep::Month => anchor
                .with_day(1)
                .and_then(|first| first.checked_add_months(Months::new(steps as u32))),
        };
        date.unwrap_or(anchor)
    }

    fn placeholder(self, steps: usize) -> String {
        match self {
            ForecastStep::Day => format!("+{}d", steps),
            ForecastStep::Month => format!("+{}m", steps),
        }
    }
}

/// Project `periods` days after the end of `series`, anchored on today
/// when the last date is unreadable
pub fn generate_forecast(series: &[SeriesPoint], periods: usize) -> Vec<ForecastPoint> {
    generate_forecast_from(series, periods, Local::now().date_naive())
}

/// Same as [`generate_forecast`] with an explicit fallback anchor date
pub fn generate_forecast_from(
    series: &[SeriesPoint],
    periods: usize,
    today: NaiveDate,
) -> Vec<ForecastPoint> {
    generate_forecast_stepped(series, periods, today, ForecastStep::Day)
}

/// Forecast with points spaced by `step`
///
/// Always returns exactly `periods` points with non-negative values.
pub fn generate_forecast_stepped(
    series: &[SeriesPoint],
    periods: usize,
    today: NaiveDate,
    step: ForecastStep,
) -> Vec<ForecastPoint> {
    let valid: Vec<f64> = series
        .iter()
        .map(|p| p.value)
        .filter(|v| v.is_finite())
        .collect();

    if valid.len() < 2 {
        return (1..=periods)
            .map(|i| ForecastPoint {
                date: step.placeholder(i),
                value: 0.0,
                is_forecast: true,
            })
            .collect();
    }

    let n = series.len();
    let window = (n / 2).clamp(2, MAX_WINDOW).min(valid.len());
    let tail = &valid[valid.len() - window..];
    let moving_average = tail.iter().sum::<f64>() / tail.len() as f64;

    let first = series
        .first()
        .map(|p| p.value)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0);
    let trend = (moving_average - first) / n as f64;

    let anchor = series
        .last()
        .and_then(|p| parse_datetime(&p.date))
        .map(|dt| dt.date())
        .unwrap_or(today);

    tracing::debug!(window, moving_average, trend, ?step, "Forecast parameters");

    (1..=periods)
        .map(|i| ForecastPoint {
            date: step.date_after(anchor, i).format("%Y-%m-%d").to_string(),
            value: round_to(moving_average + trend * i as f64, 2).max(0.0),
            is_forecast: true,
        })
        .collect()
}
