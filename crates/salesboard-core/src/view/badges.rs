//! Status badges for stock levels and trends

use serde::Serialize;
use std::fmt;

/// Stock level of a product relative to the low-stock threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StockBadge {
    OutOfStock,
    /// Below the threshold
    Low,
    /// Below twice the threshold
    Watch,
    Ok,
}

impl StockBadge {
    pub fn classify(stock: f64, low_stock: f64) -> Self {
        if stock <= 0.0 {
            StockBadge::OutOfStock
        } else if stock < low_stock {
            StockBadge::Low
        } else if stock < low_stock * 2.0 {
            StockBadge::Watch
        } else {
            StockBadge::Ok
        }
    }

    pub fn needs_attention(&self) -> bool {
        matches!(self, StockBadge::OutOfStock | StockBadge::Low)
    }
}

impl fmt::Display for StockBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StockBadge::OutOfStock => "Out of stock",
            StockBadge::Low => "Low",
            StockBadge::Watch => "Watch",
            StockBadge::Ok => "OK",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

/// Signed percentage change with its direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendBadge {
    pub value: f64,
    pub direction: TrendDirection,
    /// True when the change is good news (a drop, for inverted metrics)
    pub favorable: bool,
}

impl TrendBadge {
    pub fn new(value: f64) -> Self {
        Self::with_polarity(value, false)
    }

    /// For metrics where a decrease is good (e.g. low-stock count)
    pub fn inverted(value: f64) -> Self {
        Self::with_polarity(value, true)
    }

    fn with_polarity(value: f64, inverted: bool) -> Self {
        let value = if value.is_finite() { value } else { 0.0 };
        let direction = if value > 0.0 {
            TrendDirection::Up
        } else if value < 0.0 {
            TrendDirection::Down
        } else {
            TrendDirection::Flat
        };
        let favorable = match direction {
            TrendDirection::Up => !inverted,
            TrendDirection::Down => inverted,
            TrendDirection::Flat => false,
        };
        Self {
            value,
            direction,
            favorable,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self.direction {
            TrendDirection::Up => "▲",
            TrendDirection::Down => "▼",
            TrendDirection::Flat => "–",
        }
    }
}

impl fmt::Display for TrendBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.value > 0.0 { "+" } else { "" };
        write!(f, "{} {}{:.1}%", self.arrow(), sign, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_badge() {
        assert_eq!(StockBadge::classify(0.0, 5.0), StockBadge::OutOfStock);
        assert_eq!(StockBadge::classify(4.0, 5.0), StockBadge::Low);
        assert_eq!(StockBadge::classify(5.0, 5.0), StockBadge::Watch);
        assert_eq!(StockBadge::classify(10.0, 5.0), StockBadge::Ok);
        assert!(StockBadge::Low.needs_attention());
        assert!(!StockBadge::Watch.needs_attention());
    }

    #[test]
    fn test_trend_badge() {
        let up = TrendBadge::new(12.46);
        assert_eq!(up.direction, TrendDirection::Up);
        assert!(up.favorable);
        assert_eq!(up.to_string(), "▲ +12.5%");

        let down = TrendBadge::inverted(-3.0);
        assert_eq!(down.direction, TrendDirection::Down);
        assert!(down.favorable);
        assert_eq!(down.to_string(), "▼ -3.0%");

        assert_eq!(TrendBadge::new(f64::NAN).direction, TrendDirection::Flat);
    }
}
