//! Display formatting for amounts, counts and percentages

/// Currency with two decimals, e.g. `1234.50 DH`. Non-finite values print as zero.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "0.00 DH".to_string();
    }
    format!("{:.2} DH", value)
}

/// Large numbers with K / M suffix, small ones rounded to integers
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{:.0}", value)
    }
}

/// One decimal percentage, e.g. `12.5%`
pub fn format_percentage(value: f64) -> String {
    if !value.is_finite() {
        return "0%".to_string();
    }
    format!("{:.1}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.5), "1234.50 DH");
        assert_eq!(format_currency(0.0), "0.00 DH");
        assert_eq!(format_currency(f64::NAN), "0.00 DH");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1_500.0), "1.5K");
        assert_eq!(format_number(2_340_000.0), "2.3M");
        assert_eq!(format_number(12.4), "12");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(12.345), "12.3%");
        assert_eq!(format_percentage(-3.0), "-3.0%");
        assert_eq!(format_percentage(f64::INFINITY), "0%");
    }
}
