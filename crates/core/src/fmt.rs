//! Amount and percentage formatting for line descriptions.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::discounts::as_decimal;

/// Format a guaraní amount with dot-separated thousands (6550 → "6.550").
#[must_use]
pub fn format_gs(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    let offset = digits.len() % 3;

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 3 == offset % 3 {
            out.push('.');
        }

        out.push(c);
    }

    out
}

/// Render a percentage as the human number used in descriptions
/// (0.15 → "15", 0.105 → "10.5").
#[must_use]
pub fn display_percent(percent: Percentage) -> String {
    (as_decimal(percent) * Decimal::ONE_HUNDRED)
        .normalize()
        .to_string()
}

/// The human percentage as a plain number (0.15 → 15.0), for wire payloads.
#[must_use]
pub fn percent_number(percent: Percentage) -> f64 {
    (as_decimal(percent) * Decimal::ONE_HUNDRED)
        .to_f64()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_gs_small_amounts_have_no_separator() {
        assert_eq!(format_gs(0), "0");
        assert_eq!(format_gs(7), "7");
        assert_eq!(format_gs(999), "999");
    }

    #[test]
    fn format_gs_groups_thousands_with_dots() {
        assert_eq!(format_gs(6_550), "6.550");
        assert_eq!(format_gs(20_000), "20.000");
        assert_eq!(format_gs(1_234_567), "1.234.567");
        assert_eq!(format_gs(1_000_000_000), "1.000.000.000");
    }

    #[test]
    fn display_percent_drops_trailing_zeros() {
        assert_eq!(display_percent(Percentage::from(0.15)), "15");
        assert_eq!(display_percent(Percentage::from(0.105)), "10.5");
        assert_eq!(display_percent(Percentage::from(1.0)), "100");
    }

    #[test]
    fn percent_number_is_the_human_value() {
        assert!((percent_number(Percentage::from(0.15)) - 15.0).abs() < f64::EPSILON);
        assert!((percent_number(Percentage::from(0.105)) - 10.5).abs() < f64::EPSILON);
    }
}
