//! Cart summary

use crate::{discounts::PricingError, lines::PricedLine};

/// Cart-level totals over a set of priced lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartSummary {
    /// Sum of line subtotals.
    pub subtotal: u64,

    /// Sum of line discount amounts.
    pub discount_amount: u64,

    /// Sum of line totals, floored at zero.
    pub total: u64,

    /// Number of lines.
    pub line_count: usize,
}

/// Sum priced lines into a [`CartSummary`].
///
/// An empty slice yields the all-zero summary.
///
/// # Errors
///
/// Returns [`PricingError::AmountOverflow`] if any component sum exceeds the
/// money range.
pub fn summarize(lines: &[PricedLine]) -> Result<CartSummary, PricingError> {
    let mut summary = CartSummary {
        line_count: lines.len(),
        ..CartSummary::default()
    };

    for line in lines {
        summary.subtotal = summary
            .subtotal
            .checked_add(line.subtotal)
            .ok_or(PricingError::AmountOverflow)?;

        summary.discount_amount = summary
            .discount_amount
            .checked_add(line.discount_amount)
            .ok_or(PricingError::AmountOverflow)?;

        summary.total = summary
            .total
            .checked_add(line.total)
            .ok_or(PricingError::AmountOverflow)?;
    }

    Ok(summary)
}
