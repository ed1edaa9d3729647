//! Pricing pipeline
//!
//! The cart read flow runs these stages in order:
//!
//! 1. [`price_lines`] with the active product discounts for the cart's
//!    variants.
//! 2. [`eligible_subtotal`] over the priced lines.
//! 3. The caller looks up the amount-tier discount for that eligible
//!    subtotal — not for the raw cart subtotal.
//! 4. [`apply_amount_tier`] with the tier found, if any.
//! 5. [`crate::summary::summarize`].
//!
//! The eligible subtotal is the sum over exactly the lines stage 4 may touch,
//! so the tier lookup and the tier application always agree on the population.

use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::{
    discounts::{AmountTier, PricingError, ProductDiscount, is_positive, percent_of},
    fmt::{display_percent, format_gs},
    lines::{DiscountKind, PricedLine, RawLine},
};

/// Price each line, applying at most one product discount per line.
///
/// Lines without a matching positive discount pass through unpriced
/// (`DiscountKind::None`) and stay eligible for the amount-tier stage.
///
/// # Errors
///
/// Returns a [`PricingError`] when `unit_price × quantity` overflows or a
/// percentage cannot be applied. A failing line fails the whole run; lines
/// are never silently dropped.
pub fn price_lines(
    raw: Vec<RawLine>,
    discounts: &FxHashMap<Uuid, ProductDiscount>,
) -> Result<Vec<PricedLine>, PricingError> {
    raw.into_iter()
        .map(|line| price_line(line, discounts))
        .collect()
}

fn price_line(
    raw: RawLine,
    discounts: &FxHashMap<Uuid, ProductDiscount>,
) -> Result<PricedLine, PricingError> {
    let subtotal = raw
        .unit_price
        .checked_mul(u64::from(raw.quantity))
        .ok_or(PricingError::AmountOverflow)?;

    let discount = discounts
        .get(&raw.variant_uuid)
        .filter(|discount| is_positive(discount.percent));

    let Some(discount) = discount else {
        return Ok(PricedLine {
            raw,
            subtotal,
            discount_percent: None,
            discount_kind: DiscountKind::None,
            discount_amount: 0,
            total: subtotal,
            description: None,
        });
    };

    let discount_amount = percent_of(subtotal, discount.percent)?;

    Ok(PricedLine {
        raw,
        subtotal,
        discount_percent: Some(discount.percent),
        discount_kind: DiscountKind::Product,
        discount_amount,
        total: subtotal - discount_amount,
        description: Some(format!(
            "Por producto ({}%) - {} Gs",
            display_percent(discount.percent),
            format_gs(discount_amount),
        )),
    })
}

/// Sum the subtotals of the lines the amount-tier stage may claim: not
/// product-discounted and not discount-blocked.
///
/// This runs between the two discount stages; the result feeds the tier
/// lookup.
///
/// # Errors
///
/// Returns [`PricingError::AmountOverflow`] if the sum exceeds the money
/// range.
pub fn eligible_subtotal(lines: &[PricedLine]) -> Result<u64, PricingError> {
    lines
        .iter()
        .filter(|line| line.tier_eligible())
        .try_fold(0_u64, |sum, line| {
            sum.checked_add(line.subtotal)
                .ok_or(PricingError::AmountOverflow)
        })
}

/// Apply an amount-tier discount across every still-eligible line.
///
/// With no tier, or a tier with a non-positive percentage, lines pass through
/// unchanged. Product-discounted and discount-blocked lines are never
/// touched, which keeps the two discount kinds mutually exclusive per line.
///
/// # Errors
///
/// Returns a [`PricingError`] when the percentage cannot be applied to a
/// line subtotal.
pub fn apply_amount_tier(
    lines: Vec<PricedLine>,
    tier: Option<&AmountTier>,
) -> Result<Vec<PricedLine>, PricingError> {
    let Some(tier) = tier.filter(|tier| is_positive(tier.percent)) else {
        return Ok(lines);
    };

    lines
        .into_iter()
        .map(|mut line| {
            if !line.tier_eligible() {
                return Ok(line);
            }

            let discount_amount = percent_of(line.subtotal, tier.percent)?;

            line.discount_percent = Some(tier.percent);
            line.discount_kind = DiscountKind::Amount;
            line.discount_amount = discount_amount;
            line.total = line.subtotal - discount_amount;
            line.description = Some(format!(
                "Por importe ({}%) - {} Gs",
                display_percent(tier.percent),
                format_gs(discount_amount),
            ));

            Ok(line)
        })
        .collect()
}
