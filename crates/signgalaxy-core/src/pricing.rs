//! Premium price normalization.
//!
//! Turns an admin-entered sale price into a storefront-friendly triple: a
//! final price ending in 9, a marked-up MRP ending in 99, and the discount
//! percentage between them. Entities flagged `is_manual_discount` are left
//! untouched.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::products::{ProductDraft, VariationOption};

/// Candidate MRPs, relative to the hundred boundary at or above the minimum MRP.
///
/// The first entry lies more than 100 below the boundary, and the boundary is
/// within 100 of the minimum, so it never survives filtering under any
/// policy. It is kept so the candidate set matches the storefront's historic
/// four-entry list. The remaining three all end in 99.
pub const DEFAULT_CANDIDATE_OFFSETS: [i64; 4] = [-(100 + 99), 99, 100 + 99, 200 + 99];

/// Largest price accepted anywhere in the catalog (one billion). Fits the
/// `NUMERIC(12,2)` columns with room for the marked-up MRP.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// True when `price` is at most [`MAX_PRICE`].
#[must_use]
pub fn is_within_price_cap(price: Decimal) -> bool {
    price <= MAX_PRICE
}

/// Tunable constants behind [`normalize_price`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Target MRP as a multiple of the final price.
    pub markup_multiplier: Decimal,
    /// The MRP must exceed the final price by at least this amount...
    pub min_absolute_gap: Decimal,
    /// ...and be at least this multiple of it, whichever is larger.
    pub min_ratio: Decimal,
    pub candidate_offsets: [i64; 4],
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            markup_multiplier: Decimal::new(16, 1),
            min_absolute_gap: Decimal::from(1000),
            min_ratio: Decimal::new(135, 2),
            candidate_offsets: DEFAULT_CANDIDATE_OFFSETS,
        }
    }
}

/// Output of [`normalize_price`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub final_price: Decimal,
    pub mrp: Decimal,
    pub discount: i16,
}

impl PriceQuote {
    fn degenerate(raw: Decimal) -> Self {
        Self {
            final_price: raw,
            mrp: Decimal::ZERO,
            discount: 0,
        }
    }
}

/// Normalizes a raw sale price into a `(final, mrp, discount)` triple.
///
/// Missing, zero, or negative input degrades to `{ final: input_or_0, mrp: 0,
/// discount: 0 }` rather than failing. Input above [`MAX_PRICE`] is treated as
/// [`MAX_PRICE`]. If a policy is so extreme that the MRP search overflows, the
/// final price is kept and the MRP degrades to zero.
#[must_use]
pub fn normalize_price(raw: Option<Decimal>, policy: &PricingPolicy) -> PriceQuote {
    let raw = raw.unwrap_or(Decimal::ZERO);
    if raw <= Decimal::ZERO {
        return PriceQuote::degenerate(raw);
    }

    let final_price = round_to_nine(raw.min(MAX_PRICE));
    let Some(mrp) = choose_mrp(final_price, policy) else {
        return PriceQuote::degenerate(final_price);
    };

    PriceQuote {
        final_price,
        mrp,
        discount: discount_percent(final_price, mrp),
    }
}

/// Smallest MRP the policy accepts for a given final price, or `None` when
/// the policy pushes it past what a `Decimal` can hold.
#[must_use]
pub fn minimum_mrp(final_price: Decimal, policy: &PricingPolicy) -> Option<Decimal> {
    let by_gap = final_price.checked_add(policy.min_absolute_gap)?;
    let by_ratio = final_price.checked_mul(policy.min_ratio)?.ceil();
    Some(by_gap.max(by_ratio))
}

/// Rounds to the nearest multiple of 10 (halves up) and subtracts 1, clamping
/// non-positive results to 9. Callers cap `raw` at [`MAX_PRICE`] first.
fn round_to_nine(raw: Decimal) -> Decimal {
    let nearest_ten = (raw / Decimal::TEN)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        * Decimal::TEN;
    let candidate = nearest_ten - Decimal::ONE;
    if candidate <= Decimal::ZERO {
        Decimal::from(9)
    } else {
        candidate
    }
}

fn choose_mrp(final_price: Decimal, policy: &PricingPolicy) -> Option<Decimal> {
    let target = final_price.checked_mul(policy.markup_multiplier)?;
    let minimum = minimum_mrp(final_price, policy)?;
    let boundary = (minimum / Decimal::ONE_HUNDRED)
        .ceil()
        .checked_mul(Decimal::ONE_HUNDRED)?;

    let mut closest: Option<(Decimal, Decimal)> = None;
    for offset in policy.candidate_offsets {
        let Some(candidate) = boundary.checked_add(Decimal::from(offset)) else {
            continue;
        };
        if candidate < minimum {
            continue;
        }
        let Some(distance) = candidate.checked_sub(target).map(|d| d.abs()) else {
            continue;
        };
        if closest.map_or(true, |(_, best)| distance < best) {
            closest = Some((candidate, distance));
        }
    }

    if let Some((candidate, _)) = closest {
        return Some(candidate);
    }

    let fallback = boundary.checked_add(Decimal::from(99))?;
    if fallback < minimum {
        fallback.checked_add(Decimal::ONE_HUNDRED)
    } else {
        Some(fallback)
    }
}

fn discount_percent(final_price: Decimal, mrp: Decimal) -> i16 {
    if mrp <= Decimal::ZERO {
        return 0;
    }
    ((mrp - final_price) / mrp * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i16()
        .unwrap_or(0)
}

/// What [`apply_premium_pricing`] touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PricingOutcome {
    /// Quote applied to the product itself, `None` when it is manually priced.
    pub product: Option<PriceQuote>,
    pub options_normalized: usize,
    pub options_skipped: usize,
}

/// Normalizes a product and every variation option in place.
///
/// The product's raw input is `final_price`, falling back to the legacy
/// `pdf_price`. Options flagged `is_manual_discount` keep their stored values;
/// normalized options get `price_adjustment` set to the new MRP.
pub fn apply_premium_pricing(product: &mut ProductDraft, policy: &PricingPolicy) -> PricingOutcome {
    let mut outcome = PricingOutcome::default();

    if !product.is_manual_discount {
        let quote = normalize_price(product.pricing_input(), policy);
        product.final_price = Some(quote.final_price);
        product.mrp = Some(quote.mrp);
        product.discount = Some(quote.discount);
        outcome.product = Some(quote);
    }

    for option in product
        .variations
        .iter_mut()
        .flat_map(|variation| variation.options.iter_mut())
    {
        if option.is_manual_discount {
            outcome.options_skipped += 1;
            continue;
        }
        apply_to_option(option, policy);
        outcome.options_normalized += 1;
    }

    outcome
}

fn apply_to_option(option: &mut VariationOption, policy: &PricingPolicy) {
    let quote = normalize_price(option.final_price, policy);
    option.final_price = Some(quote.final_price);
    option.mrp = Some(quote.mrp);
    option.discount = Some(quote.discount);
    option.price_adjustment = Some(quote.mrp);
}

#[cfg(test)]
#[path = "pricing_test.rs"]
mod tests;
