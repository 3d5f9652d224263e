//! Price and coupon evaluation
//!
//! Pure functions over `Decimal`. Amounts are rounded to 2 decimal places
//! (half away from zero) to match the `NUMERIC(10,2)` columns.

use std::collections::HashMap;

use rust_decimal::prelude::*;
use shared::models::{Coupon, DiscountType, GamePrice};

const DECIMAL_PLACES: u32 = 2;

#[inline]
fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// One purchased game with its price at checkout time
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub app_id: i64,
    pub unit_price: Decimal,
    pub discount_percent: i32,
}

/// Result of evaluating a set of lines against an optional coupon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

/// Build line items for `app_ids`, in that order, from the catalog prices.
///
/// Returns the ids that have no catalog price as the error.
pub fn price_lines(app_ids: &[i64], prices: &[GamePrice]) -> Result<Vec<LineItem>, Vec<i64>> {
    let by_id: HashMap<i64, &GamePrice> = prices.iter().map(|p| (p.app_id, p)).collect();

    let missing: Vec<i64> = app_ids
        .iter()
        .copied()
        .filter(|id| !by_id.contains_key(id))
        .collect();
    if !missing.is_empty() {
        return Err(missing);
    }

    Ok(app_ids
        .iter()
        .filter_map(|id| by_id.get(id))
        .map(|p| LineItem {
            app_id: p.app_id,
            unit_price: p.price_final,
            discount_percent: p.discount_percent,
        })
        .collect())
}

pub fn subtotal(lines: &[LineItem]) -> Decimal {
    round_money(lines.iter().map(|l| l.unit_price).sum())
}

/// Discount granted by `coupon` on `subtotal`, clamped to `[0, subtotal]`
pub fn compute_discount(subtotal: Decimal, coupon: &Coupon) -> Decimal {
    let raw = match coupon.discount_type {
        DiscountType::Percentage => subtotal * coupon.value / Decimal::ONE_HUNDRED,
        DiscountType::FixedAmount => coupon.value,
    };
    round_money(raw).min(subtotal).max(Decimal::ZERO)
}

pub fn evaluate(lines: &[LineItem], coupon: Option<&Coupon>) -> Quote {
    let subtotal = subtotal(lines);
    let discount = coupon
        .map(|c| compute_discount(subtotal, c))
        .unwrap_or(Decimal::ZERO);
    Quote {
        subtotal,
        discount,
        total: subtotal - discount,
    }
}
