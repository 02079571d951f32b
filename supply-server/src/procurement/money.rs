//! Money calculation utilities using rust_decimal for precision
//!
//! This module provides precise decimal arithmetic for monetary calculations.
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` for storage/serialization.

use rust_decimal::prelude::*;
use shared::models::{OrderLine, OrderLineInput};

use super::error::{ProcurementError, ProcurementResult};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price (€1,000,000)
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i32 = 9999;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
pub fn require_finite(value: f64, field_name: &str) -> ProcurementResult<()> {
    if !value.is_finite() {
        return Err(ProcurementError::Validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate an OrderLineInput before it lands on an order
pub fn validate_line(line: &OrderLineInput) -> ProcurementResult<()> {
    require_finite(line.unit_price, "unit_price")?;
    if line.unit_price < 0.0 {
        return Err(ProcurementError::Validation(format!(
            "unit_price must be non-negative, got {}",
            line.unit_price
        )));
    }
    if line.unit_price > MAX_PRICE {
        return Err(ProcurementError::Validation(format!(
            "unit_price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, line.unit_price
        )));
    }

    if line.quantity <= 0 {
        return Err(ProcurementError::Validation(format!(
            "quantity must be positive, got {}",
            line.quantity
        )));
    }
    if line.quantity > MAX_QUANTITY {
        return Err(ProcurementError::Validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, line.quantity
        )));
    }

    if line.item_id.trim().is_empty() {
        return Err(ProcurementError::Validation(
            "item_id must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Round a monetary value to 2 decimal places, half-up
pub fn round_money(value: f64) -> f64 {
    to_f64(to_decimal(value).round_dp_with_strategy(
        DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    ))
}

/// Expected order total: Σ quantity × unit_price over the order's lines
pub fn expected_order_total(lines: &[OrderLine]) -> f64 {
    let total = lines
        .iter()
        .map(|l| Decimal::from(l.quantity) * to_decimal(l.unit_price))
        .sum::<Decimal>();
    to_f64(total.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero))
}

/// Percentage-based tolerance check: |amount − expected| ≤ expected × pct/100
pub fn within_tolerance(amount: f64, expected: f64, tolerance_pct: f64) -> bool {
    let amount = to_decimal(amount);
    let expected = to_decimal(expected);
    let tolerance = expected.abs() * to_decimal(tolerance_pct) / Decimal::ONE_HUNDRED;
    (amount - expected).abs() <= tolerance
}

/// Relative deviation (invoiced − expected) / expected; None when the
/// expected total is zero (no meaningful ratio)
pub fn variance_ratio(invoiced_total: f64, expected_total: f64) -> Option<f64> {
    let expected = to_decimal(expected_total);
    if expected.is_zero() {
        return None;
    }
    Some(to_f64((to_decimal(invoiced_total) - expected) / expected))
}
