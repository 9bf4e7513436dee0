//! Common utility functions for budget calculations.
//!
//! This module provides shared functionality used across the deduction,
//! allocation and projection calculators, including rounding, clamping and
//! percentage conversion.

use rust_decimal::Decimal;

/// Number of months in a year, used to turn annual figures into monthly ones.
pub const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// One hundred, the scale of every user-facing percentage.
pub const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use budget_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// ```
/// use rust_decimal_macros::dec;
/// use budget_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps `value` into `[low, high]`.
///
/// `low` wins when the bounds are inverted, so a misconfigured upper bound
/// can never produce a value below the floor.
pub fn clamp(
    value: Decimal,
    low: Decimal,
    high: Decimal,
) -> Decimal {
    max(value.min(high), low)
}

/// Clamps negative amounts to zero.
pub fn non_negative(value: Decimal) -> Decimal {
    max(value, Decimal::ZERO)
}

/// Converts a 0–100 percentage into a fraction (`15` → `0.15`).
pub fn pct_to_fraction(pct: Decimal) -> Decimal {
    pct / HUNDRED
}

/// Returns `pct`% of `amount`.
pub fn percent_of(
    amount: Decimal,
    pct: Decimal,
) -> Decimal {
    amount * pct_to_fraction(pct)
}
