//! Monthly expense aggregation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::{HUNDRED, non_negative};
use crate::models::ExpenseRatio;

/// Sums monthly expenses, clamping negative entries to zero. A total beyond
/// the representable range saturates at [`Decimal::MAX`].
pub fn total_monthly_expenses(expenses: &BTreeMap<String, Decimal>) -> Decimal {
    expenses
        .iter()
        .map(|(category, amount)| {
            if *amount < Decimal::ZERO {
                debug!(category = %category, %amount, "negative expense clamped to zero");
            }
            non_negative(*amount)
        })
        .fold(Decimal::ZERO, |total, amount| {
            total.checked_add(amount).unwrap_or_else(|| {
                warn!("monthly expenses exceed the representable range");
                Decimal::MAX
            })
        })
}

/// Expenses as a percentage of monthly disposable income.
///
/// Without positive disposable income the ratio is unbounded when there are
/// expenses and zero when there are none. A ratio too large to represent is
/// also unbounded.
pub fn expense_ratio(
    total_expenses: Decimal,
    monthly_disposable: Decimal,
) -> ExpenseRatio {
    if monthly_disposable > Decimal::ZERO {
        total_expenses
            .checked_div(monthly_disposable)
            .and_then(|share| share.checked_mul(HUNDRED))
            .map_or(ExpenseRatio::Unbounded, ExpenseRatio::Finite)
    } else if total_expenses > Decimal::ZERO {
        ExpenseRatio::Unbounded
    } else {
        ExpenseRatio::Finite(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn expenses(entries: &[(&str, Decimal)]) -> BTreeMap<String, Decimal> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    #[test]
    fn total_sums_all_categories() {
        let map = expenses(&[
            ("rent", dec!(1500)),
            ("food", dec!(450.50)),
            ("transit", dec!(49.50)),
        ]);

        assert_eq!(total_monthly_expenses(&map), dec!(2000));
    }

    #[test]
    fn total_clamps_negative_entries() {
        let map = expenses(&[("rent", dec!(1500)), ("refund", dec!(-300))]);

        assert_eq!(total_monthly_expenses(&map), dec!(1500));
    }

    #[test]
    fn total_saturates_instead_of_overflowing() {
        let map = expenses(&[("rent", Decimal::MAX), ("food", dec!(1))]);

        assert_eq!(total_monthly_expenses(&map), Decimal::MAX);
    }

    #[test]
    fn total_of_no_expenses_is_zero() {
        assert_eq!(total_monthly_expenses(&BTreeMap::new()), dec!(0));
    }

    #[test]
    fn ratio_with_positive_disposable_income() {
        assert_eq!(
            expense_ratio(dec!(2000), dec!(4000)),
            ExpenseRatio::Finite(dec!(50))
        );
    }

    #[test]
    fn ratio_without_disposable_income_is_unbounded() {
        assert_eq!(expense_ratio(dec!(2000), dec!(0)), ExpenseRatio::Unbounded);
        assert_eq!(expense_ratio(dec!(2000), dec!(-100)), ExpenseRatio::Unbounded);
    }

    #[test]
    fn ratio_too_large_to_represent_is_unbounded() {
        assert_eq!(
            expense_ratio(dec!(1000000000000000000000000000), dec!(1)),
            ExpenseRatio::Unbounded
        );
        assert_eq!(expense_ratio(Decimal::MAX, dec!(0.5)), ExpenseRatio::Unbounded);
    }

    #[test]
    fn ratio_without_expenses_or_income_is_zero() {
        assert_eq!(
            expense_ratio(dec!(0), dec!(0)),
            ExpenseRatio::Finite(dec!(0))
        );
    }
}
