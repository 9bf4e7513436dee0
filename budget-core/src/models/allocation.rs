use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::non_negative;

/// How the user wants the monthly surplus split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AllocationRequest {
    /// Only the policy's recommended split is produced.
    #[default]
    Recommended,
    /// Recommended split plus a split at the given 0–100 percentages of the
    /// allocatable surplus.
    Custom {
        savings_pct: Decimal,
        investments_pct: Decimal,
    },
}

/// Monthly split of the surplus left after expenses.
///
/// `monthly_savings + monthly_investments + monthly_cashflow` always equals
/// monthly disposable income minus expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub monthly_savings: Decimal,
    pub monthly_investments: Decimal,
    /// Residual left liquid. Negative only when expenses exceed income.
    pub monthly_cashflow: Decimal,
    /// False when the surplus could not cover the cash buffer target.
    pub adequate_cashflow: bool,
    pub cash_buffer_target: Decimal,
}

impl Allocation {
    pub fn total(&self) -> Decimal {
        self.monthly_savings + self.monthly_investments + self.monthly_cashflow
    }

    /// Cashflow above the buffer target that nothing else claimed.
    pub fn unallocated(&self) -> Decimal {
        non_negative(self.monthly_cashflow - self.cash_buffer_target)
    }

    /// True when cashflow is negative, i.e. expenses exceed income.
    pub fn is_deficit(&self) -> bool {
        self.monthly_cashflow < Decimal::ZERO
    }
}
