//! Disposable income derivation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{MONTHS_PER_YEAR, round_half_up};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisposableIncome {
    pub annual: Decimal,
    /// `annual / 12`, rounded to cents.
    pub monthly: Decimal,
}

impl DisposableIncome {
    /// Gross income minus deductions. Negative when deductions exceed
    /// income; callers treat zero or less as "no budget possible".
    pub fn derive(
        gross_income: Decimal,
        total_deductions: Decimal,
    ) -> Self {
        let annual = round_half_up(gross_income - total_deductions);
        Self {
            annual,
            monthly: round_half_up(annual / MONTHS_PER_YEAR),
        }
    }
}
