use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Allocation, AllocationRequest, Deduction};

/// Snapshot of everything the user entered. Immutable; every edit builds a
/// new input and a new [`BudgetResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetInput {
    pub gross_annual_income: Decimal,
    pub region: String,
    /// Share of gross income contributed to retirement, 0–100.
    #[serde(default)]
    pub retirement_pct: Decimal,
    /// Monthly amount per expense category.
    #[serde(default)]
    pub monthly_expenses: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub allocation: AllocationRequest,
}

impl BudgetInput {
    pub fn new(
        gross_annual_income: Decimal,
        region: impl Into<String>,
    ) -> Self {
        Self {
            gross_annual_income,
            region: region.into(),
            retirement_pct: Decimal::ZERO,
            monthly_expenses: BTreeMap::new(),
            allocation: AllocationRequest::Recommended,
        }
    }

    pub fn with_retirement_pct(
        mut self,
        pct: Decimal,
    ) -> Self {
        self.retirement_pct = pct;
        self
    }

    pub fn with_expense(
        mut self,
        category: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        self.monthly_expenses.insert(category.into(), amount);
        self
    }

    pub fn with_allocation(
        mut self,
        allocation: AllocationRequest,
    ) -> Self {
        self.allocation = allocation;
        self
    }
}

/// Monthly expenses as a share of monthly disposable income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseRatio {
    /// Percentage on the 0–100 scale (may exceed 100).
    Finite(Decimal),
    /// Expenses exist but there is no disposable income to measure them against.
    Unbounded,
}

impl fmt::Display for ExpenseRatio {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Finite(pct) => write!(f, "{}%", pct.round_dp(2)),
            Self::Unbounded => write!(f, "∞"),
        }
    }
}

/// Ordered budget health bands. Later variants are worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetZone {
    /// Saving and investing both permitted.
    Green,
    /// Saving permitted, investing blocked.
    Moderate,
    /// Neither saving nor investing permitted.
    Red,
}

impl BudgetZone {
    pub fn allows_savings(self) -> bool {
        matches!(self, Self::Green | Self::Moderate)
    }

    pub fn allows_investing(self) -> bool {
        matches!(self, Self::Green)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Moderate => "moderate",
            Self::Red => "red",
        }
    }
}

impl fmt::Display for BudgetZone {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetResult {
    pub deductions: Vec<Deduction>,
    pub total_deductions: Decimal,
    pub annual_disposable: Decimal,
    pub monthly_disposable: Decimal,
    pub total_monthly_expenses: Decimal,
    pub expense_ratio: ExpenseRatio,
    pub zone: BudgetZone,
    pub recommended: Allocation,
    /// Present only when the input asked for a custom split.
    pub custom: Option<Allocation>,
}

impl BudgetResult {
    /// Disposable income minus expenses; what the allocations split up.
    pub fn monthly_surplus(&self) -> Decimal {
        self.monthly_disposable.saturating_sub(self.total_monthly_expenses)
    }

    /// The allocation the user is following: custom when requested.
    pub fn active_allocation(&self) -> &Allocation {
        self.custom.as_ref().unwrap_or(&self.recommended)
    }

    /// Disposable income of zero or less leaves nothing to budget.
    pub fn has_budget(&self) -> bool {
        self.monthly_disposable > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn zones_are_ordered_by_severity() {
        assert!(BudgetZone::Green < BudgetZone::Moderate);
        assert!(BudgetZone::Moderate < BudgetZone::Red);
    }

    #[test]
    fn zone_permissions() {
        assert!(BudgetZone::Green.allows_investing());
        assert!(BudgetZone::Moderate.allows_savings());
        assert!(!BudgetZone::Moderate.allows_investing());
        assert!(!BudgetZone::Red.allows_savings());
    }

    #[test]
    fn expense_ratio_display() {
        assert_eq!(ExpenseRatio::Finite(dec!(38.2277)).to_string(), "38.23%");
        assert_eq!(ExpenseRatio::Unbounded.to_string(), "∞");
    }

    #[test]
    fn builder_collects_expenses() {
        let input = BudgetInput::new(dec!(50000), "ON")
            .with_expense("rent", dec!(1200))
            .with_expense("food", dec!(400));

        assert_eq!(input.monthly_expenses.len(), 2);
        assert_eq!(input.monthly_expenses["rent"], dec!(1200));
    }
}
