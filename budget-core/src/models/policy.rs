use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::JurisdictionConfig;

/// Expense-ratio cut points (0–100 scale) separating the budget zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneThresholds {
    /// Ratios at or below this are green.
    pub green_max: Decimal,
    /// Ratios above `green_max` and at or below this are moderate.
    pub moderate_max: Decimal,
}

impl Default for ZoneThresholds {
    fn default() -> Self {
        Self {
            green_max: Decimal::from(70),
            moderate_max: Decimal::from(80),
        }
    }
}

/// Parameters of the fund allocator. All percentages are on the 0–100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationPolicy {
    /// Share of monthly disposable income held back as a cash buffer.
    pub cash_buffer_pct: Decimal,
    pub zones: ZoneThresholds,
    /// Share of the allocatable surplus recommended for savings.
    pub recommended_savings_pct: Decimal,
    /// Share of the allocatable surplus recommended for investments.
    pub recommended_investments_pct: Decimal,
    /// Ceiling applied to custom savings requests.
    pub max_savings_pct: Decimal,
    /// Ceiling applied to custom investment requests.
    pub max_investments_pct: Decimal,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            cash_buffer_pct: Decimal::TEN,
            zones: ZoneThresholds::default(),
            recommended_savings_pct: Decimal::from(40),
            recommended_investments_pct: Decimal::from(60),
            max_savings_pct: Decimal::ONE_HUNDRED,
            max_investments_pct: Decimal::ONE_HUNDRED,
        }
    }
}

/// A named percentage-of-gross deduction used by the flat-rate model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRateDeduction {
    pub name: String,
    /// Rate as a fraction of gross income.
    pub rate: Decimal,
}

impl FlatRateDeduction {
    pub fn new(
        name: impl Into<String>,
        rate: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            rate,
        }
    }
}

/// How deductions are derived from gross income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum TaxPolicy {
    /// Federal and regional progressive brackets on income net of retirement
    /// contributions, plus payroll contributions on gross income.
    Progressive(JurisdictionConfig),
    /// Fixed percentages of gross income; retirement does not reduce the base.
    FlatRate { rates: Vec<FlatRateDeduction> },
}
