//! Scenario files: one household budget described in TOML.
//!
//! ```toml
//! gross_annual_income = "75,000"
//! region = "ON"
//! retirement_pct = 5
//!
//! [expenses]
//! rent = 1500
//! groceries = "500"
//!
//! [allocation]
//! savings_pct = 15
//! investments_pct = 20
//! ```
//!
//! Numbers may be written as TOML integers, floats or strings. Anything that
//! is not a number becomes 0 and logs a warning, the same way an empty form
//! field would.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use budget_core::calculations::common::pct_to_fraction;
use budget_core::calculations::projection::{CompoundingFrequency, ContributionTiming};
use budget_core::{
    AllocationPolicy, AllocationRequest, BudgetInput, FlatRateDeduction, JurisdictionConfig,
    TaxPolicy, ZoneThresholds,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::utils::coerce_decimal;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("cannot read scenario {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scenario: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A number as the user typed it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Default for LooseNumber {
    fn default() -> Self {
        Self::Integer(0)
    }
}

impl LooseNumber {
    /// Converts to a [`Decimal`], falling back to 0 for non-numbers.
    pub fn to_decimal(
        &self,
        field: &str,
    ) -> Decimal {
        match self {
            Self::Integer(value) => Decimal::from(*value),
            Self::Float(value) => Decimal::try_from(*value).unwrap_or_else(|_| {
                warn!(field, value, "not a finite number; using 0");
                Decimal::ZERO
            }),
            Self::Text(text) => coerce_decimal(field, text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxModel {
    #[default]
    Progressive,
    Flat,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomSplit {
    #[serde(default)]
    pub savings_pct: LooseNumber,
    #[serde(default)]
    pub investments_pct: LooseNumber,
}

/// A named flat deduction, as a 0–100 percentage of gross income.
#[derive(Debug, Clone, Deserialize)]
pub struct FlatRateEntry {
    pub name: String,
    #[serde(default)]
    pub pct: LooseNumber,
}

/// Optional `[policy.zones]` table; missing values keep the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZoneSettings {
    pub green_max: Option<LooseNumber>,
    pub moderate_max: Option<LooseNumber>,
}

/// Optional `[policy]` table overriding single [`AllocationPolicy`] fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicySettings {
    pub cash_buffer_pct: Option<LooseNumber>,
    pub recommended_savings_pct: Option<LooseNumber>,
    pub recommended_investments_pct: Option<LooseNumber>,
    pub max_savings_pct: Option<LooseNumber>,
    pub max_investments_pct: Option<LooseNumber>,
    #[serde(default)]
    pub zones: ZoneSettings,
}

fn or_default(
    value: &Option<LooseNumber>,
    field: &str,
    default: Decimal,
) -> Decimal {
    value.as_ref().map_or(default, |number| number.to_decimal(field))
}

impl PolicySettings {
    pub fn to_policy(&self) -> AllocationPolicy {
        let defaults = AllocationPolicy::default();
        AllocationPolicy {
            cash_buffer_pct: or_default(
                &self.cash_buffer_pct,
                "policy.cash_buffer_pct",
                defaults.cash_buffer_pct,
            ),
            zones: ZoneThresholds {
                green_max: or_default(
                    &self.zones.green_max,
                    "policy.zones.green_max",
                    defaults.zones.green_max,
                ),
                moderate_max: or_default(
                    &self.zones.moderate_max,
                    "policy.zones.moderate_max",
                    defaults.zones.moderate_max,
                ),
            },
            recommended_savings_pct: or_default(
                &self.recommended_savings_pct,
                "policy.recommended_savings_pct",
                defaults.recommended_savings_pct,
            ),
            recommended_investments_pct: or_default(
                &self.recommended_investments_pct,
                "policy.recommended_investments_pct",
                defaults.recommended_investments_pct,
            ),
            max_savings_pct: or_default(
                &self.max_savings_pct,
                "policy.max_savings_pct",
                defaults.max_savings_pct,
            ),
            max_investments_pct: or_default(
                &self.max_investments_pct,
                "policy.max_investments_pct",
                defaults.max_investments_pct,
            ),
        }
    }
}

/// Optional `[projection]` table: grow the monthly investment hint.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectionSettings {
    pub years: u32,
    #[serde(default)]
    pub rate_pct: LooseNumber,
    #[serde(default)]
    pub starting_amount: LooseNumber,
    #[serde(default)]
    pub frequency: CompoundingFrequency,
    #[serde(default)]
    pub timing: ContributionTiming,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub gross_annual_income: LooseNumber,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub retirement_pct: LooseNumber,
    #[serde(default)]
    pub expenses: BTreeMap<String, LooseNumber>,
    pub allocation: Option<CustomSplit>,
    #[serde(default)]
    pub policy: PolicySettings,
    #[serde(default)]
    pub tax_model: TaxModel,
    #[serde(default)]
    pub flat_rates: Vec<FlatRateEntry>,
    pub projection: Option<ProjectionSettings>,
}

impl Scenario {
    pub fn from_toml_str(text: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// The engine input this scenario describes.
    pub fn budget_input(&self) -> BudgetInput {
        let allocation = match &self.allocation {
            Some(split) => AllocationRequest::Custom {
                savings_pct: split.savings_pct.to_decimal("allocation.savings_pct"),
                investments_pct: split.investments_pct.to_decimal("allocation.investments_pct"),
            },
            None => AllocationRequest::Recommended,
        };

        let mut input = BudgetInput::new(
            self.gross_annual_income.to_decimal("gross_annual_income"),
            self.region.clone(),
        )
        .with_retirement_pct(self.retirement_pct.to_decimal("retirement_pct"))
        .with_allocation(allocation);

        for (category, amount) in &self.expenses {
            let field = format!("expenses.{category}");
            input = input.with_expense(category.clone(), amount.to_decimal(&field));
        }
        input
    }

    /// The tax policy this scenario selects. `jurisdiction` is only invoked
    /// for the progressive model.
    pub fn tax_policy<E>(
        &self,
        jurisdiction: impl FnOnce() -> Result<JurisdictionConfig, E>,
    ) -> Result<TaxPolicy, E> {
        match self.tax_model {
            TaxModel::Progressive => Ok(TaxPolicy::Progressive(jurisdiction()?)),
            TaxModel::Flat => Ok(TaxPolicy::FlatRate {
                rates: self
                    .flat_rates
                    .iter()
                    .map(|entry| {
                        let field = format!("flat_rates.{}", entry.name);
                        FlatRateDeduction::new(
                            entry.name.clone(),
                            pct_to_fraction(entry.pct.to_decimal(&field)),
                        )
                    })
                    .collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const SAMPLE: &str = r#"
gross_annual_income = "75,000"
region = "on"
retirement_pct = 5

[expenses]
rent = 1500
groceries = "500"
transport = 0.5

[allocation]
savings_pct = "15"
investments_pct = 20
"#;

    #[test]
    fn loose_numbers_accept_strings_integers_and_floats() {
        let scenario = Scenario::from_toml_str(SAMPLE).unwrap();
        let input = scenario.budget_input();

        assert_eq!(input.gross_annual_income, dec!(75000));
        assert_eq!(input.retirement_pct, dec!(5));
        assert_eq!(input.monthly_expenses["rent"], dec!(1500));
        assert_eq!(input.monthly_expenses["groceries"], dec!(500));
        assert_eq!(input.monthly_expenses["transport"], dec!(0.5));
        assert_eq!(
            input.allocation,
            AllocationRequest::Custom {
                savings_pct: dec!(15),
                investments_pct: dec!(20),
            }
        );
    }

    #[test]
    fn non_numeric_values_become_zero() {
        let scenario = Scenario::from_toml_str(
            r#"
gross_annual_income = "a lot"
region = "ON"
[expenses]
rent = "TBD"
"#,
        )
        .unwrap();
        let input = scenario.budget_input();

        assert_eq!(input.gross_annual_income, Decimal::ZERO);
        assert_eq!(input.monthly_expenses["rent"], Decimal::ZERO);
    }

    #[test]
    fn missing_allocation_means_recommended_only() {
        let scenario = Scenario::from_toml_str("gross_annual_income = 50000").unwrap();

        assert_eq!(scenario.budget_input().allocation, AllocationRequest::Recommended);
        assert_eq!(scenario.budget_input().region, "");
    }

    #[test]
    fn policy_table_overrides_defaults() {
        let scenario = Scenario::from_toml_str(
            r#"
[policy]
cash_buffer_pct = "5"

[policy.zones]
green_max = "60"
"#,
        )
        .unwrap();

        let policy = scenario.policy.to_policy();

        assert_eq!(policy.cash_buffer_pct, dec!(5));
        assert_eq!(policy.zones.green_max, dec!(60));
        assert_eq!(policy.zones.moderate_max, dec!(80));
        assert_eq!(policy.recommended_savings_pct, dec!(40));
    }

    #[test]
    fn non_numeric_policy_values_become_zero() {
        let scenario = Scenario::from_toml_str(
            r#"
gross_annual_income = 50000

[policy]
cash_buffer_pct = "ten"
max_savings_pct = 50.5
"#,
        )
        .unwrap();
        let policy = scenario.policy.to_policy();

        assert_eq!(policy.cash_buffer_pct, Decimal::ZERO);
        assert_eq!(policy.max_savings_pct, dec!(50.5));
        assert_eq!(policy.max_investments_pct, dec!(100));
    }

    #[test]
    fn projection_accepts_cli_frequency_spellings() {
        let scenario = Scenario::from_toml_str(
            r#"
[projection]
years = 5
frequency = "bi-weekly"
timing = "start"
"#,
        )
        .unwrap();
        let projection = scenario.projection.unwrap();

        assert_eq!(projection.frequency, CompoundingFrequency::BiWeekly);
        assert_eq!(projection.timing, ContributionTiming::StartOfPeriod);

        let scenario =
            Scenario::from_toml_str("[projection]\nyears = 5\nfrequency = \"semi-annually\"")
                .unwrap();
        assert_eq!(
            scenario.projection.unwrap().frequency,
            CompoundingFrequency::SemiAnnually
        );
    }

    #[test]
    fn flat_model_converts_percentages_to_fractions() {
        let scenario = Scenario::from_toml_str(
            r#"
tax_model = "flat"

[[flat_rates]]
name = "income tax"
pct = 20

[[flat_rates]]
name = "payroll"
pct = "7.5"
"#,
        )
        .unwrap();

        let policy = scenario
            .tax_policy(|| -> Result<JurisdictionConfig, ScenarioError> {
                panic!("flat model must not load a jurisdiction")
            })
            .unwrap();

        assert_eq!(
            policy,
            TaxPolicy::FlatRate {
                rates: vec![
                    FlatRateDeduction::new("income tax", dec!(0.2)),
                    FlatRateDeduction::new("payroll", dec!(0.075)),
                ],
            }
        );
    }

    #[test]
    fn projection_table_uses_defaults() {
        let scenario = Scenario::from_toml_str(
            r#"
[projection]
years = 10
rate_pct = 6
"#,
        )
        .unwrap();
        let projection = scenario.projection.unwrap();

        assert_eq!(projection.years, 10);
        assert_eq!(projection.frequency, CompoundingFrequency::Monthly);
        assert_eq!(projection.timing, ContributionTiming::EndOfPeriod);
        assert_eq!(projection.starting_amount, LooseNumber::Integer(0));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Scenario::from_toml_str("gross_annual_income = [").unwrap_err();

        assert!(matches!(err, ScenarioError::Parse(_)));
    }
}
