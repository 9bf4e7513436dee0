//! The operations behind each `budget` subcommand.

use std::path::Path;

use anyhow::{Context, Result};
use budget_core::calculations::projection::{
    CompoundingFrequency, ContributionTiming, GrowthProjector, Projection, ProjectionInput,
    RequiredContributionInput, YearlyBalance,
};
use budget_core::signals::MONTHLY_INVESTMENT;
use budget_core::{
    BudgetEngine, BudgetResult, JurisdictionConfig, SignalStore, publish_investment_hints,
};
use budget_data::{JurisdictionLoader, default_jurisdiction};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::scenario::{ProjectionSettings, Scenario};

/// Loads the jurisdiction table from `brackets` (and optionally
/// `contributions`), or the bundled table when no files are given.
pub fn load_jurisdiction(
    brackets: Option<&Path>,
    contributions: Option<&Path>,
) -> Result<JurisdictionConfig> {
    match brackets {
        Some(path) => {
            debug!(brackets = %path.display(), "loading jurisdiction from files");
            JurisdictionLoader::load_from_files(path, contributions)
                .with_context(|| format!("Failed to load jurisdiction from {}", path.display()))
        }
        None => {
            if contributions.is_some() {
                anyhow::bail!("--contributions requires --brackets");
            }
            default_jurisdiction().context("Bundled jurisdiction table is invalid")
        }
    }
}

/// Growth settings for projecting the monthly investment hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintProjection {
    pub years: u32,
    pub annual_rate_pct: Decimal,
    pub starting_amount: Decimal,
    pub frequency: CompoundingFrequency,
    pub timing: ContributionTiming,
}

impl From<&ProjectionSettings> for HintProjection {
    fn from(settings: &ProjectionSettings) -> Self {
        Self {
            years: settings.years,
            annual_rate_pct: settings.rate_pct.to_decimal("projection.rate_pct"),
            starting_amount: settings.starting_amount.to_decimal("projection.starting_amount"),
            frequency: settings.frequency,
            timing: settings.timing,
        }
    }
}

/// Everything `budget compute` reports.
#[derive(Debug)]
pub struct ComputeOutcome {
    pub result: BudgetResult,
    pub signals: SignalStore,
    pub projection: Option<ProjectedGrowth>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedGrowth {
    pub projection: Projection,
    pub schedule: Vec<YearlyBalance>,
}

/// Runs the budget engine on a scenario, publishes the investment hints and,
/// when `growth` is set, projects the monthly investment hint forward.
pub fn compute(
    scenario: &Scenario,
    jurisdiction: impl FnOnce() -> Result<JurisdictionConfig>,
    growth: Option<HintProjection>,
) -> Result<ComputeOutcome> {
    let tax_policy = scenario.tax_policy(jurisdiction)?;
    let engine = BudgetEngine::new(tax_policy, scenario.policy.to_policy());
    let input = scenario.budget_input();

    let result = engine.compute(&input);
    info!(
        zone = %result.zone,
        monthly_disposable = %result.monthly_disposable,
        "computed budget"
    );

    let mut signals = SignalStore::new();
    publish_investment_hints(&result, &mut signals);

    let projection = match growth {
        Some(growth) => {
            let contribution = signals.get(MONTHLY_INVESTMENT).unwrap_or(Decimal::ZERO);
            Some(project(&ProjectionInput {
                starting_amount: growth.starting_amount,
                contribution,
                annual_rate_pct: growth.annual_rate_pct,
                years: growth.years,
                frequency: growth.frequency,
                timing: growth.timing,
            })?)
        }
        None => None,
    };

    Ok(ComputeOutcome {
        result,
        signals,
        projection,
    })
}

/// Future value of a contribution plan plus its yearly schedule.
pub fn project(input: &ProjectionInput) -> Result<ProjectedGrowth> {
    let projection = GrowthProjector::project(input).context("Projection failed")?;
    let schedule = GrowthProjector::project_schedule(input).context("Projection failed")?;
    Ok(ProjectedGrowth {
        projection,
        schedule,
    })
}

/// Per-period contribution needed to reach a target.
pub fn required(input: &RequiredContributionInput) -> Result<Decimal> {
    GrowthProjector::required_contribution(input).context("Required contribution failed")
}

#[cfg(test)]
mod tests {
    use budget_core::signals::ANNUAL_INVESTMENT;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const SCENARIO: &str = r#"
gross_annual_income = 75000
region = "ON"

[expenses]
rent = 1500
groceries = 500

[allocation]
savings_pct = 15
investments_pct = 20
"#;

    fn bundled() -> Result<JurisdictionConfig> {
        load_jurisdiction(None, None)
    }

    #[test]
    fn load_jurisdiction_defaults_to_bundled_table() {
        let config = bundled().unwrap();

        assert_eq!(config.name, "CA-2025");
    }

    #[test]
    fn load_jurisdiction_rejects_contributions_without_brackets() {
        let result = load_jurisdiction(None, Some(Path::new("contributions.csv")));

        assert!(result.is_err());
    }

    #[test]
    fn load_jurisdiction_reports_missing_file() {
        let err = load_jurisdiction(Some(Path::new("/nonexistent/brackets.csv")), None)
            .unwrap_err();

        assert!(format!("{err:#}").contains("/nonexistent/brackets.csv"));
    }

    #[test]
    fn compute_publishes_custom_investment_hints() {
        let scenario = Scenario::from_toml_str(SCENARIO).unwrap();

        let outcome = compute(&scenario, bundled, None).unwrap();

        assert_eq!(outcome.result.monthly_disposable, dec!(4414.57));
        assert_eq!(
            outcome.signals.get(MONTHLY_INVESTMENT),
            outcome.result.custom.as_ref().map(|c| c.monthly_investments)
        );
        assert_eq!(
            outcome.signals.get(ANNUAL_INVESTMENT),
            outcome.signals.get(MONTHLY_INVESTMENT).map(|m| m * dec!(12))
        );
        assert!(outcome.projection.is_none());
    }

    #[test]
    fn compute_projects_the_monthly_hint() {
        let scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        let growth = HintProjection {
            years: 2,
            annual_rate_pct: Decimal::ZERO,
            starting_amount: Decimal::ZERO,
            frequency: CompoundingFrequency::Monthly,
            timing: ContributionTiming::EndOfPeriod,
        };

        let outcome = compute(&scenario, bundled, Some(growth)).unwrap();
        let growth = outcome.projection.unwrap();
        let monthly = outcome.signals.get(MONTHLY_INVESTMENT).unwrap();

        assert_eq!(growth.projection.periods, 24);
        assert_eq!(growth.projection.future_value, monthly * dec!(24));
        assert_eq!(growth.schedule.len(), 2);
    }

    #[test]
    fn project_and_required_agree() {
        let input = ProjectionInput {
            starting_amount: dec!(1000),
            contribution: dec!(200),
            annual_rate_pct: dec!(6),
            years: 10,
            frequency: CompoundingFrequency::Monthly,
            timing: ContributionTiming::EndOfPeriod,
        };
        let growth = project(&input).unwrap();

        let contribution = required(&RequiredContributionInput {
            target_amount: growth.projection.future_value,
            starting_amount: dec!(1000),
            annual_rate_pct: dec!(6),
            years: 10,
            frequency: CompoundingFrequency::Monthly,
            timing: ContributionTiming::EndOfPeriod,
        })
        .unwrap();

        assert!((contribution - dec!(200)).abs() < dec!(0.000001));
    }
}
