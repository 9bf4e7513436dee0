//! Tax and deduction calculations.
//!
//! Turns gross annual income into the list of deduction lines for a
//! [`TaxPolicy`]:
//!
//! | Line                 | Progressive model                               | Flat-rate model     |
//! |----------------------|-------------------------------------------------|---------------------|
//! | Federal tax          | brackets on gross − retirement                  | none                |
//! | Regional tax         | regional brackets on gross − retirement         | none                |
//! | Contributions        | `min(max(0, min(gross, ceiling) − exemption) × rate, cap)` | none     |
//! | Flat-rate lines      | none                                            | gross × rate        |
//! | Retirement           | gross × retirement %                            | gross × retirement %|
//!
//! Nothing here fails: negative income is treated as zero and an unknown
//! region simply has no regional line.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use budget_core::calculations::DeductionCalculator;
//! use budget_core::{JurisdictionConfig, TaxBracket, TaxPolicy, TaxSchedule};
//!
//! let federal = TaxSchedule::new(vec![
//!     TaxBracket { min_income: dec!(0), max_income: Some(dec!(57375)), rate: dec!(0.15) },
//!     TaxBracket { min_income: dec!(57375), max_income: None, rate: dec!(0.205) },
//! ])
//! .unwrap();
//! let policy = TaxPolicy::Progressive(JurisdictionConfig::new("CA", federal));
//!
//! let summary = DeductionCalculator::new(&policy).calculate(dec!(75000), "", dec!(0));
//!
//! assert_eq!(summary.total, dec!(12219.38));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{HUNDRED, clamp, non_negative, percent_of, round_half_up};
use crate::models::{
    ContributionRule, Deduction, DeductionKind, FlatRateDeduction, JurisdictionConfig,
    TaxPolicy, TaxSchedule, normalize_region,
};

/// Deduction lines plus their sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionSummary {
    pub deductions: Vec<Deduction>,
    pub total: Decimal,
}

impl DeductionSummary {
    /// Amount of the first line of the given kind, if any.
    pub fn amount_of(
        &self,
        kind: &DeductionKind,
    ) -> Option<Decimal> {
        self.deductions
            .iter()
            .find(|d| &d.kind == kind)
            .map(|d| d.amount)
    }
}

/// Marginal tax on `income` under `schedule`, unrounded.
///
/// Each bracket taxes `max(0, min(income, max) − min)` at its own rate.
pub fn progressive_tax(
    schedule: &TaxSchedule,
    income: Decimal,
) -> Decimal {
    if income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    schedule
        .brackets()
        .iter()
        .map(|bracket| {
            let upper = bracket.max_income.map_or(income, |max| income.min(max));
            non_negative(upper - bracket.min_income) * bracket.rate
        })
        .sum()
}

/// Flat-rate-with-cap contribution on `income`, unrounded.
pub fn capped_contribution(
    rule: &ContributionRule,
    income: Decimal,
) -> Decimal {
    let contributory =
        non_negative(non_negative(income).min(rule.max_earnings) - rule.basic_exemption);
    (contributory * rule.rate).min(rule.max_contribution)
}

/// Retirement contribution for a 0–100 percentage; out-of-range
/// percentages are clamped.
pub fn retirement_contribution(
    gross_income: Decimal,
    retirement_pct: Decimal,
) -> Decimal {
    percent_of(non_negative(gross_income), clamp(retirement_pct, Decimal::ZERO, HUNDRED))
}

/// Calculator for the deduction lines of a [`TaxPolicy`].
#[derive(Debug, Clone)]
pub struct DeductionCalculator<'a> {
    policy: &'a TaxPolicy,
}

impl<'a> DeductionCalculator<'a> {
    pub fn new(policy: &'a TaxPolicy) -> Self {
        Self { policy }
    }

    /// Computes every deduction line for the given income and region.
    pub fn calculate(
        &self,
        gross_income: Decimal,
        region: &str,
        retirement_pct: Decimal,
    ) -> DeductionSummary {
        let gross = non_negative(gross_income);
        let retirement = round_half_up(retirement_contribution(gross, retirement_pct));

        let mut lines = match self.policy {
            TaxPolicy::Progressive(config) => {
                self.progressive_lines(config, gross, retirement, region)
            }
            TaxPolicy::FlatRate { rates } => self.flat_rate_lines(rates, gross),
        };

        if retirement > Decimal::ZERO {
            lines.push((DeductionKind::Retirement, retirement));
        }

        let deductions: Vec<Deduction> = lines
            .into_iter()
            .map(|(kind, amount)| Deduction {
                kind,
                amount,
                percentage_of_gross: self.percentage_of_gross(amount, gross),
            })
            .collect();
        let total = deductions.iter().map(|d| d.amount).sum();

        debug!(%gross, %total, lines = deductions.len(), "computed deductions");

        DeductionSummary { deductions, total }
    }

    fn progressive_lines(
        &self,
        config: &JurisdictionConfig,
        gross: Decimal,
        retirement: Decimal,
        region: &str,
    ) -> Vec<(DeductionKind, Decimal)> {
        let taxable = non_negative(gross - retirement);
        let mut lines = vec![(
            DeductionKind::FederalTax,
            round_half_up(progressive_tax(&config.federal, taxable)),
        )];

        match config.region(region) {
            Some(schedule) => lines.push((
                DeductionKind::RegionalTax(normalize_region(region)),
                round_half_up(progressive_tax(schedule, taxable)),
            )),
            None if region.trim().is_empty() => {
                debug!(jurisdiction = %config.name, "no region given, federal tax only");
            }
            None => {
                warn!(jurisdiction = %config.name, region, "unknown region, skipping regional tax");
            }
        }

        lines.extend(config.contributions.iter().map(|rule| {
            (
                DeductionKind::Contribution(rule.kind.clone()),
                round_half_up(capped_contribution(rule, gross)),
            )
        }));

        lines
    }

    fn flat_rate_lines(
        &self,
        rates: &[FlatRateDeduction],
        gross: Decimal,
    ) -> Vec<(DeductionKind, Decimal)> {
        rates
            .iter()
            .map(|flat| {
                (
                    DeductionKind::FlatRate(flat.name.clone()),
                    round_half_up(gross * non_negative(flat.rate)),
                )
            })
            .collect()
    }

    fn percentage_of_gross(
        &self,
        amount: Decimal,
        gross: Decimal,
    ) -> Decimal {
        if gross.is_zero() {
            Decimal::ZERO
        } else {
            round_half_up(amount / gross * HUNDRED)
        }
    }
}
