//! Compound-growth projections for periodic contributions.
//!
//! With `r` the rate per compounding period and `n` the number of periods:
//!
//! | Quantity              | Formula                                          |
//! |-----------------------|--------------------------------------------------|
//! | Growth factor         | `(1 + r)^n`                                      |
//! | Annuity (end timing)  | `contribution × ((1 + r)^n − 1) / r`             |
//! | Annuity (start timing)| end-timing annuity × `(1 + r)`                   |
//! | Zero rate             | `contribution × n`                               |
//! | Future value          | `starting × (1 + r)^n + annuity`                 |
//!
//! The inverse form solves the same equation for the contribution needed to
//! reach a target. Values are left unrounded so the two forms round-trip.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use budget_core::calculations::projection::{
//!     CompoundingFrequency, ContributionTiming, GrowthProjector, ProjectionInput,
//! };
//!
//! let projection = GrowthProjector::project(&ProjectionInput {
//!     starting_amount: dec!(1000),
//!     contribution: dec!(100),
//!     annual_rate_pct: dec!(0),
//!     years: 2,
//!     frequency: CompoundingFrequency::Monthly,
//!     timing: ContributionTiming::EndOfPeriod,
//! })
//! .unwrap();
//!
//! assert_eq!(projection.future_value, dec!(3400));
//! ```

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::calculations::common::{non_negative, pct_to_fraction};

/// Errors that can occur during growth projections.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectionError {
    /// The projection produced a value outside the representable range.
    #[error("projection over {periods} periods overflows")]
    Overflow { periods: u64 },
}

/// How many times per year interest compounds and contributions are made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundingFrequency {
    #[serde(alias = "yearly")]
    Annually,
    #[serde(alias = "semi-annually", alias = "semiannually")]
    SemiAnnually,
    Quarterly,
    #[default]
    Monthly,
    #[serde(alias = "bi-weekly", alias = "biweekly")]
    BiWeekly,
    Weekly,
    Daily,
}

impl CompoundingFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            Self::Annually => 1,
            Self::SemiAnnually => 2,
            Self::Quarterly => 4,
            Self::Monthly => 12,
            Self::BiWeekly => 26,
            Self::Weekly => 52,
            Self::Daily => 365,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Annually => "annually",
            Self::SemiAnnually => "semi-annually",
            Self::Quarterly => "quarterly",
            Self::Monthly => "monthly",
            Self::BiWeekly => "bi-weekly",
            Self::Weekly => "weekly",
            Self::Daily => "daily",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annually" | "yearly" | "1" => Some(Self::Annually),
            "semi-annually" | "semiannually" | "2" => Some(Self::SemiAnnually),
            "quarterly" | "4" => Some(Self::Quarterly),
            "monthly" | "12" => Some(Self::Monthly),
            "bi-weekly" | "biweekly" | "26" => Some(Self::BiWeekly),
            "weekly" | "52" => Some(Self::Weekly),
            "daily" | "365" => Some(Self::Daily),
            _ => None,
        }
    }
}

impl fmt::Display for CompoundingFrequency {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether each contribution lands at the start or the end of its period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionTiming {
    #[serde(alias = "start", alias = "start-of-period", alias = "begin")]
    StartOfPeriod,
    #[default]
    #[serde(alias = "end", alias = "end-of-period")]
    EndOfPeriod,
}

impl ContributionTiming {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" | "start-of-period" | "begin" => Some(Self::StartOfPeriod),
            "end" | "end-of-period" => Some(Self::EndOfPeriod),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub starting_amount: Decimal,
    /// Amount contributed every period.
    pub contribution: Decimal,
    /// Annual rate on the 0–100 scale.
    pub annual_rate_pct: Decimal,
    pub years: u32,
    pub frequency: CompoundingFrequency,
    pub timing: ContributionTiming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub future_value: Decimal,
    /// Starting amount plus every periodic contribution.
    pub total_contributions: Decimal,
    /// Growth above contributions, floored at zero.
    pub interest_earned: Decimal,
    pub periods: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredContributionInput {
    pub target_amount: Decimal,
    pub starting_amount: Decimal,
    pub annual_rate_pct: Decimal,
    pub years: u32,
    pub frequency: CompoundingFrequency,
    pub timing: ContributionTiming,
}

/// Balance at the end of one projection year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyBalance {
    pub year: u32,
    pub balance: Decimal,
    pub contributions: Decimal,
    pub interest: Decimal,
}

/// Future-value and required-contribution calculator.
pub struct GrowthProjector;

impl GrowthProjector {
    /// Projects the value of `starting_amount` plus periodic contributions.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::Overflow`] when the growth factor, the
    /// annuity factor or the resulting value cannot be represented.
    pub fn project(input: &ProjectionInput) -> Result<Projection, ProjectionError> {
        let terms = Terms::new(input.annual_rate_pct, input.years, input.frequency)?;
        let starting_amount = non_negative(input.starting_amount);
        let contribution = non_negative(input.contribution);

        let grown_start = starting_amount
            .checked_mul(terms.growth)
            .ok_or_else(|| terms.overflow())?;
        let annuity = terms
            .annuity_factor(input.timing)
            .and_then(|factor| contribution.checked_mul(factor))
            .ok_or_else(|| terms.overflow())?;
        let future_value = grown_start.checked_add(annuity).ok_or_else(|| terms.overflow())?;

        let total_contributions = contribution
            .checked_mul(terms.periods_decimal())
            .and_then(|paid| paid.checked_add(starting_amount))
            .ok_or_else(|| terms.overflow())?;
        let interest_earned = non_negative(future_value - total_contributions);

        Ok(Projection {
            future_value,
            total_contributions,
            interest_earned,
            periods: terms.periods,
        })
    }

    /// Per-period contribution needed to grow `starting_amount` to
    /// `target_amount`. Zero when the starting amount alone gets there or
    /// when there are no periods to contribute in.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::Overflow`] when the growth or annuity factor
    /// cannot be represented.
    pub fn required_contribution(
        input: &RequiredContributionInput
    ) -> Result<Decimal, ProjectionError> {
        let terms = Terms::new(input.annual_rate_pct, input.years, input.frequency)?;
        if terms.periods == 0 {
            return Ok(Decimal::ZERO);
        }

        let grown_start = non_negative(input.starting_amount)
            .checked_mul(terms.growth)
            .ok_or_else(|| terms.overflow())?;
        let needed = input
            .target_amount
            .checked_sub(grown_start)
            .ok_or_else(|| terms.overflow())?;
        if needed <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }

        let factor = terms
            .annuity_factor(input.timing)
            .ok_or_else(|| terms.overflow())?;
        needed
            .checked_div(factor)
            .map(non_negative)
            .ok_or_else(|| terms.overflow())
    }

    /// Year-by-year balances for charting a projection.
    pub fn project_schedule(
        input: &ProjectionInput
    ) -> Result<Vec<YearlyBalance>, ProjectionError> {
        (1..=input.years)
            .map(|year| {
                let projection = Self::project(&ProjectionInput {
                    years: year,
                    ..input.clone()
                })?;
                Ok(YearlyBalance {
                    year,
                    balance: projection.future_value,
                    contributions: projection.total_contributions,
                    interest: projection.interest_earned,
                })
            })
            .collect()
    }
}

/// Per-period rate, period count and growth factor shared by both forms.
struct Terms {
    rate: Decimal,
    periods: u64,
    growth: Decimal,
}

impl Terms {
    fn new(
        annual_rate_pct: Decimal,
        years: u32,
        frequency: CompoundingFrequency,
    ) -> Result<Self, ProjectionError> {
        let annual_rate_pct = if annual_rate_pct < Decimal::ZERO {
            warn!(%annual_rate_pct, "negative growth rate treated as zero");
            Decimal::ZERO
        } else {
            annual_rate_pct
        };

        let per_year = frequency.periods_per_year();
        let periods = u64::from(years) * u64::from(per_year);
        let rate = pct_to_fraction(annual_rate_pct) / Decimal::from(per_year);
        let growth = compound(Decimal::ONE + rate, periods)
            .ok_or(ProjectionError::Overflow { periods })?;

        Ok(Self {
            rate,
            periods,
            growth,
        })
    }

    fn periods_decimal(&self) -> Decimal {
        Decimal::from(self.periods)
    }

    /// Multiplier turning one periodic contribution into its future value;
    /// `None` when it cannot be represented.
    fn annuity_factor(
        &self,
        timing: ContributionTiming,
    ) -> Option<Decimal> {
        if self.rate.is_zero() {
            return Some(self.periods_decimal());
        }

        let end_factor = self
            .growth
            .checked_sub(Decimal::ONE)?
            .checked_div(self.rate)?;
        match timing {
            ContributionTiming::EndOfPeriod => Some(end_factor),
            ContributionTiming::StartOfPeriod => {
                end_factor.checked_mul(Decimal::ONE.checked_add(self.rate)?)
            }
        }
    }

    fn overflow(&self) -> ProjectionError {
        ProjectionError::Overflow {
            periods: self.periods,
        }
    }
}

/// `base^exponent` by repeated squaring; `None` on overflow.
fn compound(
    base: Decimal,
    exponent: u64,
) -> Option<Decimal> {
    let mut result = Decimal::ONE;
    let mut square = base;
    let mut remaining = exponent;

    while remaining > 0 {
        if remaining & 1 == 1 {
            result = result.checked_mul(square)?;
        }
        remaining >>= 1;
        if remaining > 0 {
            square = square.checked_mul(square)?;
        }
    }

    Some(result)
}
