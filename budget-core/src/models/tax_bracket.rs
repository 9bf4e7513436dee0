use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One slice of a progressive tax schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    /// `None` marks the open-ended top bracket.
    pub max_income: Option<Decimal>,
    /// Marginal rate as a fraction (`0.15` = 15%).
    pub rate: Decimal,
}

/// Reasons a list of brackets cannot form a [`TaxSchedule`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxScheduleError {
    #[error("tax schedule has no brackets")]
    Empty,

    #[error("first bracket must start at 0, starts at {0}")]
    DoesNotStartAtZero(Decimal),

    #[error("bracket starting at {min} is not contiguous with previous maximum {previous_max}")]
    Gap { previous_max: Decimal, min: Decimal },

    #[error("bracket starting at {0} has a maximum not above its minimum")]
    EmptyRange(Decimal),

    #[error("only the last bracket may be unbounded (bracket starting at {0})")]
    UnboundedBeforeEnd(Decimal),

    #[error("last bracket must be unbounded, ends at {0}")]
    BoundedTop(Decimal),

    #[error("bracket starting at {min} has rate {rate} outside [0, 1]")]
    InvalidRate { min: Decimal, rate: Decimal },
}

/// Ordered, contiguous brackets covering `[0, ∞)`.
///
/// Construction validates the coverage invariant, so calculators can walk
/// the brackets without checking for gaps or overlaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxSchedule {
    brackets: Vec<TaxBracket>,
}

impl TaxSchedule {
    /// Builds a schedule, sorting brackets by `min_income` first.
    pub fn new(mut brackets: Vec<TaxBracket>) -> Result<Self, TaxScheduleError> {
        brackets.sort_by(|a, b| a.min_income.cmp(&b.min_income));

        let first = brackets.first().ok_or(TaxScheduleError::Empty)?;
        if !first.min_income.is_zero() {
            return Err(TaxScheduleError::DoesNotStartAtZero(first.min_income));
        }

        let last_index = brackets.len() - 1;
        let mut previous_max = Decimal::ZERO;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(TaxScheduleError::InvalidRate {
                    min: bracket.min_income,
                    rate: bracket.rate,
                });
            }
            if bracket.min_income != previous_max {
                return Err(TaxScheduleError::Gap {
                    previous_max,
                    min: bracket.min_income,
                });
            }
            match bracket.max_income {
                Some(max) if max <= bracket.min_income => {
                    return Err(TaxScheduleError::EmptyRange(bracket.min_income));
                }
                Some(max) if index == last_index => {
                    return Err(TaxScheduleError::BoundedTop(max));
                }
                Some(max) => previous_max = max,
                None if index != last_index => {
                    return Err(TaxScheduleError::UnboundedBeforeEnd(bracket.min_income));
                }
                None => {}
            }
        }

        Ok(Self { brackets })
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }
}

impl<'de> Deserialize<'de> for TaxSchedule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            brackets: Vec<TaxBracket>,
        }

        let raw = Raw::deserialize(deserializer)?;
        TaxSchedule::new(raw.brackets).map_err(serde::de::Error::custom)
    }
}
