use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What a deduction line represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeductionKind {
    FederalTax,
    RegionalTax(String),
    /// Flat-rate-with-cap payroll contribution, labelled by rule kind.
    Contribution(String),
    /// Simple percentage-of-gross deduction.
    FlatRate(String),
    Retirement,
}

impl fmt::Display for DeductionKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::FederalTax => write!(f, "Federal tax"),
            Self::RegionalTax(region) => write!(f, "Regional tax ({region})"),
            Self::Contribution(kind) => write!(f, "{kind} contribution"),
            Self::FlatRate(name) => write!(f, "{name}"),
            Self::Retirement => write!(f, "Retirement contribution"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deduction {
    pub kind: DeductionKind,
    /// Annual amount, rounded to cents.
    pub amount: Decimal,
    /// `amount` as a 0–100 percentage of gross income (0 when gross is 0).
    pub percentage_of_gross: Decimal,
}
