use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Flat-rate payroll contribution with an earnings ceiling and a contribution
/// cap (pension plan or employment insurance premiums).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRule {
    /// Short label used on the deduction line, e.g. `CPP` or `EI`.
    pub kind: String,
    /// Rate as a fraction of contributory earnings.
    pub rate: Decimal,
    /// Earnings above this amount are not contributory.
    pub max_earnings: Decimal,
    /// Upper bound on the annual contribution.
    pub max_contribution: Decimal,
    /// Earnings below this amount are exempt.
    #[serde(default)]
    pub basic_exemption: Decimal,
}
