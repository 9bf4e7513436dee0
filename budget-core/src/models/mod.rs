mod allocation;
mod budget;
mod contribution_rule;
mod deduction;
mod jurisdiction;
mod policy;
mod tax_bracket;

pub use allocation::{Allocation, AllocationRequest};
pub use budget::{BudgetInput, BudgetResult, BudgetZone, ExpenseRatio};
pub use contribution_rule::ContributionRule;
pub use deduction::{Deduction, DeductionKind};
pub use jurisdiction::{JurisdictionConfig, normalize_region};
pub use policy::{AllocationPolicy, FlatRateDeduction, TaxPolicy, ZoneThresholds};
pub use tax_bracket::{TaxBracket, TaxSchedule, TaxScheduleError};
