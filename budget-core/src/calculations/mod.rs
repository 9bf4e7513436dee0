//! Budget calculation modules.
//!
//! Each module covers one step of the budget pipeline; [`BudgetEngine`] wires
//! them together.

pub mod allocator;
pub mod common;
pub mod disposable;
pub mod engine;
pub mod expenses;
pub mod projection;
pub mod tax;
pub mod zones;

pub use allocator::FundAllocator;
pub use disposable::DisposableIncome;
pub use engine::BudgetEngine;
pub use projection::{
    CompoundingFrequency, ContributionTiming, GrowthProjector, Projection, ProjectionError,
    ProjectionInput, RequiredContributionInput, YearlyBalance,
};
pub use tax::{DeductionCalculator, DeductionSummary};
