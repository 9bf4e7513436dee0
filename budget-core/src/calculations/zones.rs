//! Budget zone classification.

use crate::models::{BudgetZone, ExpenseRatio, ZoneThresholds};

/// Classifies an expense ratio into a [`BudgetZone`].
///
/// Total over every input: an unbounded ratio is always red.
pub fn classify(
    ratio: ExpenseRatio,
    thresholds: &ZoneThresholds,
) -> BudgetZone {
    match ratio {
        ExpenseRatio::Finite(pct) if pct <= thresholds.green_max => BudgetZone::Green,
        ExpenseRatio::Finite(pct) if pct <= thresholds.moderate_max => BudgetZone::Moderate,
        ExpenseRatio::Finite(_) | ExpenseRatio::Unbounded => BudgetZone::Red,
    }
}
