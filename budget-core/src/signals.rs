//! Named numeric signals shared with companion calculators.
//!
//! The budget publishes the monthly and annual investment amounts it settled
//! on; an investment projector picks them up as its default contribution.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::MONTHS_PER_YEAR;
use crate::models::BudgetResult;

pub const MONTHLY_INVESTMENT: &str = "monthly_investment";
pub const ANNUAL_INVESTMENT: &str = "annual_investment";

/// Destination for named numeric values.
pub trait SignalSink {
    fn publish(
        &mut self,
        name: &str,
        value: Decimal,
    );
}

/// In-memory key-value store of the latest value per signal.
#[derive(Debug, Clone, Default)]
pub struct SignalStore {
    values: HashMap<String, Decimal>,
}

impl SignalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Option<Decimal> {
        self.values.get(name).copied()
    }

    /// All signals sorted by name.
    pub fn entries(&self) -> Vec<(&str, Decimal)> {
        let mut entries: Vec<_> = self
            .values
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl SignalSink for SignalStore {
    fn publish(
        &mut self,
        name: &str,
        value: Decimal,
    ) {
        debug!(signal = name, %value, "published signal");
        self.values.insert(name.to_string(), value);
    }
}

/// Publishes the investment amounts of the allocation the user is following.
pub fn publish_investment_hints(
    result: &BudgetResult,
    sink: &mut impl SignalSink,
) {
    let monthly = result.active_allocation().monthly_investments;
    sink.publish(MONTHLY_INVESTMENT, monthly);
    sink.publish(ANNUAL_INVESTMENT, monthly * MONTHS_PER_YEAR);
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn store_keeps_latest_value() {
        let mut store = SignalStore::new();
        store.publish("x", dec!(1));
        store.publish("x", dec!(2));

        assert_eq!(store.get("x"), Some(dec!(2)));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn entries_are_sorted_by_name() {
        let mut store = SignalStore::new();
        store.publish("b", dec!(2));
        store.publish("a", dec!(1));

        assert_eq!(store.entries(), vec![("a", dec!(1)), ("b", dec!(2))]);
    }
}
