use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ContributionRule, TaxSchedule};

/// Complete tax table for one jurisdiction: a federal schedule, one schedule
/// per region code and any payroll contribution rules.
///
/// Built once at startup and treated as read-only by every calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionConfig {
    pub name: String,
    pub federal: TaxSchedule,
    #[serde(default)]
    pub regions: BTreeMap<String, TaxSchedule>,
    #[serde(default)]
    pub contributions: Vec<ContributionRule>,
}

impl JurisdictionConfig {
    pub fn new(
        name: impl Into<String>,
        federal: TaxSchedule,
    ) -> Self {
        Self {
            name: name.into(),
            federal,
            regions: BTreeMap::new(),
            contributions: Vec::new(),
        }
    }

    /// Adds (or replaces) a regional schedule. Codes are stored upper-cased.
    pub fn with_region(
        mut self,
        code: &str,
        schedule: TaxSchedule,
    ) -> Self {
        self.regions.insert(normalize_region(code), schedule);
        self
    }

    pub fn with_contribution(
        mut self,
        rule: ContributionRule,
    ) -> Self {
        self.contributions.push(rule);
        self
    }

    /// Looks up a regional schedule, ignoring case and surrounding whitespace.
    pub fn region(
        &self,
        code: &str,
    ) -> Option<&TaxSchedule> {
        self.regions.get(&normalize_region(code))
    }

    pub fn region_codes(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }
}

/// Canonical form of a region code (`" on "` → `"ON"`).
pub fn normalize_region(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
