mod loader;

pub use loader::{BracketRecord, ContributionRecord, JurisdictionLoader, JurisdictionLoaderError};

use budget_core::JurisdictionConfig;

const CANADA_2025_BRACKETS: &str = include_str!("../data/canada_2025_brackets.csv");
const CANADA_2025_CONTRIBUTIONS: &str = include_str!("../data/canada_2025_contributions.csv");

/// The bundled Canadian 2025 table: federal brackets, the AB, BC, ON and QC
/// regional brackets, and CPP/EI contribution rules.
pub fn default_jurisdiction() -> Result<JurisdictionConfig, JurisdictionLoaderError> {
    let brackets = JurisdictionLoader::parse_brackets(CANADA_2025_BRACKETS.as_bytes())?;
    let contributions =
        JurisdictionLoader::parse_contributions(CANADA_2025_CONTRIBUTIONS.as_bytes())?;
    JurisdictionLoader::build(&brackets, &contributions)
}
