use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use budget_core::{
    ContributionRule, JurisdictionConfig, TaxBracket, TaxSchedule, TaxScheduleError,
    normalize_region,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading a jurisdiction tax table.
#[derive(Debug, Error)]
pub enum JurisdictionLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("no tax brackets provided")]
    NoBrackets,

    #[error("bracket rows mix jurisdictions '{0}' and '{1}'")]
    MixedJurisdictions(String, String),

    #[error("jurisdiction '{0}' has no federal brackets (rows with an empty region)")]
    MissingFederal(String),

    #[error("invalid {scope} schedule: {source}")]
    InvalidSchedule {
        scope: String,
        #[source]
        source: TaxScheduleError,
    },

    #[error("invalid contribution rule '{kind}': {reason}")]
    InvalidContribution { kind: String, reason: String },

    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<csv::Error> for JurisdictionLoaderError {
    fn from(err: csv::Error) -> Self {
        JurisdictionLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the tax brackets CSV file.
///
/// - `jurisdiction`: Name of the tax table (e.g. `CA-2025`)
/// - `region`: Region code (e.g. `ON`); empty for federal brackets
/// - `min_income`: The minimum income for this bracket
/// - `max_income`: The maximum income for this bracket (empty for unlimited)
/// - `rate`: The marginal rate as a decimal (e.g., 0.15 for 15%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub jurisdiction: String,
    #[serde(deserialize_with = "deserialize_optional_string")]
    pub region: Option<String>,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

/// A single record from the contributions CSV file.
///
/// An empty `basic_exemption` means no exemption.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ContributionRecord {
    pub kind: String,
    pub rate: Decimal,
    pub max_earnings: Decimal,
    pub max_contribution: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub basic_exemption: Option<Decimal>,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader)
}

/// Loader for jurisdiction tax tables stored as CSV.
///
/// Bracket rows are grouped by region (empty region = federal), sorted and
/// validated into [`TaxSchedule`]s; contribution rows become
/// [`ContributionRule`]s.
pub struct JurisdictionLoader;

impl JurisdictionLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse_brackets<R: Read>(
        reader: R
    ) -> Result<Vec<BracketRecord>, JurisdictionLoaderError> {
        let mut records = Vec::new();
        for result in csv_reader(reader).deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }
        Ok(records)
    }

    /// Parse contribution records from a CSV reader.
    pub fn parse_contributions<R: Read>(
        reader: R
    ) -> Result<Vec<ContributionRecord>, JurisdictionLoaderError> {
        let mut records = Vec::new();
        for result in csv_reader(reader).deserialize() {
            let record: ContributionRecord = result?;
            records.push(record);
        }
        Ok(records)
    }

    /// Assemble a validated [`JurisdictionConfig`] from parsed records.
    ///
    /// All bracket rows must belong to the same jurisdiction, and there must
    /// be at least one federal row.
    pub fn build(
        brackets: &[BracketRecord],
        contributions: &[ContributionRecord],
    ) -> Result<JurisdictionConfig, JurisdictionLoaderError> {
        let first = brackets.first().ok_or(JurisdictionLoaderError::NoBrackets)?;
        let name = first.jurisdiction.clone();

        let mut federal = Vec::new();
        let mut regional: BTreeMap<String, Vec<TaxBracket>> = BTreeMap::new();
        for record in brackets {
            if record.jurisdiction != name {
                return Err(JurisdictionLoaderError::MixedJurisdictions(
                    name,
                    record.jurisdiction.clone(),
                ));
            }
            let bracket = TaxBracket {
                min_income: record.min_income,
                max_income: record.max_income,
                rate: record.rate,
            };
            match &record.region {
                Some(region) => regional
                    .entry(normalize_region(region))
                    .or_default()
                    .push(bracket),
                None => federal.push(bracket),
            }
        }

        if federal.is_empty() {
            return Err(JurisdictionLoaderError::MissingFederal(name));
        }

        let federal = TaxSchedule::new(federal).map_err(|source| {
            JurisdictionLoaderError::InvalidSchedule {
                scope: "federal".to_string(),
                source,
            }
        })?;
        let mut config = JurisdictionConfig::new(name, federal);

        for (code, brackets) in regional {
            let schedule = TaxSchedule::new(brackets).map_err(|source| {
                JurisdictionLoaderError::InvalidSchedule {
                    scope: format!("region {code}"),
                    source,
                }
            })?;
            config = config.with_region(&code, schedule);
        }

        for record in contributions {
            config = config.with_contribution(contribution_rule(record)?);
        }

        debug!(
            jurisdiction = %config.name,
            regions = config.regions.len(),
            contributions = config.contributions.len(),
            "built jurisdiction config"
        );

        Ok(config)
    }

    /// Read, parse and build a jurisdiction from files on disk.
    pub fn load_from_files(
        brackets_path: &Path,
        contributions_path: Option<&Path>,
    ) -> Result<JurisdictionConfig, JurisdictionLoaderError> {
        let brackets = Self::parse_brackets(open(brackets_path)?)?;
        let contributions = match contributions_path {
            Some(path) => Self::parse_contributions(open(path)?)?,
            None => Vec::new(),
        };
        Self::build(&brackets, &contributions)
    }
}

fn open(path: &Path) -> Result<std::fs::File, JurisdictionLoaderError> {
    std::fs::File::open(path).map_err(|source| JurisdictionLoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn contribution_rule(
    record: &ContributionRecord
) -> Result<ContributionRule, JurisdictionLoaderError> {
    let invalid = |reason: &str| JurisdictionLoaderError::InvalidContribution {
        kind: record.kind.clone(),
        reason: reason.to_string(),
    };

    if record.kind.is_empty() {
        return Err(invalid("kind must not be empty"));
    }
    if record.rate < Decimal::ZERO || record.rate > Decimal::ONE {
        return Err(invalid("rate must be between 0 and 1"));
    }
    if record.max_earnings < Decimal::ZERO || record.max_contribution < Decimal::ZERO {
        return Err(invalid("earnings ceiling and contribution cap must be non-negative"));
    }
    let basic_exemption = record.basic_exemption.unwrap_or(Decimal::ZERO);
    if basic_exemption < Decimal::ZERO {
        return Err(invalid("basic exemption must be non-negative"));
    }

    Ok(ContributionRule {
        kind: record.kind.clone(),
        rate: record.rate,
        max_earnings: record.max_earnings,
        max_contribution: record.max_contribution,
        basic_exemption,
    })
}
