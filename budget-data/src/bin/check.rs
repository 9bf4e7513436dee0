use std::path::PathBuf;

use anyhow::{Context, Result};
use budget_data::JurisdictionLoader;
use clap::Parser;

/// Validate a jurisdiction tax table and print a summary of it.
#[derive(Parser, Debug)]
#[command(name = "budget-data-check")]
#[command(about = "Validate jurisdiction bracket and contribution CSV files")]
struct Args {
    /// Path to the tax brackets CSV file
    #[arg(short, long)]
    brackets: PathBuf,

    /// Path to the contribution rules CSV file
    #[arg(short, long)]
    contributions: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Reading tax brackets from: {}", args.brackets.display());

    let config =
        JurisdictionLoader::load_from_files(&args.brackets, args.contributions.as_deref())
            .context("Jurisdiction table is invalid")?;

    println!("Jurisdiction: {}", config.name);
    println!("  federal: {} brackets", config.federal.brackets().len());
    for code in config.region_codes() {
        let count = config.region(code).map_or(0, |s| s.brackets().len());
        println!("  {code}: {count} brackets");
    }
    for rule in &config.contributions {
        println!(
            "  {}: {} up to {} (cap {}, exemption {})",
            rule.kind, rule.rate, rule.max_earnings, rule.max_contribution, rule.basic_exemption
        );
    }

    println!("Table is valid.");

    Ok(())
}
