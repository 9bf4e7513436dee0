use std::path::PathBuf;

use anyhow::{Context, Result};
use budget_cli::commands::{self, HintProjection};
use budget_cli::logging;
use budget_cli::report::{BudgetReport, ProjectionReport, SignalReport};
use budget_cli::scenario::Scenario;
use budget_cli::utils::{format_money, parse_decimal};
use budget_core::calculations::projection::{
    CompoundingFrequency, ContributionTiming, ProjectionInput, RequiredContributionInput,
};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::debug;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Household budget planner.
///
/// Turns gross income, a region and monthly expenses into deductions,
/// disposable income, a budget zone and a savings/investment split, and
/// projects compound growth of regular contributions.
#[derive(Debug, Parser)]
#[command(name = "budget", version)]
struct Cli {
    /// Log filter: a level ("warn", "debug") or an EnvFilter directive.
    /// Overrides `RUST_LOG`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute a budget from a scenario file.
    Compute(ComputeArgs),
    /// Project the future value of regular contributions.
    Project(ProjectArgs),
    /// Contribution needed per period to reach a target amount.
    Required(RequiredArgs),
}

#[derive(Debug, Args)]
struct ComputeArgs {
    /// Scenario TOML file.
    scenario: PathBuf,

    /// Tax brackets CSV; defaults to the bundled table.
    #[arg(long)]
    brackets: Option<PathBuf>,

    /// Contribution rules CSV (requires --brackets).
    #[arg(long, requires = "brackets")]
    contributions: Option<PathBuf>,

    /// Project the monthly investment over this many years.
    #[arg(long)]
    project_years: Option<u32>,

    /// Annual growth rate in percent for --project-years.
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    rate: Decimal,
}

#[derive(Debug, Args)]
struct GrowthArgs {
    /// Annual growth rate in percent.
    #[arg(long, value_parser = parse_decimal)]
    rate: Decimal,

    /// Number of years.
    #[arg(long)]
    years: u32,

    /// Amount already invested.
    #[arg(long, value_parser = parse_decimal, default_value = "0")]
    starting: Decimal,

    /// Compounding and contribution frequency.
    #[arg(long, value_parser = parse_frequency, default_value = "monthly")]
    frequency: CompoundingFrequency,

    /// Contribution timing within each period: "start" or "end".
    #[arg(long, value_parser = parse_timing, default_value = "end")]
    timing: ContributionTiming,
}

#[derive(Debug, Args)]
struct ProjectArgs {
    /// Amount contributed every period.
    #[arg(long, value_parser = parse_decimal)]
    contribution: Decimal,

    #[command(flatten)]
    growth: GrowthArgs,

    /// Also print the year-by-year balances.
    #[arg(long)]
    schedule: bool,
}

#[derive(Debug, Args)]
struct RequiredArgs {
    /// Amount to reach.
    #[arg(long, value_parser = parse_decimal)]
    target: Decimal,

    #[command(flatten)]
    growth: GrowthArgs,
}

fn parse_frequency(s: &str) -> Result<CompoundingFrequency, String> {
    CompoundingFrequency::parse(s).ok_or_else(|| {
        format!(
            "unknown frequency '{s}' (expected annually, semi-annually, quarterly, monthly, \
             bi-weekly, weekly or daily)"
        )
    })
}

fn parse_timing(s: &str) -> Result<ContributionTiming, String> {
    ContributionTiming::parse(s)
        .ok_or_else(|| format!("unknown timing '{s}' (expected start or end)"))
}

// ─── subcommands ─────────────────────────────────────────────────────────────

fn run_compute(args: ComputeArgs) -> Result<()> {
    let scenario = Scenario::load(&args.scenario)
        .with_context(|| format!("Failed to load scenario {}", args.scenario.display()))?;

    let growth = match (args.project_years, &scenario.projection) {
        (Some(years), _) => Some(HintProjection {
            years,
            annual_rate_pct: args.rate,
            starting_amount: Decimal::ZERO,
            frequency: CompoundingFrequency::default(),
            timing: ContributionTiming::default(),
        }),
        (None, Some(settings)) => Some(HintProjection::from(settings)),
        (None, None) => None,
    };

    let brackets = args.brackets.as_deref();
    let contributions = args.contributions.as_deref();
    let outcome = commands::compute(
        &scenario,
        || commands::load_jurisdiction(brackets, contributions),
        growth,
    )?;

    print!("{}", BudgetReport(&outcome.result));
    println!();
    print!("{}", SignalReport(&outcome.signals));
    if let Some(growth) = &outcome.projection {
        println!();
        print!(
            "{}",
            ProjectionReport {
                projection: &growth.projection,
                schedule: &growth.schedule,
            }
        );
    }
    Ok(())
}

fn run_project(args: ProjectArgs) -> Result<()> {
    let input = ProjectionInput {
        starting_amount: args.growth.starting,
        contribution: args.contribution,
        annual_rate_pct: args.growth.rate,
        years: args.growth.years,
        frequency: args.growth.frequency,
        timing: args.growth.timing,
    };
    debug!(?input, "projecting");

    let growth = commands::project(&input)?;
    let schedule: &[_] = if args.schedule {
        growth.schedule.as_slice()
    } else {
        &[]
    };
    print!(
        "{}",
        ProjectionReport {
            projection: &growth.projection,
            schedule,
        }
    );
    Ok(())
}

fn run_required(args: RequiredArgs) -> Result<()> {
    let input = RequiredContributionInput {
        target_amount: args.target,
        starting_amount: args.growth.starting,
        annual_rate_pct: args.growth.rate,
        years: args.growth.years,
        frequency: args.growth.frequency,
        timing: args.growth.timing,
    };
    debug!(?input, "solving for contribution");

    let contribution = commands::required(&input)?;
    println!(
        "Required {} contribution: {}",
        input.frequency,
        format_money(contribution)
    );
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    match cli.command {
        Command::Compute(args) => run_compute(args),
        Command::Project(args) => run_project(args),
        Command::Required(args) => run_required(args),
    }
}
