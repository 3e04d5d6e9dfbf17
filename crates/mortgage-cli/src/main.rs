mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use mortgage_core::{MortgageEngine, UnderwritingPolicy};
use std::process;

use commands::amortization::LoanArgs;
use commands::refinance::RefinanceArgs;
use commands::scenarios::{CompareArgs, ScenarioArgs};
use commands::underwriting::{AffordabilityArgs, RatioArgs};

/// Fixed-rate mortgage calculations
#[derive(Parser)]
#[command(
    name = "mortgage",
    version,
    about = "Fixed-rate mortgage calculations",
    long_about = "A CLI for fixed-rate mortgage calculations with decimal precision. \
                  Supports payments, amortization schedules, LTV/DTI/PMI, affordability, \
                  refinance break-even, and side-by-side scenario comparison."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Underwriting policy file (YAML or JSON); defaults apply when omitted
    #[arg(long, global = true)]
    policy: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the level monthly payment and loan totals
    Payment(LoanArgs),
    /// Generate the full amortization schedule with a yearly roll-up
    Schedule(LoanArgs),
    /// Loan-to-value, PMI and debt-to-income
    Ratios(RatioArgs),
    /// Maximum affordable home price under the DTI policy
    Affordability(AffordabilityArgs),
    /// Compare an existing loan against a refinance offer
    Refinance(RefinanceArgs),
    /// Evaluate a single loan scenario
    Scenario(ScenarioArgs),
    /// Compare loan scenarios side by side
    Compare(CompareArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn build_engine(policy: Option<&str>) -> Result<MortgageEngine, Box<dyn std::error::Error>> {
    let policy = match policy {
        Some(path) => input::file::read_policy(path)?,
        None => UnderwritingPolicy::default(),
    };
    Ok(MortgageEngine::new(policy)?)
}

fn run(command: Commands, policy: Option<&str>) -> Result<Option<serde_json::Value>, Box<dyn std::error::Error>> {
    // Only the policy-driven commands load (and can fail on) the policy file.
    let value = match command {
        Commands::Payment(args) => commands::amortization::run_payment(args)?,
        Commands::Schedule(args) => commands::amortization::run_schedule(args)?,
        Commands::Ratios(args) => commands::underwriting::run_ratios(args, &build_engine(policy)?)?,
        Commands::Affordability(args) => {
            commands::underwriting::run_affordability(args, &build_engine(policy)?)?
        }
        Commands::Refinance(args) => commands::refinance::run_refinance(args)?,
        Commands::Scenario(args) => commands::scenarios::run_scenario(args, &build_engine(policy)?)?,
        Commands::Compare(args) => commands::scenarios::run_compare(args)?,
        Commands::Version => {
            println!("mortgage {}", env!("CARGO_PKG_VERSION"));
            return Ok(None);
        }
    };
    Ok(Some(value))
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli.command, cli.policy.as_deref()) {
        Ok(Some(value)) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Ok(None) => {}
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
