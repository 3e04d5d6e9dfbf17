use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_core::refinance::analysis::calculate_refinance;
use mortgage_core::refinance::RefinanceInput;

use crate::input;

/// Arguments for refinance analysis
#[derive(Args)]
pub struct RefinanceArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Remaining balance on the current loan
    #[arg(long)]
    pub current_principal: Option<Decimal>,

    /// Current annual rate in percent
    #[arg(long)]
    pub current_rate: Option<Decimal>,

    /// Years remaining on the current loan (may be fractional)
    #[arg(long)]
    pub remaining_years: Option<Decimal>,

    /// Offered annual rate in percent
    #[arg(long)]
    pub new_rate: Option<Decimal>,

    /// Term of the new loan in years
    #[arg(long)]
    pub new_term_years: Option<u32>,

    /// Closing costs of the refinance
    #[arg(long)]
    pub closing_costs: Option<Decimal>,
}

pub fn run_refinance(args: RefinanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let refi_input: RefinanceInput = input::resolve(args.input.as_deref(), || {
        Ok(RefinanceInput {
            current_principal: args.current_principal
                .ok_or("--current-principal is required (or provide --input)")?,
            current_rate_pct: args.current_rate
                .ok_or("--current-rate is required (or provide --input)")?,
            current_term_remaining_years: args.remaining_years
                .ok_or("--remaining-years is required (or provide --input)")?,
            new_rate_pct: args.new_rate
                .ok_or("--new-rate is required (or provide --input)")?,
            new_term_years: args.new_term_years
                .ok_or("--new-term-years is required (or provide --input)")?,
            closing_costs: args.closing_costs.unwrap_or(Decimal::ZERO),
        })
    })?;
    let result = calculate_refinance(&refi_input)?;
    Ok(serde_json::to_value(result)?)
}
