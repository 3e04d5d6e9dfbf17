use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_core::amortization::schedule::{calculate_amortization, calculate_payment};
use mortgage_core::amortization::LoanTerms;

use crate::input;

/// Arguments shared by the payment and schedule commands
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (4.5 = 4.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub term_years: Option<u32>,
}

fn loan_terms(args: &LoanArgs) -> Result<LoanTerms, Box<dyn std::error::Error>> {
    input::resolve(args.input.as_deref(), || {
        Ok(LoanTerms {
            principal: args.principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_pct: args.rate
                .ok_or("--rate is required (or provide --input)")?,
            term_years: args.term_years
                .ok_or("--term-years is required (or provide --input)")?,
        })
    })
}

pub fn run_payment(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = loan_terms(&args)?;
    let result = calculate_payment(&terms)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = loan_terms(&args)?;
    let result = calculate_amortization(&terms)?;
    Ok(serde_json::to_value(result)?)
}
