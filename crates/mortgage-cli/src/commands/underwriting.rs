use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_core::underwriting::affordability::{calculate_affordability, AffordabilityInput};
use mortgage_core::underwriting::ratios::{calculate_ratios, RatioInput};
use mortgage_core::MortgageEngine;

use crate::input;

/// Arguments for loan-to-value, PMI and debt-to-income
#[derive(Args)]
pub struct RatioArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Appraised property value
    #[arg(long)]
    pub property_value: Option<Decimal>,

    /// Gross monthly income; enables the DTI check
    #[arg(long)]
    pub monthly_income: Option<Decimal>,

    /// Total monthly debt payments
    #[arg(long)]
    pub monthly_debt: Option<Decimal>,
}

/// Arguments for maximum affordable home price
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Gross monthly income
    #[arg(long)]
    pub monthly_income: Option<Decimal>,

    /// Existing monthly debt payments
    #[arg(long)]
    pub monthly_debts: Option<Decimal>,

    /// Cash available for the down payment
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Expected annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub term_years: Option<u32>,

    /// Annual property tax as a fraction of price (policy default if omitted)
    #[arg(long)]
    pub property_tax_rate: Option<Decimal>,

    /// Annual insurance as a fraction of price (policy default if omitted)
    #[arg(long)]
    pub insurance_rate: Option<Decimal>,
}

pub fn run_ratios(args: RatioArgs, engine: &MortgageEngine) -> Result<Value, Box<dyn std::error::Error>> {
    let ratio_input: RatioInput = input::resolve(args.input.as_deref(), || {
        Ok(RatioInput {
            loan_amount: args.loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            property_value: args.property_value
                .ok_or("--property-value is required (or provide --input)")?,
            monthly_income: args.monthly_income,
            monthly_debt: args.monthly_debt.unwrap_or(Decimal::ZERO),
        })
    })?;
    let result = calculate_ratios(&ratio_input, engine.policy())?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_affordability(
    args: AffordabilityArgs,
    engine: &MortgageEngine,
) -> Result<Value, Box<dyn std::error::Error>> {
    let afford_input: AffordabilityInput = input::resolve(args.input.as_deref(), || {
        Ok(AffordabilityInput {
            monthly_income: args.monthly_income
                .ok_or("--monthly-income is required (or provide --input)")?,
            monthly_debts: args.monthly_debts.unwrap_or(Decimal::ZERO),
            down_payment: args.down_payment.unwrap_or(Decimal::ZERO),
            annual_rate_pct: args.rate
                .ok_or("--rate is required (or provide --input)")?,
            term_years: args.term_years
                .ok_or("--term-years is required (or provide --input)")?,
            property_tax_rate: args.property_tax_rate,
            insurance_rate: args.insurance_rate,
        })
    })?;
    let result = calculate_affordability(&afford_input, engine.policy())?;
    Ok(serde_json::to_value(result)?)
}
