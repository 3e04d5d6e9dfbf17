use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_core::scenarios::comparison::{compare_scenarios, ComparisonInput};
use mortgage_core::scenarios::scenario::calculate_scenario;
use mortgage_core::scenarios::{Scenario, ScenarioRecord};
use mortgage_core::MortgageEngine;

use crate::input;

/// Arguments for evaluating a single scenario
#[derive(Args)]
pub struct ScenarioArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Scenario name
    #[arg(long)]
    pub name: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Nominal annual rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub term_years: Option<u32>,

    /// Down payment
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Property value (defaults to loan amount plus down payment)
    #[arg(long)]
    pub property_value: Option<Decimal>,

    /// Discount points paid, as a percent of the loan
    #[arg(long)]
    pub points: Option<Decimal>,

    /// Rate bought with the points, in percent
    #[arg(long)]
    pub reduced_rate: Option<Decimal>,
}

/// Arguments for comparing scenarios side by side
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON file holding `{"scenarios": [...]}` or a bare array
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_scenario(args: ScenarioArgs, engine: &MortgageEngine) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario: Scenario = input::resolve(args.input.as_deref(), || {
        let record = ScenarioRecord {
            name: args.name.clone().unwrap_or_else(|| "Scenario".to_string()),
            loan_amount: args.loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            interest_rate: args.rate
                .ok_or("--rate is required (or provide --input)")?,
            term_years: args.term_years
                .ok_or("--term-years is required (or provide --input)")?,
            down_payment: args.down_payment.unwrap_or(Decimal::ZERO),
            property_value: args.property_value,
            points_paid: args.points.unwrap_or(Decimal::ZERO),
            reduced_rate: args.reduced_rate,
            created_at: None,
        };
        Ok(record.build()?)
    })?;
    let result = calculate_scenario(&scenario, engine.policy())?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw: Value = input::resolve(args.input.as_deref(), || {
        Err("--input is required (or pipe scenarios as JSON on stdin)".into())
    })?;
    let compare_input: ComparisonInput = match raw {
        Value::Array(_) => ComparisonInput {
            scenarios: serde_json::from_value(raw)?,
        },
        other => serde_json::from_value(other)?,
    };
    let result = compare_scenarios(&compare_input)?;
    Ok(serde_json::to_value(result)?)
}
