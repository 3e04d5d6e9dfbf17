//! Affordability sizing: invert the annuity formula to find the largest loan
//! a borrower's income can carry once existing debts, property tax and
//! insurance are accounted for.
//!
//! Tax and insurance are modelled as multiplicative monthly loads on the
//! principal-and-interest share: `PITI = PI * (1 + tax/12 + insurance/12)`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::UnderwritingPolicy;
use crate::error::MortgageError;
use crate::time_value::{self, MONTHS_PER_YEAR};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::MortgageResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub monthly_income: Money,
    #[serde(default)]
    pub monthly_debts: Money,
    #[serde(default)]
    pub down_payment: Money,
    /// Expected annual rate in percentage points.
    pub annual_rate_pct: Percent,
    pub term_years: u32,
    /// Annual property tax rate; the policy default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_tax_rate: Option<Rate>,
    /// Annual insurance rate; the policy default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_rate: Option<Rate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityOutput {
    pub max_price: Money,
    pub max_loan: Money,
    pub down_payment: Money,
    /// Monthly budget for principal, interest, tax and insurance.
    pub max_piti: Money,
    /// Share of the PITI budget left for principal and interest.
    pub max_principal_interest: Money,
    pub monthly_tax: Money,
    pub monthly_insurance: Money,
}

fn validate(input: &AffordabilityInput) -> MortgageResult<()> {
    if input.term_years == 0 {
        return Err(MortgageError::invalid(
            "term_years",
            "Loan term must be at least 1 year",
        ));
    }
    if input.monthly_income < Decimal::ZERO {
        return Err(MortgageError::invalid(
            "monthly_income",
            "Monthly income cannot be negative",
        ));
    }
    if input.monthly_debts < Decimal::ZERO {
        return Err(MortgageError::invalid(
            "monthly_debts",
            "Monthly debts cannot be negative",
        ));
    }
    if input.down_payment < Decimal::ZERO {
        return Err(MortgageError::invalid(
            "down_payment",
            "Down payment cannot be negative",
        ));
    }
    if input.annual_rate_pct < Decimal::ZERO {
        return Err(MortgageError::invalid(
            "annual_rate_pct",
            "Interest rate cannot be negative",
        ));
    }
    for (field, rate) in [
        ("property_tax_rate", input.property_tax_rate),
        ("insurance_rate", input.insurance_rate),
    ] {
        if rate.is_some_and(|r| r < Decimal::ZERO) {
            return Err(MortgageError::invalid(field, "Rate cannot be negative"));
        }
    }
    Ok(())
}

/// Size the maximum loan and home price for a borrower.
///
/// When existing debts already consume the whole DTI budget the loan is
/// sized at zero and the price is the down payment alone.
pub fn max_affordable_price(
    input: &AffordabilityInput,
    policy: &UnderwritingPolicy,
) -> MortgageResult<AffordabilityOutput> {
    validate(input)?;

    let months = Decimal::from(MONTHS_PER_YEAR);
    let tax_rate = input.property_tax_rate.unwrap_or(policy.property_tax_rate);
    let insurance_rate = input.insurance_rate.unwrap_or(policy.insurance_rate);

    let dti_budget = input
        .monthly_income
        .checked_mul(policy.max_dti)
        .ok_or_else(|| MortgageError::overflow("DTI budget"))?;
    let max_piti = (dti_budget - input.monthly_debts).max(Decimal::ZERO);
    let monthly_tax_rate = tax_rate / months;
    let monthly_insurance_rate = insurance_rate / months;
    let max_pi = max_piti / (Decimal::ONE + monthly_tax_rate + monthly_insurance_rate);

    let n = time_value::num_payments(input.term_years)?;
    let rate = time_value::monthly_rate(input.annual_rate_pct);
    let max_loan = time_value::annuity_present_value(max_pi, rate, n)?;

    let max_price = max_loan
        .checked_add(input.down_payment)
        .ok_or_else(|| MortgageError::overflow("affordable price"))?;

    Ok(AffordabilityOutput {
        max_price,
        max_loan,
        down_payment: input.down_payment,
        max_piti,
        max_principal_interest: max_pi,
        monthly_tax: max_pi * monthly_tax_rate,
        monthly_insurance: max_pi * monthly_insurance_rate,
    })
}

pub fn calculate_affordability(
    input: &AffordabilityInput,
    policy: &UnderwritingPolicy,
) -> MortgageResult<ComputationOutput<AffordabilityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let output = max_affordable_price(input, policy)?;
    if output.max_piti.is_zero() {
        warnings.push(format!(
            "Existing debts of {} use the full {}% DTI budget; no additional loan is affordable",
            input.monthly_debts,
            policy.max_dti * Decimal::ONE_HUNDRED
        ));
    }
    log::debug!(
        "affordable loan {} (price {})",
        output.max_loan,
        output.max_price
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "PITI Affordability (Inverted Annuity)",
        &serde_json::json!({
            "input": input,
            "max_dti": policy.max_dti.to_string(),
            "property_tax_rate": input.property_tax_rate.unwrap_or(policy.property_tax_rate).to_string(),
            "insurance_rate": input.insurance_rate.unwrap_or(policy.insurance_rate).to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
