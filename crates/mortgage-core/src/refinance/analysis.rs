//! Refinance break-even: compare the payment on the remaining balance of an
//! existing loan with the payment on a new loan for that same balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::payment::monthly_payment;
use crate::error::MortgageError;
use crate::time_value::{self, break_even_months, MONTHS_PER_YEAR};
use crate::types::{with_metadata, BreakEven, ComputationOutput, Money, Percent, Years};
use crate::MortgageResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinanceInput {
    /// Remaining balance on the existing loan.
    pub current_principal: Money,
    pub current_rate_pct: Percent,
    /// Years left on the existing loan; may be fractional.
    pub current_term_remaining_years: Years,
    pub new_rate_pct: Percent,
    pub new_term_years: u32,
    #[serde(default)]
    pub closing_costs: Money,
}

/// Two independent signals: whether refinancing pays off over the life of
/// the loans, and whether it raises the monthly payment while doing so.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinanceRecommendation {
    pub beneficial: bool,
    pub payment_increases: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinanceAnalysis {
    pub current_payment: Money,
    pub new_payment: Money,
    pub monthly_savings: Money,
    pub lifetime_savings: Money,
    pub break_even: BreakEven,
    pub recommendation: RefinanceRecommendation,
}

fn validate(input: &RefinanceInput) -> MortgageResult<()> {
    if input.current_principal <= Decimal::ZERO {
        return Err(MortgageError::invalid(
            "current_principal",
            "Remaining balance must be positive",
        ));
    }
    if input.current_rate_pct < Decimal::ZERO {
        return Err(MortgageError::invalid(
            "current_rate_pct",
            "Interest rate cannot be negative",
        ));
    }
    if input.current_term_remaining_years <= Decimal::ZERO {
        return Err(MortgageError::invalid(
            "current_term_remaining_years",
            "Remaining term must be positive",
        ));
    }
    if input.new_rate_pct < Decimal::ZERO {
        return Err(MortgageError::invalid(
            "new_rate_pct",
            "Interest rate cannot be negative",
        ));
    }
    if input.new_term_years == 0 {
        return Err(MortgageError::invalid(
            "new_term_years",
            "Loan term must be at least 1 year",
        ));
    }
    if input.closing_costs < Decimal::ZERO {
        return Err(MortgageError::invalid(
            "closing_costs",
            "Closing costs cannot be negative",
        ));
    }
    Ok(())
}

/// Compare keeping the current loan against refinancing its remaining balance.
pub fn analyze_refinance(input: &RefinanceInput) -> MortgageResult<RefinanceAnalysis> {
    validate(input)?;

    let months = Decimal::from(MONTHS_PER_YEAR);
    let current_months = input.current_term_remaining_years * months;
    let new_months = Decimal::from(time_value::num_payments(input.new_term_years)?);

    let current_payment = time_value::level_payment(
        input.current_principal,
        time_value::monthly_rate(input.current_rate_pct),
        current_months,
    )?;
    let new_payment = monthly_payment(
        input.current_principal,
        input.new_rate_pct,
        input.new_term_years,
    )?;

    let monthly_savings = current_payment - new_payment;
    let lifetime_savings = current_payment
        .checked_mul(current_months)
        .zip(new_payment.checked_mul(new_months))
        .and_then(|(current_total, new_total)| current_total.checked_sub(new_total))
        .and_then(|net| net.checked_sub(input.closing_costs))
        .ok_or_else(|| MortgageError::overflow("refinance lifetime savings"))?;

    Ok(RefinanceAnalysis {
        current_payment,
        new_payment,
        monthly_savings,
        lifetime_savings,
        break_even: break_even_months(input.closing_costs, monthly_savings)?,
        recommendation: RefinanceRecommendation {
            beneficial: lifetime_savings > Decimal::ZERO,
            payment_increases: new_payment > current_payment,
        },
    })
}

pub fn calculate_refinance(
    input: &RefinanceInput,
) -> MortgageResult<ComputationOutput<RefinanceAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let analysis = analyze_refinance(input)?;
    let rec = analysis.recommendation;
    if rec.beneficial && rec.payment_increases {
        warnings.push(format!(
            "Refinancing saves {} over the life of the loan but raises the monthly payment by {}",
            analysis.lifetime_savings.round_dp(2),
            (-analysis.monthly_savings).round_dp(2)
        ));
    } else if !rec.beneficial && analysis.monthly_savings > Decimal::ZERO {
        warnings.push(format!(
            "Lower monthly payment, but refinancing costs {} more over the life of the loan",
            (-analysis.lifetime_savings).round_dp(2)
        ));
    }
    if !analysis.break_even.is_applicable() {
        warnings.push("No monthly savings; closing costs are never recovered".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Refinance Break-Even Analysis",
        input,
        warnings,
        elapsed,
        analysis,
    ))
}
