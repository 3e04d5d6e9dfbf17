//! Loan-to-value, debt-to-income and private mortgage insurance.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::UnderwritingPolicy;
use crate::error::MortgageError;
use crate::time_value::MONTHS_PER_YEAR;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::MortgageResult;

fn as_percent(part: Money, whole: Money, context: &str) -> MortgageResult<Percent> {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .ok_or_else(|| MortgageError::overflow(context))
}

/// Loan amount as a percentage of property value.
pub fn loan_to_value(loan_amount: Money, property_value: Money) -> MortgageResult<Percent> {
    if property_value <= Decimal::ZERO {
        return Err(MortgageError::invalid(
            "property_value",
            "Property value must be positive",
        ));
    }
    as_percent(loan_amount, property_value, "loan-to-value")
}

/// Monthly debt payments as a percentage of gross monthly income.
pub fn debt_to_income(monthly_income: Money, monthly_debt: Money) -> MortgageResult<Percent> {
    if monthly_income <= Decimal::ZERO {
        return Err(MortgageError::invalid(
            "monthly_income",
            "Monthly income must be positive",
        ));
    }
    as_percent(monthly_debt, monthly_income, "debt-to-income")
}

/// Annual PMI premium: zero at or below the LTV threshold, otherwise a flat
/// share of the loan amount. There is no LTV-tiered pricing.
pub fn private_mortgage_insurance(
    loan_amount: Money,
    property_value: Money,
    policy: &UnderwritingPolicy,
) -> MortgageResult<Money> {
    let ltv = loan_to_value(loan_amount, property_value)?;
    if ltv <= policy.pmi_ltv_threshold {
        return Ok(Decimal::ZERO);
    }
    loan_amount
        .checked_mul(policy.pmi_annual_rate)
        .ok_or_else(|| MortgageError::overflow("PMI premium"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtiAssessment {
    Good,
    Acceptable,
    High,
}

pub fn assess_dti(dti: Percent, policy: &UnderwritingPolicy) -> DtiAssessment {
    if dti <= policy.dti_good_threshold {
        DtiAssessment::Good
    } else if dti <= policy.dti_acceptable_threshold {
        DtiAssessment::Acceptable
    } else {
        DtiAssessment::High
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioInput {
    pub loan_amount: Money,
    pub property_value: Money,
    /// Gross monthly income; DTI is only computed when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<Money>,
    #[serde(default)]
    pub monthly_debt: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioOutput {
    pub loan_to_value: Percent,
    pub requires_pmi: bool,
    pub annual_pmi: Money,
    pub monthly_pmi: Money,
    pub debt_to_income: Option<Percent>,
    pub dti_assessment: Option<DtiAssessment>,
}

/// LTV, PMI and (when income is given) DTI for a prospective loan.
pub fn calculate_ratios(
    input: &RatioInput,
    policy: &UnderwritingPolicy,
) -> MortgageResult<ComputationOutput<RatioOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.loan_amount < Decimal::ZERO {
        return Err(MortgageError::invalid(
            "loan_amount",
            "Loan amount cannot be negative",
        ));
    }

    let ltv = loan_to_value(input.loan_amount, input.property_value)?;
    let annual_pmi = private_mortgage_insurance(input.loan_amount, input.property_value, policy)?;
    let requires_pmi = ltv > policy.pmi_ltv_threshold;
    if requires_pmi {
        warnings.push(format!(
            "LTV of {}% exceeds {}%; private mortgage insurance applies",
            ltv.round_dp(1),
            policy.pmi_ltv_threshold
        ));
    }
    if ltv > dec!(100) {
        warnings.push("Loan exceeds property value".into());
    }

    let (debt_to_income, dti_assessment) = match input.monthly_income {
        Some(income) => {
            let dti = debt_to_income(income, input.monthly_debt)?;
            let grade = assess_dti(dti, policy);
            if grade == DtiAssessment::High {
                warnings.push(format!(
                    "DTI of {}% is above {}%; qualifying may be difficult",
                    dti.round_dp(1),
                    policy.dti_acceptable_threshold
                ));
            }
            (Some(dti), Some(grade))
        }
        None => (None, None),
    };

    let output = RatioOutput {
        loan_to_value: ltv,
        requires_pmi,
        annual_pmi,
        monthly_pmi: annual_pmi / Decimal::from(MONTHS_PER_YEAR),
        debt_to_income,
        dti_assessment,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Loan-to-Value / Debt-to-Income / PMI",
        &serde_json::json!({
            "input": input,
            "pmi_ltv_threshold": policy.pmi_ltv_threshold.to_string(),
            "pmi_annual_rate": policy.pmi_annual_rate.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_loan_to_value() {
        assert_eq!(loan_to_value(dec!(240000), dec!(300000)).unwrap(), dec!(80.0));
        assert_eq!(loan_to_value(dec!(270000), dec!(300000)).unwrap(), dec!(90.0));
    }

    #[test]
    fn test_loan_to_value_rejects_non_positive_value() {
        assert!(loan_to_value(dec!(240000), Decimal::ZERO).is_err());
        assert!(loan_to_value(dec!(240000), dec!(-1)).is_err());
    }

    #[test]
    fn test_tiny_denominator_overflow_is_an_error() {
        let err = loan_to_value(dec!(50000000000000000000000000000), dec!(0.01)).unwrap_err();
        assert!(matches!(err, MortgageError::NumericOverflow { .. }));
        let err = debt_to_income(dec!(0.0001), dec!(50000000000000000000000000000)).unwrap_err();
        assert!(matches!(err, MortgageError::NumericOverflow { .. }));
    }

    #[test]
    fn test_debt_to_income() {
        assert_eq!(debt_to_income(dec!(6000), dec!(2400)).unwrap(), dec!(40.0));
        assert_eq!(debt_to_income(dec!(8000), dec!(2000)).unwrap(), dec!(25.0));
        assert!(debt_to_income(Decimal::ZERO, dec!(2000)).is_err());
    }

    #[test]
    fn test_pmi_at_threshold_is_zero() {
        let policy = UnderwritingPolicy::default();
        let pmi = private_mortgage_insurance(dec!(240000), dec!(300000), &policy).unwrap();
        assert_eq!(pmi, Decimal::ZERO);
    }

    #[test]
    fn test_pmi_above_threshold() {
        let policy = UnderwritingPolicy::default();
        let pmi = private_mortgage_insurance(dec!(270000), dec!(300000), &policy).unwrap();
        assert_eq!(pmi, dec!(270000) * dec!(0.005));
        assert_eq!(pmi, dec!(1350));
    }

    #[test]
    fn test_pmi_follows_policy() {
        let policy = UnderwritingPolicy {
            pmi_annual_rate: dec!(0.01),
            pmi_ltv_threshold: dec!(85),
            ..Default::default()
        };
        assert_eq!(
            private_mortgage_insurance(dec!(252000), dec!(300000), &policy).unwrap(),
            Decimal::ZERO
        );
        assert_eq!(
            private_mortgage_insurance(dec!(270000), dec!(300000), &policy).unwrap(),
            dec!(2700)
        );
    }

    #[test]
    fn test_dti_assessment_bands() {
        let policy = UnderwritingPolicy::default();
        assert_eq!(assess_dti(dec!(36), &policy), DtiAssessment::Good);
        assert_eq!(assess_dti(dec!(40), &policy), DtiAssessment::Acceptable);
        assert_eq!(assess_dti(dec!(43), &policy), DtiAssessment::Acceptable);
        assert_eq!(assess_dti(dec!(43.01), &policy), DtiAssessment::High);
    }

    #[test]
    fn test_calculate_ratios_full() {
        let input = RatioInput {
            loan_amount: dec!(270000),
            property_value: dec!(300000),
            monthly_income: Some(dec!(6000)),
            monthly_debt: dec!(2700),
        };
        let out = calculate_ratios(&input, &UnderwritingPolicy::default()).unwrap();
        let r = &out.result;
        assert_eq!(r.loan_to_value, dec!(90));
        assert!(r.requires_pmi);
        assert_eq!(r.annual_pmi, dec!(1350));
        assert_eq!(r.monthly_pmi, dec!(112.5));
        assert_eq!(r.debt_to_income, Some(dec!(45)));
        assert_eq!(r.dti_assessment, Some(DtiAssessment::High));
        assert_eq!(out.warnings.len(), 2);
    }

    #[test]
    fn test_calculate_ratios_without_income() {
        let input = RatioInput {
            loan_amount: dec!(240000),
            property_value: dec!(300000),
            monthly_income: None,
            monthly_debt: Decimal::ZERO,
        };
        let out = calculate_ratios(&input, &UnderwritingPolicy::default()).unwrap();
        assert!(!out.result.requires_pmi);
        assert_eq!(out.result.monthly_pmi, Decimal::ZERO);
        assert!(out.result.debt_to_income.is_none());
        assert!(out.warnings.is_empty());
    }
}
