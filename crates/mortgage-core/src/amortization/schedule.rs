use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::payment::LoanTerms;
use crate::error::MortgageError;
use crate::time_value::{checked_sum, MONTHS_PER_YEAR};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::MortgageResult;

/// Annual rate above which results are flagged as unusual.
const HIGH_RATE_WARNING_PCT: Decimal = dec!(20);

/// One monthly payment of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// 1-based position in the schedule.
    pub payment_number: u32,
    pub payment_amount: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    /// Balance after this payment.
    pub remaining_balance: Money,
}

/// Principal and interest paid within one loan year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationYear {
    pub year: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub ending_balance: Money,
}

/// Headline figures for a fixed-rate loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub monthly_payment: Money,
    pub num_payments: u32,
    pub total_interest: Money,
    /// Principal plus total interest.
    pub total_cost: Money,
}

/// Full amortization: summary, yearly roll-up and every payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    #[serde(flatten)]
    pub summary: PaymentSummary,
    pub annual_summary: Vec<AmortizationYear>,
    pub schedule: Vec<PaymentRecord>,
}

impl LoanTerms {
    /// Payment-by-payment schedule. Each call builds a fresh schedule.
    pub fn schedule(&self) -> MortgageResult<Vec<PaymentRecord>> {
        self.validate()?;
        let rate = self.monthly_rate();
        let n = self.num_payments()?;
        let payment = self.monthly_payment()?;

        let mut records = Vec::with_capacity(n as usize);
        let mut balance = self.principal;

        for payment_number in 1..=n {
            let interest = balance
                .checked_mul(rate)
                .ok_or_else(|| MortgageError::overflow("schedule interest"))?;
            let principal_portion = payment - interest;
            balance -= principal_portion;

            records.push(PaymentRecord {
                payment_number,
                payment_amount: payment,
                principal_portion,
                interest_portion: interest,
                remaining_balance: balance,
            });
        }

        absorb_final_residual(&mut records);
        Ok(records)
    }

    /// Sum of the interest column of the schedule.
    pub fn total_interest(&self) -> MortgageResult<Money> {
        checked_sum(
            self.schedule()?.iter().map(|r| r.interest_portion),
            "total interest",
        )
    }
}

/// Fold whatever balance drift is left after the last payment into its
/// principal portion so the loan closes at exactly zero.
fn absorb_final_residual(records: &mut [PaymentRecord]) {
    if let Some(last) = records.last_mut() {
        last.principal_portion += last.remaining_balance;
        last.remaining_balance = Decimal::ZERO;
    }
}

/// Amortization schedule for a fixed-rate loan.
pub fn generate_schedule(
    principal: Money,
    annual_rate_pct: Percent,
    term_years: u32,
) -> MortgageResult<Vec<PaymentRecord>> {
    LoanTerms::new(principal, annual_rate_pct, term_years)?.schedule()
}

/// Total interest paid over the life of the loan (sum of schedule interest).
pub fn total_interest(
    principal: Money,
    annual_rate_pct: Percent,
    term_years: u32,
) -> MortgageResult<Money> {
    LoanTerms::new(principal, annual_rate_pct, term_years)?.total_interest()
}

/// Roll a schedule up into loan years.
pub fn annual_summary(schedule: &[PaymentRecord]) -> MortgageResult<Vec<AmortizationYear>> {
    schedule
        .chunks(MONTHS_PER_YEAR as usize)
        .zip(1u32..)
        .map(|(months, year)| {
            Ok(AmortizationYear {
                year,
                principal_paid: checked_sum(
                    months.iter().map(|r| r.principal_portion),
                    "annual principal",
                )?,
                interest_paid: checked_sum(
                    months.iter().map(|r| r.interest_portion),
                    "annual interest",
                )?,
                ending_balance: months
                    .last()
                    .map(|r| r.remaining_balance)
                    .unwrap_or(Decimal::ZERO),
            })
        })
        .collect()
}

fn summarize(terms: &LoanTerms, schedule: &[PaymentRecord]) -> MortgageResult<PaymentSummary> {
    let total_interest = checked_sum(schedule.iter().map(|r| r.interest_portion), "total interest")?;
    let total_cost = terms
        .principal
        .checked_add(total_interest)
        .ok_or_else(|| MortgageError::overflow("total cost"))?;
    Ok(PaymentSummary {
        monthly_payment: terms.monthly_payment()?,
        num_payments: terms.num_payments()?,
        total_interest,
        total_cost,
    })
}

fn rate_warnings(terms: &LoanTerms) -> Vec<String> {
    let mut warnings = Vec::new();
    if terms.annual_rate_pct.is_zero() {
        warnings.push("Zero interest rate: principal amortizes linearly".into());
    } else if terms.annual_rate_pct > HIGH_RATE_WARNING_PCT {
        warnings.push(format!(
            "Annual rate of {}% is unusually high",
            terms.annual_rate_pct
        ));
    }
    warnings
}

/// Monthly payment, total interest and total cost, without the schedule.
pub fn calculate_payment(terms: &LoanTerms) -> MortgageResult<ComputationOutput<PaymentSummary>> {
    let start = Instant::now();
    terms.validate()?;

    let schedule = terms.schedule()?;
    let summary = summarize(terms, &schedule)?;
    log::debug!(
        "payment {} over {} months, total interest {}",
        summary.monthly_payment,
        summary.num_payments,
        summary.total_interest
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Level Payment",
        terms,
        rate_warnings(terms),
        elapsed,
        summary,
    ))
}

/// Full amortization schedule with a yearly roll-up.
pub fn calculate_amortization(
    terms: &LoanTerms,
) -> MortgageResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    terms.validate()?;

    let schedule = terms.schedule()?;
    let output = AmortizationOutput {
        summary: summarize(terms, &schedule)?,
        annual_summary: annual_summary(&schedule)?,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Amortization Schedule",
        terms,
        rate_warnings(terms),
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn assert_principal_retired(principal: Money, rate: Percent, years: u32) {
        let schedule = generate_schedule(principal, rate, years).unwrap();
        assert_eq!(schedule.len(), (years * 12) as usize);

        let principal_sum: Money = schedule.iter().map(|r| r.principal_portion).sum();
        assert!(
            (principal_sum - principal).abs() <= dec!(0.01),
            "principal sum {principal_sum} != {principal}"
        );
        assert_eq!(schedule.last().unwrap().remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_schedule_retires_principal() {
        assert_principal_retired(dec!(300000), dec!(4.5), 30);
        assert_principal_retired(dec!(200000), dec!(3.0), 15);
        assert_principal_retired(dec!(123456.78), dec!(7.125), 10);
        assert_principal_retired(dec!(50000), dec!(12), 1);
    }

    #[test]
    fn test_zero_rate_schedule() {
        assert_principal_retired(dec!(100000), Decimal::ZERO, 10);
        let schedule = generate_schedule(dec!(100000), Decimal::ZERO, 10).unwrap();
        assert!(schedule.iter().all(|r| r.interest_portion.is_zero()));
    }

    #[test]
    fn test_first_payment_split() {
        let schedule = generate_schedule(dec!(300000), dec!(4.5), 30).unwrap();
        let first = &schedule[0];
        assert_eq!(first.payment_number, 1);
        // 300000 * 0.00375
        assert_eq!(first.interest_portion, dec!(1125));
        assert!((first.principal_portion - dec!(395.06)).abs() < dec!(0.01));
        assert!((first.remaining_balance - dec!(299604.94)).abs() < dec!(0.01));
    }

    #[test]
    fn test_record_invariants_hold() {
        let rate = crate::time_value::monthly_rate(dec!(4.5));
        let schedule = generate_schedule(dec!(300000), dec!(4.5), 30).unwrap();
        let mut balance = dec!(300000);
        for r in &schedule[..schedule.len() - 1] {
            assert_eq!(r.interest_portion, balance * rate);
            assert_eq!(r.principal_portion, r.payment_amount - r.interest_portion);
            assert_eq!(r.remaining_balance, balance - r.principal_portion);
            balance = r.remaining_balance;
        }
    }

    #[test]
    fn test_payment_amount_constant() {
        let schedule = generate_schedule(dec!(250000), dec!(6.25), 20).unwrap();
        let pmt = schedule[0].payment_amount;
        assert!(schedule.iter().all(|r| r.payment_amount == pmt));
    }

    #[test]
    fn test_schedule_is_restartable() {
        let a = generate_schedule(dec!(180000), dec!(5.0), 15).unwrap();
        let b = generate_schedule(dec!(180000), dec!(5.0), 15).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_total_interest_thirty_year() {
        let interest = total_interest(dec!(300000), dec!(4.5), 30).unwrap();
        assert!((interest - dec!(247220.13)).abs() < dec!(0.01));
    }

    #[test]
    fn test_total_interest_fifteen_year() {
        let interest = total_interest(dec!(200000), dec!(3.0), 15).unwrap();
        assert!((interest - dec!(48609.39)).abs() < dec!(0.01));
    }

    #[test]
    fn test_total_interest_matches_schedule_column() {
        let schedule = generate_schedule(dec!(315000), dec!(6.875), 30).unwrap();
        let column: Money = schedule.iter().map(|r| r.interest_portion).sum();
        assert_eq!(total_interest(dec!(315000), dec!(6.875), 30).unwrap(), column);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(generate_schedule(Decimal::ZERO, dec!(4.5), 30).is_err());
        assert!(generate_schedule(dec!(1000), dec!(-1), 30).is_err());
        assert!(generate_schedule(dec!(1000), dec!(4.5), 0).is_err());
        assert!(total_interest(dec!(1000), dec!(4.5), 0).is_err());
    }

    #[test]
    fn test_annual_summary() {
        let schedule = generate_schedule(dec!(300000), dec!(4.5), 30).unwrap();
        let years = annual_summary(&schedule).unwrap();
        assert_eq!(years.len(), 30);
        assert_eq!(years[0].year, 1);
        assert_eq!(years[29].ending_balance, Decimal::ZERO);
        assert_eq!(years[4].ending_balance, schedule[59].remaining_balance);

        let interest: Money = years.iter().map(|y| y.interest_paid).sum();
        let column: Money = schedule.iter().map(|r| r.interest_portion).sum();
        assert!((interest - column).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_calculate_amortization_envelope() {
        let terms = LoanTerms::new(dec!(300000), dec!(4.5), 30).unwrap();
        let out = calculate_amortization(&terms).unwrap();
        assert_eq!(out.result.schedule.len(), 360);
        assert_eq!(out.result.summary.num_payments, 360);
        assert_eq!(
            out.result.summary.total_cost,
            dec!(300000) + out.result.summary.total_interest
        );
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_calculate_payment_warnings() {
        let zero = LoanTerms::new(dec!(100000), Decimal::ZERO, 10).unwrap();
        let out = calculate_payment(&zero).unwrap();
        assert_eq!(out.result.monthly_payment, dec!(100000) / dec!(120));
        assert_eq!(out.warnings.len(), 1);

        let steep = LoanTerms::new(dec!(100000), dec!(24), 10).unwrap();
        let out = calculate_payment(&steep).unwrap();
        assert!(out.warnings[0].contains("unusually high"));
    }

    #[test]
    fn test_calculate_payment_rejects_unvalidated_terms() {
        let terms = LoanTerms {
            principal: dec!(100000),
            annual_rate_pct: dec!(4.5),
            term_years: 0,
        };
        assert!(calculate_payment(&terms).is_err());
    }

    #[test]
    fn test_total_cost_overflow_is_an_error() {
        // Interest on a principal this close to Decimal::MAX pushes the total past it.
        let terms = LoanTerms::new(dec!(50000000000000000000000000000), dec!(4.5), 30).unwrap();
        let err = calculate_payment(&terms).unwrap_err();
        assert!(matches!(err, MortgageError::NumericOverflow { .. }));
        let err = calculate_amortization(&terms).unwrap_err();
        assert!(matches!(err, MortgageError::NumericOverflow { .. }));
    }
}
