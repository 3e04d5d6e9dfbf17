use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::MortgageError;
use crate::time_value;
use crate::types::{Money, Percent, Rate};
use crate::MortgageResult;

/// Fixed-rate loan parameters: principal, annual rate in percent, term in whole years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Annual rate in percentage points (4.5 = 4.5%).
    pub annual_rate_pct: Percent,
    pub term_years: u32,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_rate_pct: Percent, term_years: u32) -> MortgageResult<Self> {
        let terms = Self {
            principal,
            annual_rate_pct,
            term_years,
        };
        terms.validate()?;
        Ok(terms)
    }

    pub fn validate(&self) -> MortgageResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(MortgageError::invalid(
                "principal",
                "Loan principal must be positive",
            ));
        }
        if self.annual_rate_pct < Decimal::ZERO {
            return Err(MortgageError::invalid(
                "annual_rate_pct",
                "Interest rate cannot be negative",
            ));
        }
        if self.term_years == 0 {
            return Err(MortgageError::invalid(
                "term_years",
                "Loan term must be at least 1 year",
            ));
        }
        Ok(())
    }

    pub fn monthly_rate(&self) -> Rate {
        time_value::monthly_rate(self.annual_rate_pct)
    }

    pub fn num_payments(&self) -> MortgageResult<u32> {
        time_value::num_payments(self.term_years)
    }

    /// Level monthly payment; `principal / n` exactly when the rate is zero.
    pub fn monthly_payment(&self) -> MortgageResult<Money> {
        let n = self.num_payments()?;
        time_value::level_payment(self.principal, self.monthly_rate(), Decimal::from(n))
    }
}

/// Monthly payment for a fixed-rate loan.
pub fn monthly_payment(
    principal: Money,
    annual_rate_pct: Percent,
    term_years: u32,
) -> MortgageResult<Money> {
    LoanTerms::new(principal, annual_rate_pct, term_years)?.monthly_payment()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_thirty_year_payment() {
        let pmt = monthly_payment(dec!(300000), dec!(4.5), 30).unwrap();
        assert!((pmt - dec!(1520.06)).abs() < dec!(0.01));
    }

    #[test]
    fn test_fifteen_year_payment() {
        let pmt = monthly_payment(dec!(200000), dec!(3.0), 15).unwrap();
        assert!((pmt - dec!(1381.16)).abs() < dec!(0.01));
    }

    #[test]
    fn test_zero_rate_payment_is_exact() {
        let pmt = monthly_payment(dec!(100000), Decimal::ZERO, 10).unwrap();
        assert_eq!(pmt, dec!(100000) / dec!(120));
    }

    #[test]
    fn test_non_positive_principal_rejected() {
        assert!(monthly_payment(Decimal::ZERO, dec!(4.5), 30).is_err());
        assert!(monthly_payment(dec!(-1), dec!(4.5), 30).is_err());
    }

    #[test]
    fn test_negative_rate_rejected() {
        let err = monthly_payment(dec!(100000), dec!(-0.5), 30).unwrap_err();
        match err {
            MortgageError::InvalidArgument { field, .. } => assert_eq!(field, "annual_rate_pct"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_term_rejected() {
        assert!(monthly_payment(dec!(100000), dec!(4.5), 0).is_err());
    }

    #[test]
    fn test_loan_terms_derived_values() {
        let terms = LoanTerms::new(dec!(300000), dec!(4.5), 30).unwrap();
        assert_eq!(terms.monthly_rate(), dec!(0.00375));
        assert_eq!(terms.num_payments().unwrap(), 360);
    }
}
