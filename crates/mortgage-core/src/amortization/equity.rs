use rust_decimal::Decimal;

use super::payment::LoanTerms;
use crate::error::MortgageError;
use crate::time_value::MONTHS_PER_YEAR;
use crate::types::{Money, Percent};
use crate::MortgageResult;

/// Owner's equity `year` years into a fixed-rate loan.
///
/// Before the first year this is the down payment. From the end of the term
/// onwards the loan is retired and the whole property value is equity.
/// In between it is the down payment plus the principal repaid so far.
pub fn equity_buildup(
    principal: Money,
    annual_rate_pct: Percent,
    term_years: u32,
    year: i32,
    property_value: Money,
    down_payment: Money,
) -> MortgageResult<Money> {
    let terms = LoanTerms::new(principal, annual_rate_pct, term_years)?;
    if property_value <= Decimal::ZERO {
        return Err(MortgageError::invalid(
            "property_value",
            "Property value must be positive",
        ));
    }

    if year <= 0 {
        return Ok(down_payment);
    }
    let year = year.unsigned_abs();
    if year >= term_years {
        return Ok(property_value);
    }

    let schedule = terms.schedule()?;
    let paid = (year * MONTHS_PER_YEAR).min(schedule.len() as u32) as usize;
    let balance = schedule[paid - 1].remaining_balance;

    down_payment
        .checked_add(principal - balance)
        .ok_or_else(|| MortgageError::overflow("equity build-up"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_equity_before_first_year_is_down_payment() {
        let eq = equity_buildup(dec!(300000), dec!(4.5), 30, 0, dec!(360000), dec!(60000)).unwrap();
        assert_eq!(eq, dec!(60000));
        let eq = equity_buildup(dec!(300000), dec!(4.5), 30, -3, dec!(360000), dec!(60000)).unwrap();
        assert_eq!(eq, dec!(60000));
    }

    #[test]
    fn test_equity_after_five_years() {
        let eq = equity_buildup(dec!(300000), dec!(4.5), 30, 5, dec!(360000), dec!(60000)).unwrap();
        // Balance after 60 payments ≈ 273473.75
        assert!((eq - dec!(86526.25)).abs() < dec!(0.01));
        assert!(eq > dec!(60000) && eq < dec!(360000));
    }

    #[test]
    fn test_equity_at_and_beyond_term_is_property_value() {
        for year in [30, 31, 100] {
            let eq = equity_buildup(dec!(300000), dec!(4.5), 30, year, dec!(360000), dec!(60000))
                .unwrap();
            assert_eq!(eq, dec!(360000));
        }
    }

    #[test]
    fn test_equity_rejects_invalid_loan() {
        assert!(equity_buildup(dec!(0), dec!(4.5), 30, 5, dec!(360000), dec!(60000)).is_err());
        assert!(equity_buildup(dec!(300000), dec!(4.5), 30, 5, dec!(0), dec!(60000)).is_err());
    }
}
