//! Annuity arithmetic shared by every engine: rate conversion, compounding,
//! level payments, the inverted annuity (present value of a payment stream)
//! and break-even months.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::MortgageError;
use crate::types::{BreakEven, Money, Percent, Rate};
use crate::MortgageResult;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Monthly decimal rate from an annual percentage (4.5 -> 0.00375).
pub fn monthly_rate(annual_rate_pct: Percent) -> Rate {
    annual_rate_pct / dec!(100) / Decimal::from(MONTHS_PER_YEAR)
}

/// Number of monthly payments in a term of whole years.
pub fn num_payments(term_years: u32) -> MortgageResult<u32> {
    term_years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| MortgageError::NumericOverflow {
            context: format!("payment count for {term_years} years"),
        })
}

/// (1 + r)^n for a period count that may be fractional.
pub fn compound_factor(rate: Rate, periods: Decimal) -> MortgageResult<Decimal> {
    let base = Decimal::ONE + rate;
    let factor = if periods.fract().is_zero() {
        periods.to_u64().and_then(|n| base.checked_powu(n))
    } else {
        base.checked_powd(periods)
    };
    factor.ok_or_else(|| MortgageError::NumericOverflow {
        context: format!("compounding {base} over {periods} periods"),
    })
}

/// Level payment that retires `principal` over `periods` at `rate` per period.
///
/// A zero rate amortizes linearly, `principal / periods`, since the annuity
/// formula divides by zero there.
pub fn level_payment(principal: Money, rate: Rate, periods: Decimal) -> MortgageResult<Money> {
    if periods <= Decimal::ZERO {
        return Err(MortgageError::invalid(
            "periods",
            "Number of periods must be > 0",
        ));
    }

    if rate.is_zero() {
        return Ok(principal / periods);
    }

    let factor = compound_factor(rate, periods)?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(MortgageError::DivisionByZero {
            context: "level payment annuity factor".into(),
        });
    }

    rate.checked_mul(factor)
        .and_then(|growth| principal.checked_mul(growth))
        .and_then(|numerator| numerator.checked_div(denominator))
        .ok_or_else(|| MortgageError::overflow("level payment"))
}

/// Largest principal that `payment` can service over `periods` at `rate`.
///
/// This is the annuity formula inverted: `payment * (1 - (1+r)^-n) / r`,
/// or `payment * n` when the rate is zero.
pub fn annuity_present_value(payment: Money, rate: Rate, periods: u32) -> MortgageResult<Money> {
    if rate.is_zero() {
        return payment
            .checked_mul(Decimal::from(periods))
            .ok_or_else(|| MortgageError::overflow("zero-rate annuity present value"));
    }

    let factor = compound_factor(rate, Decimal::from(periods))?;
    if factor.is_zero() {
        return Err(MortgageError::DivisionByZero {
            context: "annuity discount factor".into(),
        });
    }

    payment
        .checked_mul(Decimal::ONE - Decimal::ONE / factor)
        .and_then(|discounted| discounted.checked_div(rate))
        .ok_or_else(|| MortgageError::overflow("annuity present value"))
}

/// Months of `monthly_savings` needed to recover `upfront_cost`.
pub fn break_even_months(upfront_cost: Money, monthly_savings: Money) -> MortgageResult<BreakEven> {
    if monthly_savings <= Decimal::ZERO {
        return Ok(BreakEven::NotApplicable);
    }
    upfront_cost
        .checked_div(monthly_savings)
        .map(BreakEven::Months)
        .ok_or_else(|| MortgageError::overflow("break-even months"))
}

/// Sum that reports overflow instead of panicking.
pub fn checked_sum<I>(values: I, context: &str) -> MortgageResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or_else(|| MortgageError::overflow(context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_rate_conversion() {
        assert_eq!(monthly_rate(dec!(4.5)), dec!(0.00375));
        assert_eq!(monthly_rate(dec!(0)), Decimal::ZERO);
    }

    #[test]
    fn test_num_payments() {
        assert_eq!(num_payments(30).unwrap(), 360);
        assert!(num_payments(u32::MAX).is_err());
    }

    #[test]
    fn test_level_payment_standard() {
        let pmt = level_payment(dec!(300000), dec!(0.00375), dec!(360)).unwrap();
        // 300k at 4.5% over 30 years ≈ 1520.06
        assert!((pmt - dec!(1520.0559)).abs() < dec!(0.001));
    }

    #[test]
    fn test_level_payment_zero_rate_is_linear() {
        let pmt = level_payment(dec!(100000), Decimal::ZERO, dec!(120)).unwrap();
        assert_eq!(pmt, dec!(100000) / dec!(120));
    }

    #[test]
    fn test_level_payment_fractional_periods() {
        // 10.5 years remaining = 126 months, integral
        let whole = level_payment(dec!(100000), dec!(0.005), dec!(126)).unwrap();
        // 126.5 months goes through the fractional power
        let frac = level_payment(dec!(100000), dec!(0.005), dec!(126.5)).unwrap();
        assert!(frac < whole);
        assert!((whole - frac).abs() < dec!(5));
    }

    #[test]
    fn test_level_payment_rejects_zero_periods() {
        assert!(level_payment(dec!(1000), dec!(0.01), Decimal::ZERO).is_err());
    }

    #[test]
    fn test_annuity_present_value_inverts_level_payment() {
        let pmt = level_payment(dec!(250000), dec!(0.005), dec!(360)).unwrap();
        let pv = annuity_present_value(pmt, dec!(0.005), 360).unwrap();
        assert!((pv - dec!(250000)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_annuity_present_value_zero_rate() {
        let pv = annuity_present_value(dec!(1000), Decimal::ZERO, 120).unwrap();
        assert_eq!(pv, dec!(120000));
    }

    #[test]
    fn test_break_even_months() {
        assert_eq!(
            break_even_months(dec!(4500), dec!(100)).unwrap(),
            BreakEven::Months(dec!(45))
        );
        assert_eq!(
            break_even_months(dec!(4500), Decimal::ZERO).unwrap(),
            BreakEven::NotApplicable
        );
        assert_eq!(
            break_even_months(dec!(4500), dec!(-25)).unwrap(),
            BreakEven::NotApplicable
        );
    }

    #[test]
    fn test_break_even_months_overflow_is_an_error() {
        let err = break_even_months(Decimal::MAX, dec!(0.0001)).unwrap_err();
        assert!(matches!(err, MortgageError::NumericOverflow { .. }));
    }

    #[test]
    fn test_annuity_present_value_overflow_is_an_error() {
        let err = annuity_present_value(Decimal::MAX, Decimal::ZERO, 360).unwrap_err();
        assert!(matches!(err, MortgageError::NumericOverflow { .. }));
        let err = annuity_present_value(Decimal::MAX, dec!(0.00375), 360).unwrap_err();
        assert!(matches!(err, MortgageError::NumericOverflow { .. }));
    }

    #[test]
    fn test_checked_sum() {
        assert_eq!(checked_sum([dec!(1.5), dec!(2.5)], "sum").unwrap(), dec!(4));
        let err = checked_sum([Decimal::MAX, Decimal::ONE], "sum").unwrap_err();
        assert!(matches!(err, MortgageError::NumericOverflow { .. }));
    }

    #[test]
    fn test_compound_factor_overflow_is_an_error() {
        assert!(compound_factor(dec!(0.5), dec!(100000)).is_err());
    }
}
