//! Underwriting policy: the lending rules that size affordability, price PMI
//! and grade debt-to-income. Defaults are the conventional rules of thumb.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MortgageError;
use crate::types::{Percent, Rate};
use crate::MortgageResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnderwritingPolicy {
    /// Share of gross monthly income available for all debt including PITI (0.43 = 43%).
    pub max_dti: Rate,
    /// DTI at or below which the borrower is graded "good", in percent.
    pub dti_good_threshold: Percent,
    /// DTI at or below which the borrower is graded "acceptable", in percent.
    pub dti_acceptable_threshold: Percent,
    /// LTV above which PMI is charged, in percent.
    pub pmi_ltv_threshold: Percent,
    /// Annual PMI premium as a fraction of the loan amount.
    pub pmi_annual_rate: Rate,
    /// Annual property tax as a fraction of the price, used when the caller gives none.
    pub property_tax_rate: Rate,
    /// Annual homeowner's insurance as a fraction of the price, used when the caller gives none.
    pub insurance_rate: Rate,
}

impl Default for UnderwritingPolicy {
    fn default() -> Self {
        Self {
            max_dti: dec!(0.43),
            dti_good_threshold: dec!(36),
            dti_acceptable_threshold: dec!(43),
            pmi_ltv_threshold: dec!(80),
            pmi_annual_rate: dec!(0.005),
            property_tax_rate: dec!(0.0125),
            insurance_rate: dec!(0.0035),
        }
    }
}

impl UnderwritingPolicy {
    pub fn validate(&self) -> MortgageResult<()> {
        if self.max_dti <= Decimal::ZERO || self.max_dti > Decimal::ONE {
            return Err(MortgageError::invalid(
                "max_dti",
                "Maximum DTI must be in (0, 1]",
            ));
        }
        for (field, value) in [
            ("dti_good_threshold", self.dti_good_threshold),
            ("dti_acceptable_threshold", self.dti_acceptable_threshold),
            ("pmi_ltv_threshold", self.pmi_ltv_threshold),
        ] {
            if value < Decimal::ZERO || value > dec!(100) {
                return Err(MortgageError::invalid(
                    field,
                    "Threshold must be a percentage between 0 and 100",
                ));
            }
        }
        if self.dti_good_threshold > self.dti_acceptable_threshold {
            return Err(MortgageError::invalid(
                "dti_good_threshold",
                "Good DTI threshold cannot exceed the acceptable threshold",
            ));
        }
        for (field, value) in [
            ("pmi_annual_rate", self.pmi_annual_rate),
            ("property_tax_rate", self.property_tax_rate),
            ("insurance_rate", self.insurance_rate),
        ] {
            if value < Decimal::ZERO {
                return Err(MortgageError::invalid(field, "Rate cannot be negative"));
            }
        }
        Ok(())
    }
}
