//! `MortgageEngine` bundles a validated underwriting policy with every
//! calculation, so callers construct one value and pass it where needed.

use crate::amortization::{self, PaymentRecord};
use crate::config::UnderwritingPolicy;
use crate::types::{Money, Percent};
use crate::underwriting::ratios;
use crate::MortgageResult;

#[cfg(feature = "affordability")]
use crate::underwriting::affordability::{self, AffordabilityInput, AffordabilityOutput};

#[cfg(feature = "refinance")]
use crate::refinance::{self, RefinanceAnalysis, RefinanceInput};

#[cfg(feature = "scenarios")]
use crate::scenarios::{ComparisonResult, Scenario};

#[derive(Debug, Clone, Default)]
pub struct MortgageEngine {
    policy: UnderwritingPolicy,
}

impl MortgageEngine {
    pub fn new(policy: UnderwritingPolicy) -> MortgageResult<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &UnderwritingPolicy {
        &self.policy
    }

    pub fn monthly_payment(
        &self,
        principal: Money,
        annual_rate_pct: Percent,
        term_years: u32,
    ) -> MortgageResult<Money> {
        amortization::monthly_payment(principal, annual_rate_pct, term_years)
    }

    pub fn generate_schedule(
        &self,
        principal: Money,
        annual_rate_pct: Percent,
        term_years: u32,
    ) -> MortgageResult<Vec<PaymentRecord>> {
        amortization::generate_schedule(principal, annual_rate_pct, term_years)
    }

    pub fn total_interest(
        &self,
        principal: Money,
        annual_rate_pct: Percent,
        term_years: u32,
    ) -> MortgageResult<Money> {
        amortization::total_interest(principal, annual_rate_pct, term_years)
    }

    pub fn loan_to_value(&self, loan_amount: Money, property_value: Money) -> MortgageResult<Percent> {
        ratios::loan_to_value(loan_amount, property_value)
    }

    pub fn debt_to_income(&self, monthly_income: Money, monthly_debt: Money) -> MortgageResult<Percent> {
        ratios::debt_to_income(monthly_income, monthly_debt)
    }

    /// Annual PMI premium under this engine's policy.
    pub fn private_mortgage_insurance(
        &self,
        loan_amount: Money,
        property_value: Money,
    ) -> MortgageResult<Money> {
        ratios::private_mortgage_insurance(loan_amount, property_value, &self.policy)
    }

    /// Maximum affordable price using the policy's tax and insurance rates.
    #[cfg(feature = "affordability")]
    pub fn max_affordable_price(
        &self,
        monthly_income: Money,
        monthly_debts: Money,
        down_payment: Money,
        annual_rate_pct: Percent,
        term_years: u32,
    ) -> MortgageResult<Money> {
        let input = AffordabilityInput {
            monthly_income,
            monthly_debts,
            down_payment,
            annual_rate_pct,
            term_years,
            property_tax_rate: None,
            insurance_rate: None,
        };
        Ok(self.affordability(&input)?.max_price)
    }

    #[cfg(feature = "affordability")]
    pub fn affordability(&self, input: &AffordabilityInput) -> MortgageResult<AffordabilityOutput> {
        affordability::max_affordable_price(input, &self.policy)
    }

    #[cfg(feature = "refinance")]
    pub fn analyze_refinance(&self, input: &RefinanceInput) -> MortgageResult<RefinanceAnalysis> {
        refinance::analyze_refinance(input)
    }

    #[cfg(feature = "scenarios")]
    pub fn compare(&self, scenarios: &[Scenario]) -> MortgageResult<ComparisonResult> {
        crate::scenarios::compare(scenarios)
    }
}
