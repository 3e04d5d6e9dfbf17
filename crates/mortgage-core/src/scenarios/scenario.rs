//! A named bundle of loan parameters and the metrics derived from it.
//!
//! `Scenario` is immutable once built: every metric is a pure function of
//! its fields. It is constructed from a `ScenarioRecord`, which is also the
//! serialized shape, so loaded and hand-built scenarios pass through the
//! same validation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{equity_buildup, LoanTerms};
use crate::config::UnderwritingPolicy;
use crate::error::MortgageError;
use crate::time_value::break_even_months;
use crate::types::{with_metadata, BreakEven, ComputationOutput, Money, Percent};
use crate::underwriting::ratios;
use crate::MortgageResult;

/// Persisted field set of a scenario. Optional fields default on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub name: String,
    pub loan_amount: Money,
    /// Nominal annual rate in percentage points.
    pub interest_rate: Percent,
    pub term_years: u32,
    #[serde(default)]
    pub down_payment: Money,
    /// Defaults to loan amount plus down payment.
    #[serde(default)]
    pub property_value: Option<Money>,
    /// Points as a percentage of the loan amount.
    #[serde(default)]
    pub points_paid: Percent,
    /// Rate bought with the points, in percentage points.
    #[serde(default)]
    pub reduced_rate: Option<Percent>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ScenarioRecord {
    pub fn new(
        name: impl Into<String>,
        loan_amount: Money,
        interest_rate: Percent,
        term_years: u32,
    ) -> Self {
        Self {
            name: name.into(),
            loan_amount,
            interest_rate,
            term_years,
            down_payment: Decimal::ZERO,
            property_value: None,
            points_paid: Decimal::ZERO,
            reduced_rate: None,
            created_at: None,
        }
    }

    pub fn down_payment(mut self, down_payment: Money) -> Self {
        self.down_payment = down_payment;
        self
    }

    pub fn property_value(mut self, property_value: Money) -> Self {
        self.property_value = Some(property_value);
        self
    }

    pub fn points(mut self, points_paid: Percent, reduced_rate: Percent) -> Self {
        self.points_paid = points_paid;
        self.reduced_rate = Some(reduced_rate);
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn build(self) -> MortgageResult<Scenario> {
        Scenario::try_from(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScenarioRecord", into = "ScenarioRecord")]
pub struct Scenario {
    name: String,
    loan_amount: Money,
    interest_rate: Percent,
    term_years: u32,
    down_payment: Money,
    property_value: Money,
    points_paid: Percent,
    reduced_rate: Option<Percent>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ScenarioRecord> for Scenario {
    type Error = MortgageError;

    fn try_from(r: ScenarioRecord) -> MortgageResult<Self> {
        if r.name.trim().is_empty() {
            return Err(MortgageError::invalid("name", "Scenario name cannot be empty"));
        }
        LoanTerms::new(r.loan_amount, r.interest_rate, r.term_years)?;
        if r.down_payment < Decimal::ZERO {
            return Err(MortgageError::invalid(
                "down_payment",
                "Down payment cannot be negative",
            ));
        }
        let property_value = match r.property_value {
            Some(value) => value,
            None => r
                .loan_amount
                .checked_add(r.down_payment)
                .ok_or_else(|| MortgageError::overflow("default property value"))?,
        };
        if property_value <= Decimal::ZERO {
            return Err(MortgageError::invalid(
                "property_value",
                "Property value must be positive",
            ));
        }
        if r.points_paid < Decimal::ZERO || r.points_paid > dec!(100) {
            return Err(MortgageError::invalid(
                "points_paid",
                "Points paid must be between 0 and 100 percent of the loan",
            ));
        }
        if r.reduced_rate.is_some_and(|rate| rate < Decimal::ZERO) {
            return Err(MortgageError::invalid(
                "reduced_rate",
                "Interest rate cannot be negative",
            ));
        }

        Ok(Self {
            name: r.name,
            loan_amount: r.loan_amount,
            interest_rate: r.interest_rate,
            term_years: r.term_years,
            down_payment: r.down_payment,
            property_value,
            points_paid: r.points_paid,
            reduced_rate: r.reduced_rate,
            created_at: r.created_at.unwrap_or_else(Utc::now),
        })
    }
}

impl From<Scenario> for ScenarioRecord {
    fn from(s: Scenario) -> Self {
        Self {
            name: s.name,
            loan_amount: s.loan_amount,
            interest_rate: s.interest_rate,
            term_years: s.term_years,
            down_payment: s.down_payment,
            property_value: Some(s.property_value),
            points_paid: s.points_paid,
            reduced_rate: s.reduced_rate,
            created_at: Some(s.created_at),
        }
    }
}

/// Every per-scenario figure a comparison tabulates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMetrics {
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_cost: Money,
    pub equity_5yr: Money,
    pub equity_10yr: Money,
    pub equity_15yr: Money,
    pub break_even_point: BreakEven,
}

impl Scenario {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn loan_amount(&self) -> Money {
        self.loan_amount
    }

    pub fn interest_rate(&self) -> Percent {
        self.interest_rate
    }

    pub fn term_years(&self) -> u32 {
        self.term_years
    }

    pub fn down_payment(&self) -> Money {
        self.down_payment
    }

    pub fn property_value(&self) -> Money {
        self.property_value
    }

    pub fn points_paid(&self) -> Percent {
        self.points_paid
    }

    pub fn reduced_rate(&self) -> Option<Percent> {
        self.reduced_rate
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The reduced rate when one was bought, otherwise the nominal rate.
    pub fn effective_rate(&self) -> Percent {
        self.reduced_rate.unwrap_or(self.interest_rate)
    }

    pub fn points_cost(&self) -> Money {
        self.points_paid / dec!(100) * self.loan_amount
    }

    /// Loan terms at the effective rate.
    pub fn terms(&self) -> LoanTerms {
        LoanTerms {
            principal: self.loan_amount,
            annual_rate_pct: self.effective_rate(),
            term_years: self.term_years,
        }
    }

    pub fn monthly_payment(&self) -> MortgageResult<Money> {
        self.terms().monthly_payment()
    }

    pub fn total_interest(&self) -> MortgageResult<Money> {
        self.terms().total_interest()
    }

    /// Principal, lifetime interest and the upfront cost of points.
    pub fn total_cost(&self) -> MortgageResult<Money> {
        self.loan_amount
            .checked_add(self.total_interest()?)
            .and_then(|cost| cost.checked_add(self.points_cost()))
            .ok_or_else(|| MortgageError::overflow("scenario total cost"))
    }

    pub fn equity_at_year(&self, year: i32) -> MortgageResult<Money> {
        equity_buildup(
            self.loan_amount,
            self.effective_rate(),
            self.term_years,
            year,
            self.property_value,
            self.down_payment,
        )
    }

    /// Months for the payment reduction bought with points to repay their cost.
    ///
    /// Not applicable without points, without a reduced rate, or when the
    /// reduced rate does not undercut the nominal one.
    pub fn points_break_even_months(&self) -> MortgageResult<BreakEven> {
        let reduced = match self.reduced_rate {
            Some(rate) if !self.points_paid.is_zero() && rate < self.interest_rate => rate,
            _ => return Ok(BreakEven::NotApplicable),
        };

        let nominal = LoanTerms {
            annual_rate_pct: self.interest_rate,
            ..self.terms()
        };
        let bought = LoanTerms {
            annual_rate_pct: reduced,
            ..self.terms()
        };
        let monthly_savings = nominal.monthly_payment()? - bought.monthly_payment()?;

        break_even_months(self.points_cost(), monthly_savings)
    }

    pub fn loan_to_value(&self) -> MortgageResult<Percent> {
        ratios::loan_to_value(self.loan_amount, self.property_value)
    }

    pub fn annual_pmi(&self, policy: &UnderwritingPolicy) -> MortgageResult<Money> {
        ratios::private_mortgage_insurance(self.loan_amount, self.property_value, policy)
    }

    pub fn metrics(&self) -> MortgageResult<ScenarioMetrics> {
        Ok(ScenarioMetrics {
            monthly_payment: self.monthly_payment()?,
            total_interest: self.total_interest()?,
            total_cost: self.total_cost()?,
            equity_5yr: self.equity_at_year(5)?,
            equity_10yr: self.equity_at_year(10)?,
            equity_15yr: self.equity_at_year(15)?,
            break_even_point: self.points_break_even_months()?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    pub effective_rate: Percent,
    pub points_cost: Money,
    pub loan_to_value: Percent,
    pub annual_pmi: Money,
    #[serde(flatten)]
    pub metrics: ScenarioMetrics,
}

/// Every metric of a single scenario, with LTV and PMI.
pub fn calculate_scenario(
    scenario: &Scenario,
    policy: &UnderwritingPolicy,
) -> MortgageResult<ComputationOutput<ScenarioReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    match scenario.reduced_rate {
        Some(rate) if rate >= scenario.interest_rate => warnings.push(format!(
            "Reduced rate {rate}% does not undercut the nominal {}%; points never break even",
            scenario.interest_rate
        )),
        Some(_) if scenario.points_paid.is_zero() => {
            warnings.push("Reduced rate given without any points paid".into())
        }
        None if !scenario.points_paid.is_zero() => {
            warnings.push("Points paid without a reduced rate add cost with no savings".into())
        }
        _ => {}
    }

    let report = ScenarioReport {
        name: scenario.name.clone(),
        effective_rate: scenario.effective_rate(),
        points_cost: scenario.points_cost(),
        loan_to_value: scenario.loan_to_value()?,
        annual_pmi: scenario.annual_pmi(policy)?,
        metrics: scenario.metrics()?,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Mortgage Scenario Evaluation",
        scenario,
        warnings,
        elapsed,
        report,
    ))
}
