//! Side-by-side comparison of scenarios. Column order is the caller's input
//! order; nothing is sorted or de-duplicated.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

use super::scenario::{Scenario, ScenarioMetrics};
use crate::error::MortgageError;
use crate::types::{with_metadata, BreakEven, ComputationOutput, Money};
use crate::MortgageResult;

/// Per-metric columns, each index-aligned with `ComparisonResult::scenario_names`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetrics {
    pub monthly_payment: Vec<Money>,
    pub total_interest: Vec<Money>,
    pub total_cost: Vec<Money>,
    pub equity_5yr: Vec<Money>,
    pub equity_10yr: Vec<Money>,
    pub equity_15yr: Vec<Money>,
    pub break_even_point: Vec<BreakEven>,
}

impl ComparisonMetrics {
    fn push(&mut self, m: ScenarioMetrics) {
        self.monthly_payment.push(m.monthly_payment);
        self.total_interest.push(m.total_interest);
        self.total_cost.push(m.total_cost);
        self.equity_5yr.push(m.equity_5yr);
        self.equity_10yr.push(m.equity_10yr);
        self.equity_15yr.push(m.equity_15yr);
        self.break_even_point.push(m.break_even_point);
    }

    /// Money-valued rows as (label, values), in display order.
    pub fn amount_rows(&self) -> [(&'static str, &[Money]); 6] {
        [
            ("Monthly Payment", self.monthly_payment.as_slice()),
            ("Total Interest", self.total_interest.as_slice()),
            ("Total Cost", self.total_cost.as_slice()),
            ("Equity (5 years)", self.equity_5yr.as_slice()),
            ("Equity (10 years)", self.equity_10yr.as_slice()),
            ("Equity (15 years)", self.equity_15yr.as_slice()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub scenario_names: Vec<String>,
    pub metrics: ComparisonMetrics,
}

impl ComparisonResult {
    pub fn len(&self) -> usize {
        self.scenario_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenario_names.is_empty()
    }
}

#[cfg(feature = "parallel")]
fn evaluate_all(scenarios: &[Scenario]) -> MortgageResult<Vec<ScenarioMetrics>> {
    use rayon::prelude::*;
    scenarios.par_iter().map(Scenario::metrics).collect()
}

#[cfg(not(feature = "parallel"))]
fn evaluate_all(scenarios: &[Scenario]) -> MortgageResult<Vec<ScenarioMetrics>> {
    scenarios.iter().map(Scenario::metrics).collect()
}

/// Evaluate every scenario and tabulate the results column by column.
///
/// Fails as a whole if any scenario fails; there are no partial results.
pub fn compare(scenarios: &[Scenario]) -> MortgageResult<ComparisonResult> {
    if scenarios.is_empty() {
        return Err(MortgageError::invalid(
            "scenarios",
            "At least one scenario is required for a comparison",
        ));
    }

    let evaluated = evaluate_all(scenarios)?;

    let mut metrics = ComparisonMetrics::default();
    for m in evaluated {
        metrics.push(m);
    }

    Ok(ComparisonResult {
        scenario_names: scenarios.iter().map(|s| s.name().to_string()).collect(),
        metrics,
    })
}

/// Display rows: a header of scenario names, then one row per metric.
/// Money is shown to the cent and break-evens as `{y}y {m}m` or `N/A`.
pub fn comparison_table(result: &ComparisonResult) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(8);

    let mut header = vec!["Metric".to_string()];
    header.extend(result.scenario_names.iter().cloned());
    rows.push(header);

    for (label, values) in result.metrics.amount_rows() {
        let mut row = vec![label.to_string()];
        row.extend(values.iter().map(|v| format!("${:.2}", v.round_dp(2))));
        rows.push(row);
    }

    let mut break_even = vec!["Break-even Point".to_string()];
    break_even.extend(result.metrics.break_even_point.iter().map(|b| b.to_string()));
    rows.push(break_even);

    rows
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub scenarios: Vec<Scenario>,
}

pub fn compare_scenarios(
    input: &ComparisonInput,
) -> MortgageResult<ComputationOutput<ComparisonResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = compare(&input.scenarios)?;

    let mut seen = HashSet::new();
    for name in &result.scenario_names {
        if !seen.insert(name.as_str()) {
            warnings.push(format!(
                "Scenario name '{name}' appears more than once; each is kept as its own column"
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Mortgage Scenario Comparison",
        &serde_json::json!({
            "num_scenarios": result.len(),
            "equity_years": [5, 10, 15],
        }),
        warnings,
        elapsed,
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::ScenarioRecord;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn thirty_year() -> Scenario {
        ScenarioRecord::new("Scenario 1", dec!(300000), dec!(4.5), 30)
            .down_payment(dec!(60000))
            .build()
            .unwrap()
    }

    fn fifteen_year() -> Scenario {
        ScenarioRecord::new("Scenario 2", dec!(300000), dec!(4.0), 15)
            .down_payment(dec!(60000))
            .build()
            .unwrap()
    }

    fn points() -> Scenario {
        ScenarioRecord::new("Points", dec!(300000), dec!(4.5), 30)
            .points(dec!(1.5), dec!(4.0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_comparison_fails() {
        let err = compare(&[]).unwrap_err();
        assert!(matches!(err, MortgageError::InvalidArgument { .. }));
    }

    #[test]
    fn test_columns_follow_input_order() {
        let result = compare(&[thirty_year(), fifteen_year()]).unwrap();
        assert_eq!(result.scenario_names, vec!["Scenario 1", "Scenario 2"]);

        let m = &result.metrics;
        for len in [
            m.monthly_payment.len(),
            m.total_interest.len(),
            m.total_cost.len(),
            m.equity_5yr.len(),
            m.equity_10yr.len(),
            m.equity_15yr.len(),
            m.break_even_point.len(),
        ] {
            assert_eq!(len, 2);
        }

        assert!(m.monthly_payment[1] > m.monthly_payment[0]);
        assert!(m.total_interest[1] < m.total_interest[0]);
    }

    #[test]
    fn test_result_is_independent_of_source_list() {
        let mut scenarios = vec![thirty_year(), fifteen_year()];
        let result = compare(&scenarios).unwrap();
        scenarios.reverse();
        assert_eq!(result.scenario_names, vec!["Scenario 1", "Scenario 2"]);
        assert_eq!(
            result.metrics.monthly_payment[0],
            scenarios[1].monthly_payment().unwrap()
        );
    }

    #[test]
    fn test_metrics_match_scenario() {
        let s = points();
        let result = compare(std::slice::from_ref(&s)).unwrap();
        let expected = s.metrics().unwrap();
        assert_eq!(result.metrics.monthly_payment, vec![expected.monthly_payment]);
        assert_eq!(result.metrics.total_cost, vec![expected.total_cost]);
        assert_eq!(result.metrics.equity_10yr, vec![s.equity_at_year(10).unwrap()]);
        assert_eq!(result.metrics.break_even_point, vec![expected.break_even_point]);
    }

    #[test]
    fn test_fifteen_year_equity_column_is_property_value() {
        let result = compare(&[fifteen_year()]).unwrap();
        assert_eq!(result.metrics.equity_15yr, vec![dec!(360000)]);
    }

    #[test]
    fn test_duplicate_names_stay_distinct() {
        let input = ComparisonInput {
            scenarios: vec![thirty_year(), thirty_year()],
        };
        let out = compare_scenarios(&input).unwrap();
        assert_eq!(out.result.len(), 2);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_comparison_table() {
        let result = compare(&[thirty_year(), points()]).unwrap();
        let table = comparison_table(&result);
        assert_eq!(table.len(), 8);
        assert_eq!(table[0], vec!["Metric", "Scenario 1", "Points"]);
        assert_eq!(table[1][0], "Monthly Payment");
        assert_eq!(table[1][1], "$1520.06");
        assert_eq!(table[1][2], "$1432.25");
        assert_eq!(table[7][0], "Break-even Point");
        assert_eq!(table[7][1], "N/A");
        assert_eq!(table[7][2], "4y 3m");
    }

    #[test]
    fn test_failure_is_fail_fast() {
        // A scenario cannot be built invalid, so feed one through serde with a
        // term large enough to overflow compounding.
        let huge: Scenario = serde_json::from_value(serde_json::json!({
            "name": "Overflow",
            "loan_amount": 100000,
            "interest_rate": 99,
            "term_years": 2000
        }))
        .unwrap();
        assert!(compare(&[thirty_year(), huge]).is_err());
    }
}
