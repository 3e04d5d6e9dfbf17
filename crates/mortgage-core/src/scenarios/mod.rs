pub mod comparison;
pub mod scenario;

pub use comparison::{compare, comparison_table, ComparisonMetrics, ComparisonResult};
pub use scenario::{Scenario, ScenarioMetrics, ScenarioRecord};
