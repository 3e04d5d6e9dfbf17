use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.005 = 0.5%).
pub type Rate = Decimal;

/// Rates quoted in percentage points (4.5 = 4.5%), as borrowers quote them.
pub type Percent = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Months until an upfront cost is recovered by monthly savings.
///
/// `NotApplicable` is a result, not an error: it means there are no positive
/// savings to recover the cost with. Callers decide how to render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "months", rename_all = "snake_case")]
pub enum BreakEven {
    Months(Decimal),
    NotApplicable,
}

impl BreakEven {
    pub fn months(&self) -> Option<Decimal> {
        match self {
            BreakEven::Months(m) => Some(*m),
            BreakEven::NotApplicable => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, BreakEven::Months(_))
    }
}

impl fmt::Display for BreakEven {
    /// Renders as whole years and months, e.g. `3y 9m`, or `N/A`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakEven::Months(m) => {
                let whole = m.trunc().to_u64().unwrap_or(0);
                write!(f, "{}y {}m", whole / 12, whole % 12)
            }
            BreakEven::NotApplicable => write!(f, "N/A"),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    for w in &warnings {
        log::warn!("{methodology}: {w}");
    }
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
