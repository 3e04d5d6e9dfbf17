pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use mortgage_core::scenarios::{comparison_table, ComparisonResult};
use serde_json::Value;

use crate::OutputFormat;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Metric-by-scenario rows when the result is a scenario comparison.
pub(crate) fn comparison_rows(result: &Value) -> Option<Vec<Vec<String>>> {
    let map = result.as_object()?;
    if !(map.contains_key("scenario_names") && map.contains_key("metrics")) {
        return None;
    }
    let comparison: ComparisonResult = serde_json::from_value(result.clone()).ok()?;
    Some(comparison_table(&comparison))
}

/// Render a break-even object (`{"status": ...}`) the way people read it.
pub(crate) fn break_even_label(map: &serde_json::Map<String, Value>) -> Option<String> {
    match map.get("status")?.as_str()? {
        "not_applicable" => Some("N/A".to_string()),
        "months" => map.get("months").map(scalar_text),
        _ => None,
    }
}

pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Object(map) => break_even_label(map)
            .unwrap_or_else(|| serde_json::to_string(value).unwrap_or_default()),
        Value::Array(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
