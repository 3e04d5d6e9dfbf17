use serde_json::Value;
use std::io;

use super::{comparison_rows, scalar_text};

/// Write output as CSV to stdout.
///
/// Schedules come out one row per payment, comparisons one row per metric,
/// everything else as field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(rows) = comparison_rows(result) {
        for row in rows {
            let _ = wtr.write_record(&row);
        }
    } else if let Some(Value::Array(schedule)) = result.get("schedule") {
        write_array_csv(&mut wtr, schedule);
    } else if let Value::Object(map) = result {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in map {
            let _ = wtr.write_record([key.as_str(), &scalar_text(val)]);
        }
    } else if let Value::Array(arr) = result {
        write_array_csv(&mut wtr, arr);
    } else {
        let _ = wtr.write_record([&scalar_text(result)]);
    }

    let _ = wtr.flush();
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&scalar_text(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(scalar_text).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
