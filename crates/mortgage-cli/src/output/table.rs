use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{comparison_rows, scalar_text};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    if let Some(rows) = comparison_rows(result) {
        let mut builder = Builder::default();
        for row in rows {
            builder.push_record(row);
        }
        println!("{}", Table::from(builder));
    } else if let Value::Object(res_map) = result {
        // Nested arrays (the payment schedule, the yearly roll-up) get their
        // own tables below the summary.
        let (arrays, fields): (Vec<_>, Vec<_>) =
            res_map.iter().partition(|(_, v)| v.is_array());

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in fields {
            builder.push_record([key.as_str(), &scalar_text(val)]);
        }
        println!("{}", Table::from(builder));

        for (key, val) in arrays {
            if let Value::Array(arr) = val {
                println!("\n{}:", key);
                print_array_table(arr);
            }
        }
    } else {
        print_flat_object(envelope);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &scalar_text(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(scalar_text).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", scalar_text(item));
        }
    }
}
