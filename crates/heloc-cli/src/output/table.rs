use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::SCHEDULE_KEYS;

/// Per-month columns shown in schedule tables; the full row set is only
/// available in JSON/CSV output.
const SCHEDULE_COLUMNS: [&str; 8] = [
    "month",
    "beginning_balance",
    "beginning_mortgage_balance",
    "principal_payment",
    "mortgage_principal",
    "interest_payment",
    "mortgage_interest",
    "ending_balance",
];

const MAX_SCHEDULE_ROWS: usize = 24;

/// Format output as tables: scalar result fields first, then a truncated
/// per-month schedule when the result carries one.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => print_array_table(arr, None),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &serde_json::Map<String, Value>) {
    if let Value::Object(result_map) = result {
        // Scalars and small nested objects first.
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in result_map {
            if SCHEDULE_KEYS.contains(&key.as_str()) {
                continue;
            }
            match val {
                Value::Object(nested) => {
                    for (nested_key, nested_val) in nested {
                        builder.push_record([
                            format!("{key}.{nested_key}").as_str(),
                            &format_value(nested_val),
                        ]);
                    }
                }
                _ => builder.push_record([key.as_str(), &format_value(val)]),
            }
        }
        println!("{}", Table::from(builder));

        // Then the schedule detail, truncated for the terminal.
        for schedule_key in SCHEDULE_KEYS {
            if let Some(Value::Array(rows)) = result_map.get(schedule_key) {
                if rows.is_empty() {
                    continue;
                }
                println!("\n{} (first {} months):", schedule_key, MAX_SCHEDULE_ROWS.min(rows.len()));
                print_array_table(&rows[..rows.len().min(MAX_SCHEDULE_ROWS)], Some(&SCHEDULE_COLUMNS));
            }
        }
    } else {
        print_flat_object(&Value::Object(envelope.clone()));
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for warning in warnings {
                if let Value::String(s) = warning {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {}", methodology);
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_array_table(arr: &[Value], column_filter: Option<&[&str]>) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first
            .keys()
            .filter(|k| column_filter.is_none_or(|cols| cols.contains(&k.as_str())))
            .cloned()
            .collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
