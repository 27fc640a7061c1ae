use loan_calc_core::Currency;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::currency;
use super::{envelope_currency, ROW_FIELDS};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            // Check if "result" key holds the primary data
            if let Some(result) = map.get("result") {
                let ccy = envelope_currency(value).map(Currency::from_code);
                print_result_table(result, map, ccy.as_ref());
            } else {
                print_flat_object(map, None);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr, None);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>, ccy: Option<&Currency>) {
    if let Value::Object(res_map) = result {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        let mut row_sections: Vec<(&str, &Vec<Value>)> = Vec::new();

        for (key, val) in res_map {
            match val {
                Value::Array(rows) if ROW_FIELDS.contains(&key.as_str()) => {
                    row_sections.push((key.as_str(), rows));
                }
                Value::Object(section) => {
                    // summary block flattens into the field table
                    for (sub_key, sub_val) in section {
                        let label = format!("{key}.{sub_key}");
                        builder.push_record([label, format_cell(sub_key, sub_val, ccy)]);
                    }
                }
                _ => {
                    builder.push_record([key.clone(), format_cell(key, val, ccy)]);
                }
            }
        }
        println!("{}", Table::from(builder));

        for (name, rows) in row_sections {
            println!("\n{}:", name);
            print_array_table(rows, ccy);
        }
    } else {
        print_flat_object(envelope, ccy);
    }

    // Print warnings if any
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

    // Print methodology
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(map: &Map<String, Value>, ccy: Option<&Currency>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.clone(), format_cell(key, val, ccy)]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value], ccy: Option<&Currency>) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    // Collect all keys from first object for headers
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.clone());

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        map.get(h.as_str())
                            .map(|v| format_cell(h, v, ccy))
                            .unwrap_or_default()
                    })
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

fn format_cell(key: &str, value: &Value, ccy: Option<&Currency>) -> String {
    currency::format_field(key, value, ccy).unwrap_or_else(|| format_value(value))
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
