pub mod csv_out;
pub mod currency;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => log::error!("could not serialize result as JSON: {e}"),
    }
}

/// Array-of-rows fields that tabular formats render as their own table,
/// in the order CSV export prefers them.
pub(crate) const ROW_FIELDS: [&str; 4] = [
    "schedule",
    "series",
    "cost_breakdown",
    "first_payment_breakdown",
];

/// Currency code recorded in the envelope assumptions, if any.
pub(crate) fn envelope_currency(value: &Value) -> Option<&str> {
    value
        .get("assumptions")
        .and_then(|a| a.get("currency"))
        .and_then(Value::as_str)
}
