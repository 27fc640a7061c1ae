use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Serialize;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn to_json(output: &impl Serialize) -> NapiResult<String> {
    serde_json::to_string(output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn amortize_loan(input_json: String) -> NapiResult<String> {
    let input: loan_calc_core::amortization::schedule::LoanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        loan_calc_core::amortization::schedule::amortize_loan(&input).map_err(to_napi_error)?;
    to_json(&output)
}

#[napi]
pub fn periodic_payment(input_json: String) -> NapiResult<String> {
    let input: loan_calc_core::amortization::schedule::PaymentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        loan_calc_core::amortization::schedule::quote_payment(&input).map_err(to_napi_error)?;
    to_json(&output)
}

// ---------------------------------------------------------------------------
// Charting
// ---------------------------------------------------------------------------

#[napi]
pub fn loan_chart_data(input_json: String) -> NapiResult<String> {
    let input: loan_calc_core::amortization::schedule::LoanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        loan_calc_core::amortization::charting::loan_chart_data(&input).map_err(to_napi_error)?;
    to_json(&output)
}
