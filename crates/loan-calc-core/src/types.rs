use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Currency the caller wants amounts rendered in. The engine never formats;
/// the code is carried through to the output for the formatting layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    CNY,
    INR,
    CAD,
    AUD,
    Other(String),
}

impl Currency {
    /// ISO 4217 code.
    pub fn code(&self) -> &str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CNY => "CNY",
            Currency::INR => "INR",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::Other(code) => code.as_str(),
        }
    }

    /// Display symbol. Unknown codes render as the code itself.
    pub fn symbol(&self) -> &str {
        match self {
            Currency::USD | Currency::CAD | Currency::AUD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY | Currency::CNY => "¥",
            Currency::INR => "₹",
            Currency::Other(code) => code.as_str(),
        }
    }

    /// Digits after the decimal point when displaying an amount (ISO 4217 minor unit).
    pub fn minor_units(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            Currency::Other(code) => match code.as_str() {
                "KRW" | "VND" | "CLP" | "ISK" | "HUF" | "TWD" | "UGX" | "XAF" | "XOF" => 0,
                "BHD" | "KWD" | "OMR" | "JOD" | "TND" | "LYD" | "IQD" => 3,
                _ => 2,
            },
            _ => 2,
        }
    }

    /// Parse an ISO code, case-insensitive. Anything unrecognised becomes `Other`.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "USD" => Currency::USD,
            "EUR" => Currency::EUR,
            "GBP" => Currency::GBP,
            "JPY" => Currency::JPY,
            "CNY" => Currency::CNY,
            "INR" => Currency::INR,
            "CAD" => Currency::CAD,
            "AUD" => Currency::AUD,
            other => Currency::Other(other.to_string()),
        }
    }
}

impl From<String> for Currency {
    fn from(code: String) -> Self {
        Currency::from_code(&code)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code().to_string()
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_from_code_known_and_other() {
        assert_eq!(Currency::from_code("eur"), Currency::EUR);
        assert_eq!(Currency::from_code(" INR "), Currency::INR);
        assert_eq!(Currency::from_code("chf"), Currency::Other("CHF".into()));
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(Currency::USD.symbol(), "$");
        assert_eq!(Currency::GBP.symbol(), "£");
        assert_eq!(Currency::Other("CHF".into()).symbol(), "CHF");
        assert_eq!(Currency::Other("CHF".into()).code(), "CHF");
    }

    #[test]
    fn test_currency_minor_units() {
        assert_eq!(Currency::JPY.minor_units(), 0);
        assert_eq!(Currency::USD.minor_units(), 2);
        assert_eq!(Currency::from_code("kwd").minor_units(), 3);
        assert_eq!(Currency::from_code("CHF").minor_units(), 2);
    }

    #[test]
    fn test_currency_serializes_as_plain_code() {
        let ccy: Currency = serde_json::from_str("\"chf\"").unwrap();
        assert_eq!(ccy, Currency::Other("CHF".into()));
        assert_eq!(serde_json::to_string(&Currency::EUR).unwrap(), "\"EUR\"");
    }
}
