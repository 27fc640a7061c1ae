use loan_calc_core::Currency;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::str::FromStr;

/// Fields holding currency amounts; everything else renders verbatim.
const MONEY_FIELDS: [&str; 17] = [
    "periodic_payment",
    "total_payment",
    "total_interest",
    "monthly_equivalent",
    "annual_equivalent",
    "principal",
    "payment",
    "principal_payment",
    "interest_payment",
    "cumulative_interest",
    "remaining_balance",
    "extra_payment_per_period",
    "interest_saved",
    "total_of_payments",
    "interest",
    "balance",
    "value",
];

pub fn is_money_field(key: &str) -> bool {
    MONEY_FIELDS.contains(&key)
}

/// Render an amount as e.g. `$1,199.10` or `¥1,199`. Rounds half away from
/// zero to the currency's minor unit.
pub fn format_money(amount: Decimal, currency: &Currency) -> String {
    let dp = currency.minor_units();
    let rounded = amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", dp as usize, rounded.abs());
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = match fraction {
        Some(fraction) => format!("{grouped}.{fraction}"),
        None => grouped,
    };
    let symbol = currency.symbol();
    if matches!(currency, Currency::Other(_)) {
        format!("{sign}{digits} {symbol}")
    } else {
        format!("{sign}{symbol}{digits}")
    }
}

/// Format a JSON field, applying currency formatting to money fields.
pub fn format_field(key: &str, value: &Value, currency: Option<&Currency>) -> Option<String> {
    let currency = currency?;
    if !is_money_field(key) {
        return None;
    }
    let amount = match value {
        Value::String(s) => Decimal::from_str(s).ok()?,
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok()?,
        _ => return None,
    };
    Some(format_money(amount, currency))
}
