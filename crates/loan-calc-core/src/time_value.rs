use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LoanCalcError;
use crate::types::{Money, Rate};
use crate::LoanCalcResult;

const PERCENT: Decimal = dec!(100);
/// Growth below this over the whole term cannot be told apart from rounding.
const NEGLIGIBLE_GROWTH: Decimal = dec!(0.000000000000000001);

/// Convert an annual percentage (6.5 = 6.5%) into a per-period decimal rate.
pub fn periodic_rate(annual_rate_pct: Decimal, periods_per_year: u32) -> LoanCalcResult<Rate> {
    if periods_per_year == 0 {
        return Err(LoanCalcError::invalid(
            "periods_per_year",
            "Periods per year must be > 0",
        ));
    }
    Ok(annual_rate_pct / PERCENT / Decimal::from(periods_per_year))
}

/// Compound growth factor (1 + rate)^nper, checked against Decimal overflow.
pub fn compound_factor(rate: Rate, nper: u32) -> LoanCalcResult<Decimal> {
    let one_plus_r = Decimal::ONE
        .checked_add(rate)
        .ok_or_else(|| LoanCalcError::overflow("compound factor base"))?;
    one_plus_r
        .checked_powi(i64::from(nper))
        .ok_or_else(|| LoanCalcError::overflow(format!("compound factor (1 + {rate})^{nper}")))
}

/// Present value of 1 due in `nper` periods: (1 + rate)^-nper.
///
/// Raised from the per-period discount `1 / (1 + rate)`, so long terms at high
/// rates shrink towards 0 instead of overflowing.
pub fn discount_factor(rate: Rate, nper: u32) -> LoanCalcResult<Decimal> {
    let one_plus_r = Decimal::ONE
        .checked_add(rate)
        .ok_or_else(|| LoanCalcError::overflow("discount factor base"))?;
    let per_period = Decimal::ONE
        .checked_div(one_plus_r)
        .ok_or_else(|| LoanCalcError::DivisionByZero {
            context: format!("discount factor 1 / (1 + {rate})"),
        })?;
    per_period
        .checked_powi(i64::from(nper))
        .ok_or_else(|| LoanCalcError::overflow(format!("discount factor (1 + {rate})^-{nper}")))
}

/// Level payment that fully amortizes `principal` over `nper` periods.
///
/// Evaluated as `P * r / (1 - (1 + r)^-n)`. Returned as a positive amount. A
/// zero rate, or one too small to move the discount factor measurably off 1,
/// is straight-line repayment.
pub fn level_payment(principal: Money, rate: Rate, nper: u32) -> LoanCalcResult<Money> {
    if nper == 0 {
        return Err(LoanCalcError::invalid(
            "nper",
            "Number of periods must be > 0",
        ));
    }

    let n = Decimal::from(nper);
    if rate.is_zero() {
        return Ok(principal / n);
    }

    let annuity = Decimal::ONE - discount_factor(rate, nper)?;
    if annuity.abs() < NEGLIGIBLE_GROWTH {
        return Ok(principal / n);
    }

    let per_unit = rate
        .checked_div(annuity)
        .ok_or_else(|| LoanCalcError::DivisionByZero {
            context: "level payment annuity factor".into(),
        })?;
    principal
        .checked_mul(per_unit)
        .ok_or_else(|| LoanCalcError::overflow("level payment"))
}
