//! Level-payment loan amortization.
//!
//! Computes the fixed installment for a loan, walks the loan period by period
//! (applying any extra principal and stopping early on payoff) and aggregates
//! the resulting schedule. All math uses `rust_decimal::Decimal`; nothing is
//! rounded here, rounding is left to whoever renders the figures.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::frequency::PaymentFrequency;
use crate::error::LoanCalcError;
use crate::time_value;
use crate::types::{with_metadata, ComputationOutput, Currency, Money, Rate, Years};
use crate::LoanCalcResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Longest term accepted. Keeps the worst case at 5200 weekly periods.
const MAX_TERM_YEARS: Decimal = dec!(100);
/// `MAX_TERM_YEARS` at the weekly frequency.
const MAX_TOTAL_PERIODS: u32 = 5200;
const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// Loan request as entered by a user: gross amount, down payment and terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    /// Purchase price or gross amount borrowed against.
    pub loan_amount: Money,
    /// Paid up front; the financed principal is `loan_amount - down_payment`.
    #[serde(default)]
    pub down_payment: Money,
    /// Nominal annual rate as a percentage (6.5 = 6.5%).
    pub annual_interest_rate_pct: Decimal,
    /// Term in years; fractional terms are allowed.
    pub term_years: Years,
    #[serde(default)]
    pub payment_frequency: PaymentFrequency,
    /// Additional principal paid with every installment.
    #[serde(default)]
    pub extra_payment_per_period: Money,
    /// Due date of the first installment.
    pub start_date: NaiveDate,
    /// Display currency, passed through for formatting only.
    #[serde(default)]
    pub currency: Currency,
}

/// Validated engine parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    pub principal: Money,
    pub annual_interest_rate_pct: Decimal,
    pub term_years: Years,
    pub payment_frequency: PaymentFrequency,
    pub extra_payment_per_period: Money,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub currency: Currency,
}

/// One installment in the amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// 1-based period index.
    pub period: u32,
    pub date: NaiveDate,
    /// Principal plus interest actually paid this period.
    pub payment: Money,
    pub principal_payment: Money,
    pub interest_payment: Money,
    /// Interest paid from period 1 through this period.
    pub cumulative_interest: Money,
    pub remaining_balance: Money,
}

/// Ordered schedule and the number of periods it took to retire the loan.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltSchedule {
    pub entries: Vec<ScheduleEntry>,
    pub actual_periods: u32,
}

/// Aggregate figures for a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    /// Scheduled installment before extra principal.
    pub periodic_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    pub periods_per_year: u32,
    pub nominal_total_periods: u32,
    pub actual_periods: u32,
    /// Installment restated per month (payment * periods_per_year / 12).
    pub monthly_equivalent: Money,
    /// Installment restated per year (payment * periods_per_year).
    pub annual_equivalent: Money,
    pub principal: Money,
    pub periods_saved: u32,
    pub extra_payment_per_period: Money,
    /// Interest of the same loan without extra principal, less `total_interest`.
    /// Zero when no extra principal is paid.
    pub interest_saved: Money,
    /// Due date of the last installment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
    pub currency: Currency,
}

/// Full engine output: summary plus the period-by-period schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub summary: AmortizationResult,
    pub schedule: Vec<ScheduleEntry>,
}

/// Installment quote without a schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    pub principal: Money,
    /// Nominal annual rate as a percentage (6.5 = 6.5%).
    pub annual_interest_rate_pct: Decimal,
    pub term_years: Years,
    #[serde(default)]
    pub payment_frequency: PaymentFrequency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentQuote {
    pub periodic_payment: Money,
    pub periodic_rate: Rate,
    pub total_periods: u32,
    pub periods_per_year: u32,
    pub monthly_equivalent: Money,
    pub annual_equivalent: Money,
    /// periodic_payment * total_periods
    pub total_of_payments: Money,
}

/// Running state threaded through the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Accrual {
    balance: Money,
    cumulative_interest: Money,
}

/// Split of one installment.
#[derive(Debug, Clone, Copy)]
struct Installment {
    principal: Money,
    interest: Money,
}

impl Accrual {
    fn opening(principal: Money) -> Self {
        Accrual {
            balance: principal,
            cumulative_interest: Decimal::ZERO,
        }
    }

    /// Apply one installment. In the final scheduled period the whole
    /// remaining balance is retired.
    fn step(
        self,
        period: u32,
        payment: Money,
        periodic_rate: Rate,
        extra_payment: Money,
        is_final: bool,
    ) -> LoanCalcResult<(Accrual, Installment)> {
        let interest = self
            .balance
            .checked_mul(periodic_rate)
            .ok_or_else(|| LoanCalcError::overflow(format!("interest for period {period}")))?;

        let scheduled_principal = payment - interest + extra_payment;
        if scheduled_principal < Decimal::ZERO {
            return Err(LoanCalcError::invalid(
                "payment",
                format!(
                    "Payment {payment} does not cover interest {interest} in period {period}"
                ),
            ));
        }

        let principal = if is_final || scheduled_principal > self.balance {
            self.balance
        } else {
            scheduled_principal
        };

        let cumulative_interest = self
            .cumulative_interest
            .checked_add(interest)
            .ok_or_else(|| LoanCalcError::overflow("cumulative interest"))?;

        Ok((
            Accrual {
                balance: self.balance - principal,
                cumulative_interest,
            },
            Installment {
                principal,
                interest,
            },
        ))
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl LoanInput {
    /// Validate the request and derive the financed principal.
    pub fn to_parameters(&self) -> LoanCalcResult<LoanParameters> {
        validate_loan_input(self)?;
        let params = LoanParameters {
            principal: self.loan_amount - self.down_payment,
            annual_interest_rate_pct: self.annual_interest_rate_pct,
            term_years: self.term_years,
            payment_frequency: self.payment_frequency,
            extra_payment_per_period: self.extra_payment_per_period,
            start_date: self.start_date,
            currency: self.currency.clone(),
        };
        validate_loan_parameters(&params)?;
        Ok(params)
    }
}

/// Amortize a loan request, wrapped in the standard output envelope.
pub fn amortize_loan(input: &LoanInput) -> LoanCalcResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let params = input.to_parameters()?;
    let output = run_amortization(&params, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-Payment Amortization (annuity installment, extra principal, early payoff)",
        &serde_json::json!({
            "loan_amount": input.loan_amount.to_string(),
            "down_payment": input.down_payment.to_string(),
            "principal": params.principal.to_string(),
            "annual_interest_rate_pct": params.annual_interest_rate_pct.to_string(),
            "term_years": params.term_years.to_string(),
            "payment_frequency": params.payment_frequency,
            "extra_payment_per_period": params.extra_payment_per_period.to_string(),
            "start_date": params.start_date,
            "currency": input.currency.code(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Quote the level installment for a loan without building its schedule.
pub fn quote_payment(input: &PaymentInput) -> LoanCalcResult<ComputationOutput<PaymentQuote>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_terms(input.principal, input.annual_interest_rate_pct, input.term_years)?;

    let frequency = input.payment_frequency;
    let periods_per_year = frequency.periods_per_year();
    let periodic_rate = time_value::periodic_rate(input.annual_interest_rate_pct, periods_per_year)?;
    let total_periods = nominal_periods(input.term_years, frequency)?;
    if let Some(msg) = fractional_term_warning(input.term_years, frequency, total_periods) {
        warnings.push(msg);
    }

    let periodic_payment = compute_periodic_payment(input.principal, periodic_rate, total_periods)?;
    let per_year = Decimal::from(periods_per_year);
    let quote = PaymentQuote {
        periodic_payment,
        periodic_rate,
        total_periods,
        periods_per_year,
        monthly_equivalent: periodic_payment * per_year / MONTHS_PER_YEAR,
        annual_equivalent: periodic_payment * per_year,
        total_of_payments: periodic_payment * Decimal::from(total_periods),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-Payment Installment (annuity formula)",
        input,
        warnings,
        elapsed,
        quote,
    ))
}

/// Amortize validated parameters without the envelope.
pub fn amortize(params: &LoanParameters) -> LoanCalcResult<AmortizationOutput> {
    let mut warnings = Vec::new();
    run_amortization(params, &mut warnings)
}

/// Number of scheduled installments for a term.
///
/// A term that does not divide into whole periods (2.3 years monthly = 27.6)
/// is rounded up, so the schedule never ends before the requested term.
pub fn nominal_periods(term_years: Years, frequency: PaymentFrequency) -> LoanCalcResult<u32> {
    if term_years <= Decimal::ZERO {
        return Err(LoanCalcError::invalid("term_years", "Loan term must be greater than 0"));
    }
    let raw = term_years * Decimal::from(frequency.periods_per_year());
    raw.ceil()
        .to_u32()
        .ok_or_else(|| LoanCalcError::overflow(format!("period count for {term_years} years")))
}

/// Level installment for `principal` over `total_periods` at `periodic_rate`.
///
/// A zero rate is straight-line repayment (`principal / total_periods`); the
/// annuity formula is only evaluated for a positive rate.
pub fn compute_periodic_payment(
    principal: Money,
    periodic_rate: Rate,
    total_periods: u32,
) -> LoanCalcResult<Money> {
    if principal <= Decimal::ZERO {
        return Err(LoanCalcError::invalid("principal", "Principal must be greater than 0"));
    }
    if periodic_rate < Decimal::ZERO {
        return Err(LoanCalcError::invalid(
            "periodic_rate",
            "Periodic rate cannot be negative",
        ));
    }
    if total_periods == 0 || total_periods > MAX_TOTAL_PERIODS {
        return Err(LoanCalcError::invalid(
            "total_periods",
            format!("Total periods must be between 1 and {MAX_TOTAL_PERIODS}"),
        ));
    }
    time_value::level_payment(principal, periodic_rate, total_periods)
}

/// Simulate the loan period by period.
///
/// Stops after `total_periods` or as soon as the balance reaches zero,
/// whichever comes first. Identical arguments always produce an identical
/// schedule.
pub fn build_schedule(
    payment: Money,
    principal: Money,
    periodic_rate: Rate,
    total_periods: u32,
    extra_payment: Money,
    start_date: NaiveDate,
    frequency: PaymentFrequency,
) -> LoanCalcResult<BuiltSchedule> {
    validate_schedule_args(payment, principal, periodic_rate, total_periods, extra_payment)?;

    let mut entries: Vec<ScheduleEntry> = Vec::with_capacity(total_periods as usize);
    let mut state = Accrual::opening(principal);

    for period in 1..=total_periods {
        if state.balance <= Decimal::ZERO {
            break;
        }

        let (next, installment) = state.step(
            period,
            payment,
            periodic_rate,
            extra_payment,
            period == total_periods,
        )?;

        entries.push(ScheduleEntry {
            period,
            date: frequency.date_for_period(start_date, period)?,
            payment: installment.principal + installment.interest,
            principal_payment: installment.principal,
            interest_payment: installment.interest,
            cumulative_interest: next.cumulative_interest,
            remaining_balance: next.balance.max(Decimal::ZERO),
        });

        state = next;
    }

    let actual_periods = entries.len() as u32;
    Ok(BuiltSchedule {
        entries,
        actual_periods,
    })
}

/// Aggregate a schedule into totals and frequency-normalised projections.
///
/// The extra-principal fields start at zero and the currency at its default;
/// [`amortize`] fills them in from the loan parameters.
pub fn summarize(
    schedule: &[ScheduleEntry],
    periodic_payment: Money,
    nominal_total_periods: u32,
    periods_per_year: u32,
    principal: Money,
) -> AmortizationResult {
    let total_payment: Money = schedule.iter().map(|e| e.payment).sum();
    let total_interest: Money = schedule.iter().map(|e| e.interest_payment).sum();
    let actual_periods = schedule.len() as u32;
    let per_year = Decimal::from(periods_per_year);

    AmortizationResult {
        periodic_payment,
        total_payment,
        total_interest,
        periods_per_year,
        nominal_total_periods,
        actual_periods,
        monthly_equivalent: periodic_payment * per_year / MONTHS_PER_YEAR,
        annual_equivalent: periodic_payment * per_year,
        principal,
        periods_saved: nominal_total_periods.saturating_sub(actual_periods),
        extra_payment_per_period: Decimal::ZERO,
        interest_saved: Decimal::ZERO,
        payoff_date: schedule.last().map(|e| e.date),
        currency: Currency::default(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_loan_input(input: &LoanInput) -> LoanCalcResult<()> {
    if input.loan_amount <= Decimal::ZERO {
        return Err(LoanCalcError::invalid(
            "loan_amount",
            "Loan amount must be greater than 0",
        ));
    }
    if input.down_payment < Decimal::ZERO {
        return Err(LoanCalcError::invalid(
            "down_payment",
            "Down payment cannot be negative",
        ));
    }
    if input.down_payment >= input.loan_amount {
        return Err(LoanCalcError::invalid(
            "down_payment",
            "Down payment must be less than the loan amount",
        ));
    }
    Ok(())
}

fn validate_loan_parameters(params: &LoanParameters) -> LoanCalcResult<()> {
    validate_terms(
        params.principal,
        params.annual_interest_rate_pct,
        params.term_years,
    )?;
    if params.extra_payment_per_period < Decimal::ZERO {
        return Err(LoanCalcError::invalid(
            "extra_payment_per_period",
            "Extra payment cannot be negative",
        ));
    }
    Ok(())
}

fn validate_terms(principal: Money, annual_rate_pct: Decimal, term_years: Years) -> LoanCalcResult<()> {
    if principal <= Decimal::ZERO {
        return Err(LoanCalcError::invalid("principal", "Principal must be greater than 0"));
    }
    if annual_rate_pct < Decimal::ZERO {
        return Err(LoanCalcError::invalid(
            "annual_interest_rate_pct",
            "Interest rate cannot be negative",
        ));
    }
    if term_years <= Decimal::ZERO {
        return Err(LoanCalcError::invalid("term_years", "Loan term must be greater than 0"));
    }
    if term_years > MAX_TERM_YEARS {
        return Err(LoanCalcError::invalid(
            "term_years",
            format!("Loan term cannot exceed {MAX_TERM_YEARS} years"),
        ));
    }
    Ok(())
}

fn validate_schedule_args(
    payment: Money,
    principal: Money,
    periodic_rate: Rate,
    total_periods: u32,
    extra_payment: Money,
) -> LoanCalcResult<()> {
    if payment <= Decimal::ZERO {
        return Err(LoanCalcError::invalid("payment", "Payment must be greater than 0"));
    }
    if principal <= Decimal::ZERO {
        return Err(LoanCalcError::invalid("principal", "Principal must be greater than 0"));
    }
    if periodic_rate < Decimal::ZERO {
        return Err(LoanCalcError::invalid(
            "periodic_rate",
            "Periodic rate cannot be negative",
        ));
    }
    if total_periods == 0 || total_periods > MAX_TOTAL_PERIODS {
        return Err(LoanCalcError::invalid(
            "total_periods",
            format!("Total periods must be between 1 and {MAX_TOTAL_PERIODS}"),
        ));
    }
    if extra_payment < Decimal::ZERO {
        return Err(LoanCalcError::invalid(
            "extra_payment",
            "Extra payment cannot be negative",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn fractional_term_warning(
    term_years: Years,
    frequency: PaymentFrequency,
    total_periods: u32,
) -> Option<String> {
    let exact_periods = term_years * Decimal::from(frequency.periods_per_year());
    if Decimal::from(total_periods) == exact_periods {
        return None;
    }
    let msg = format!(
        "{term_years} years at {frequency} frequency is {} periods; rounded up to {total_periods}",
        exact_periods.normalize()
    );
    log::warn!("{msg}");
    Some(msg)
}

fn run_amortization(
    params: &LoanParameters,
    warnings: &mut Vec<String>,
) -> LoanCalcResult<AmortizationOutput> {
    validate_loan_parameters(params)?;

    let frequency = params.payment_frequency;
    let periods_per_year = frequency.periods_per_year();
    let periodic_rate = time_value::periodic_rate(params.annual_interest_rate_pct, periods_per_year)?;
    let total_periods = nominal_periods(params.term_years, frequency)?;

    if let Some(msg) = fractional_term_warning(params.term_years, frequency, total_periods) {
        warnings.push(msg);
    }

    let extra = params.extra_payment_per_period;
    if extra >= params.principal {
        warnings.push(format!(
            "Extra payment {extra} covers the full principal {}; loan is retired in the first period",
            params.principal
        ));
    }

    log::debug!(
        "amortizing principal={} periodic_rate={} periods={} frequency={} extra={}",
        params.principal,
        periodic_rate,
        total_periods,
        frequency,
        extra
    );

    let payment = compute_periodic_payment(params.principal, periodic_rate, total_periods)?;
    let built = build_schedule(
        payment,
        params.principal,
        periodic_rate,
        total_periods,
        extra,
        params.start_date,
        frequency,
    )?;

    let interest_saved = if extra > Decimal::ZERO {
        let baseline = build_schedule(
            payment,
            params.principal,
            periodic_rate,
            total_periods,
            Decimal::ZERO,
            params.start_date,
            frequency,
        )?;
        let baseline_interest: Money = baseline.entries.iter().map(|e| e.interest_payment).sum();
        baseline_interest - built.entries.iter().map(|e| e.interest_payment).sum::<Money>()
    } else {
        Decimal::ZERO
    };

    let summary = AmortizationResult {
        extra_payment_per_period: extra,
        interest_saved,
        currency: params.currency.clone(),
        ..summarize(
            &built.entries,
            payment,
            total_periods,
            periods_per_year,
            params.principal,
        )
    };

    log::debug!(
        "amortized in {} of {} periods, total interest {}",
        built.actual_periods,
        total_periods,
        summary.total_interest
    );

    Ok(AmortizationOutput {
        summary,
        schedule: built.entries,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    /// Helper: 200k, 6%, 30 years, monthly, no extra.
    fn standard_mortgage() -> LoanParameters {
        LoanParameters {
            principal: dec!(200_000),
            annual_interest_rate_pct: dec!(6),
            term_years: dec!(30),
            payment_frequency: PaymentFrequency::Monthly,
            extra_payment_per_period: Decimal::ZERO,
            start_date: start(),
            currency: Currency::USD,
        }
    }

    #[test]
    fn test_compute_periodic_payment_positive_rate() {
        let p = compute_periodic_payment(dec!(200_000), dec!(0.005), 360).unwrap();
        assert!((p - dec!(1199.10)).abs() < dec!(0.01), "got {p}");
    }

    #[test]
    fn test_compute_periodic_payment_zero_rate_is_straight_line() {
        let p = compute_periodic_payment(dec!(10_000), Decimal::ZERO, 12).unwrap();
        assert_eq!(p.round_dp(2), dec!(833.33));
        assert_eq!(p, dec!(10_000) / dec!(12));
    }

    #[test]
    fn test_compute_periodic_payment_zero_rate_never_divides_by_zero() {
        for n in [1u32, 2, 12, 360, 5200] {
            let result = compute_periodic_payment(dec!(5000), Decimal::ZERO, n);
            assert!(
                !matches!(result, Err(LoanCalcError::DivisionByZero { .. })),
                "zero-rate branch must not reach the annuity division (n = {n})"
            );
            assert!(result.is_ok());
        }
    }

    #[test]
    fn test_compute_periodic_payment_covers_principal() {
        let p = compute_periodic_payment(dec!(25_000), dec!(0.01), 48).unwrap();
        assert!(p * dec!(48) >= dec!(25_000));
    }

    #[test]
    fn test_compute_periodic_payment_rejects_bad_args() {
        assert!(compute_periodic_payment(Decimal::ZERO, dec!(0.01), 12).is_err());
        assert!(compute_periodic_payment(dec!(1000), dec!(-0.01), 12).is_err());
        assert!(compute_periodic_payment(dec!(1000), dec!(0.01), 0).is_err());
    }

    #[test]
    fn test_nominal_periods_rounds_fraction_up() {
        assert_eq!(nominal_periods(dec!(2.5), PaymentFrequency::Monthly).unwrap(), 30);
        assert_eq!(nominal_periods(dec!(2.3), PaymentFrequency::Monthly).unwrap(), 28);
        assert_eq!(nominal_periods(dec!(0.5), PaymentFrequency::Annual).unwrap(), 1);
        assert!(nominal_periods(Decimal::ZERO, PaymentFrequency::Monthly).is_err());
    }

    #[test]
    fn test_build_schedule_final_balance_exactly_zero() {
        let payment = compute_periodic_payment(dec!(12_000), dec!(0.01), 24).unwrap();
        let built = build_schedule(
            payment,
            dec!(12_000),
            dec!(0.01),
            24,
            Decimal::ZERO,
            start(),
            PaymentFrequency::Monthly,
        )
        .unwrap();
        assert_eq!(built.actual_periods, 24);
        assert_eq!(built.entries.last().unwrap().remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_build_schedule_rejects_payment_below_interest() {
        // 1% of 10k is 100 interest; a 50 payment would grow the balance
        let err = build_schedule(
            dec!(50),
            dec!(10_000),
            dec!(0.01),
            12,
            Decimal::ZERO,
            start(),
            PaymentFrequency::Monthly,
        )
        .unwrap_err();
        assert!(matches!(err, LoanCalcError::InvalidInput { .. }));
    }

    #[test]
    fn test_build_schedule_single_period_payoff() {
        let payment = compute_periodic_payment(dec!(1000), dec!(0.05) / dec!(12), 12).unwrap();
        let built = build_schedule(
            payment,
            dec!(1000),
            dec!(0.05) / dec!(12),
            12,
            dec!(1000),
            start(),
            PaymentFrequency::Monthly,
        )
        .unwrap();
        assert_eq!(built.actual_periods, 1);
        let only = &built.entries[0];
        assert_eq!(only.principal_payment, dec!(1000));
        assert_eq!(only.remaining_balance, Decimal::ZERO);
        assert_eq!(only.payment, only.principal_payment + only.interest_payment);
    }

    #[test]
    fn test_build_schedule_rejects_period_count_past_cap() {
        let err = build_schedule(
            dec!(100),
            dec!(1000),
            Decimal::ZERO,
            u32::MAX,
            Decimal::ZERO,
            start(),
            PaymentFrequency::Weekly,
        )
        .unwrap_err();
        match err {
            LoanCalcError::InvalidInput { field, .. } => assert_eq!(field, "total_periods"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
        assert!(compute_periodic_payment(dec!(1000), dec!(0.01), MAX_TOTAL_PERIODS + 1).is_err());
        assert!(compute_periodic_payment(dec!(1000), dec!(0.01), MAX_TOTAL_PERIODS).is_ok());
    }

    #[test]
    fn test_summary_serialized_fields() {
        let out = amortize(&standard_mortgage()).unwrap();
        let json = serde_json::to_value(&out).unwrap();
        let mut top: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        top.sort_unstable();
        assert_eq!(top, vec!["schedule", "summary"]);

        let summary = json["summary"].as_object().unwrap();
        let mut keys: Vec<&str> = summary.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "actual_periods",
                "annual_equivalent",
                "currency",
                "extra_payment_per_period",
                "interest_saved",
                "monthly_equivalent",
                "nominal_total_periods",
                "payoff_date",
                "periodic_payment",
                "periods_per_year",
                "periods_saved",
                "principal",
                "total_interest",
                "total_payment",
            ]
        );
        assert_eq!(summary["interest_saved"], "0");
        assert_eq!(summary["currency"], "USD");
    }

    #[test]
    fn test_summarize_equivalents() {
        let out = amortize(&LoanParameters {
            payment_frequency: PaymentFrequency::Biweekly,
            ..standard_mortgage()
        })
        .unwrap();
        let s = &out.summary;
        assert_eq!(s.periods_per_year, 26);
        assert_eq!(s.annual_equivalent, s.periodic_payment * dec!(26));
        assert_eq!(s.monthly_equivalent, s.periodic_payment * dec!(26) / dec!(12));
    }

    #[test]
    fn test_summarize_empty_schedule() {
        let s = summarize(&[], dec!(100), 12, 12, dec!(1200));
        assert_eq!(s.total_payment, Decimal::ZERO);
        assert_eq!(s.actual_periods, 0);
        assert_eq!(s.periods_saved, 12);
        assert!(s.payoff_date.is_none());
    }

    #[test]
    fn test_amortize_standard_mortgage() {
        let out = amortize(&standard_mortgage()).unwrap();
        let s = &out.summary;
        assert_eq!(s.nominal_total_periods, 360);
        assert_eq!(s.actual_periods, 360);
        assert_eq!(s.periods_saved, 0);
        assert!((s.total_interest - dec!(231_676.38)).abs() < dec!(1));
        assert_eq!(s.extra_payment_per_period, Decimal::ZERO);
        assert_eq!(s.interest_saved, Decimal::ZERO);
    }

    #[test]
    fn test_amortize_early_payoff_reports_savings() {
        let out = amortize(&LoanParameters {
            extra_payment_per_period: dec!(200),
            ..standard_mortgage()
        })
        .unwrap();
        let s = &out.summary;
        let baseline = amortize(&standard_mortgage()).unwrap().summary;
        assert!(s.actual_periods < 360);
        assert_eq!(s.extra_payment_per_period, dec!(200));
        assert!(s.interest_saved > Decimal::ZERO);
        assert_eq!(s.interest_saved, baseline.total_interest - s.total_interest);
        assert!(baseline.payoff_date.unwrap() > s.payoff_date.unwrap());
    }

    #[test]
    fn test_amortize_loan_envelope_and_fraction_warning() {
        let input = LoanInput {
            loan_amount: dec!(30_000),
            down_payment: dec!(5_000),
            annual_interest_rate_pct: dec!(4.5),
            term_years: dec!(2.3),
            payment_frequency: PaymentFrequency::Monthly,
            extra_payment_per_period: Decimal::ZERO,
            start_date: start(),
            currency: Currency::EUR,
        };
        let out = amortize_loan(&input).unwrap();
        assert_eq!(out.result.summary.principal, dec!(25_000));
        assert_eq!(out.result.summary.nominal_total_periods, 28);
        assert_eq!(out.result.summary.actual_periods, 28);
        assert_eq!(out.assumptions["currency"], "EUR");
        assert!(out.warnings.iter().any(|w| w.contains("rounded up")));
    }

    #[test]
    fn test_down_payment_must_be_below_loan_amount() {
        let input = LoanInput {
            loan_amount: dec!(10_000),
            down_payment: dec!(10_000),
            annual_interest_rate_pct: dec!(5),
            term_years: dec!(1),
            payment_frequency: PaymentFrequency::Monthly,
            extra_payment_per_period: Decimal::ZERO,
            start_date: start(),
            currency: Currency::USD,
        };
        match input.to_parameters() {
            Err(LoanCalcError::InvalidInput { field, .. }) => assert_eq!(field, "down_payment"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_term_cap_enforced() {
        let err = amortize(&LoanParameters {
            term_years: dec!(101),
            ..standard_mortgage()
        })
        .unwrap_err();
        assert!(matches!(err, LoanCalcError::InvalidInput { .. }));
    }

    #[test]
    fn test_quote_payment_matches_schedule_payment() {
        let quote = quote_payment(&PaymentInput {
            principal: dec!(200_000),
            annual_interest_rate_pct: dec!(6),
            term_years: dec!(30),
            payment_frequency: PaymentFrequency::Monthly,
        })
        .unwrap();
        let out = amortize(&standard_mortgage()).unwrap();
        assert_eq!(quote.result.periodic_payment, out.summary.periodic_payment);
        assert_eq!(quote.result.total_periods, 360);
        assert_eq!(quote.result.periodic_rate, dec!(0.005));
        assert!(quote.warnings.is_empty());
    }

    #[test]
    fn test_quote_payment_rejects_negative_rate() {
        let err = quote_payment(&PaymentInput {
            principal: dec!(5_000),
            annual_interest_rate_pct: dec!(-1),
            term_years: dec!(3),
            payment_frequency: PaymentFrequency::Quarterly,
        })
        .unwrap_err();
        assert!(matches!(err, LoanCalcError::InvalidInput { .. }));
    }

    #[test]
    fn test_loan_input_json_defaults() {
        let input: LoanInput = serde_json::from_str(
            r#"{
                "loan_amount": "15000",
                "annual_interest_rate_pct": "7.25",
                "term_years": "3",
                "start_date": "2025-02-01"
            }"#,
        )
        .unwrap();
        assert_eq!(input.down_payment, Decimal::ZERO);
        assert_eq!(input.extra_payment_per_period, Decimal::ZERO);
        assert_eq!(input.payment_frequency, PaymentFrequency::Monthly);
        assert_eq!(input.currency, Currency::USD);
    }
}
