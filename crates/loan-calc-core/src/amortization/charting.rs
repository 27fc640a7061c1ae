//! Chart-ready views of an amortization.
//!
//! Reshapes the schedule and summary into the series a chart renderer
//! consumes: per-period principal/interest/balance points plus the two pie
//! breakdowns (lifetime cost and first installment).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::schedule::{self, AmortizationOutput, AmortizationResult, LoanInput, ScheduleEntry};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::LoanCalcResult;

/// One point on the principal/interest/balance charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub period: u32,
    pub date: NaiveDate,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    pub balance: Money,
}

/// A named slice of a pie breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownSlice {
    pub name: String,
    pub value: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanChartData {
    pub series: Vec<ChartPoint>,
    pub cost_breakdown: Vec<BreakdownSlice>,
    pub first_payment_breakdown: Vec<BreakdownSlice>,
}

pub fn chart_series(schedule: &[ScheduleEntry]) -> Vec<ChartPoint> {
    schedule
        .iter()
        .map(|e| ChartPoint {
            period: e.period,
            date: e.date,
            payment: e.payment,
            principal: e.principal_payment,
            interest: e.interest_payment,
            balance: e.remaining_balance,
        })
        .collect()
}

/// Principal versus lifetime interest.
pub fn cost_breakdown(summary: &AmortizationResult) -> Vec<BreakdownSlice> {
    vec![
        BreakdownSlice {
            name: "Principal".into(),
            value: summary.principal,
        },
        BreakdownSlice {
            name: "Total Interest".into(),
            value: summary.total_interest,
        },
    ]
}

/// Principal versus interest of the first installment. Empty for an empty schedule.
pub fn first_payment_breakdown(schedule: &[ScheduleEntry]) -> Vec<BreakdownSlice> {
    match schedule.first() {
        Some(first) => vec![
            BreakdownSlice {
                name: "Principal".into(),
                value: first.principal_payment,
            },
            BreakdownSlice {
                name: "Interest".into(),
                value: first.interest_payment,
            },
        ],
        None => Vec::new(),
    }
}

pub fn build_chart_data(output: &AmortizationOutput) -> LoanChartData {
    LoanChartData {
        series: chart_series(&output.schedule),
        cost_breakdown: cost_breakdown(&output.summary),
        first_payment_breakdown: first_payment_breakdown(&output.schedule),
    }
}

/// Amortize a loan request and return only its chart data.
pub fn loan_chart_data(input: &LoanInput) -> LoanCalcResult<ComputationOutput<LoanChartData>> {
    let start = Instant::now();
    let amortized = schedule::amortize_loan(input)?;
    let charts = build_chart_data(&amortized.result);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Amortization Chart Series (per-period split, lifetime and first-payment breakdowns)",
        &amortized.assumptions,
        amortized.warnings,
        elapsed,
        charts,
    ))
}
