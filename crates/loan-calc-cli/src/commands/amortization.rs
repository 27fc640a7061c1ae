use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use loan_calc_core::amortization::charting;
use loan_calc_core::amortization::schedule::{self, LoanInput, PaymentInput};
use loan_calc_core::amortization::PaymentFrequency;
use loan_calc_core::Currency;

use crate::input;

/// Loan terms shared by `amortize` and `chart`
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanArgs {
    /// Gross loan amount (purchase price)
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Down payment subtracted from the loan amount
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual interest rate as a percentage (e.g. 6.5 for 6.5%)
    #[arg(long, alias = "interest-rate")]
    pub rate: Option<Decimal>,

    /// Loan term in years (fractional allowed, e.g. 2.5)
    #[arg(long, alias = "term")]
    pub term_years: Option<Decimal>,

    /// weekly, biweekly, monthly, quarterly, semiannual or annual
    #[arg(long)]
    pub frequency: Option<PaymentFrequency>,

    /// Extra principal paid every period
    #[arg(long)]
    pub extra_payment: Option<Decimal>,

    /// Due date of the first payment (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// ISO currency code used for table output (USD, EUR, GBP, ...)
    #[arg(long)]
    pub currency: Option<String>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a full amortization schedule
#[derive(Args)]
pub struct AmortizeArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Omit the period-by-period schedule from the output
    #[arg(long)]
    pub summary_only: bool,
}

/// Arguments for chart series
#[derive(Args)]
pub struct ChartArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

/// Arguments for a payment quote
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PaymentArgs {
    /// Financed principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate as a percentage (e.g. 6.5 for 6.5%)
    #[arg(long, alias = "interest-rate")]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, alias = "term")]
    pub term_years: Option<Decimal>,

    /// Payment frequency
    #[arg(long, default_value = "monthly")]
    pub frequency: PaymentFrequency,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input = resolve_loan_input(args.loan)?;
    let result = schedule::amortize_loan(&loan_input)?;
    let mut value = serde_json::to_value(result)?;
    if args.summary_only {
        if let Some(res) = value.get_mut("result").and_then(Value::as_object_mut) {
            res.remove("schedule");
        }
    }
    Ok(value)
}

pub fn run_chart(args: ChartArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input = resolve_loan_input(args.loan)?;
    let result = charting::loan_chart_data(&loan_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let payment_input: PaymentInput = if let Some(ref path) = args.input {
        input::file::read_structured(path)?
    } else if let Some(request) = input::stdin::read_request()? {
        request
    } else {
        PaymentInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_interest_rate_pct: args
                .rate
                .ok_or("--rate is required (or provide --input)")?,
            term_years: args
                .term_years
                .ok_or("--term-years is required (or provide --input)")?,
            payment_frequency: args.frequency,
        }
    };
    let result = schedule::quote_payment(&payment_input)?;
    Ok(serde_json::to_value(result)?)
}

fn resolve_loan_input(args: LoanArgs) -> Result<LoanInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_structured(path);
    }
    if let Some(request) = input::stdin::read_request()? {
        return Ok(request);
    }

    let start_date = match args.start_date {
        Some(date) => date,
        None => {
            let today = chrono::Local::now().date_naive();
            log::info!("no --start-date given, anchoring schedule at {today}");
            today
        }
    };

    Ok(LoanInput {
        loan_amount: args
            .loan_amount
            .ok_or("--loan-amount is required (or provide --input)")?,
        down_payment: args.down_payment.unwrap_or(dec!(0)),
        annual_interest_rate_pct: args
            .rate
            .ok_or("--rate is required (or provide --input)")?,
        term_years: args
            .term_years
            .ok_or("--term-years is required (or provide --input)")?,
        payment_frequency: args.frequency.unwrap_or_default(),
        extra_payment_per_period: args.extra_payment.unwrap_or(dec!(0)),
        start_date,
        currency: args
            .currency
            .as_deref()
            .map(Currency::from_code)
            .unwrap_or_default(),
    })
}
