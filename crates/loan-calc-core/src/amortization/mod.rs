pub mod frequency;
pub mod schedule;

#[cfg(feature = "charting")]
pub mod charting;

pub use frequency::PaymentFrequency;
pub use schedule::{
    amortize, amortize_loan, build_schedule, compute_periodic_payment, quote_payment, summarize,
    AmortizationOutput, AmortizationResult, LoanInput, LoanParameters, PaymentInput, PaymentQuote,
    ScheduleEntry,
};
