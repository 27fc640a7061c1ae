//! Payment frequency and calendar stepping for schedule dates.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LoanCalcError;
use crate::LoanCalcResult;

/// How often installments fall due.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    Weekly,
    Biweekly,
    #[default]
    Monthly,
    Quarterly,
    Semiannual,
    Annual,
}

/// Distance between two consecutive due dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodStep {
    Days(u64),
    Months(u32),
}

impl PaymentFrequency {
    pub const ALL: [PaymentFrequency; 6] = [
        PaymentFrequency::Weekly,
        PaymentFrequency::Biweekly,
        PaymentFrequency::Monthly,
        PaymentFrequency::Quarterly,
        PaymentFrequency::Semiannual,
        PaymentFrequency::Annual,
    ];

    pub fn periods_per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Weekly => 52,
            PaymentFrequency::Biweekly => 26,
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::Semiannual => 2,
            PaymentFrequency::Annual => 1,
        }
    }

    pub fn step(&self) -> PeriodStep {
        match self {
            PaymentFrequency::Weekly => PeriodStep::Days(7),
            PaymentFrequency::Biweekly => PeriodStep::Days(14),
            PaymentFrequency::Monthly => PeriodStep::Months(1),
            PaymentFrequency::Quarterly => PeriodStep::Months(3),
            PaymentFrequency::Semiannual => PeriodStep::Months(6),
            PaymentFrequency::Annual => PeriodStep::Months(12),
        }
    }

    /// Human label, e.g. "Bi-weekly".
    pub fn label(&self) -> &'static str {
        match self {
            PaymentFrequency::Weekly => "Weekly",
            PaymentFrequency::Biweekly => "Bi-weekly",
            PaymentFrequency::Monthly => "Monthly",
            PaymentFrequency::Quarterly => "Quarterly",
            PaymentFrequency::Semiannual => "Semi-Annual",
            PaymentFrequency::Annual => "Annual",
        }
    }

    /// Due date of `period` (1-based). Period 1 falls on `start`.
    ///
    /// Month-based steps are always measured from `start`, never from the
    /// previous due date, so a 31st anchor returns to the 31st after a short
    /// month instead of drifting to the 28th.
    pub fn date_for_period(&self, start: NaiveDate, period: u32) -> LoanCalcResult<NaiveDate> {
        if period == 0 {
            return Err(LoanCalcError::invalid("period", "Periods are numbered from 1"));
        }
        let offset = period - 1;
        let stepped = match self.step() {
            PeriodStep::Days(days) => start.checked_add_days(Days::new(days * u64::from(offset))),
            PeriodStep::Months(months) => months
                .checked_mul(offset)
                .and_then(|total| start.checked_add_months(Months::new(total))),
        };
        stepped.ok_or_else(|| {
            LoanCalcError::DateError(format!(
                "{} period {period} from {start} is outside the supported calendar",
                self.label()
            ))
        })
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentFrequency::Weekly => "weekly",
            PaymentFrequency::Biweekly => "biweekly",
            PaymentFrequency::Monthly => "monthly",
            PaymentFrequency::Quarterly => "quarterly",
            PaymentFrequency::Semiannual => "semiannual",
            PaymentFrequency::Annual => "annual",
        };
        f.write_str(name)
    }
}

impl FromStr for PaymentFrequency {
    type Err = LoanCalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "weekly" => Ok(PaymentFrequency::Weekly),
            "biweekly" => Ok(PaymentFrequency::Biweekly),
            "monthly" => Ok(PaymentFrequency::Monthly),
            "quarterly" => Ok(PaymentFrequency::Quarterly),
            "semiannual" | "semiannually" => Ok(PaymentFrequency::Semiannual),
            "annual" | "annually" | "yearly" => Ok(PaymentFrequency::Annual),
            other => Err(LoanCalcError::invalid(
                "payment_frequency",
                format!(
                    "Unknown frequency '{other}'; expected weekly, biweekly, monthly, quarterly, semiannual or annual"
                ),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_periods_per_year_table() {
        let counts: Vec<u32> = PaymentFrequency::ALL
            .iter()
            .map(|f| f.periods_per_year())
            .collect();
        assert_eq!(counts, vec![52, 26, 12, 4, 2, 1]);
    }

    #[test]
    fn test_first_period_is_start_date() {
        for freq in PaymentFrequency::ALL {
            assert_eq!(freq.date_for_period(date(2024, 3, 15), 1).unwrap(), date(2024, 3, 15));
        }
    }

    #[test]
    fn test_weekly_and_biweekly_step_in_days() {
        let start = date(2024, 12, 25);
        assert_eq!(
            PaymentFrequency::Weekly.date_for_period(start, 2).unwrap(),
            date(2025, 1, 1)
        );
        assert_eq!(
            PaymentFrequency::Biweekly.date_for_period(start, 3).unwrap(),
            date(2025, 1, 22)
        );
    }

    #[test]
    fn test_monthly_end_of_month_does_not_drift() {
        let start = date(2024, 1, 31);
        let m = PaymentFrequency::Monthly;
        assert_eq!(m.date_for_period(start, 2).unwrap(), date(2024, 2, 29));
        assert_eq!(m.date_for_period(start, 3).unwrap(), date(2024, 3, 31));
        assert_eq!(m.date_for_period(start, 4).unwrap(), date(2024, 4, 30));
    }

    #[test]
    fn test_quarterly_semiannual_annual() {
        let start = date(2023, 8, 31);
        assert_eq!(
            PaymentFrequency::Quarterly.date_for_period(start, 2).unwrap(),
            date(2023, 11, 30)
        );
        assert_eq!(
            PaymentFrequency::Semiannual.date_for_period(start, 2).unwrap(),
            date(2024, 2, 29)
        );
        assert_eq!(
            PaymentFrequency::Annual.date_for_period(date(2024, 2, 29), 2).unwrap(),
            date(2025, 2, 28)
        );
    }

    #[test]
    fn test_period_zero_rejected() {
        assert!(PaymentFrequency::Monthly
            .date_for_period(date(2024, 1, 1), 0)
            .is_err());
    }

    #[test]
    fn test_date_past_calendar_end_is_date_error() {
        let result = PaymentFrequency::Annual.date_for_period(NaiveDate::MAX, 2);
        assert!(matches!(result, Err(LoanCalcError::DateError(_))));
    }

    #[test]
    fn test_parse_frequency_variants() {
        assert_eq!("Bi-weekly".parse::<PaymentFrequency>().unwrap(), PaymentFrequency::Biweekly);
        assert_eq!("semi_annual".parse::<PaymentFrequency>().unwrap(), PaymentFrequency::Semiannual);
        assert_eq!("ANNUAL".parse::<PaymentFrequency>().unwrap(), PaymentFrequency::Annual);
        assert!("fortnightly".parse::<PaymentFrequency>().is_err());
    }

    #[test]
    fn test_serde_lowercase_names() {
        let json = serde_json::to_string(&PaymentFrequency::Semiannual).unwrap();
        assert_eq!(json, "\"semiannual\"");
        let back: PaymentFrequency = serde_json::from_str("\"biweekly\"").unwrap();
        assert_eq!(back, PaymentFrequency::Biweekly);
    }
}
