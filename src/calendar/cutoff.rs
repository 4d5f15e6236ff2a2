//! Billing-period calendar: maps calendar dates to billing periods given a
//! client's cutoff day.
//!
//! A billing period is the half-open span `[cutoff(n-1), cutoff(n))` between
//! two consecutive cutoff dates and is labeled by the *ending* cutoff's year
//! and month. All functions here are pure: no hidden state, no timezone
//! conversion, naive calendar dates only.

use chrono::{Datelike, NaiveDate};

use crate::core::domain::{BillingPeriod, MeterTable};
use crate::core::error::{SummaryError, SummaryResult};

/// Number of days in the given calendar month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

/// The cutoff date of a given month, clamped to the month's last day.
///
/// Every month gets exactly one cutoff date: `cutoff_day = 31` in February
/// yields the 28th (or 29th in a leap year).
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use metersum::calendar::cutoff_date;
///
/// let d = cutoff_date(2023, 2, 31);
/// assert_eq!(d, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
/// ```
pub fn cutoff_date(year: i32, month: u32, cutoff_day: u32) -> NaiveDate {
    let day = cutoff_day.clamp(1, days_in_month(year, month));
    // A day clamped into 1..=days_in_month is always a valid calendar date.
    NaiveDate::from_ymd_opt(year, month, day).expect("clamped day within month")
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

pub(crate) fn period_of_unchecked(date: NaiveDate, cutoff_day: u32) -> BillingPeriod {
    let year = date.year();
    let month = date.month();
    let this_cutoff = cutoff_date(year, month, cutoff_day);

    if date.day() >= this_cutoff.day() {
        // On or past the cutoff: the period ends on next month's cutoff.
        let (end_year, end_month) = next_month(year, month);
        BillingPeriod {
            label: format!("{:04}-{:02}", end_year, end_month),
            start: this_cutoff,
            end: cutoff_date(end_year, end_month, cutoff_day),
        }
    } else {
        let (start_year, start_month) = prev_month(year, month);
        BillingPeriod {
            label: format!("{:04}-{:02}", year, month),
            start: cutoff_date(start_year, start_month, cutoff_day),
            end: this_cutoff,
        }
    }
}

/// Maps a calendar date to its billing period for the given cutoff day.
///
/// For a fixed cutoff day the resulting periods partition the calendar:
/// contiguous, non-overlapping, every date mapped to exactly one period.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use metersum::calendar::period_of;
///
/// let date = NaiveDate::from_ymd_opt(2023, 6, 10).unwrap();
/// let period = period_of(date, 7).unwrap();
/// assert_eq!(period.label, "2023-07");
/// assert_eq!(period.start, NaiveDate::from_ymd_opt(2023, 6, 7).unwrap());
/// assert_eq!(period.end, NaiveDate::from_ymd_opt(2023, 7, 7).unwrap());
/// ```
pub fn period_of(date: NaiveDate, cutoff_day: u32) -> SummaryResult<BillingPeriod> {
    validate_cutoff_day(cutoff_day)?;
    Ok(period_of_unchecked(date, cutoff_day))
}

/// Annotates every row of a table with its billing period in one pass,
/// preserving row order.
pub fn annotate_rows(table: &MeterTable, cutoff_day: u32) -> SummaryResult<Vec<BillingPeriod>> {
    validate_cutoff_day(cutoff_day)?;
    Ok(table
        .timestamps
        .iter()
        .map(|ts| period_of_unchecked(ts.date(), cutoff_day))
        .collect())
}

pub(crate) fn validate_cutoff_day(cutoff_day: u32) -> SummaryResult<()> {
    if !(1..=31).contains(&cutoff_day) {
        return Err(SummaryError::InvalidCutoffDay(cutoff_day));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn date_before_cutoff_ends_in_current_month() {
        let period = period_of(d(2023, 6, 3), 7).unwrap();
        assert_eq!(period.label, "2023-06");
        assert_eq!(period.start, d(2023, 5, 7));
        assert_eq!(period.end, d(2023, 6, 7));
    }

    #[test]
    fn cutoff_date_itself_starts_the_next_period() {
        let period = period_of(d(2023, 6, 7), 7).unwrap();
        assert_eq!(period.label, "2023-07");
        assert_eq!(period.start, d(2023, 6, 7));
    }

    #[test]
    fn periods_are_contiguous_across_the_boundary() {
        let before = period_of(d(2023, 6, 6), 7).unwrap();
        let after = period_of(d(2023, 6, 7), 7).unwrap();
        assert_eq!(before.end, after.start);
    }

    #[test]
    fn year_rollover() {
        let period = period_of(d(2023, 12, 20), 7).unwrap();
        assert_eq!(period.label, "2024-01");
        assert_eq!(period.end, d(2024, 1, 7));
    }

    #[test]
    fn february_clamps_cutoff_31() {
        // Scenario: cutoff day 31 applied to February.
        assert_eq!(cutoff_date(2023, 2, 31), d(2023, 2, 28));
        assert_eq!(cutoff_date(2024, 2, 31), d(2024, 2, 29));

        // No February date is left unmapped and boundaries stay contiguous.
        let before = period_of(d(2023, 2, 27), 31).unwrap();
        assert_eq!(before.label, "2023-02");
        let after = period_of(d(2023, 2, 28), 31).unwrap();
        assert_eq!(after.label, "2023-03");
        assert_eq!(before.end, after.start);
    }

    #[test]
    fn cutoff_day_one_gives_whole_calendar_months() {
        let period = period_of(d(2023, 6, 15), 1).unwrap();
        assert_eq!(period.start, d(2023, 6, 1));
        assert_eq!(period.end, d(2023, 7, 1));
        assert_eq!(period.label, "2023-07");
    }

    #[test]
    fn invalid_cutoff_day_is_rejected() {
        assert!(matches!(
            period_of(d(2023, 6, 1), 0),
            Err(SummaryError::InvalidCutoffDay(0))
        ));
        assert!(matches!(
            period_of(d(2023, 6, 1), 32),
            Err(SummaryError::InvalidCutoffDay(32))
        ));
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 12), 31);
    }
}
