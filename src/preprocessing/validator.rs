//! Completeness validation for meter time series.
//!
//! [`DataCompletenessChecker`] flags days with too few samples against the
//! estimated sampling profile; [`MonthCompletenessValidator`] decides which
//! calendar months qualify as full for reporting. Both detect only — no row
//! is dropped here except by the month validator's explicit reject policy,
//! and nothing is ever imputed.

use chrono::{Datelike, Duration, NaiveDate};
use log::warn;
use std::collections::BTreeMap;

use crate::calendar::cutoff::days_in_month;
use crate::config::SummaryConfig;
use crate::core::domain::{
    CompletenessVerdict, DayCount, MeterTable, MonthCompleteness, SamplingProfile,
};
use crate::core::error::{SummaryError, SummaryResult};

/// Per-day sample-count validation against a sampling profile.
pub struct DataCompletenessChecker;

impl DataCompletenessChecker {
    /// Produces a [`DayCount`] for every calendar day in the table's date
    /// range, including days with no rows at all.
    ///
    /// A day is missing when its row count falls short of
    /// `expected_per_day - missing_samples_tolerance`, or when its longest
    /// contiguous in-tolerance run is shorter than the profile's
    /// `min_run_len`.
    ///
    /// With `strict` set, any missing day is a hard
    /// [`SummaryError::DataCompleteness`] carrying the full list of
    /// offending days; otherwise the verdicts are returned and the caller
    /// decides.
    pub fn check(
        table: &MeterTable,
        profile: &SamplingProfile,
        strict: bool,
        config: &SummaryConfig,
    ) -> SummaryResult<Vec<DayCount>> {
        let Some((first, last)) = table.date_range() else {
            return Ok(Vec::new());
        };

        let actual_counts = table.rows_per_day();
        let runs = longest_runs(table, profile);
        let threshold = profile
            .expected_per_day
            .saturating_sub(config.missing_samples_tolerance);

        let mut counts = Vec::new();
        let mut day = first;
        while day <= last {
            let actual = actual_counts.get(&day).copied().unwrap_or(0);
            let longest_run = runs.get(&day).copied().unwrap_or(0);
            let missing = actual < threshold || longest_run < profile.min_run_len;
            counts.push(DayCount {
                date: day,
                expected: profile.expected_per_day,
                actual,
                longest_run,
                missing,
            });
            let Some(next) = day.succ_opt() else { break };
            day = next;
        }

        if strict {
            let missing_days: Vec<NaiveDate> = counts
                .iter()
                .filter(|c| c.missing)
                .map(|c| c.date)
                .collect();
            if !missing_days.is_empty() {
                return Err(SummaryError::DataCompleteness { days: missing_days });
            }
        }

        Ok(counts)
    }
}

/// Longest contiguous run of in-tolerance samples per calendar day.
///
/// Duplicate timestamps neither extend nor break a run; a day boundary or a
/// real gap starts a fresh run.
fn longest_runs(table: &MeterTable, profile: &SamplingProfile) -> BTreeMap<NaiveDate, usize> {
    let threshold = profile.gap_threshold();
    let mut runs: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut run = 0usize;
    let mut previous_date: Option<NaiveDate> = None;

    for (i, ts) in table.timestamps.iter().enumerate() {
        let date = ts.date();
        if previous_date == Some(date) && i > 0 {
            let gap = *ts - table.timestamps[i - 1];
            if gap == Duration::zero() {
                // Duplicate reading; the run neither grows nor resets.
            } else if gap <= threshold {
                run += 1;
            } else {
                run = 1;
            }
        } else {
            run = 1;
        }
        previous_date = Some(date);
        let best = runs.entry(date).or_insert(0);
        if run > *best {
            *best = run;
        }
    }

    runs
}

/// Decides which calendar months hold enough data to be reported.
pub struct MonthCompletenessValidator;

impl MonthCompletenessValidator {
    /// Splits the table into retained rows and per-month verdicts.
    ///
    /// A month is full when its rows span the whole calendar month and its
    /// missing days stay within `missing_days_tolerance`. With
    /// `warning_only` every row is retained and incomplete months are merely
    /// flagged (`incomplete-warn`); otherwise their rows are removed from
    /// the returned table (`incomplete-reject`).
    ///
    /// Months are always evaluated against calendar-month bounds; billing
    /// periods spanning a cutoff get their coarser verdict downstream from
    /// the aggregator.
    pub fn select_full_months(
        table: &MeterTable,
        day_counts: &[DayCount],
        warning_only: bool,
        config: &SummaryConfig,
    ) -> (MeterTable, Vec<MonthCompleteness>) {
        let mut by_month: BTreeMap<(i32, u32), Vec<&DayCount>> = BTreeMap::new();
        for count in day_counts {
            by_month
                .entry((count.date.year(), count.date.month()))
                .or_default()
                .push(count);
        }

        let mut months = Vec::new();
        for ((year, month), days) in &by_month {
            let covers_full_month = days.len() == days_in_month(*year, *month) as usize;
            let missing_days: Vec<NaiveDate> = days
                .iter()
                .filter(|d| d.missing)
                .map(|d| d.date)
                .collect();
            let full =
                covers_full_month && missing_days.len() <= config.missing_days_tolerance;

            let verdict = if full {
                CompletenessVerdict::Complete
            } else if warning_only {
                CompletenessVerdict::IncompleteWarn
            } else {
                CompletenessVerdict::IncompleteReject
            };

            if !full {
                warn!(
                    "Month {:04}-{:02} is incomplete ({} missing day(s), full coverage: {}): {}",
                    year,
                    month,
                    missing_days.len(),
                    covers_full_month,
                    if warning_only { "retained with warning" } else { "excluded from report" },
                );
            }

            months.push(MonthCompleteness {
                year: *year,
                month: *month,
                verdict,
                missing_days,
                covers_full_month,
            });
        }

        let retained = if warning_only {
            table.clone()
        } else {
            let keep: Vec<bool> = table
                .timestamps
                .iter()
                .map(|ts| {
                    let key = (ts.date().year(), ts.date().month());
                    months
                        .iter()
                        .find(|m| (m.year, m.month) == key)
                        .map(|m| m.verdict.is_complete())
                        .unwrap_or(false)
                })
                .collect();
            table.filter_rows(&keep)
        };

        (retained, months)
    }
}
