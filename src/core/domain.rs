//! Domain models for meter time series, sampling profiles, billing periods,
//! completeness verdicts and energy summaries.
//!
//! Everything here is a plain value: stages of the pipeline produce fresh
//! instances instead of mutating shared state, so a profile or verdict is
//! always scoped to the table it was computed from.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Values of one column of a meter table.
///
/// Numeric columns keep per-row optional readings (a missing cell stays
/// `None`, it is never imputed). Text columns are kept verbatim so metadata
/// such as device identifiers survives into the rendered report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnValues {
    Numeric(Vec<Option<f64>>),
    Text(Vec<String>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Numeric(v) => v.len(),
            ColumnValues::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the numeric readings, or `None` for a text column.
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match self {
            ColumnValues::Numeric(v) => Some(v),
            ColumnValues::Text(_) => None,
        }
    }
}

/// A named column of a [`MeterTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterColumn {
    pub name: String,
    pub values: ColumnValues,
}

impl MeterColumn {
    pub fn is_numeric(&self) -> bool {
        matches!(self.values, ColumnValues::Numeric(_))
    }
}

/// An in-memory meter time series: one timestamp per row plus the value
/// columns in their original input order.
///
/// Invariant: `timestamps` is monotonically non-decreasing after loading.
/// Duplicate timestamps are a data-quality condition surfaced by
/// [`MeterTable::duplicate_timestamps`], never silently merged.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use metersum::core::domain::{ColumnValues, MeterColumn, MeterTable};
///
/// let day = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
/// let table = MeterTable::new(
///     vec![
///         day.and_hms_opt(0, 0, 0).unwrap(),
///         day.and_hms_opt(0, 30, 0).unwrap(),
///     ],
///     vec![MeterColumn {
///         name: "mains_kw".to_string(),
///         values: ColumnValues::Numeric(vec![Some(1.2), Some(1.4)]),
///     }],
/// );
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.date_range(), Some((day, day)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterTable {
    pub timestamps: Vec<NaiveDateTime>,
    pub columns: Vec<MeterColumn>,
}

impl MeterTable {
    pub fn new(timestamps: Vec<NaiveDateTime>, columns: Vec<MeterColumn>) -> Self {
        Self {
            timestamps,
            columns,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// First and last calendar date covered by the table, if any rows exist.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.timestamps.first()?.date();
        let last = self.timestamps.last()?.date();
        Some((first, last))
    }

    /// Row count per calendar day, in chronological order.
    pub fn rows_per_day(&self) -> BTreeMap<NaiveDate, usize> {
        let mut counts = BTreeMap::new();
        for ts in &self.timestamps {
            *counts.entry(ts.date()).or_insert(0) += 1;
        }
        counts
    }

    /// Timestamps that occur more than once, each reported once, in order.
    pub fn duplicate_timestamps(&self) -> Vec<NaiveDateTime> {
        let mut duplicates = Vec::new();
        let mut i = 0;
        while i < self.timestamps.len() {
            let mut j = i + 1;
            while j < self.timestamps.len() && self.timestamps[j] == self.timestamps[i] {
                j += 1;
            }
            if j - i > 1 {
                duplicates.push(self.timestamps[i]);
            }
            i = j;
        }
        duplicates
    }

    /// Column lookup by name.
    pub fn column(&self, name: &str) -> Option<&MeterColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns a new table containing only the rows where `keep` is true.
    ///
    /// `keep` must have one entry per row.
    pub fn filter_rows(&self, keep: &[bool]) -> MeterTable {
        let timestamps = self
            .timestamps
            .iter()
            .zip(keep)
            .filter(|(_, k)| **k)
            .map(|(ts, _)| *ts)
            .collect();
        let columns = self
            .columns
            .iter()
            .map(|col| MeterColumn {
                name: col.name.clone(),
                values: match &col.values {
                    ColumnValues::Numeric(v) => ColumnValues::Numeric(
                        v.iter()
                            .zip(keep)
                            .filter(|(_, k)| **k)
                            .map(|(x, _)| *x)
                            .collect(),
                    ),
                    ColumnValues::Text(v) => ColumnValues::Text(
                        v.iter()
                            .zip(keep)
                            .filter(|(_, k)| **k)
                            .map(|(x, _)| x.clone())
                            .collect(),
                    ),
                },
            })
            .collect();
        MeterTable::new(timestamps, columns)
    }
}

/// What a load channel measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelKind {
    /// Instantaneous power in kW; integrated over elapsed time into kWh.
    Power,
    /// A cumulative energy counter in kWh; differenced between readings.
    CumulativeEnergy,
}

/// One measured circuit/meter column, identified once per dataset load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadChannel {
    pub name: String,
    pub kind: ChannelKind,
    /// Index of the backing column in [`MeterTable::columns`].
    pub column: usize,
}

/// Typed partition of a table's columns.
///
/// Ambiguous columns (numeric but with no recognized naming marker) are kept
/// in their own bucket; downstream they are treated as metadata so that a
/// non-load column is never aggregated as consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelPartition {
    pub loads: Vec<LoadChannel>,
    pub metadata: Vec<String>,
    pub ambiguous: Vec<String>,
}

/// Sampling characteristics inferred from one table's timestamp sequence.
///
/// A profile is immutable and scoped to the table it was computed from;
/// re-estimating on a filtered subset must be re-invoked explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingProfile {
    /// Dominant interval between consecutive samples.
    pub interval: Duration,
    /// Jitter absorbed before a gap counts as real.
    pub tolerance: Duration,
    /// Expected sample count for a full calendar day.
    pub expected_per_day: usize,
    /// Days whose longest contiguous in-tolerance run is shorter than this
    /// are incomplete even if the raw row count passes.
    pub min_run_len: usize,
}

impl SamplingProfile {
    /// Largest elapsed time still treated as continuous sampling.
    pub fn gap_threshold(&self) -> Duration {
        self.interval + self.tolerance
    }
}

/// A labeled billing span `[start, end)` between two consecutive cutoff dates.
///
/// The label is keyed by the *ending* cutoff's year and month, formatted
/// `YYYY-MM`. For a fixed cutoff day, periods tile the calendar with no gap
/// and no overlap.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BillingPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

impl std::fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Day/month/period-level judgment of whether enough samples exist to trust
/// an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletenessVerdict {
    Complete,
    IncompleteWarn,
    IncompleteReject,
}

impl CompletenessVerdict {
    pub fn is_complete(&self) -> bool {
        matches!(self, CompletenessVerdict::Complete)
    }

    /// Combines two verdicts, keeping the more severe one.
    pub fn combine(self, other: CompletenessVerdict) -> CompletenessVerdict {
        use CompletenessVerdict::*;
        match (self, other) {
            (IncompleteReject, _) | (_, IncompleteReject) => IncompleteReject,
            (IncompleteWarn, _) | (_, IncompleteWarn) => IncompleteWarn,
            _ => Complete,
        }
    }
}

/// Expected versus observed sample count for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub expected: usize,
    pub actual: usize,
    /// Length of the longest contiguous run of in-tolerance samples.
    pub longest_run: usize,
    pub missing: bool,
}

/// Completeness verdict for one calendar month, with the missing days that
/// produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthCompleteness {
    pub year: i32,
    pub month: u32,
    pub verdict: CompletenessVerdict,
    pub missing_days: Vec<NaiveDate>,
    /// False when the dataset does not span the whole calendar month.
    pub covers_full_month: bool,
}

impl MonthCompleteness {
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;
        date.year() == self.year && date.month() == self.month
    }
}

/// A cumulative meter reading that went backwards between two samples.
///
/// This is a recorded data condition, not an error: the energy delta is
/// clamped and the anomaly travels alongside it for the caller to flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterResetAnomaly {
    pub channel: String,
    pub timestamp: NaiveDateTime,
    pub previous: f64,
    pub current: f64,
}

/// Per-row energy for one load channel, aligned with the table rows.
///
/// `None` marks rows with no computable energy: the first row of a contiguous
/// run, a row after a real gap, or a row with a missing reading. Zero would
/// understate true consumption, so absence stays absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyChannel {
    pub name: String,
    pub kind: ChannelKind,
    pub kwh: Vec<Option<f64>>,
}

/// Per-row energy columns for every load channel, in input-column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyTable {
    pub channels: Vec<EnergyChannel>,
}

impl EnergyTable {
    pub fn channel(&self, name: &str) -> Option<&EnergyChannel> {
        self.channels.iter().find(|c| c.name == name)
    }
}

/// Daily energy total for one load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEnergy {
    pub date: NaiveDate,
    pub kwh: f64,
    pub verdict: CompletenessVerdict,
}

/// Billing-period energy total for one load.
///
/// The numeric total is always produced; the verdict reports whether every
/// composing day was complete. Enforcement is the caller's policy choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodEnergy {
    pub period: BillingPeriod,
    pub kwh: f64,
    /// False when the dataset does not span the whole billing period, so a
    /// few days of data at the edge of the range never pass for a full
    /// period's consumption.
    pub covers_full_period: bool,
    pub verdict: CompletenessVerdict,
}

/// Roll-up for one load channel: daily totals and billing-period totals,
/// both in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub channel: String,
    pub kind: ChannelKind,
    pub daily: Vec<DailyEnergy>,
    pub periods: Vec<PeriodEnergy>,
}

/// The complete summary set: one [`LoadSummary`] per load channel, in
/// input-column order. Consumed read-only by the report layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergySummary {
    pub cutoff_day: u32,
    pub loads: Vec<LoadSummary>,
}
