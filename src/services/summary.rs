//! Roll-up of per-interval energy into per-day and per-billing-period
//! totals.
//!
//! Roll-up order: per-interval energy → per-day total per load →
//! per-billing-period total per load. Totals are always produced;
//! completeness is reported through verdicts, never enforced here — that
//! policy choice belongs to the caller.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use crate::calendar::cutoff::{period_of_unchecked, validate_cutoff_day};
use crate::core::domain::{
    BillingPeriod, CompletenessVerdict, DailyEnergy, DayCount, EnergySummary, EnergyTable,
    LoadSummary, MeterTable, MonthCompleteness, PeriodEnergy,
};
use crate::core::error::SummaryResult;

/// Composes the pipeline outputs into an [`EnergySummary`].
pub struct SummaryAggregator;

impl SummaryAggregator {
    /// Rolls energy up into daily and billing-period totals per load.
    ///
    /// Output order is deterministic: loads follow input-column order,
    /// days and periods are chronological, so two runs over the same input
    /// produce identical summaries.
    ///
    /// A period's verdict combines the verdicts of every calendar day
    /// composing it (within the dataset's original range); reject dominates
    /// warn. `day_counts` and `months` must come from the same dataset the
    /// retained `table` was derived from.
    ///
    /// A day whose retained rows all carry undefined energy (for example a
    /// single row closing a long outage) is omitted from the daily list
    /// rather than reported as zero, matching the per-row rule that absence
    /// stays absent.
    pub fn summarize(
        table: &MeterTable,
        energy: &EnergyTable,
        day_counts: &[DayCount],
        months: &[MonthCompleteness],
        cutoff_day: u32,
    ) -> SummaryResult<EnergySummary> {
        validate_cutoff_day(cutoff_day)?;

        let missing_days: BTreeSet<NaiveDate> = day_counts
            .iter()
            .filter(|c| c.missing)
            .map(|c| c.date)
            .collect();
        // Original dataset range, independent of month-level filtering.
        let range = day_counts
            .first()
            .zip(day_counts.last())
            .map(|(first, last)| (first.date, last.date));

        let day_verdict = |date: NaiveDate| -> CompletenessVerdict {
            let mut verdict = months
                .iter()
                .find(|m| m.contains(date))
                .map(|m| m.verdict)
                .unwrap_or(CompletenessVerdict::Complete);
            if missing_days.contains(&date) {
                verdict = verdict.combine(CompletenessVerdict::IncompleteWarn);
            }
            verdict
        };

        let covers_period = |period: &BillingPeriod| -> bool {
            let Some((first, last)) = range else {
                return false;
            };
            first <= period.start
                && period.end.pred_opt().map_or(false, |final_day| final_day <= last)
        };

        let period_verdict = |period: &BillingPeriod| -> CompletenessVerdict {
            let Some((first, last)) = range else {
                return CompletenessVerdict::Complete;
            };
            let mut verdict = CompletenessVerdict::Complete;
            let mut day = period.start.max(first);
            while day < period.end && day <= last {
                verdict = verdict.combine(day_verdict(day));
                let Some(next) = day.succ_opt() else { break };
                day = next;
            }
            verdict
        };

        let mut loads = Vec::with_capacity(energy.channels.len());
        for channel in &energy.channels {
            let mut day_totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
            for (ts, kwh) in table.timestamps.iter().zip(&channel.kwh) {
                if let Some(value) = kwh {
                    *day_totals.entry(ts.date()).or_insert(0.0) += value;
                }
            }

            let daily: Vec<DailyEnergy> = day_totals
                .iter()
                .map(|(date, kwh)| DailyEnergy {
                    date: *date,
                    kwh: *kwh,
                    verdict: day_verdict(*date),
                })
                .collect();

            let mut period_totals: BTreeMap<BillingPeriod, f64> = BTreeMap::new();
            for (date, kwh) in &day_totals {
                let period = period_of_unchecked(*date, cutoff_day);
                *period_totals.entry(period).or_insert(0.0) += *kwh;
            }

            let periods: Vec<PeriodEnergy> = period_totals
                .into_iter()
                .map(|(period, kwh)| {
                    let verdict = period_verdict(&period);
                    let covers_full_period = covers_period(&period);
                    PeriodEnergy {
                        period,
                        kwh,
                        covers_full_period,
                        verdict,
                    }
                })
                .collect();

            loads.push(LoadSummary {
                channel: channel.name.clone(),
                kind: channel.kind,
                daily,
                periods,
            });
        }

        Ok(EnergySummary { cutoff_day, loads })
    }
}
