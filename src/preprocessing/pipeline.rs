//! The end-to-end computation pipeline for one in-memory meter table.
//!
//! The stages are strictly sequential — selector, interval estimator,
//! completeness checker, month validator, energy computer, aggregator —
//! because each depends on the previous stage's output. The pipeline holds
//! no state between invocations; every call produces a fresh
//! [`PipelineOutcome`].

use log::warn;

use crate::algorithms::EnergyComputer;
use crate::calendar;
use crate::config::SummaryConfig;
use crate::core::domain::{
    BillingPeriod, ChannelPartition, DayCount, EnergySummary, EnergyTable, MeterResetAnomaly,
    MeterTable, MonthCompleteness, SamplingProfile,
};
use crate::core::error::SummaryResult;
use crate::preprocessing::selector::LoadSelector;
use crate::preprocessing::sampling::IntervalEstimator;
use crate::preprocessing::validator::{DataCompletenessChecker, MonthCompletenessValidator};
use crate::services::summary::SummaryAggregator;

/// Caller-supplied flags for one pipeline run.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Any missing day anywhere in range becomes a hard failure.
    pub strict: bool,
    /// Retain incomplete months (flagged) instead of excluding their rows.
    pub warning_only: bool,
}

/// Everything one pipeline run produced, handed read-only to the report
/// layer.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub partition: ChannelPartition,
    pub profile: SamplingProfile,
    pub day_counts: Vec<DayCount>,
    pub months: Vec<MonthCompleteness>,
    /// The retained rows (everything, in warning-only mode).
    pub table: MeterTable,
    pub energy: EnergyTable,
    /// Per-row billing-period labels for the retained rows.
    pub periods: Vec<BillingPeriod>,
    pub anomalies: Vec<MeterResetAnomaly>,
    pub summary: EnergySummary,
}

/// Sequences the computation stages over one table.
pub struct SummaryPipeline {
    config: SummaryConfig,
}

impl SummaryPipeline {
    /// Pipeline with default thresholds.
    pub fn new() -> Self {
        Self {
            config: SummaryConfig::default(),
        }
    }

    /// Pipeline with custom thresholds.
    pub fn with_config(config: SummaryConfig) -> Self {
        Self { config }
    }

    /// Runs selector → estimator → checker → month validator → energy →
    /// aggregator for one table and cutoff day.
    ///
    /// Running twice on the same input with the same flags yields an
    /// identical [`EnergySummary`].
    pub fn process(
        &self,
        table: &MeterTable,
        cutoff_day: u32,
        options: &PipelineOptions,
    ) -> SummaryResult<PipelineOutcome> {
        calendar::cutoff::validate_cutoff_day(cutoff_day)?;

        let duplicates = table.duplicate_timestamps();
        if !duplicates.is_empty() {
            warn!(
                "Dataset contains {} duplicate timestamp(s), first at {}",
                duplicates.len(),
                duplicates[0]
            );
        }

        let partition = LoadSelector::select_loads(table)?;
        let profile = IntervalEstimator::estimate(&table.timestamps, &self.config)?;
        let day_counts =
            DataCompletenessChecker::check(table, &profile, options.strict, &self.config)?;
        let (retained, months) = MonthCompletenessValidator::select_full_months(
            table,
            &day_counts,
            options.warning_only,
            &self.config,
        );
        let (energy, anomalies) = EnergyComputer::compute(&retained, &partition, &profile);
        let periods = calendar::annotate_rows(&retained, cutoff_day)?;
        let summary = SummaryAggregator::summarize(
            &retained,
            &energy,
            &day_counts,
            &months,
            cutoff_day,
        )?;

        Ok(PipelineOutcome {
            partition,
            profile,
            day_counts,
            months,
            table: retained,
            energy,
            periods,
            anomalies,
            summary,
        })
    }
}

impl Default for SummaryPipeline {
    fn default() -> Self {
        Self::new()
    }
}
