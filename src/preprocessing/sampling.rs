//! Sampling-interval inference from a timestamp sequence.

use chrono::{Duration, NaiveDateTime};
use std::collections::HashMap;

use crate::config::SummaryConfig;
use crate::core::domain::SamplingProfile;
use crate::core::error::{SummaryError, SummaryResult};

/// Minimum number of samples needed to observe at least one gap.
pub const MIN_SAMPLES: usize = 2;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Infers a [`SamplingProfile`] from observed inter-sample gaps.
pub struct IntervalEstimator;

impl IntervalEstimator {
    /// Estimates the dominant sampling interval of a timestamp sequence.
    ///
    /// The dominant interval is the statistical mode of the consecutive gaps;
    /// ties break toward the smaller interval, the more conservative
    /// assumption for gap detection. Zero-length gaps (duplicate timestamps)
    /// never vote.
    ///
    /// The profile is scoped to the sequence it was computed from: after
    /// filtering a table, estimate again instead of reusing the old profile.
    ///
    /// # Errors
    ///
    /// [`SummaryError::InsufficientData`] when fewer than [`MIN_SAMPLES`]
    /// samples exist, or when every gap is zero.
    pub fn estimate(
        timestamps: &[NaiveDateTime],
        config: &SummaryConfig,
    ) -> SummaryResult<SamplingProfile> {
        if timestamps.len() < MIN_SAMPLES {
            return Err(SummaryError::InsufficientData {
                got: timestamps.len(),
                needed: MIN_SAMPLES,
            });
        }

        let mut gap_counts: HashMap<i64, usize> = HashMap::new();
        for pair in timestamps.windows(2) {
            let gap = (pair[1] - pair[0]).num_seconds();
            if gap > 0 {
                *gap_counts.entry(gap).or_insert(0) += 1;
            }
        }

        let Some((&interval_secs, _)) = gap_counts
            .iter()
            .max_by(|(gap_a, count_a), (gap_b, count_b)| {
                count_a.cmp(count_b).then_with(|| gap_b.cmp(gap_a))
            })
        else {
            // Every timestamp was identical; there is no interval to see.
            return Err(SummaryError::InsufficientData {
                got: timestamps.len(),
                needed: MIN_SAMPLES,
            });
        };

        let tolerance_secs = (interval_secs as f64 * config.interval_tolerance).round() as i64;
        let expected_per_day = ((SECONDS_PER_DAY / interval_secs as f64).round() as usize).max(1);
        let min_run_len = ((expected_per_day as f64) * config.min_run_fraction).ceil() as usize;

        Ok(SamplingProfile {
            interval: Duration::seconds(interval_secs),
            tolerance: Duration::seconds(tolerance_secs),
            expected_per_day,
            min_run_len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(step_minutes: i64, count: usize) -> Vec<NaiveDateTime> {
        let base = NaiveDate::from_ymd_opt(2023, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..count)
            .map(|i| base + Duration::minutes(step_minutes * i as i64))
            .collect()
    }

    #[test]
    fn thirty_minute_series() {
        let profile = IntervalEstimator::estimate(&series(30, 10), &SummaryConfig::default()).unwrap();
        assert_eq!(profile.interval, Duration::minutes(30));
        assert_eq!(profile.expected_per_day, 48);
        assert_eq!(profile.tolerance, Duration::seconds(180));
        assert_eq!(profile.min_run_len, 24);
        assert_eq!(profile.gap_threshold(), Duration::seconds(1980));
    }

    #[test]
    fn mode_wins_over_outlier_gaps() {
        let mut timestamps = series(15, 20);
        // One long outage in the middle must not shift the dominant interval.
        let base = *timestamps.last().unwrap();
        timestamps.extend((1..10).map(|i| base + Duration::hours(6) + Duration::minutes(15 * i)));
        let profile = IntervalEstimator::estimate(&timestamps, &SummaryConfig::default()).unwrap();
        assert_eq!(profile.interval, Duration::minutes(15));
    }

    #[test]
    fn ties_break_toward_the_smaller_interval() {
        let base = NaiveDate::from_ymd_opt(2023, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        // Two gaps of 10 minutes and two of 30 minutes.
        let timestamps = vec![
            base,
            base + Duration::minutes(10),
            base + Duration::minutes(20),
            base + Duration::minutes(50),
            base + Duration::minutes(80),
        ];
        let profile = IntervalEstimator::estimate(&timestamps, &SummaryConfig::default()).unwrap();
        assert_eq!(profile.interval, Duration::minutes(10));
    }

    #[test]
    fn single_sample_is_insufficient() {
        let err = IntervalEstimator::estimate(&series(30, 1), &SummaryConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            SummaryError::InsufficientData { got: 1, needed: 2 }
        ));
    }

    #[test]
    fn two_samples_are_enough() {
        let profile = IntervalEstimator::estimate(&series(30, 2), &SummaryConfig::default()).unwrap();
        assert_eq!(profile.interval, Duration::minutes(30));
    }

    #[test]
    fn all_duplicates_is_insufficient() {
        let base = NaiveDate::from_ymd_opt(2023, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let err =
            IntervalEstimator::estimate(&[base, base, base], &SummaryConfig::default()).unwrap_err();
        assert!(matches!(err, SummaryError::InsufficientData { .. }));
    }

    #[test]
    fn duplicates_do_not_vote_for_the_mode() {
        let base = NaiveDate::from_ymd_opt(2023, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        // Three zero gaps and two 30-minute gaps: 30 minutes must win.
        let timestamps = vec![
            base,
            base,
            base,
            base,
            base + Duration::minutes(30),
            base + Duration::minutes(60),
        ];
        let profile = IntervalEstimator::estimate(&timestamps, &SummaryConfig::default()).unwrap();
        assert_eq!(profile.interval, Duration::minutes(30));
    }
}
