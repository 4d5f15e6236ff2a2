//! Power-to-energy integration.
//!
//! Power channels are integrated over the *actual* elapsed time between
//! consecutive samples, which keeps the result robust to timestamp jitter
//! while staying sensitive to real gaps: an interval wider than the
//! profile's gap threshold is never integrated as if sampling had been
//! continuous. Cumulative-energy channels are differenced instead, with a
//! monotonicity check that turns a backwards reading into a clamped delta
//! plus a recorded [`MeterResetAnomaly`].

use chrono::{Duration, NaiveDateTime};

use crate::core::domain::{
    ChannelKind, ChannelPartition, ColumnValues, EnergyChannel, EnergyTable, MeterResetAnomaly,
    MeterTable, SamplingProfile,
};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Computes per-row energy columns for every load channel.
pub struct EnergyComputer;

impl EnergyComputer {
    /// Produces one kWh column per load, aligned with the table rows, plus
    /// any meter-reset anomalies observed on cumulative channels.
    ///
    /// The first row of a contiguous run has no predecessor and is emitted
    /// as `None`, never zero.
    pub fn compute(
        table: &MeterTable,
        partition: &ChannelPartition,
        profile: &SamplingProfile,
    ) -> (EnergyTable, Vec<MeterResetAnomaly>) {
        let mut anomalies = Vec::new();
        let channels = partition
            .loads
            .iter()
            .map(|load| {
                let kwh = match (&table.columns[load.column].values, load.kind) {
                    (ColumnValues::Numeric(values), ChannelKind::Power) => {
                        integrate_power(&table.timestamps, values, profile)
                    }
                    (ColumnValues::Numeric(values), ChannelKind::CumulativeEnergy) => {
                        diff_cumulative(&table.timestamps, values, &load.name, &mut anomalies)
                    }
                    // The selector never classifies text columns as loads.
                    (ColumnValues::Text(_), _) => vec![None; table.len()],
                };
                EnergyChannel {
                    name: load.name.clone(),
                    kind: load.kind,
                    kwh,
                }
            })
            .collect();

        (EnergyTable { channels }, anomalies)
    }
}

/// kWh for row `i` from the power reading and the actual elapsed time since
/// row `i - 1`. Gaps beyond the tolerance band and duplicate timestamps are
/// not integrable.
fn integrate_power(
    timestamps: &[NaiveDateTime],
    values: &[Option<f64>],
    profile: &SamplingProfile,
) -> Vec<Option<f64>> {
    let threshold = profile.gap_threshold();
    let mut kwh = vec![None; values.len()];

    for i in 1..values.len() {
        let elapsed = timestamps[i] - timestamps[i - 1];
        if elapsed <= Duration::zero() || elapsed > threshold {
            continue;
        }
        if let Some(power) = values[i] {
            kwh[i] = Some(power * elapsed.num_seconds() as f64 / SECONDS_PER_HOUR);
        }
    }

    kwh
}

/// First difference of cumulative readings, skipping missing cells.
///
/// A reading lower than its predecessor signals a meter reset, not bad data:
/// the delta is clamped to zero and the anomaly recorded so the caller can
/// flag it. Deltas are taken across gaps as well, since the counter itself
/// already integrates over them.
fn diff_cumulative(
    timestamps: &[NaiveDateTime],
    values: &[Option<f64>],
    channel: &str,
    anomalies: &mut Vec<MeterResetAnomaly>,
) -> Vec<Option<f64>> {
    let mut kwh = vec![None; values.len()];
    let mut previous: Option<f64> = None;

    for (i, value) in values.iter().enumerate() {
        let Some(current) = *value else { continue };
        if let Some(prev) = previous {
            let delta = current - prev;
            if delta < 0.0 {
                anomalies.push(MeterResetAnomaly {
                    channel: channel.to_string(),
                    timestamp: timestamps[i],
                    previous: prev,
                    current,
                });
                kwh[i] = Some(0.0);
            } else {
                kwh[i] = Some(delta);
            }
        }
        previous = Some(current);
    }

    kwh
}
