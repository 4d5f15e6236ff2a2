//! Error types for the summary computation pipeline.

use chrono::NaiveDate;

/// Result type for summary computations
pub type SummaryResult<T> = Result<T, SummaryError>;

/// Error type for conditions that make a computation meaningless.
///
/// Stage-local findings (a single missing day, an ambiguous column, a meter
/// reset) are carried forward as verdicts or annotations in the data and are
/// never raised through this type. Each variant keeps enough structure for the
/// caller to render a precise user-facing message.
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("not enough samples to estimate a sampling interval: got {got}, need at least {needed}")]
    InsufficientData { got: usize, needed: usize },

    #[error("{} day(s) below the completeness threshold: {}", days.len(), format_days(days))]
    DataCompleteness { days: Vec<NaiveDate> },

    #[error("no load channels detected among columns: {}", columns.join(", "))]
    NoLoadChannels { columns: Vec<String> },

    #[error("invalid cutoff day {0}, expected a value in 1..=31")]
    InvalidCutoffDay(u32),
}

fn format_days(days: &[NaiveDate]) -> String {
    days.iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completeness_error_names_offending_days() {
        let days = vec![
            NaiveDate::from_ymd_opt(2023, 6, 10).unwrap(),
            NaiveDate::from_ymd_opt(2023, 6, 11).unwrap(),
        ];
        let err = SummaryError::DataCompleteness { days };
        let msg = err.to_string();
        assert!(msg.contains("2 day(s)"));
        assert!(msg.contains("2023-06-10"));
        assert!(msg.contains("2023-06-11"));
    }

    #[test]
    fn no_load_channels_lists_columns() {
        let err = SummaryError::NoLoadChannels {
            columns: vec!["device_id".to_string(), "status".to_string()],
        };
        assert!(err.to_string().contains("device_id, status"));
    }
}
