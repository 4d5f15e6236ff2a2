//! Column-role classification for meter tables.
//!
//! Load channels are recognized by naming convention plus a numeric-type
//! check; everything else is metadata. Numeric columns with no recognized
//! marker land in the ambiguous bucket and are treated as metadata, so a
//! non-load column is never aggregated as consumption.

use log::warn;

use crate::core::domain::{ChannelKind, ChannelPartition, LoadChannel, MeterTable};
use crate::core::error::{SummaryError, SummaryResult};

/// Name suffixes marking an instantaneous power column (kW).
const POWER_MARKERS: &[&str] = &["_kw", "(kw)", "_power"];

/// Name suffixes marking a cumulative energy counter column (kWh).
const CUMULATIVE_MARKERS: &[&str] = &["_kwh", "(kwh)", "_energy"];

/// Well-known metadata column names, matched case-insensitively.
const METADATA_NAMES: &[&str] = &[
    "timestamp",
    "time",
    "datetime",
    "date",
    "device",
    "device_id",
    "meter",
    "meter_id",
    "site",
    "site_id",
    "status",
    "quality",
    "flag",
    "notes",
    "source",
];

/// Classifier for table columns.
pub struct LoadSelector;

impl LoadSelector {
    /// Partitions a table's columns into loads, metadata and ambiguous.
    ///
    /// Classification happens once per loaded dataset; the partition is
    /// immutable thereafter. Errors only when no load column is detected at
    /// all, since a metadata-only table makes the whole computation
    /// meaningless. Partial ambiguity degrades gracefully instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use metersum::parsing::parse_meter_csv_str;
    /// use metersum::preprocessing::LoadSelector;
    ///
    /// let table = parse_meter_csv_str(
    ///     "timestamp,mains_kw,device_id\n2023-06-01 00:00:00,1.5,m7\n",
    /// )
    /// .unwrap();
    /// let partition = LoadSelector::select_loads(&table).unwrap();
    /// assert_eq!(partition.loads.len(), 1);
    /// assert_eq!(partition.metadata, vec!["device_id".to_string()]);
    /// ```
    pub fn select_loads(table: &MeterTable) -> SummaryResult<ChannelPartition> {
        let mut loads = Vec::new();
        let mut metadata = Vec::new();
        let mut ambiguous = Vec::new();

        for (index, column) in table.columns.iter().enumerate() {
            let lowered = column.name.trim().to_lowercase();

            if METADATA_NAMES.iter().any(|m| lowered == *m) {
                metadata.push(column.name.clone());
                continue;
            }

            // Non-numeric columns are never loads, regardless of name.
            if !column.is_numeric() {
                metadata.push(column.name.clone());
                continue;
            }

            if let Some(kind) = kind_from_name(&lowered) {
                loads.push(LoadChannel {
                    name: column.name.clone(),
                    kind,
                    column: index,
                });
            } else {
                warn!(
                    "Column '{}' is numeric but matches no load naming convention; treating as metadata",
                    column.name
                );
                ambiguous.push(column.name.clone());
            }
        }

        if loads.is_empty() {
            return Err(SummaryError::NoLoadChannels {
                columns: table.columns.iter().map(|c| c.name.clone()).collect(),
            });
        }

        Ok(ChannelPartition {
            loads,
            metadata,
            ambiguous,
        })
    }
}

fn kind_from_name(lowered: &str) -> Option<ChannelKind> {
    if CUMULATIVE_MARKERS.iter().any(|m| lowered.ends_with(m)) {
        Some(ChannelKind::CumulativeEnergy)
    } else if POWER_MARKERS.iter().any(|m| lowered.ends_with(m)) {
        Some(ChannelKind::Power)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{ColumnValues, MeterColumn};
    use chrono::NaiveDate;

    fn table_with(columns: Vec<MeterColumn>) -> MeterTable {
        let rows = columns.first().map(|c| c.values.len()).unwrap_or(0);
        let base = NaiveDate::from_ymd_opt(2023, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let timestamps = (0..rows)
            .map(|i| base + chrono::Duration::minutes(30 * i as i64))
            .collect();
        MeterTable::new(timestamps, columns)
    }

    fn numeric(name: &str) -> MeterColumn {
        MeterColumn {
            name: name.to_string(),
            values: ColumnValues::Numeric(vec![Some(1.0), Some(2.0)]),
        }
    }

    fn text(name: &str) -> MeterColumn {
        MeterColumn {
            name: name.to_string(),
            values: ColumnValues::Text(vec!["a".to_string(), "b".to_string()]),
        }
    }

    #[test]
    fn classifies_power_and_cumulative_markers() {
        let table = table_with(vec![
            numeric("mains_kw"),
            numeric("Total_kWh"),
            numeric("hvac (kW)"),
        ]);
        let partition = LoadSelector::select_loads(&table).unwrap();
        assert_eq!(partition.loads.len(), 3);
        assert_eq!(partition.loads[0].kind, ChannelKind::Power);
        assert_eq!(partition.loads[1].kind, ChannelKind::CumulativeEnergy);
        assert_eq!(partition.loads[2].kind, ChannelKind::Power);
        assert_eq!(partition.loads[1].column, 1);
    }

    #[test]
    fn known_metadata_names_and_text_columns_are_metadata() {
        let table = table_with(vec![numeric("mains_kw"), text("notes"), numeric("Status")]);
        let partition = LoadSelector::select_loads(&table).unwrap();
        assert_eq!(partition.loads.len(), 1);
        assert_eq!(
            partition.metadata,
            vec!["notes".to_string(), "Status".to_string()]
        );
    }

    #[test]
    fn numeric_column_with_load_like_name_but_text_values_is_not_a_load() {
        let table = table_with(vec![numeric("mains_kw"), text("backup_kw")]);
        let partition = LoadSelector::select_loads(&table).unwrap();
        assert_eq!(partition.loads.len(), 1);
        assert!(partition.metadata.contains(&"backup_kw".to_string()));
    }

    #[test]
    fn unmatched_numeric_columns_are_ambiguous() {
        let table = table_with(vec![numeric("mains_kw"), numeric("reading")]);
        let partition = LoadSelector::select_loads(&table).unwrap();
        assert_eq!(partition.ambiguous, vec!["reading".to_string()]);
    }

    #[test]
    fn zero_loads_is_an_error() {
        let table = table_with(vec![text("device_id"), numeric("reading")]);
        let err = LoadSelector::select_loads(&table).unwrap_err();
        match err {
            SummaryError::NoLoadChannels { columns } => {
                assert_eq!(columns, vec!["device_id".to_string(), "reading".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
