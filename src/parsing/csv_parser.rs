use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use std::path::Path;

use crate::core::domain::{ColumnValues, MeterColumn, MeterTable};

/// Timestamp formats accepted in the first CSV column, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Parse a timestamp cell, trying the supported formats in order.
/// A bare date parses as midnight.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(ts);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    None
}

/// Parse a meter CSV file into a [`MeterTable`].
///
/// The first column is the timestamp; every other column is kept in input
/// order. Rows are stably sorted by timestamp after parsing, so duplicate
/// timestamps remain adjacent and detectable instead of being merged.
pub fn parse_meter_csv(csv_path: &Path) -> Result<MeterTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file: {}", csv_path.display()))?;
    read_table(&mut reader)
}

/// Parse a meter CSV from an in-memory string (useful for testing).
pub fn parse_meter_csv_str(contents: &str) -> Result<MeterTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());
    read_table(&mut reader)
}

fn read_table<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<MeterTable> {
    let headers = reader
        .headers()
        .context("Failed to read CSV header row")?
        .clone();
    if headers.is_empty() {
        bail!("CSV has no columns");
    }

    let value_names: Vec<String> = headers.iter().skip(1).map(|h| h.to_string()).collect();
    let mut timestamps: Vec<NaiveDateTime> = Vec::new();
    let mut raw_cells: Vec<Vec<String>> = vec![Vec::new(); value_names.len()];

    for (idx, record) in reader.records().enumerate() {
        // Header is line 1, so data row `idx` sits on line `idx + 2`.
        let line = idx + 2;
        let record = record.with_context(|| format!("Failed to read CSV row {}", line))?;

        let ts_cell = record.get(0).unwrap_or("");
        let ts = parse_timestamp(ts_cell)
            .with_context(|| format!("Unparseable timestamp '{}' at row {}", ts_cell, line))?;
        timestamps.push(ts);

        for (col, cells) in raw_cells.iter_mut().enumerate() {
            cells.push(record.get(col + 1).unwrap_or("").to_string());
        }
    }

    // Stable sort keeps duplicate timestamps in input order.
    let mut order: Vec<usize> = (0..timestamps.len()).collect();
    order.sort_by_key(|&i| timestamps[i]);

    let sorted_timestamps: Vec<NaiveDateTime> = order.iter().map(|&i| timestamps[i]).collect();
    let columns = value_names
        .into_iter()
        .zip(raw_cells)
        .map(|(name, cells)| {
            let reordered: Vec<String> = order.iter().map(|&i| cells[i].clone()).collect();
            MeterColumn {
                name,
                values: classify_cells(reordered),
            }
        })
        .collect();

    Ok(MeterTable::new(sorted_timestamps, columns))
}

/// Decide whether a column is numeric and convert it.
///
/// A column is numeric when every non-empty cell parses as a float and at
/// least one cell holds a value; empty cells become `None`. Anything else is
/// kept as text so it can never be mistaken for a load downstream.
fn classify_cells(cells: Vec<String>) -> ColumnValues {
    let mut parsed: Vec<Option<f64>> = Vec::with_capacity(cells.len());
    let mut any_value = false;
    let mut all_numeric = true;

    for cell in &cells {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            parsed.push(None);
            continue;
        }
        match trimmed.parse::<f64>() {
            Ok(v) => {
                any_value = true;
                parsed.push(Some(v));
            }
            Err(_) => {
                all_numeric = false;
                break;
            }
        }
    }

    if all_numeric && any_value {
        ColumnValues::Numeric(parsed)
    } else {
        ColumnValues::Text(cells)
    }
}
