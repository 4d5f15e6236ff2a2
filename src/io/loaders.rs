use anyhow::{Context, Result};
use std::path::Path;

use crate::core::domain::MeterTable;
use crate::parsing::csv_parser;

/// Unified interface for loading meter time-series data.
pub struct MeterDataLoader;

impl MeterDataLoader {
    /// Load a meter table from a file, dispatching on the extension.
    pub fn load_from_file(path: &Path) -> Result<MeterTable> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .context("File has no extension")?;

        match extension.to_lowercase().as_str() {
            "csv" => csv_parser::parse_meter_csv(path)
                .with_context(|| format!("Failed to load meter CSV: {}", path.display())),
            _ => anyhow::bail!("Unsupported file format: {}", extension),
        }
    }

    /// Load a meter table from an in-memory CSV string.
    pub fn load_from_str(contents: &str) -> Result<MeterTable> {
        csv_parser::parse_meter_csv_str(contents).context("Failed to parse meter CSV string")
    }
}
