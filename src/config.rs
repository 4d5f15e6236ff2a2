//! Tunable thresholds for sampling estimation and completeness checks.
//!
//! The exact defaults are a calibration question; everything that was a magic
//! number in earlier report tooling is exposed here and can be overridden from
//! a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Thresholds consumed across the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Fraction of the dominant interval absorbed as timestamp jitter before
    /// an elapsed time counts as a real gap.
    #[serde(default = "default_interval_tolerance")]
    pub interval_tolerance: f64,

    /// A day may fall this many samples short of the expected count and still
    /// be considered complete.
    #[serde(default = "default_missing_samples_tolerance")]
    pub missing_samples_tolerance: usize,

    /// A month may contain this many missing days and still qualify as full.
    #[serde(default = "default_missing_days_tolerance")]
    pub missing_days_tolerance: usize,

    /// Minimum contiguous in-tolerance run for a day, as a fraction of the
    /// expected daily sample count.
    #[serde(default = "default_min_run_fraction")]
    pub min_run_fraction: f64,
}

fn default_interval_tolerance() -> f64 {
    0.1
}

fn default_missing_samples_tolerance() -> usize {
    2
}

fn default_missing_days_tolerance() -> usize {
    0
}

fn default_min_run_fraction() -> f64 {
    0.5
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            interval_tolerance: default_interval_tolerance(),
            missing_samples_tolerance: default_missing_samples_tolerance(),
            missing_days_tolerance: default_missing_days_tolerance(),
            min_run_fraction: default_min_run_fraction(),
        }
    }
}

impl SummaryConfig {
    /// Parse a configuration from a TOML string. Missing keys fall back to
    /// the defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("Failed to parse summary configuration")
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_keys() {
        let config = SummaryConfig::from_toml_str("missing_samples_tolerance = 5").unwrap();
        assert_eq!(config.missing_samples_tolerance, 5);
        assert_eq!(config.interval_tolerance, 0.1);
        assert_eq!(config.missing_days_tolerance, 0);
        assert_eq!(config.min_run_fraction, 0.5);
    }

    #[test]
    fn empty_config_is_the_default() {
        let config = SummaryConfig::from_toml_str("").unwrap();
        assert_eq!(config, SummaryConfig::default());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(SummaryConfig::from_toml_str("interval_tolerance = [").is_err());
    }
}
