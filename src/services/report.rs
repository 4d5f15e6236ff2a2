//! Report orchestration: per-file and per-folder batch semantics, plus the
//! seam to external rendering collaborators.
//!
//! Chart generation, HTML templating and delivery live outside this crate;
//! they receive a [`ReportBundle`] through the [`ReportRenderer`] trait. The
//! built-in [`JsonReportRenderer`] writes the bundle as a JSON artifact and
//! doubles as the default collaborator in tests.

use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SummaryConfig;
use crate::core::domain::{
    BillingPeriod, EnergySummary, EnergyTable, MeterResetAnomaly, MeterTable, MonthCompleteness,
};
use crate::io::MeterDataLoader;
use crate::preprocessing::{PipelineOptions, SummaryPipeline};

/// Everything a rendering collaborator needs for one dataset, read-only.
#[derive(Debug)]
pub struct ReportBundle<'a> {
    pub source: &'a Path,
    pub summary: &'a EnergySummary,
    /// Retained rows, in input row/column order.
    pub table: &'a MeterTable,
    /// Per-row energy columns aligned with `table`.
    pub energy: &'a EnergyTable,
    /// Per-row billing-period labels aligned with `table`.
    pub periods: &'a [BillingPeriod],
    pub anomalies: &'a [MeterResetAnomaly],
    pub months: &'a [MonthCompleteness],
}

/// External rendering collaborator.
pub trait ReportRenderer {
    /// Renders one bundle and returns the identifying path of the artifact.
    fn render(&self, bundle: &ReportBundle<'_>) -> Result<PathBuf>;
}

/// Renderer writing the bundle as a JSON document, one file per dataset.
#[derive(Debug, Clone)]
pub struct JsonReportRenderer {
    output_dir: PathBuf,
}

impl JsonReportRenderer {
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl ReportRenderer for JsonReportRenderer {
    fn render(&self, bundle: &ReportBundle<'_>) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create report output directory: {}",
                self.output_dir.display()
            )
        })?;

        let stem = bundle
            .source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("report");
        let path = self.output_dir.join(format!("{}_summary.json", stem));

        let document = serde_json::json!({
            "source": bundle.source.display().to_string(),
            "rows": bundle.table.len(),
            "summary": bundle.summary,
            "months": bundle.months,
            "anomalies": bundle.anomalies,
        });

        let file = fs::File::create(&path)
            .with_context(|| format!("Failed to create report file: {}", path.display()))?;
        serde_json::to_writer_pretty(file, &document)
            .with_context(|| format!("Failed to write report file: {}", path.display()))?;

        info!("Report written to {}", path.display());
        Ok(path)
    }
}

/// Result of a folder batch: artifacts produced and files skipped.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub rendered: Vec<PathBuf>,
    pub failures: Vec<BatchFailure>,
}

/// One skipped file with the reason it failed.
#[derive(Debug)]
pub struct BatchFailure {
    pub source: PathBuf,
    pub reason: String,
}

/// Sequences loading, computation and rendering for files and folders.
///
/// Holds no results between calls: every invocation computes at most once
/// per (dataset, cutoff day) and never memoizes.
pub struct ReportOrchestrator<R: ReportRenderer> {
    pipeline: SummaryPipeline,
    renderer: R,
}

impl<R: ReportRenderer> ReportOrchestrator<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            pipeline: SummaryPipeline::new(),
            renderer,
        }
    }

    pub fn with_config(config: SummaryConfig, renderer: R) -> Self {
        Self {
            pipeline: SummaryPipeline::with_config(config),
            renderer,
        }
    }

    /// Loads one dataset, runs the pipeline and hands the result to the
    /// renderer. Returns the artifact path.
    pub fn generate_for_file(
        &self,
        path: &Path,
        cutoff_day: u32,
        options: &PipelineOptions,
    ) -> Result<PathBuf> {
        let table = MeterDataLoader::load_from_file(path)?;
        let outcome = self.pipeline.process(&table, cutoff_day, options)?;

        let bundle = ReportBundle {
            source: path,
            summary: &outcome.summary,
            table: &outcome.table,
            energy: &outcome.energy,
            periods: &outcome.periods,
            anomalies: &outcome.anomalies,
            months: &outcome.months,
        };
        self.renderer
            .render(&bundle)
            .context("Report renderer failed")
    }

    /// Runs [`Self::generate_for_file`] once per CSV file in the folder, in
    /// name order for reproducibility.
    ///
    /// A failing file is logged and skipped so one bad dataset never takes
    /// down the whole batch; in strict mode the first failure aborts
    /// instead.
    pub fn generate_for_folder(
        &self,
        dir: &Path,
        cutoff_day: u32,
        options: &PipelineOptions,
    ) -> Result<BatchOutcome> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .with_context(|| format!("Failed to read input folder: {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
            })
            .collect();
        files.sort();

        let mut outcome = BatchOutcome::default();
        for file in files {
            match self.generate_for_file(&file, cutoff_day, options) {
                Ok(artifact) => outcome.rendered.push(artifact),
                Err(err) => {
                    if options.strict {
                        return Err(err.context(format!(
                            "Aborting batch at first failure: {}",
                            file.display()
                        )));
                    }
                    warn!("Skipping {}: {:#}", file.display(), err);
                    outcome.failures.push(BatchFailure {
                        source: file,
                        reason: format!("{:#}", err),
                    });
                }
            }
        }

        Ok(outcome)
    }
}
