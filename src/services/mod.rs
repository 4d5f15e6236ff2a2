//! Service layer: roll-ups and report orchestration.
//!
//! [`summary`] composes the per-interval energy into the per-day and
//! per-billing-period totals that make up an
//! [`crate::core::domain::EnergySummary`]; [`report`] owns per-file and
//! per-folder batch semantics and the seam to external rendering
//! collaborators.

pub mod report;
pub mod summary;

pub use report::{BatchOutcome, JsonReportRenderer, ReportBundle, ReportOrchestrator, ReportRenderer};
pub use summary::SummaryAggregator;
