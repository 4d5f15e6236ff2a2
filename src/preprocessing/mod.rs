//! Dataset characterization and validation stages.
//!
//! - [`selector`]: classify table columns into loads, metadata and ambiguous
//! - [`sampling`]: infer the dominant sampling interval and gap tolerance
//! - [`validator`]: per-day completeness checks and full-month selection
//! - [`pipeline`]: sequence the stages for one in-memory table

pub mod pipeline;
pub mod sampling;
pub mod selector;
pub mod validator;

pub use pipeline::{PipelineOptions, PipelineOutcome, SummaryPipeline};
pub use sampling::IntervalEstimator;
pub use selector::LoadSelector;
pub use validator::{DataCompletenessChecker, MonthCompletenessValidator};
