pub mod cutoff;

pub use cutoff::{annotate_rows, cutoff_date, period_of};
