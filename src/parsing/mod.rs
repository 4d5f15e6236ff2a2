//! Parsers for meter time-series input formats.
//!
//! The only supported input today is a delimited text file whose first column
//! is a parseable timestamp; subsequent columns are load readings or metadata
//! per the naming convention handled by
//! [`crate::preprocessing::selector`].

pub mod csv_parser;


pub use csv_parser::{parse_meter_csv, parse_meter_csv_str};
