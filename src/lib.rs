//! Billing-period-aligned energy consumption summaries from meter time series.
//!
//! The crate ingests sub-hourly power/energy meter readings (CSV), characterizes
//! their sampling, decides which calendar months hold enough data to be trusted,
//! integrates power samples into energy, and rolls everything up into per-load,
//! per-billing-period totals suitable for client reports. Rendering, delivery and
//! persistence are external collaborators reached through [`services::report`].

pub mod algorithms;
pub mod calendar;
pub mod config;
pub mod core;
pub mod io;
pub mod parsing;
pub mod preprocessing;
pub mod services;
