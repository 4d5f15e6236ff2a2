//! Numeric computations over meter tables.
//!
//! # Components
//!
//! - [`energy`]: integrate power samples into per-interval energy and
//!   difference cumulative meter readings

pub mod energy;

pub use energy::EnergyComputer;
