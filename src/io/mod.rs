//! Input loading boundaries.
//!
//! Loading is the only read-side I/O in the crate; everything downstream of
//! [`loaders::MeterDataLoader`] operates on in-memory tables.

pub mod loaders;

#[cfg(test)]
mod loaders_tests;

pub use loaders::MeterDataLoader;
