//! Core types and pure pipeline stages for the winback one-time-buyer report.
//!
//! This crate is deliberately free of HTTP and filesystem dependencies.
//! The query and report crates depend on it; it depends on nothing heavier
//! than `chrono` and `serde`.

pub mod error;
pub mod pipeline;
pub mod record;
pub mod version;

pub use error::{Error, Result};
