//! Test Utilities Crate
//!
//! Shared fixtures and builders for the vaccination system test suites.
//!
//! # Modules
//!
//! - `fixtures`: canned CPFs, dates, and pre-seeded mock stores
//! - `builders`: builder patterns for test data construction
//! - `telemetry`: opt-in tracing output for test runs

pub mod builders;
pub mod fixtures;
pub mod telemetry;

pub use builders::*;
pub use fixtures::*;
pub use telemetry::*;
