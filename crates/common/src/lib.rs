//! lmsmooth Common Utilities
//!
//! Shared infrastructure for all lmsmooth crates:
//! - Error types and result aliases
//! - Timestamp helpers and synthetic frame clocks
//! - Tracing/logging initialization
//! - Configuration loading and validation

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
