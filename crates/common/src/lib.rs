//! Waterflow Common Utilities
//!
//! Shared infrastructure for all Waterflow crates:
//! - Error types and result aliases
//! - Monotonic clock for stamping pointer events
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
