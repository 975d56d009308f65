//! Common utilities for mcp-dash
//!
//! Shared functionality for the dashboard client: tracing setup, the
//! crate-level error type used during startup, and mock record
//! constructors for tests.

pub mod error;
pub mod logging;
pub mod test_utils;

pub use error::{Error, Result};
pub use logging::setup_logging;
