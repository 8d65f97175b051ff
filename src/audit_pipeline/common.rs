//! Common utilities module
//!
//! This module contains shared utilities used across the audit pipeline.

pub mod error;

pub use error::{AuditError, Result};
