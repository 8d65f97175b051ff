//! Batch auditing module
//!
//! Drives the core over every capture in a source directory. Each file is
//! processed independently; failures are collected, never dropped.

mod auditor;
mod cancel;
mod config;
mod outcome;


pub use auditor::BatchAuditor;
pub use cancel::CancelToken;
pub use config::{AuditConfig, AuditConfigBuilder};
pub use outcome::{BatchOutcome, BatchSummary, FileOutcome};
