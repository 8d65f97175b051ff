use std::fmt;
use std::path::{Path, PathBuf};

use crate::audit_pipeline::common::error::AuditError;
use crate::audit_pipeline::report::AuditReport;

/// What happened to one input file.
#[derive(Debug)]
pub enum FileOutcome {
    Completed {
        path: PathBuf,
        report: AuditReport,
        output: PathBuf,
    },
    Failed {
        path: PathBuf,
        error: AuditError,
    },
    /// The batch was cancelled before this file started.
    Cancelled { path: PathBuf },
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            FileOutcome::Completed { path, .. }
            | FileOutcome::Failed { path, .. }
            | FileOutcome::Cancelled { path } => path,
        }
    }

    pub fn report(&self) -> Option<&AuditReport> {
        match self {
            FileOutcome::Completed { report, .. } => Some(report),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AuditError> {
        match self {
            FileOutcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Per-file outcomes of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    outcomes: Vec<FileOutcome>,
}

impl BatchOutcome {
    pub fn new(outcomes: Vec<FileOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    pub fn reports(&self) -> impl Iterator<Item = &AuditReport> {
        self.outcomes.iter().filter_map(FileOutcome::report)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &AuditError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.error().map(|e| (o.path(), e)))
    }

    pub fn was_cancelled(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| matches!(o, FileOutcome::Cancelled { .. }))
    }

    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.outcomes.len(),
            ..BatchSummary::default()
        };
        for outcome in &self.outcomes {
            match outcome {
                FileOutcome::Completed { .. } => summary.completed += 1,
                FileOutcome::Failed { .. } => summary.failed += 1,
                FileOutcome::Cancelled { .. } => summary.cancelled += 1,
            }
        }
        summary
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files: {} audited, {} failed, {} cancelled",
            self.total, self.completed, self.failed, self.cancelled
        )
    }
}
