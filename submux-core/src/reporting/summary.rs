//! Summary reporting module
//!
//! Aggregates the per-folder reports of a run into a [`BatchSummary`].

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use super::{FolderOutcome, FolderReport};

/// Aggregate over one batch run. Built once, after the last folder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    /// Number of folders submitted
    pub total: usize,
    /// Folders whose merge succeeded
    pub succeeded: usize,
    /// Folders that never reached the merge tool
    pub skipped: usize,
    /// Folders whose merge failed
    pub failed: usize,
    /// Wall-clock duration of the run in seconds
    pub elapsed_secs: f64,
    /// One report per folder, in processing order
    pub folders: Vec<FolderReport>,
}

impl BatchSummary {
    /// Builds the summary from the reports of a finished run.
    pub fn from_reports(folders: Vec<FolderReport>, elapsed: Duration) -> Self {
        let mut succeeded = 0;
        let mut skipped = 0;
        let mut failed = 0;
        for report in &folders {
            match report.outcome {
                FolderOutcome::Succeeded { .. } => succeeded += 1,
                FolderOutcome::Skipped { .. } => skipped += 1,
                FolderOutcome::Failed { .. } => failed += 1,
            }
        }

        Self {
            total: folders.len(),
            succeeded,
            skipped,
            failed,
            elapsed_secs: elapsed.as_secs_f64(),
            folders,
        }
    }

    /// True if at least one merge failed.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// True if every submitted folder produced an output.
    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.total
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {}/{} folders successfully ({} skipped, {} failed)",
            self.succeeded, self.total, self.skipped, self.failed
        )
    }
}
