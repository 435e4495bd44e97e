//! Per-folder outcomes and the batch summary.
//!
//! Every folder of a run ends in exactly one [`FolderOutcome`]. The summary
//! aggregates them once, after the last folder.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::analysis::AmbiguityNote;
use crate::merge::MergeError;

pub mod summary;

pub use summary::BatchSummary;

/// Why a folder never reached the merge tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The folder could not be read (moved, deleted, permissions).
    FolderInaccessible { detail: String },
    /// No file with a video extension.
    NoVideoFound,
    /// No file with the subtitle extension.
    NoSubtitlesFound,
    /// The output already exists and the policy is to keep it.
    OutputExists { output_path: PathBuf },
    /// An earlier folder of the same run already targets this output.
    OutputCollision {
        output_path: PathBuf,
        first_folder: PathBuf,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::FolderInaccessible { detail } => {
                write!(f, "folder inaccessible ({detail}); it may have been moved or deleted")
            }
            SkipReason::NoVideoFound => write!(f, "no video file found"),
            SkipReason::NoSubtitlesFound => write!(f, "no subtitle files found"),
            SkipReason::OutputExists { output_path } => {
                write!(f, "output already exists: {}", output_path.display())
            }
            SkipReason::OutputCollision {
                output_path,
                first_folder,
            } => write!(
                f,
                "output {} is already produced by folder {}",
                output_path.display(),
                first_folder.display()
            ),
        }
    }
}

/// Terminal state of one folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FolderOutcome {
    Skipped { reason: SkipReason },
    Succeeded { output_path: PathBuf },
    Failed { error: MergeError },
}

impl FolderOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FolderOutcome::Succeeded { .. })
    }
}

/// Record of one folder in a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderReport {
    pub folder: PathBuf,
    pub outcome: FolderOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ambiguity: Option<AmbiguityNote>,
}
