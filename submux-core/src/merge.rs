// ============================================================================
// submux-core/src/merge.rs
// ============================================================================
//
// MERGE EXECUTION: One Video Plus Its Subtitles Into One Container
//
// This module runs the merge tool for a single job and turns every possible
// result of that invocation into a MergeOutcome. It never returns an error and
// never panics on tool failures: a missing binary, a tool-reported error and
// unexpected I/O problems are all classified into MergeError values.
//
// KEY COMPONENTS:
// - output_path_for: deterministic output naming
// - MergeExecutor: builds the command and runs it through a ToolRunner
// - MergeOutcome / MergeError: first-class result of a merge attempt

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, error, info};
use serde::Serialize;
use thiserror::Error;

use crate::config::CoreConfig;
use crate::external::{build_merge_args, format_command, ProcessToolRunner, ToolRunner};

// ============================================================================
// OUTPUT NAMING
// ============================================================================

/// File name of the output for `video`: `<stem><suffix>.<container_extension>`.
pub fn output_file_name(video: &Path, config: &CoreConfig) -> OsString {
    let mut name = video
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_else(|| OsString::from("output"));
    name.push(&config.output_suffix);
    name.push(".");
    name.push(&config.container_extension);
    name
}

/// Full output path for `video`: next to the video, or inside the configured
/// output directory.
pub fn output_path_for(video: &Path, config: &CoreConfig) -> PathBuf {
    let dir = match &config.output_dir {
        Some(dir) => dir.clone(),
        None => video.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    dir.join(output_file_name(video, config))
}

// ============================================================================
// OUTCOME TYPES
// ============================================================================

/// Classified cause of a failed merge.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MergeError {
    /// The tool binary could not be found.
    #[error(
        "merge tool not found at '{}'. Ensure MKVToolNix is installed and the tool path is correct.",
        .tool.display()
    )]
    ToolMissing { tool: PathBuf },

    /// The tool ran and exited with a nonzero status.
    ///
    /// `diagnostic` is the tool's stderr, or its stdout when stderr is blank.
    #[error("merge tool error (code {exit_code}): {diagnostic}")]
    ToolReportedError { exit_code: i32, diagnostic: String },

    /// Any other failure to run the tool.
    #[error("unexpected error: {detail}")]
    Unexpected { detail: String },
}

impl MergeError {
    /// Short machine-friendly name of the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            MergeError::ToolMissing { .. } => "tool_missing",
            MergeError::ToolReportedError { .. } => "tool_reported_error",
            MergeError::Unexpected { .. } => "unexpected",
        }
    }
}

/// Result of one merge attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub success: bool,
    pub output_path: PathBuf,
    pub error: Option<MergeError>,
    /// Tool stdout from a successful run, kept for logging only
    pub tool_output: Option<String>,
}

impl MergeOutcome {
    fn succeeded(output_path: PathBuf, stdout: String) -> Self {
        Self {
            success: true,
            output_path,
            error: None,
            tool_output: Some(stdout),
        }
    }

    fn failed(output_path: PathBuf, error: MergeError) -> Self {
        Self {
            success: false,
            output_path,
            error: Some(error),
            tool_output: None,
        }
    }
}

// ============================================================================
// EXECUTOR
// ============================================================================

/// Runs the merge tool for one job at a time.
///
/// Generic over the [`ToolRunner`] so tests can substitute a mock; the
/// default is a real child process.
#[derive(Debug, Clone)]
pub struct MergeExecutor<R: ToolRunner = ProcessToolRunner> {
    runner: R,
    tool_path: PathBuf,
    language_tag: String,
}

impl<R: ToolRunner> MergeExecutor<R> {
    pub fn new(config: &CoreConfig, runner: R) -> Self {
        Self {
            runner,
            tool_path: config.tool_path.clone(),
            language_tag: config.language_tag.clone(),
        }
    }

    /// The argument vector `merge` would pass to the tool.
    pub fn command_args(&self, video: &Path, subtitles: &[PathBuf], output: &Path) -> Vec<OsString> {
        build_merge_args(video, subtitles, output, &self.language_tag)
    }

    /// The command line `merge` would run, formatted for display.
    pub fn command_line(&self, video: &Path, subtitles: &[PathBuf], output: &Path) -> String {
        format_command(&self.tool_path, &self.command_args(video, subtitles, output))
    }

    /// Merges `subtitles` into `video`, writing `output`.
    ///
    /// Blocks until the tool exits. Every path returns a [`MergeOutcome`].
    pub fn merge(&self, video: &Path, subtitles: &[PathBuf], output: &Path) -> MergeOutcome {
        let args = self.command_args(video, subtitles, output);
        info!("Executing command: {}", format_command(&self.tool_path, &args));

        let result = self.runner.run(&self.tool_path, &args);
        let outcome = self.classify(result, output);

        match &outcome.error {
            None => info!("Merged to '{}'", output.display()),
            Some(e) => error!("Merge failed: {}", e),
        }
        outcome
    }

    fn classify(&self, result: io::Result<crate::external::ToolOutput>, output: &Path) -> MergeOutcome {
        let output = output.to_path_buf();
        match result {
            Ok(tool_output) if tool_output.success() => {
                if !tool_output.stdout.trim().is_empty() {
                    debug!("Merge tool output:\n{}", tool_output.stdout.trim_end());
                }
                MergeOutcome::succeeded(output, tool_output.stdout)
            }
            Ok(tool_output) => {
                // mkvmerge reports most errors on stdout
                let diagnostic = if tool_output.stderr.trim().is_empty() {
                    tool_output.stdout
                } else {
                    tool_output.stderr
                };
                MergeOutcome::failed(
                    output,
                    MergeError::ToolReportedError {
                        exit_code: tool_output.exit_code.unwrap_or(-1),
                        diagnostic: diagnostic.trim_end().to_string(),
                    },
                )
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => MergeOutcome::failed(
                output,
                MergeError::ToolMissing {
                    tool: self.tool_path.clone(),
                },
            ),
            Err(e) => MergeOutcome::failed(
                output,
                MergeError::Unexpected {
                    detail: e.to_string(),
                },
            ),
        }
    }
}
