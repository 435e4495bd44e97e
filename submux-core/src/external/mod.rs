// ============================================================================
// submux-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with the Merge Tool Process
//
// This module encapsulates every interaction with the external merge tool.
// Process execution sits behind the ToolRunner trait so the executor and the
// orchestrator can be driven by a mock in tests.
//
// KEY COMPONENTS:
// - ToolRunner: trait for running a program to completion with captured output
// - ProcessToolRunner: std::process implementation (console window hidden on Windows)
// - probe_tool_version: pre-flight check of the configured tool
// - mkvmerge: argument construction for the merge command

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{CoreError, CoreResult};

/// Contains merge argument construction and command formatting
pub mod mkvmerge;

/// Mock runner recording calls and replaying canned results
#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

pub use mkvmerge::{build_merge_args, format_command};

// ============================================================================
// TOOL EXECUTION
// ============================================================================

/// Captured result of a finished tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` if the process was terminated by a signal
    pub exit_code: Option<i32>,
    /// Standard output, decoded lossily as UTF-8
    pub stdout: String,
    /// Standard error, decoded lossily as UTF-8
    pub stderr: String,
}

impl ToolOutput {
    /// True if the tool exited with status zero.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs an external program to completion.
///
/// Implementations block the calling thread until the program exits. An
/// `Err` means the program could not be started or waited on; a program that
/// ran and failed is an `Ok` with a nonzero exit code.
pub trait ToolRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ToolOutput>;
}

/// Runs tools as child processes with `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessToolRunner;

impl ToolRunner for ProcessToolRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ToolOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        hide_console_window(&mut cmd);

        let output = cmd.output()?;
        Ok(ToolOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Keeps console tools from flashing a window when launched from a GUI session.
#[cfg(windows)]
fn hide_console_window(cmd: &mut Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    cmd.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn hide_console_window(_cmd: &mut Command) {}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that the merge tool can be started and returns its version line.
///
/// Runs `<tool> --version`. A missing binary yields
/// `CoreError::DependencyNotFound`; any other start failure or a nonzero
/// exit yields `CoreError::CommandStart`.
pub fn probe_tool_version<R: ToolRunner>(runner: &R, tool: &Path) -> CoreResult<String> {
    let version_arg = [OsString::from("--version")];
    match runner.run(tool, &version_arg) {
        Ok(output) if output.success() => {
            let line = output
                .stdout
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .unwrap_or("unknown version")
                .to_string();
            log::debug!("Found merge tool {}: {}", tool.display(), line);
            Ok(line)
        }
        Ok(output) => Err(CoreError::CommandStart(
            tool.display().to_string(),
            format!("--version exited with code {}", output.exit_code.unwrap_or(-1)),
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Merge tool '{}' not found.", tool.display());
            Err(CoreError::DependencyNotFound(tool.display().to_string()))
        }
        Err(e) => {
            log::error!("Failed to start merge tool '{}': {}", tool.display(), e);
            Err(CoreError::CommandStart(tool.display().to_string(), e.to_string()))
        }
    }
}
