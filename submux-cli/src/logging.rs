// ============================================================================
// submux-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and File Dispatch
//
// All terminal output of the CLI goes through the `log` macros, so the logger
// set up here decides what reaches the console and what reaches the run log.
//
// KEY COMPONENTS:
// - get_timestamp: timestamp used in log file names
// - init_logging: fern dispatch with a console output and an optional file
//
// The console output prints messages as they are (the terminal module styles
// them); warnings and errors go to stderr, and so does everything else when
// stdout carries JSON lines. The file output prefixes every line
// with time, level and target and strips ANSI escapes.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use log::LevelFilter;

use crate::error::{CliErrorContext, CliResult};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// # Example
/// ```
/// let log_filename = format!("submux_{}.log", submux_cli::logging::get_timestamp());
/// assert!(log_filename.starts_with("submux_"));
/// ```
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Name of the run log file for a run started now.
pub fn log_file_name() -> String {
    format!("submux_{}.log", get_timestamp())
}

/// Removes ANSI escape sequences from a log line.
pub fn strip_ansi(text: &str) -> String {
    String::from_utf8_lossy(&strip_ansi_escapes::strip(text)).into_owned()
}

/// Initializes the global logger.
///
/// With `stdout_reserved` every console line goes to stderr, leaving stdout
/// to machine-readable output. Returns the path of the log file when one was
/// created.
pub fn init_logging(
    verbose: bool,
    log_dir: Option<&Path>,
    stdout_reserved: bool,
) -> CliResult<Option<PathBuf>> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let console = fern::Dispatch::new()
        .format(|out, message, _record| out.finish(format_args!("{}", message)))
        .chain(
            fern::Dispatch::new()
                .filter(move |metadata| !stdout_reserved && metadata.level() > log::Level::Warn)
                .chain(io::stdout()),
        )
        .chain(
            fern::Dispatch::new()
                .filter(move |metadata| stdout_reserved || metadata.level() <= log::Level::Warn)
                .chain(io::stderr()),
        );

    let mut dispatch = fern::Dispatch::new()
        .level(level)
        // Keep third-party crates quiet unless debugging
        .level_for("indicatif", LevelFilter::Warn)
        .chain(console);

    let mut log_path = None;
    if let Some(dir) = log_dir {
        fs::create_dir_all(dir)
            .cli_with_context(|| format!("Failed to create log directory '{}'", dir.display()))?;
        let path = dir.join(log_file_name());
        let file = File::create(&path)
            .cli_with_context(|| format!("Failed to create log file '{}'", path.display()))?;

        let file_dispatch = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{} [{:<5}] {}: {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                    record.level(),
                    record.target(),
                    strip_ansi(&message.to_string())
                ))
            })
            .chain(file);
        dispatch = dispatch.chain(file_dispatch);
        log_path = Some(path);
    }

    dispatch
        .apply()
        .map_err(|e| submux_core::CoreError::Config(format!("Failed to initialize logger: {e}")))?;

    Ok(log_path)
}
