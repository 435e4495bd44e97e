// ============================================================================
// submux-cli/src/main.rs
// ============================================================================
//
// MAIN ENTRY POINT: Submux CLI Application
//
// Parses the command line, sets up logging and dispatches to the command
// implementations.
//
// EXIT CODES:
// - 0: every folder merged or was skipped
// - 1: setup error (arguments, configuration, logging, missing tool on check)
// - 2: the batch ran and at least one folder failed to merge

use clap::Parser;
use log::debug;
use std::path::PathBuf;
use std::process;

use submux_cli::{run_check, run_merge, terminal, Cli, CliResult, Commands};

/// Exit code for a batch in which at least one merge failed
const EXIT_FOLDER_FAILURES: i32 = 2;

/// Default location of the run log when `--log-dir` is not given.
fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join("submux").join("logs")
}

fn run(cli: Cli) -> CliResult<i32> {
    let json_mode = matches!(&cli.command, Commands::Merge(args) if args.json);
    let log_dir = if cli.no_log_file {
        None
    } else {
        Some(cli.log_dir.clone().unwrap_or_else(default_log_dir))
    };

    let log_path = submux_cli::logging::init_logging(cli.verbose, log_dir.as_deref(), json_mode)?;
    if let Some(path) = &log_path {
        debug!("Writing run log to {}", path.display());
    }

    match cli.command {
        Commands::Merge(args) => {
            let summary = run_merge(args)?;
            Ok(match summary {
                Some(summary) if summary.has_failures() => EXIT_FOLDER_FAILURES,
                _ => 0,
            })
        }
        Commands::Check(args) => {
            run_check(args)?;
            Ok(0)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            // The logger may not be up yet, so errors go straight to stderr
            terminal::clear_progress_bar();
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
