//! Implementation of the 'check' subcommand: verifies the merge tool can be started.

use crate::cli::CheckArgs;
use crate::error::CliResult;
use crate::terminal;

use submux_core::{probe_tool_version, CoreConfig, ProcessToolRunner};

/// Probes the configured merge tool and prints its version.
pub fn run_check(args: CheckArgs) -> CliResult<String> {
    let mut config = CoreConfig::from_env();
    if let Some(tool) = args.tool.tool_path {
        config.tool_path = tool;
    }

    terminal::print_section("Merge tool");
    terminal::print_status("Path", &config.tool_path.display().to_string(), false);

    let version = probe_tool_version(&ProcessToolRunner, &config.tool_path)?;
    terminal::print_status("Version", &version, true);
    terminal::print_success("Merge tool is available");
    Ok(version)
}
