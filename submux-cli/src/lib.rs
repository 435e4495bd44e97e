// submux-cli/src/lib.rs
//
// Library portion of the Submux CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod terminal;

// Re-export items needed by the binary or integration tests
pub use cli::{CheckArgs, Cli, Commands, MergeArgs};
pub use commands::check::run_check;
pub use commands::merge::run_merge;
pub use error::{CliErrorContext, CliResult};
