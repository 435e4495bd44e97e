//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Module containing the implementation of the `check` command.
pub mod check;

/// Module containing the implementation of the `merge` command.
/// This command collects folders, runs the batch and renders its events.
pub mod merge;
