// ============================================================================
// submux-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Setup Errors for the Submux Core
//
// This module defines the error type returned by the fallible setup
// operations of the core library (configuration validation, job collection).
// Per-folder problems during a batch run are never errors at this level: they
// are recovered by the orchestrator and reported as events.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur before or around a batch run.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Filesystem failures in setup steps (via `?` or `cli_with_context`).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Required external tool '{0}' not found")]
    DependencyNotFound(String),

    #[error("Failed to start '{0}': {1}")]
    CommandStart(String, String),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("No folders to process")]
    NoFolders,

    #[error("Batch worker failed: {0}")]
    Worker(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for submux-core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;
