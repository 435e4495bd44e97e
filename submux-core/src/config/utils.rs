//! Configuration utility functions
//!
//! Helpers for reading configuration overrides from environment variables.
//! An unset or empty variable yields the default.

use std::path::PathBuf;

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|val| !val.trim().is_empty())
}

/// Get a string value from an environment variable or use the default
pub fn get_env_string(key: &str, default: String) -> String {
    non_empty_var(key).unwrap_or(default)
}

/// Get a path value from an environment variable or use the default
pub fn get_env_path(key: &str, default: PathBuf) -> PathBuf {
    non_empty_var(key).map(PathBuf::from).unwrap_or(default)
}

/// Parse a comma-separated list from an environment variable
pub fn get_env_list(key: &str, default: Vec<String>) -> Vec<String> {
    match non_empty_var(key) {
        Some(val) => {
            let items: Vec<String> = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if items.is_empty() { default } else { items }
        }
        None => default,
    }
}
