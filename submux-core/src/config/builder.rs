// ============================================================================
// submux-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// This module implements a fluent builder for CoreConfig. Every setter that
// takes an extension normalizes it, so callers can pass ".SRT" or "srt"
// interchangeably.

use std::path::PathBuf;

use super::{normalize_extension, CoreConfig, ExistingOutput};

/// Builder for creating CoreConfig instances.
///
/// Starts from [`CoreConfig::default`]; unset fields keep their defaults.
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    config: CoreConfig,
}

impl CoreConfigBuilder {
    /// Creates a new builder holding the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration, e.g. [`CoreConfig::from_env`].
    pub fn from_config(config: CoreConfig) -> Self {
        Self { config }
    }

    /// Sets the location of the merge tool executable.
    pub fn tool_path(mut self, tool_path: impl Into<PathBuf>) -> Self {
        self.config.tool_path = tool_path.into();
        self
    }

    /// Sets the extensions matched as video candidates.
    ///
    /// Duplicates are dropped, first occurrence wins.
    pub fn video_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for ext in extensions {
            let ext = normalize_extension(ext.as_ref());
            if !normalized.contains(&ext) {
                normalized.push(ext);
            }
        }
        self.config.video_extensions = normalized;
        self
    }

    /// Sets the extension matched as subtitle files.
    pub fn subtitle_extension(mut self, extension: impl AsRef<str>) -> Self {
        self.config.subtitle_extension = normalize_extension(extension.as_ref());
        self
    }

    /// Sets the language tag applied to every subtitle track.
    pub fn language_tag(mut self, tag: impl Into<String>) -> Self {
        self.config.language_tag = tag.into();
        self
    }

    /// Sets the marker inserted before the container extension.
    pub fn output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.output_suffix = suffix.into();
        self
    }

    /// Sets the extension of the produced container.
    pub fn container_extension(mut self, extension: impl AsRef<str>) -> Self {
        self.config.container_extension = normalize_extension(extension.as_ref());
        self
    }

    /// Sends every output to `output_dir` instead of the video's folder.
    pub fn output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(output_dir.into());
        self
    }

    /// Sets the behavior for outputs that already exist.
    pub fn existing_output(mut self, policy: ExistingOutput) -> Self {
        self.config.existing_output = policy;
        self
    }

    /// Builds the configuration. Call [`CoreConfig::validate`] before use.
    pub fn build(self) -> CoreConfig {
        self.config
    }
}
