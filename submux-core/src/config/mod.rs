//! Configuration structures and constants for the submux-core library.
//!
//! The configuration is an explicit value constructed once at startup and
//! handed to the analyzer and the executor. Nothing in the core reads ambient
//! global state.

mod builder;
pub mod utils;

use std::ffi::OsStr;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::{CoreError, CoreResult};

pub use builder::CoreConfigBuilder;

// Default constants

/// Default merge tool, resolved through `PATH`.
pub const DEFAULT_TOOL_PATH: &str = "mkvmerge";

/// Default extensions recognized as video candidates.
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv"];

/// Default extension recognized as a subtitle file.
pub const DEFAULT_SUBTITLE_EXTENSION: &str = "srt";

/// Default language tag applied to every subtitle track.
pub const DEFAULT_LANGUAGE_TAG: &str = "eng";

/// Default marker inserted between the video stem and the container extension.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_subbed";

/// Default extension of the produced container.
pub const DEFAULT_CONTAINER_EXTENSION: &str = "mkv";

// Environment variable names

pub const ENV_TOOL_PATH: &str = "SUBMUX_TOOL_PATH";
pub const ENV_VIDEO_EXTENSIONS: &str = "SUBMUX_VIDEO_EXTENSIONS";
pub const ENV_SUBTITLE_EXTENSION: &str = "SUBMUX_SUBTITLE_EXTENSION";
pub const ENV_LANGUAGE_TAG: &str = "SUBMUX_LANGUAGE";
pub const ENV_OUTPUT_SUFFIX: &str = "SUBMUX_OUTPUT_SUFFIX";

/// What to do when the output file of a folder already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExistingOutput {
    /// Run the tool anyway; it replaces the previous output.
    #[default]
    Overwrite,
    /// Leave the existing output untouched and record the folder as skipped.
    Skip,
}

/// Main configuration structure for the submux-core library.
///
/// Extensions are stored normalized: lowercase, without a leading dot.
/// Use [`CoreConfigBuilder`] or [`CoreConfig::from_env`] to get normalization
/// for free.
///
/// # Examples
///
/// ```rust
/// use submux_core::config::CoreConfigBuilder;
///
/// let config = CoreConfigBuilder::new()
///     .tool_path("/usr/bin/mkvmerge")
///     .video_extensions(["mp4", ".MKV", "avi"])
///     .subtitle_extension(".srt")
///     .language_tag("eng")
///     .output_suffix("_subbed")
///     .build();
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.video_extensions, vec!["mp4", "mkv", "avi"]);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct CoreConfig {
    /// Location of the merge tool executable
    pub tool_path: PathBuf,

    /// Extensions matched as video candidates
    pub video_extensions: Vec<String>,

    /// Extension matched as subtitle files
    pub subtitle_extension: String,

    /// Language tag applied to every subtitle track
    pub language_tag: String,

    /// Marker inserted before the container extension of the output name
    pub output_suffix: String,

    /// Extension of the produced container
    pub container_extension: String,

    /// Optional directory receiving all outputs (defaults to the video's folder)
    pub output_dir: Option<PathBuf>,

    /// Behavior when the output file already exists
    pub existing_output: ExistingOutput,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            tool_path: PathBuf::from(DEFAULT_TOOL_PATH),
            video_extensions: DEFAULT_VIDEO_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
            subtitle_extension: DEFAULT_SUBTITLE_EXTENSION.to_string(),
            language_tag: DEFAULT_LANGUAGE_TAG.to_string(),
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            container_extension: DEFAULT_CONTAINER_EXTENSION.to_string(),
            output_dir: None,
            existing_output: ExistingOutput::default(),
        }
    }
}

impl CoreConfig {
    /// Creates the default configuration with environment overrides applied.
    ///
    /// Recognized variables: `SUBMUX_TOOL_PATH`, `SUBMUX_VIDEO_EXTENSIONS`
    /// (comma separated), `SUBMUX_SUBTITLE_EXTENSION`, `SUBMUX_LANGUAGE` and
    /// `SUBMUX_OUTPUT_SUFFIX`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        CoreConfigBuilder::new()
            .tool_path(utils::get_env_path(ENV_TOOL_PATH, defaults.tool_path))
            .video_extensions(utils::get_env_list(
                ENV_VIDEO_EXTENSIONS,
                defaults.video_extensions,
            ))
            .subtitle_extension(utils::get_env_string(
                ENV_SUBTITLE_EXTENSION,
                defaults.subtitle_extension,
            ))
            .language_tag(utils::get_env_string(ENV_LANGUAGE_TAG, defaults.language_tag))
            .output_suffix(utils::get_env_string(ENV_OUTPUT_SUFFIX, defaults.output_suffix))
            .build()
    }

    /// Checks that the configuration can drive a batch run.
    pub fn validate(&self) -> CoreResult<()> {
        if self.tool_path.as_os_str().is_empty() {
            return Err(CoreError::Config("tool path must not be empty".to_string()));
        }
        if self.video_extensions.is_empty() || self.video_extensions.iter().any(String::is_empty) {
            return Err(CoreError::Config(
                "at least one non-empty video extension is required".to_string(),
            ));
        }
        if self.subtitle_extension.is_empty() {
            return Err(CoreError::Config(
                "subtitle extension must not be empty".to_string(),
            ));
        }
        if self.video_extensions.contains(&self.subtitle_extension) {
            return Err(CoreError::Config(format!(
                "'{}' cannot be both a video and the subtitle extension",
                self.subtitle_extension
            )));
        }
        if self.language_tag.trim().is_empty() {
            return Err(CoreError::Config("language tag must not be empty".to_string()));
        }
        if self.container_extension.is_empty() {
            return Err(CoreError::Config(
                "container extension must not be empty".to_string(),
            ));
        }
        if self.output_suffix.is_empty() && self.output_dir.is_none() {
            // <stem>.<container> next to the source could be the source itself
            return Err(CoreError::Config(
                "an empty output suffix requires a separate output directory".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns true if `ext` (as given by `Path::extension`) is a video extension.
    pub fn is_video_extension(&self, ext: &OsStr) -> bool {
        ext.to_str()
            .map(|e| self.video_extensions.iter().any(|v| v.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }

    /// Returns true if `ext` (as given by `Path::extension`) is the subtitle extension.
    pub fn is_subtitle_extension(&self, ext: &OsStr) -> bool {
        ext.to_str()
            .map(|e| self.subtitle_extension.eq_ignore_ascii_case(e))
            .unwrap_or(false)
    }
}

/// Normalizes a user-supplied extension: trims whitespace, strips leading
/// dots and lowercases it. `".SRT"` becomes `"srt"`.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}
