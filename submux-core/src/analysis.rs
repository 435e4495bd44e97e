//! Folder analysis: classifies a folder's files into video and subtitle roles.
//!
//! Only the immediate entries of the folder are considered; subdirectories
//! are ignored. Entries are sorted by file name before classification so the
//! "first video wins" rule gives the same answer on every platform.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Serialize;

use crate::config::CoreConfig;
use crate::merge::output_file_name;

/// Advisory annotation raised when a folder holds more than one video candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmbiguityNote {
    /// The video that was selected (the first candidate)
    pub selected: PathBuf,
    /// Every other candidate, in discovery order
    pub ignored: Vec<PathBuf>,
}

impl fmt::Display for AmbiguityNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ignored: Vec<String> = self.ignored.iter().map(|p| display_name(p)).collect();
        write!(
            f,
            "multiple videos found; using '{}', ignoring {}",
            display_name(&self.selected),
            ignored
                .iter()
                .map(|name| format!("'{name}'"))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

/// What the analyzer found in one folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisResult {
    /// The selected video file, if any candidate was found
    pub video: Option<PathBuf>,
    /// All subtitle files, in discovery order
    pub subtitles: Vec<PathBuf>,
    /// Set when more than one video candidate exists
    pub ambiguity: Option<AmbiguityNote>,
    /// Set when the folder could not be read; the result is otherwise empty
    pub inaccessible: Option<String>,
}

impl AnalysisResult {
    fn inaccessible(detail: String) -> Self {
        Self {
            inaccessible: Some(detail),
            ..Self::default()
        }
    }
}

/// Classifies folder contents according to the configured extensions.
#[derive(Debug, Clone)]
pub struct FolderAnalyzer {
    config: CoreConfig,
}

impl FolderAnalyzer {
    pub fn new(config: &CoreConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Analyzes the immediate files of `folder`.
    ///
    /// Never fails: an unreadable folder produces an empty result with
    /// [`AnalysisResult::inaccessible`] set.
    pub fn analyze(&self, folder: &Path) -> AnalysisResult {
        let files = match list_files(folder) {
            Ok(files) => files,
            Err(e) => {
                warn!(
                    "Could not access folder {}: {}. It may have been moved or deleted.",
                    folder.display(),
                    e
                );
                return AnalysisResult::inaccessible(e.to_string());
            }
        };

        let mut videos: Vec<PathBuf> = Vec::new();
        let mut subtitles: Vec<PathBuf> = Vec::new();

        for file in files {
            let Some(ext) = file.extension() else {
                continue;
            };
            if self.config.is_video_extension(ext) {
                videos.push(file);
            } else if self.config.is_subtitle_extension(ext) {
                subtitles.push(file);
            }
        }

        let videos = self.without_previous_outputs(videos);

        let mut candidates = videos.into_iter();
        let video = candidates.next();
        let ignored: Vec<PathBuf> = candidates.collect();

        let ambiguity = match (&video, ignored.is_empty()) {
            (Some(selected), false) => {
                let note = AmbiguityNote {
                    selected: selected.clone(),
                    ignored,
                };
                warn!("Multiple videos in {}: {}", folder_name(folder), note);
                Some(note)
            }
            _ => None,
        };

        debug!(
            "Analyzed {}: video={:?}, subtitles={}",
            folder.display(),
            video.as_ref().map(|v| display_name(v)),
            subtitles.len()
        );

        AnalysisResult {
            video,
            subtitles,
            ambiguity,
            inaccessible: None,
        }
    }

    /// Drops candidates that are the output of a previous run for another
    /// candidate in the same folder (`movie_subbed.mkv` next to `movie.mp4`).
    ///
    /// With an output directory, outputs never land in the source folder and
    /// every candidate is kept.
    fn without_previous_outputs(&self, videos: Vec<PathBuf>) -> Vec<PathBuf> {
        if self.config.output_suffix.is_empty() || self.config.output_dir.is_some() {
            return videos;
        }
        let produced: Vec<_> = videos
            .iter()
            .map(|v| output_file_name(v, &self.config))
            .collect();

        videos
            .into_iter()
            .filter(|candidate| {
                let is_output = candidate
                    .file_name()
                    .map(|name| produced.iter().any(|p| p.as_os_str() == name))
                    .unwrap_or(false);
                if is_output {
                    debug!("Ignoring previous output {}", candidate.display());
                }
                !is_output
            })
            .collect()
    }
}

/// Lists the regular files directly inside `folder`, sorted by file name.
fn list_files(folder: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(folder)?
        .filter_map(|entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry in {}: {}", folder.display(), e);
                    return None;
                }
            };
            let path = entry.path();
            path.is_file().then_some(path)
        })
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Last path component as a lossy string, or the whole path if there is none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Display name of a folder (its last component).
pub fn folder_name(folder: &Path) -> String {
    display_name(folder)
}
