//! Core library for batch muxing of subtitle files into video containers using mkvmerge.
//!
//! Each input folder is expected to hold one video and any number of subtitle
//! files. Folders are analyzed, merged with the external tool and reported on
//! strictly one at a time, with progress and outcomes delivered as [`Event`]s.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use submux_core::{spawn_batch, BatchOrchestrator, CoreConfigBuilder, Event};
//! use std::path::PathBuf;
//!
//! let config = CoreConfigBuilder::new().language_tag("eng").build();
//! config.validate().unwrap();
//!
//! let orchestrator = BatchOrchestrator::with_process_runner(config);
//! let handle = spawn_batch(orchestrator, vec![PathBuf::from("/media/ep1")]).unwrap();
//!
//! for event in handle.events.iter() {
//!     if let Event::FolderStarted { index, total, folder_name, .. } = event {
//!         println!("[{index}/{total}] {folder_name}");
//!     }
//! }
//! let summary = handle.wait().unwrap();
//! println!("{summary}");
//! ```

pub mod analysis;
pub mod batch;
pub mod config;
pub mod error;
pub mod events;
pub mod external;
pub mod merge;
pub mod reporting;

// Re-exports for public API
pub use analysis::{AmbiguityNote, AnalysisResult, FolderAnalyzer};
pub use batch::{spawn_batch, BatchHandle, BatchOrchestrator, BatchState, FolderPlan, JobList, MergeJob};
pub use config::{CoreConfig, CoreConfigBuilder, ExistingOutput};
pub use error::{CoreError, CoreResult};
pub use events::{ChannelEventHandler, Event, EventHandler, JsonEventHandler};
pub use external::{probe_tool_version, ProcessToolRunner, ToolOutput, ToolRunner};
pub use merge::{output_path_for, MergeError, MergeExecutor, MergeOutcome};
pub use reporting::{BatchSummary, FolderOutcome, FolderReport, SkipReason};
