//! Events emitted by a batch run and the observer interface receiving them.
//!
//! A run emits `BatchStarted`, then for every folder a `FolderStarted`
//! followed by exactly one terminal event (`FolderSkipped`,
//! `FolderSucceeded` or `FolderFailed`), and finally one `BatchComplete`.
//! Events are delivered in processing order and never batched.

use std::path::PathBuf;
use std::sync::mpsc::Sender;

use serde::Serialize;

use crate::analysis::AmbiguityNote;
use crate::merge::MergeError;
use crate::reporting::{BatchSummary, SkipReason};

pub mod json_handler;

pub use json_handler::JsonEventHandler;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    BatchStarted {
        total: usize,
    },

    /// Progress: folder `index` (1-based) of `total` is about to be analyzed.
    FolderStarted {
        index: usize,
        total: usize,
        folder: PathBuf,
        folder_name: String,
    },

    FolderSkipped {
        index: usize,
        folder: PathBuf,
        folder_name: String,
        reason: SkipReason,
        #[serde(skip_serializing_if = "Option::is_none")]
        ambiguity: Option<AmbiguityNote>,
    },

    FolderSucceeded {
        index: usize,
        folder: PathBuf,
        folder_name: String,
        video: PathBuf,
        subtitle_count: usize,
        output_path: PathBuf,
        output_file: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        ambiguity: Option<AmbiguityNote>,
    },

    FolderFailed {
        index: usize,
        folder: PathBuf,
        folder_name: String,
        error: MergeError,
        #[serde(skip_serializing_if = "Option::is_none")]
        ambiguity: Option<AmbiguityNote>,
    },

    BatchComplete {
        summary: BatchSummary,
    },
}

impl Event {
    /// True for the per-folder events that end a folder's processing.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Event::FolderSkipped { .. } | Event::FolderSucceeded { .. } | Event::FolderFailed { .. }
        )
    }
}

/// Observer of batch events.
pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &Event);
}

/// Forwards events onto an mpsc channel.
///
/// The worker never waits on the consumer: sends are unbounded, and a
/// dropped receiver is ignored so the run still completes.
pub struct ChannelEventHandler {
    sender: Sender<Event>,
}

impl ChannelEventHandler {
    pub fn new(sender: Sender<Event>) -> Self {
        Self { sender }
    }
}

impl EventHandler for ChannelEventHandler {
    fn handle(&self, event: &Event) {
        if self.sender.send(event.clone()).is_err() {
            log::debug!("Event receiver dropped; discarding {:?}", event);
        }
    }
}
