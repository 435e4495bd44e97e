// ============================================================================
// submux-core/src/batch.rs
// ============================================================================
//
// BATCH ORCHESTRATION: Sequential Processing of a Folder List
//
// The orchestrator drives every folder of a batch through analysis and merge,
// one after another, reporting progress and per-folder outcomes as events.
// Per-folder problems never stop the batch: they become skip or failure
// events and the run moves on to the next folder.
//
// KEY COMPONENTS:
// - JobList: de-duplicated, insertion-ordered list of folders to process
// - BatchOrchestrator: the Idle -> Running -> Complete state machine
// - plan_folder / plan_batch: analysis + output naming without side effects
// - OutputClaims: outputs already targeted by earlier folders of a run
// - spawn_batch / BatchHandle: runs a batch on a worker thread
//
// EVENT ORDER:
// BatchStarted, then per folder FolderStarted followed by exactly one of
// FolderSkipped / FolderSucceeded / FolderFailed, then BatchComplete.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use log::{debug, info, warn};

use crate::analysis::{display_name, folder_name, AmbiguityNote, FolderAnalyzer};
use crate::config::{CoreConfig, ExistingOutput};
use crate::error::{CoreError, CoreResult};
use crate::events::{ChannelEventHandler, Event, EventHandler};
use crate::external::{ProcessToolRunner, ToolRunner};
use crate::merge::{output_path_for, MergeExecutor};
use crate::reporting::{BatchSummary, FolderOutcome, FolderReport, SkipReason};

// ============================================================================
// JOB LIST
// ============================================================================

/// Ordered folder list with exact-path de-duplication.
///
/// Two different spellings of the same directory (`a` and `./a`) are kept
/// as separate jobs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobList {
    folders: Vec<PathBuf>,
}

impl JobList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `folder` unless it is already listed. Returns true if added.
    pub fn add(&mut self, folder: impl Into<PathBuf>) -> bool {
        let folder = folder.into();
        if self.folders.contains(&folder) {
            debug!("Ignoring duplicate folder {}", folder.display());
            return false;
        }
        self.folders.push(folder);
        true
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.folders.iter()
    }

    /// Owned copy of the list, handed to a run.
    pub fn snapshot(&self) -> Vec<PathBuf> {
        self.folders.clone()
    }

    pub fn into_snapshot(self) -> Vec<PathBuf> {
        self.folders
    }
}

// ============================================================================
// PLANNING
// ============================================================================

/// A folder that is ready to be merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeJob {
    pub video: PathBuf,
    pub subtitles: Vec<PathBuf>,
    pub output_path: PathBuf,
}

/// What a run would do with one folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderPlan {
    pub folder: PathBuf,
    pub ambiguity: Option<AmbiguityNote>,
    /// The merge to run, or why the folder is skipped
    pub job: Result<MergeJob, SkipReason>,
}

/// Output paths targeted so far in a run, each with the folder that
/// claimed it first.
///
/// Several folders map to one output when an output directory is configured
/// and their videos share a file name.
#[derive(Debug, Default)]
struct OutputClaims {
    owners: HashMap<PathBuf, PathBuf>,
}

impl OutputClaims {
    fn owner(&self, output_path: &Path) -> Option<&Path> {
        self.owners.get(output_path).map(PathBuf::as_path)
    }

    /// Records the output of a folder that is going to be merged.
    fn claim(&mut self, plan: &FolderPlan) {
        if let Ok(job) = &plan.job {
            self.owners
                .entry(job.output_path.clone())
                .or_insert_with(|| plan.folder.clone());
        }
    }
}

/// Lifecycle of an orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Running,
    Complete,
}

// ============================================================================
// ORCHESTRATOR
// ============================================================================

/// Processes folders strictly one at a time.
pub struct BatchOrchestrator<R: ToolRunner = ProcessToolRunner> {
    config: CoreConfig,
    analyzer: FolderAnalyzer,
    executor: MergeExecutor<R>,
    state: BatchState,
}

impl BatchOrchestrator<ProcessToolRunner> {
    /// Creates an orchestrator that runs the real merge tool.
    pub fn with_process_runner(config: CoreConfig) -> Self {
        Self::new(config, ProcessToolRunner)
    }
}

impl<R: ToolRunner> BatchOrchestrator<R> {
    pub fn new(config: CoreConfig, runner: R) -> Self {
        Self {
            analyzer: FolderAnalyzer::new(&config),
            executor: MergeExecutor::new(&config, runner),
            config,
            state: BatchState::Idle,
        }
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn executor(&self) -> &MergeExecutor<R> {
        &self.executor
    }

    /// Analyzes `folder` and decides what a run would do with it.
    ///
    /// Reads the filesystem only; the merge tool is never invoked.
    pub fn plan_folder(&self, folder: &Path) -> FolderPlan {
        self.plan_with_claims(folder, &OutputClaims::default())
    }

    /// Plans every folder in order, as [`run`](Self::run) would see them.
    ///
    /// A folder whose output an earlier folder already targets is planned as
    /// a [`SkipReason::OutputCollision`] skip.
    pub fn plan_batch(&self, folders: &[PathBuf]) -> Vec<FolderPlan> {
        let mut claims = OutputClaims::default();
        folders
            .iter()
            .map(|folder| {
                let plan = self.plan_with_claims(folder, &claims);
                claims.claim(&plan);
                plan
            })
            .collect()
    }

    fn plan_with_claims(&self, folder: &Path, claims: &OutputClaims) -> FolderPlan {
        let analysis = self.analyzer.analyze(folder);
        let ambiguity = analysis.ambiguity.clone();

        let job = if let Some(detail) = analysis.inaccessible {
            Err(SkipReason::FolderInaccessible { detail })
        } else {
            match analysis.video {
                None => Err(SkipReason::NoVideoFound),
                Some(_) if analysis.subtitles.is_empty() => Err(SkipReason::NoSubtitlesFound),
                Some(video) => {
                    let output_path = output_path_for(&video, &self.config);
                    if let Some(first_folder) = claims.owner(&output_path) {
                        Err(SkipReason::OutputCollision {
                            first_folder: first_folder.to_path_buf(),
                            output_path,
                        })
                    } else if self.config.existing_output == ExistingOutput::Skip
                        && output_path.exists()
                    {
                        Err(SkipReason::OutputExists { output_path })
                    } else {
                        Ok(MergeJob {
                            video,
                            subtitles: analysis.subtitles,
                            output_path,
                        })
                    }
                }
            }
        };

        FolderPlan {
            folder: folder.to_path_buf(),
            ambiguity,
            job,
        }
    }

    /// Runs every folder in order and returns the summary.
    ///
    /// Never fails: per-folder problems are reported through `handler` and
    /// recorded in the summary.
    pub fn run(&mut self, folders: Vec<PathBuf>, handler: &dyn EventHandler) -> BatchSummary {
        let started = Instant::now();
        let total = folders.len();
        self.state = BatchState::Running;

        info!("Starting batch of {} folder(s)", total);
        handler.handle(&Event::BatchStarted { total });

        let mut claims = OutputClaims::default();
        let mut reports = Vec::with_capacity(total);
        for (i, folder) in folders.into_iter().enumerate() {
            let report = self.process_folder(i + 1, total, folder, &mut claims, handler);
            reports.push(report);
        }

        let summary = BatchSummary::from_reports(reports, started.elapsed());
        self.state = BatchState::Complete;
        info!("{}", summary);
        handler.handle(&Event::BatchComplete {
            summary: summary.clone(),
        });
        summary
    }

    fn process_folder(
        &self,
        index: usize,
        total: usize,
        folder: PathBuf,
        claims: &mut OutputClaims,
        handler: &dyn EventHandler,
    ) -> FolderReport {
        let name = folder_name(&folder);
        info!("Processing folder {}/{}: {}", index, total, name);
        handler.handle(&Event::FolderStarted {
            index,
            total,
            folder: folder.clone(),
            folder_name: name.clone(),
        });

        let plan = self.plan_with_claims(&folder, claims);
        claims.claim(&plan);
        let ambiguity = plan.ambiguity;

        let outcome = match plan.job {
            Err(reason) => {
                warn!("Skipping {}: {}", name, reason);
                handler.handle(&Event::FolderSkipped {
                    index,
                    folder: folder.clone(),
                    folder_name: name,
                    reason: reason.clone(),
                    ambiguity: ambiguity.clone(),
                });
                FolderOutcome::Skipped { reason }
            }
            Ok(job) => {
                let merged = self.executor.merge(&job.video, &job.subtitles, &job.output_path);
                match merged.error {
                    None => {
                        handler.handle(&Event::FolderSucceeded {
                            index,
                            folder: folder.clone(),
                            folder_name: name,
                            video: job.video,
                            subtitle_count: job.subtitles.len(),
                            output_file: display_name(&merged.output_path),
                            output_path: merged.output_path.clone(),
                            ambiguity: ambiguity.clone(),
                        });
                        FolderOutcome::Succeeded {
                            output_path: merged.output_path,
                        }
                    }
                    Some(error) => {
                        handler.handle(&Event::FolderFailed {
                            index,
                            folder: folder.clone(),
                            folder_name: name,
                            error: error.clone(),
                            ambiguity: ambiguity.clone(),
                        });
                        FolderOutcome::Failed { error }
                    }
                }
            }
        };

        FolderReport {
            folder,
            outcome,
            ambiguity,
        }
    }
}

// ============================================================================
// WORKER THREAD
// ============================================================================

/// A batch running on its worker thread.
pub struct BatchHandle {
    /// Events in processing order; closes when the run is over
    pub events: Receiver<Event>,
    join: JoinHandle<BatchSummary>,
}

impl BatchHandle {
    /// Blocks until the worker finishes and returns its summary.
    pub fn wait(self) -> CoreResult<BatchSummary> {
        self.join
            .join()
            .map_err(|_| CoreError::Worker("batch worker thread panicked".to_string()))
    }
}

/// Runs `folders` on a dedicated worker thread.
///
/// The caller drains [`BatchHandle::events`] on its own schedule; the worker
/// never waits for it.
pub fn spawn_batch<R>(mut orchestrator: BatchOrchestrator<R>, folders: Vec<PathBuf>) -> CoreResult<BatchHandle>
where
    R: ToolRunner + Send + 'static,
{
    let (sender, events) = mpsc::channel();
    let join = thread::Builder::new()
        .name("submux-batch".to_string())
        .spawn(move || {
            let handler = ChannelEventHandler::new(sender);
            orchestrator.run(folders, &handler)
        })
        .map_err(|e| CoreError::Worker(format!("failed to spawn batch worker: {e}")))?;

    Ok(BatchHandle { events, join })
}
