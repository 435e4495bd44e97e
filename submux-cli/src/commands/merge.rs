//! Implementation of the 'merge' subcommand.
//!
//! Collects the folders to process, builds the core configuration from
//! arguments and environment, runs the batch on a worker thread and renders
//! the events it streams back.

use crate::cli::MergeArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::terminal;

use submux_core::analysis::{display_name, folder_name};
use submux_core::{
    probe_tool_version, spawn_batch, BatchOrchestrator, BatchSummary, CoreConfig,
    CoreConfigBuilder, CoreError, Event, EventHandler, ExistingOutput, FolderOutcome,
    JobList, JsonEventHandler, ProcessToolRunner,
};

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

/// Builds the job list from positional folders and `--parent` directories.
///
/// Positional paths that exist but are not directories are reported and
/// skipped; paths that do not exist are kept so the run reports them as
/// inaccessible. Every immediate subdirectory of a parent is added, sorted by
/// name. Duplicates are removed by exact path.
pub fn collect_folders(folders: &[PathBuf], parents: &[PathBuf]) -> CliResult<JobList> {
    let mut jobs = JobList::new();

    for folder in folders {
        if folder.exists() && !folder.is_dir() {
            warn!("Skipping '{}': not a directory", folder.display());
            continue;
        }
        jobs.add(folder.clone());
    }

    for parent in parents {
        for child in subdirectories(parent)? {
            jobs.add(child);
        }
    }

    Ok(jobs)
}

/// Immediate subdirectories of `parent`, sorted by file name.
fn subdirectories(parent: &Path) -> CliResult<Vec<PathBuf>> {
    if !parent.is_dir() {
        return Err(CoreError::NotADirectory(parent.to_path_buf()));
    }

    let mut children: Vec<PathBuf> = fs::read_dir(parent)
        .cli_with_context(|| format!("Failed to read directory '{}'", parent.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            let is_dir = path.is_dir();
            if !is_dir {
                debug!("Ignoring non-directory entry {}", path.display());
            }
            is_dir
        })
        .collect();
    children.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(children)
}

/// Creates the core configuration: environment first, then explicit flags.
pub fn create_core_config(args: &MergeArgs) -> CliResult<CoreConfig> {
    let mut builder = CoreConfigBuilder::from_config(CoreConfig::from_env());

    if let Some(tool) = &args.tool.tool_path {
        builder = builder.tool_path(tool);
    }
    if let Some(exts) = &args.video_ext {
        builder = builder.video_extensions(exts);
    }
    if let Some(ext) = &args.subtitle_ext {
        builder = builder.subtitle_extension(ext);
    }
    if let Some(tag) = &args.language {
        builder = builder.language_tag(tag.clone());
    }
    if let Some(suffix) = &args.suffix {
        builder = builder.output_suffix(suffix.clone());
    }
    if let Some(dir) = &args.output_dir {
        builder = builder.output_dir(dir);
    }
    if args.skip_existing {
        builder = builder.existing_output(ExistingOutput::Skip);
    }

    let config = builder.build();
    config.validate()?;
    Ok(config)
}

/// Runs the merge command.
///
/// Returns the batch summary, or `None` for a dry run.
pub fn run_merge(args: MergeArgs) -> CliResult<Option<BatchSummary>> {
    let jobs = collect_folders(&args.folders, &args.parents)?;
    if jobs.is_empty() {
        return Err(CoreError::NoFolders);
    }

    let config = create_core_config(&args)?;
    if let Some(dir) = &config.output_dir {
        fs::create_dir_all(dir)
            .cli_with_context(|| format!("Failed to create output directory '{}'", dir.display()))?;
    }

    let orchestrator = BatchOrchestrator::with_process_runner(config);

    if args.dry_run {
        print_plan(&orchestrator, &jobs);
        return Ok(None);
    }

    if !args.json {
        display_initialization_info(orchestrator.config(), jobs.len());
    }

    let handle = spawn_batch(orchestrator, jobs.into_snapshot())?;
    let json_handler = args.json.then(JsonEventHandler::new);

    for event in handle.events.iter() {
        match &json_handler {
            Some(handler) => handler.handle(&event),
            None => render_event(&event),
        }
    }

    let summary = handle.wait()?;
    Ok(Some(summary))
}

/// Prints the run parameters and checks the merge tool.
///
/// A tool that cannot be started is only a warning here: every folder will
/// report the missing tool on its own.
fn display_initialization_info(config: &CoreConfig, folder_count: usize) {
    terminal::print_section("Initialization");
    terminal::print_status("Folders", &folder_count.to_string(), true);
    terminal::print_status("Merge tool", &config.tool_path.display().to_string(), false);

    match probe_tool_version(&ProcessToolRunner, &config.tool_path) {
        Ok(version) => terminal::print_status("Version", &version, false),
        Err(e) => terminal::print_warning(&format!("{e}")),
    }

    terminal::print_status("Videos", &config.video_extensions.join(", "), false);
    terminal::print_status("Subtitles", &config.subtitle_extension, false);
    terminal::print_status("Language", &config.language_tag, false);
    let output = match &config.output_dir {
        Some(dir) => dir.display().to_string(),
        None => "next to each video".to_string(),
    };
    terminal::print_status("Output", &output, false);
}

/// Dry run: analysis and command construction only.
fn print_plan(orchestrator: &BatchOrchestrator, jobs: &JobList) {
    terminal::print_section("Dry run");
    let total = jobs.len();

    for (i, plan) in orchestrator.plan_batch(&jobs.snapshot()).into_iter().enumerate() {
        terminal::print_processing(&format!("[{}/{}] {}", i + 1, total, folder_name(&plan.folder)));

        if let Some(note) = &plan.ambiguity {
            terminal::print_warning(&note.to_string());
        }
        match plan.job {
            Ok(job) => {
                terminal::print_sub_item(&format!("Video: {}", display_name(&job.video)));
                terminal::print_sub_item(&format!("Subtitles: {} file(s)", job.subtitles.len()));
                let command = orchestrator
                    .executor()
                    .command_line(&job.video, &job.subtitles, &job.output_path);
                terminal::print_sub_item(&format!("Command: {command}"));
            }
            Err(reason) => terminal::print_warning(&format!("Would skip: {reason}")),
        }
    }
}

/// Renders one batch event in the terminal.
pub fn render_event(event: &Event) {
    match event {
        Event::BatchStarted { total } => {
            terminal::print_section("Merging");
            terminal::start_progress(*total);
        }
        Event::FolderStarted {
            index,
            total,
            folder_name,
            ..
        } => {
            terminal::update_progress(index - 1, folder_name);
            terminal::print_processing(&format!("[{index}/{total}] {folder_name}"));
        }
        Event::FolderSkipped {
            reason, ambiguity, ..
        } => {
            if let Some(note) = ambiguity {
                terminal::print_warning(&note.to_string());
            }
            terminal::print_warning(&format!("Skipped: {reason}"));
        }
        Event::FolderSucceeded {
            video,
            subtitle_count,
            output_file,
            ambiguity,
            ..
        } => {
            if let Some(note) = ambiguity {
                terminal::print_warning(&note.to_string());
            }
            terminal::print_sub_item(&format!("Video: {}", display_name(video)));
            terminal::print_sub_item(&format!("Subtitles: {subtitle_count} file(s)"));
            terminal::print_success(&format!("Created '{output_file}'"));
        }
        Event::FolderFailed {
            error, ambiguity, ..
        } => {
            if let Some(note) = ambiguity {
                terminal::print_warning(&note.to_string());
            }
            terminal::print_failure(&format!("Failed to merge: {error}"));
        }
        Event::BatchComplete { summary } => {
            terminal::clear_progress_bar();
            print_summary(summary);
        }
    }
}

fn print_summary(summary: &BatchSummary) {
    terminal::print_section("Summary");
    terminal::print_status("Total", &summary.total.to_string(), true);
    terminal::print_status("Succeeded", &summary.succeeded.to_string(), false);
    terminal::print_status("Skipped", &summary.skipped.to_string(), false);
    terminal::print_status("Failed", &summary.failed.to_string(), false);
    terminal::print_status("Elapsed", &terminal::format_elapsed(summary.elapsed_secs), false);

    for report in &summary.folders {
        if let FolderOutcome::Failed { error } = &report.outcome {
            terminal::print_failure(&format!("{}: {}", folder_name(&report.folder), error.kind()));
        }
    }

    if summary.all_succeeded() {
        terminal::print_success(&summary.to_string());
    } else {
        info!("");
        info!("{summary}");
    }
}
