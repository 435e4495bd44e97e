//! Terminal UI components and styling for submux.
//!
//! Output follows a small visual hierarchy (sections, processing steps,
//! status lines, sub-items) with minimal symbols and consistent spacing.
//! Everything is emitted through `log::info!` so the run log records exactly
//! what the user saw.

use console::{Term, style};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::info;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::sync::{LazyLock, Mutex};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

/// Represents the visual hierarchy levels in the CLI output
#[derive(Debug, Clone, Copy)]
pub enum OutputLevel {
    /// Level 1: Main sections (===== SECTION =====)
    Section,
    /// Level 2: Processing steps (» Folder)
    Subsection,
    /// Level 3: Details under a processing step
    Progress,
    /// Level 4: Key-value status information
    Status,
}

impl OutputLevel {
    fn indent(&self) -> &'static str {
        match self {
            OutputLevel::Section => "",
            OutputLevel::Subsection => "  ",
            OutputLevel::Progress => "    ",
            OutputLevel::Status => "      ",
        }
    }
}

/// Width the status labels are padded to
const LABEL_WIDTH: usize = 15;

struct TerminalState {
    current_progress: Option<ProgressBar>,
}

static TERMINAL_STATE: LazyLock<Mutex<TerminalState>> = LazyLock::new(|| {
    Mutex::new(TerminalState {
        current_progress: None,
    })
});

/// Check if color should be used (respects NO_COLOR environment variable)
fn should_use_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Logs a line, suspending the progress bar while it is written.
fn emit(line: &str) {
    let bar = TERMINAL_STATE
        .lock()
        .ok()
        .and_then(|state| state.current_progress.clone());
    match bar {
        Some(pb) => pb.suspend(|| info!("{line}")),
        None => info!("{line}"),
    }
}

/// Print a section header for major workflow phases
pub fn print_section(title: &str) {
    emit("");
    if should_use_color() {
        emit(&format!("===== {} =====", title.to_uppercase().cyan()));
    } else {
        emit(&format!("===== {} =====", title.to_uppercase()));
    }
    emit("");
}

/// Print an item at the specified hierarchy level
pub fn print_item(level: OutputLevel, symbol: Option<&str>, text: &str, bold: bool) {
    let indent = level.indent();
    let prefix = symbol.map(|sym| format!("{sym} ")).unwrap_or_default();

    if should_use_color() && bold {
        emit(&format!("{indent}{prefix}{}", style(text).bold()));
    } else {
        emit(&format!("{indent}{prefix}{text}"));
    }
}

/// Print a processing step
pub fn print_processing(message: &str) {
    emit("");
    print_item(OutputLevel::Subsection, Some("»"), message, true);
}

/// Print a sub-item under a processing step
pub fn print_sub_item(message: &str) {
    print_item(OutputLevel::Progress, None, message, false);
}

/// Formats a status line, padding the label so values line up.
pub fn format_status(label: &str, value: &str) -> String {
    let padding = LABEL_WIDTH.saturating_sub(label.width()).max(1);
    format!(
        "{}{}:{} {}",
        OutputLevel::Status.indent(),
        label,
        " ".repeat(padding),
        value
    )
}

/// Print a status line (key-value pair)
pub fn print_status(label: &str, value: &str, highlight: bool) {
    if should_use_color() {
        let colored_value = match () {
            () if label.contains("Failed") && value != "0" => value.red().bold().to_string(),
            () if label.contains("Succeeded") && value != "0" => value.green().to_string(),
            () if label.contains("Skipped") && value != "0" => value.yellow().to_string(),
            () if highlight => value.bold().to_string(),
            () => value.to_string(),
        };
        emit(&format_status(label, &colored_value));
    } else {
        emit(&format_status(label, value));
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    if should_use_color() {
        emit(&format!("    ✓ {}", message.green()));
    } else {
        emit(&format!("    ✓ {message}"));
    }
}

/// Print a warning message
pub fn print_warning(message: &str) {
    if should_use_color() {
        emit(&format!("    ⚠ {}", message.yellow()));
    } else {
        emit(&format!("    ⚠ {message}"));
    }
}

/// Print a per-folder failure
pub fn print_failure(message: &str) {
    if should_use_color() {
        emit(&format!("    ✗ {}", message.red()));
    } else {
        emit(&format!("    ✗ {message}"));
    }
}

/// Formats elapsed seconds as `HH:MM:SS`, or `N.Ns` below one minute.
pub fn format_elapsed(seconds: f64) -> String {
    if seconds < 60.0 {
        return format!("{seconds:.1}s");
    }
    let total = seconds as u64;
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

// ============================================================================
// FOLDER PROGRESS BAR
// ============================================================================

fn init_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);

    let term_width = Term::stderr().size().1 as usize;
    let template = if term_width >= 80 {
        "  ⧖ Folders: {pos}/{len} [{bar:30}] {msg}"
    } else {
        "  ⧖ {pos}/{len} [{bar:10}]"
    };
    let style = ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##.");
    pb.set_style(style);

    if !std::io::stderr().is_terminal() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }

    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Starts the folder progress bar for a batch of `total` folders.
pub fn start_progress(total: usize) {
    if let Ok(mut state) = TERMINAL_STATE.lock() {
        if let Some(old) = state.current_progress.take() {
            old.finish_and_clear();
        }
        state.current_progress = Some(init_progress_bar(total as u64));
    }
}

/// Shows `folder_name` as the folder in progress; `completed` folders are done.
pub fn update_progress(completed: usize, folder_name: &str) {
    if let Ok(state) = TERMINAL_STATE.lock() {
        if let Some(pb) = state.current_progress.as_ref() {
            pb.set_position(completed as u64);
            pb.set_message(folder_name.to_string());
        }
    }
}

/// Clear the current progress bar
pub fn clear_progress_bar() {
    if let Ok(mut state) = TERMINAL_STATE.lock() {
        if let Some(pb) = state.current_progress.take() {
            pb.finish_and_clear();
        }
    }
}
