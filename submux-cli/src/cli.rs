// submux-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Submux: Batch subtitle muxer",
    long_about = "Merges the subtitle files of each folder into its video using mkvmerge via submux-core."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Directory for the run log file (defaults to submux/logs in the system temp directory)
    #[arg(long, global = true, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Do not write a log file
    #[arg(long, global = true, default_value_t = false)]
    pub no_log_file: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merges the subtitles of each folder into its video
    Merge(MergeArgs),
    /// Checks that the merge tool can be started and prints its version
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Folders to process, each holding one video and its subtitle files
    #[arg(value_name = "FOLDER")]
    pub folders: Vec<PathBuf>,

    /// Add every immediate subdirectory of DIR as a folder to process
    #[arg(short, long = "parent", value_name = "DIR")]
    pub parents: Vec<PathBuf>,

    #[command(flatten)]
    pub tool: ToolArgs,

    /// Comma-separated video extensions (e.g. mp4,mkv)
    #[arg(long, value_delimiter = ',', value_name = "EXTS", env = "SUBMUX_VIDEO_EXTENSIONS")]
    pub video_ext: Option<Vec<String>>,

    /// Subtitle file extension
    #[arg(long, value_name = "EXT", env = "SUBMUX_SUBTITLE_EXTENSION")]
    pub subtitle_ext: Option<String>,

    /// Language tag applied to every subtitle track
    #[arg(short, long, value_name = "TAG", env = "SUBMUX_LANGUAGE")]
    pub language: Option<String>,

    /// Suffix appended to the video's stem to name the output
    #[arg(long, value_name = "SUFFIX", env = "SUBMUX_OUTPUT_SUFFIX")]
    pub suffix: Option<String>,

    /// Write outputs here instead of next to each video
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Leave existing outputs untouched and skip their folders
    #[arg(long, default_value_t = false)]
    pub skip_existing: bool,

    /// Show the planned merge command for each folder without running it
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Print events as JSON lines on stdout instead of styled output
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub tool: ToolArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ToolArgs {
    /// Path to the mkvmerge executable
    #[arg(long = "tool", value_name = "PATH", env = "SUBMUX_TOOL_PATH")]
    pub tool_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_merge_basic_args() {
        let cli = Cli::parse_from(["submux", "merge", "ep1", "ep2"]);

        match cli.command {
            Commands::Merge(args) => {
                assert_eq!(args.folders, vec![PathBuf::from("ep1"), PathBuf::from("ep2")]);
                assert!(args.parents.is_empty());
                assert!(!args.dry_run);
                assert!(!args.skip_existing);
                assert!(!args.json);
            }
            other => panic!("Expected Merge command, got {:?}", other),
        }
        assert!(!cli.verbose);
        assert!(!cli.no_log_file);
    }

    #[test]
    fn test_parse_merge_options() {
        let cli = Cli::parse_from([
            "submux",
            "merge",
            "--parent",
            "/shows",
            "--tool",
            "/opt/mkvmerge",
            "--video-ext",
            "mp4,avi",
            "--subtitle-ext",
            "ass",
            "--language",
            "jpn",
            "--suffix",
            ".muxed",
            "--output-dir",
            "out",
            "--skip-existing",
            "--dry-run",
            "--verbose",
            "--no-log-file",
        ]);

        assert!(cli.verbose);
        assert!(cli.no_log_file);
        match cli.command {
            Commands::Merge(args) => {
                assert_eq!(args.parents, vec![PathBuf::from("/shows")]);
                assert_eq!(args.tool.tool_path, Some(PathBuf::from("/opt/mkvmerge")));
                assert_eq!(
                    args.video_ext,
                    Some(vec!["mp4".to_string(), "avi".to_string()])
                );
                assert_eq!(args.subtitle_ext.as_deref(), Some("ass"));
                assert_eq!(args.language.as_deref(), Some("jpn"));
                assert_eq!(args.suffix.as_deref(), Some(".muxed"));
                assert_eq!(args.output_dir, Some(PathBuf::from("out")));
                assert!(args.skip_existing);
                assert!(args.dry_run);
            }
            other => panic!("Expected Merge command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::parse_from(["submux", "check", "--tool", "mkvmerge-9"]);
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.tool.tool_path, Some(PathBuf::from("mkvmerge-9")));
            }
            other => panic!("Expected Check command, got {:?}", other),
        }
    }

    #[test]
    fn test_log_dir_help_names_default_location() {
        use clap::CommandFactory;

        let command = Cli::command();
        let log_dir = command
            .get_arguments()
            .find(|arg| arg.get_id() == "log_dir")
            .expect("log_dir argument");
        let help = log_dir.get_help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("submux/logs"), "help was: {help}");
    }
}
