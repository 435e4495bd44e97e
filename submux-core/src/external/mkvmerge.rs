//! Argument construction for the merge command.
//!
//! The tool is invoked as
//! `<tool> -o <output> <video> [--language 0:<tag> <subtitle>]*`.
//! Arguments are kept as `OsString`s and handed to the process directly,
//! never through a shell, so paths with spaces or quotes need no escaping.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Builds the argument vector for merging `subtitles` into `video`.
///
/// Subtitle order is preserved; it determines track order in the output.
pub fn build_merge_args(
    video: &Path,
    subtitles: &[PathBuf],
    output: &Path,
    language_tag: &str,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(3 + subtitles.len() * 3);
    args.push(OsString::from("-o"));
    args.push(output.as_os_str().to_os_string());
    args.push(video.as_os_str().to_os_string());

    for subtitle in subtitles {
        args.push(OsString::from("--language"));
        args.push(OsString::from(format!("0:{language_tag}")));
        args.push(subtitle.as_os_str().to_os_string());
    }
    args
}

/// Renders a command line for logs. Arguments containing whitespace or
/// quotes are wrapped in double quotes.
pub fn format_command(program: &Path, args: &[OsString]) -> String {
    std::iter::once(program.as_os_str())
        .chain(args.iter().map(OsString::as_os_str))
        .map(quote_for_display)
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_for_display(arg: &OsStr) -> String {
    let arg = arg.to_string_lossy();
    if arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        arg.into_owned()
    }
}
