// submux-cli/tests/cli_integration.rs
//
// Runs the submux binary end to end. Merges use a shell script standing in
// for mkvmerge, so those tests are unix-only.

use assert_cmd::Command;
use predicates::str::contains;
use std::error::Error;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

// Helper function to get the path to the compiled binary
fn submux_cmd() -> Command {
    let mut cmd = Command::cargo_bin("submux").expect("Failed to find submux binary");
    cmd.env("NO_COLOR", "1")
        .env_remove("SUBMUX_TOOL_PATH")
        .env_remove("SUBMUX_VIDEO_EXTENSIONS")
        .env_remove("SUBMUX_SUBTITLE_EXTENSION")
        .env_remove("SUBMUX_LANGUAGE")
        .env_remove("SUBMUX_OUTPUT_SUFFIX");
    cmd
}

fn create_folder(root: &TempDir, name: &str, files: &[&str]) -> PathBuf {
    let folder = root.path().join(name);
    fs::create_dir_all(&folder).expect("Failed to create folder");
    for file in files {
        File::create(folder.join(file)).expect("Failed to create dummy file");
    }
    folder
}

#[test]
fn test_merge_without_folders_fails() {
    submux_cmd()
        .args(["merge", "--no-log-file"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("No folders to process"));
}

#[test]
fn test_parent_that_is_not_a_directory_fails() {
    submux_cmd()
        .args(["merge", "--no-log-file", "--parent", "surely/this/does/not/exist"])
        .assert()
        .failure()
        .stderr(contains("Not a directory"));
}

#[test]
fn test_invalid_configuration_fails() -> Result<(), Box<dyn Error>> {
    let media = tempdir()?;
    let folder = create_folder(&media, "ep", &["a.mp4", "a.srt"]);

    submux_cmd()
        .arg("merge")
        .arg("--no-log-file")
        .arg(&folder)
        .args(["--video-ext", "srt"])
        .assert()
        .failure()
        .stderr(contains("Invalid configuration"));
    Ok(())
}

#[test]
fn test_dry_run_prints_command_without_merging() -> Result<(), Box<dyn Error>> {
    let media = tempdir()?;
    let folder = create_folder(&media, "ep1", &["show.mp4", "show.srt"]);
    let empty = create_folder(&media, "ep2", &["notes.txt"]);

    submux_cmd()
        .arg("merge")
        .arg("--no-log-file")
        .arg("--dry-run")
        .args(["--tool", "/surely/missing/mkvmerge"])
        .arg(&folder)
        .arg(&empty)
        .assert()
        .success()
        .stdout(contains("DRY RUN"))
        .stdout(contains("[1/2] ep1"))
        .stdout(contains("Command: /surely/missing/mkvmerge -o"))
        .stdout(contains("--language 0:eng"))
        .stdout(contains("Would skip: no video file found"));

    assert!(!folder.join("show_subbed.mkv").exists());
    Ok(())
}

#[test]
fn test_dry_run_reports_shared_output_names() -> Result<(), Box<dyn Error>> {
    let media = tempdir()?;
    let out = tempdir()?;
    let s1 = create_folder(&media, "s1", &["episode.mp4", "episode.srt"]);
    let s2 = create_folder(&media, "s2", &["episode.mp4", "episode.srt"]);

    submux_cmd()
        .arg("merge")
        .arg("--no-log-file")
        .arg("--dry-run")
        .arg("--output-dir")
        .arg(out.path())
        .arg(&s1)
        .arg(&s2)
        .assert()
        .success()
        .stdout(contains("Would skip: output"))
        .stdout(contains("is already produced by folder"));
    Ok(())
}

#[test]
fn test_missing_tool_reports_failures() -> Result<(), Box<dyn Error>> {
    let media = tempdir()?;
    let folder = create_folder(&media, "ep1", &["show.mp4", "show.srt"]);

    submux_cmd()
        .arg("merge")
        .arg("--no-log-file")
        .args(["--tool", "/surely/missing/mkvmerge"])
        .arg(&folder)
        .assert()
        .code(2)
        .stdout(contains("MKVToolNix"))
        .stdout(contains("0 skipped, 1 failed"));
    Ok(())
}

#[test]
fn test_log_file_is_written() -> Result<(), Box<dyn Error>> {
    let media = tempdir()?;
    let logs = tempdir()?;
    let folder = create_folder(&media, "ep1", &["show.srt"]);

    submux_cmd()
        .arg("merge")
        .arg("--log-dir")
        .arg(logs.path())
        .arg(&folder)
        .assert()
        .success();

    let entries: Vec<PathBuf> = fs::read_dir(logs.path())?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    assert_eq!(entries.len(), 1);
    let name = entries[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("submux_") && name.ends_with(".log"));

    let content = fs::read_to_string(&entries[0])?;
    assert!(content.contains("no video file found"));
    assert!(!content.contains('\u{1b}'));
    Ok(())
}

#[test]
fn test_check_with_missing_tool_fails() {
    submux_cmd()
        .args(["check", "--no-log-file", "--tool", "/surely/missing/mkvmerge"])
        .assert()
        .failure()
        .stderr(contains("not found"));
}

#[cfg(unix)]
mod fake_tool {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::sync::Mutex;

    // Scripts are written and then executed; running these tests one at a
    // time keeps a concurrently forked child from holding a script open.
    static SERIAL: Mutex<()> = Mutex::new(());

    const SUCCEEDING_TOOL: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "mkvmerge v99.0.0 ('Fake') 64-bit"
  exit 0
fi
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then out="$2"; shift; fi
  shift
done
: > "$out"
"#;

    const FAILING_TOOL: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "mkvmerge v99.0.0 ('Fake') 64-bit"
  exit 0
fi
echo "bad track" >&2
exit 1
"#;

    fn write_tool(dir: &Path, script: &str) -> PathBuf {
        let tool = dir.join("fake-mkvmerge");
        fs::write(&tool, script).expect("Failed to write fake tool");
        let mut perms = fs::metadata(&tool).expect("metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&tool, perms).expect("Failed to chmod fake tool");
        tool
    }

    #[test]
    fn test_merge_creates_outputs() -> Result<(), Box<dyn Error>> {
        let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        let tools = tempdir()?;
        let media = tempdir()?;
        let tool = write_tool(tools.path(), SUCCEEDING_TOOL);
        let ep1 = create_folder(&media, "show/ep1", &["e1.mp4", "e1.srt"]);
        let ep2 = create_folder(&media, "show/ep2", &["e2.mkv", "e2.en.srt", "e2.de.srt"]);

        submux_cmd()
            .arg("merge")
            .arg("--no-log-file")
            .arg("--tool")
            .arg(&tool)
            .arg("--parent")
            .arg(media.path().join("show"))
            .arg(&ep1)
            .assert()
            .success()
            .stdout(contains("v99.0.0"))
            .stdout(contains("[2/2] ep2"))
            .stdout(contains("Created 'e1_subbed.mkv'"))
            .stdout(contains("Subtitles: 2 file(s)"))
            .stdout(contains("Processed 2/2 folders successfully"));

        assert!(ep1.join("e1_subbed.mkv").exists());
        assert!(ep2.join("e2_subbed.mkv").exists());
        Ok(())
    }

    #[test]
    fn test_failed_merge_exits_with_two() -> Result<(), Box<dyn Error>> {
        let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        let tools = tempdir()?;
        let media = tempdir()?;
        let tool = write_tool(tools.path(), FAILING_TOOL);
        let folder = create_folder(&media, "ep1", &["e1.mp4", "e1.srt"]);

        submux_cmd()
            .arg("merge")
            .arg("--no-log-file")
            .arg("--tool")
            .arg(&tool)
            .arg(&folder)
            .assert()
            .code(2)
            .stdout(contains("merge tool error (code 1): bad track"));
        Ok(())
    }

    #[test]
    fn test_skip_existing_leaves_output_alone() -> Result<(), Box<dyn Error>> {
        let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        let tools = tempdir()?;
        let media = tempdir()?;
        let tool = write_tool(tools.path(), FAILING_TOOL);
        let folder = create_folder(&media, "ep1", &["e1.mp4", "e1.srt", "e1_subbed.mkv"]);

        submux_cmd()
            .arg("merge")
            .arg("--no-log-file")
            .arg("--skip-existing")
            .arg("--tool")
            .arg(&tool)
            .arg(&folder)
            .assert()
            .success()
            .stdout(contains("output already exists"));
        Ok(())
    }

    #[test]
    fn test_json_mode_prints_event_lines() -> Result<(), Box<dyn Error>> {
        let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        let tools = tempdir()?;
        let media = tempdir()?;
        let tool = write_tool(tools.path(), SUCCEEDING_TOOL);
        let ep1 = create_folder(&media, "ep1", &["e1.mp4", "e1.srt"]);
        let ep2 = create_folder(&media, "ep2", &["e2.srt"]);

        let output = submux_cmd()
            .arg("merge")
            .arg("--no-log-file")
            .arg("--json")
            .arg("--tool")
            .arg(&tool)
            .arg(&ep1)
            .arg(&ep2)
            .output()?;
        assert!(output.status.success());

        let events: Vec<serde_json::Value> = String::from_utf8(output.stdout)?
            .lines()
            .map(|line| serde_json::from_str::<serde_json::Value>(line))
            .collect::<Result<_, _>>()?;
        let types: Vec<&str> = events
            .iter()
            .map(|e| e["type"].as_str().unwrap_or_default())
            .collect();
        assert_eq!(
            types,
            vec![
                "batch_started",
                "folder_started",
                "folder_succeeded",
                "folder_started",
                "folder_skipped",
                "batch_complete"
            ]
        );
        assert_eq!(events[2]["output_file"], "e1_subbed.mkv");
        assert_eq!(events[4]["reason"]["kind"], "no_video_found");
        assert_eq!(events[5]["summary"]["succeeded"], 1);
        Ok(())
    }

    #[test]
    fn test_check_prints_version() -> Result<(), Box<dyn Error>> {
        let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        let tools = tempdir()?;
        let tool = write_tool(tools.path(), SUCCEEDING_TOOL);

        submux_cmd()
            .args(["check", "--no-log-file", "--tool"])
            .arg(&tool)
            .assert()
            .success()
            .stdout(contains("mkvmerge v99.0.0 ('Fake') 64-bit"))
            .stdout(contains("Merge tool is available"));
        Ok(())
    }
}
