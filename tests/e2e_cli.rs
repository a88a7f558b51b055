//! CLI end-to-end tests
//!
//! Tests for the ffmpegbin command-line interface. Jobs are either run as
//! dry runs or against a small shell script standing in for ffmpeg.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Get a command for the ffmpegbin binary
#[allow(deprecated)]
fn ffmpegbin_cmd() -> Command {
    let mut cmd = Command::cargo_bin("ffmpegbin").unwrap();
    cmd.env_remove("FFMPEGBIN_FFMPEG")
        .env_remove("FFMPEG_PATH")
        .env_remove("RUST_LOG");
    cmd
}

/// Write an executable shell script named `ffmpeg` into `dir`.
#[cfg(unix)]
fn fake_ffmpeg(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("ffmpeg");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = ffmpegbin_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = ffmpegbin_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ffmpegbin"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = ffmpegbin_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_check_tools_command() {
    let mut cmd = ffmpegbin_cmd();
    cmd.arg("check-tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("ffmpeg"));
}

#[test]
fn test_cli_encode_help() {
    let mut cmd = ffmpegbin_cmd();
    cmd.args(["encode", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transcode one input"));
}

#[test]
fn test_cli_dry_run_prints_arguments() {
    let mut cmd = ffmpegbin_cmd();
    cmd.args([
        "encode",
        "-i",
        "A.mp4",
        "-o",
        "B.mp4",
        "--seek",
        "3",
        "--duration",
        "5",
        "--audio-bitrate",
        "126000",
        "--video-bitrate",
        "440000",
        "--dry-run",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains(
        "-ss 3 -t 5 -i A.mp4 -y -b:a 126000 -b:v 440000 B.mp4",
    ));
}

#[test]
fn test_cli_dry_run_stream_output() {
    let mut cmd = ffmpegbin_cmd();
    cmd.args([
        "encode",
        "-i",
        "-",
        "-o",
        "-",
        "--format",
        "mp4",
        "--movflags",
        "+faststart",
        "--strip-metadata",
        "--no-video",
        "--dry-run",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains(
        "-i - -y -map_metadata -1 -vn -f mp4 -movflags +faststart+frag_keyframe+empty_moov pipe:",
    ));
}

#[test]
fn test_cli_dry_run_json() {
    let mut cmd = ffmpegbin_cmd();
    let output = cmd
        .args([
            "encode", "-i", "A.gif", "-o", "B.webp", "--loop", "0", "--lossless", "--dry-run",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(plan["program"].as_str().unwrap().ends_with("ffmpeg"));
    assert_eq!(
        plan["args"],
        serde_json::json!(["-i", "A.gif", "-y", "-loop", "0", "-lossless", "1", "B.webp"])
    );
    assert_eq!(plan["options"]["loop_count"], 0);
}

#[test]
fn test_cli_dry_run_reports_ffmpeg_path_env() {
    let temp = tempdir().unwrap();
    let ffmpeg = temp.path().join("ffmpeg-custom");
    fs::write(&ffmpeg, b"").unwrap();

    let mut cmd = ffmpegbin_cmd();
    let output = cmd
        .env("FFMPEG_PATH", &ffmpeg)
        .args(["encode", "-i", "A.mp4", "-o", "B.mp4", "--dry-run", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["program"], ffmpeg.to_str().unwrap());
}

#[test]
fn test_cli_json_requires_dry_run() {
    let mut cmd = ffmpegbin_cmd();
    cmd.args(["encode", "-i", "A.mp4", "-o", "B.mp4", "--json"])
        .assert()
        .failure();
}

#[test]
fn test_cli_missing_input() {
    let mut cmd = ffmpegbin_cmd();
    cmd.args(["encode", "-o", "B.mp4", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("undefined input"));
}

#[test]
fn test_cli_missing_output() {
    let mut cmd = ffmpegbin_cmd();
    cmd.args(["encode", "-i", "A.mp4", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("undefined output"));
}

#[test]
fn test_cli_invalid_seek() {
    let mut cmd = ffmpegbin_cmd();
    cmd.args(["encode", "-i", "A.mp4", "-o", "B.mp4", "--seek", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid time value"));
}

#[test]
fn test_cli_options_file_with_override() {
    let temp = tempdir().unwrap();
    let options_file = temp.path().join("job.toml");

    fs::write(
        &options_file,
        r#"
format = "webp"
compression_level = 6
qscale = 80
"#,
    )
    .unwrap();

    let mut cmd = ffmpegbin_cmd();
    cmd.args([
        "encode",
        "-i",
        "A.gif",
        "-o",
        "B.webp",
        "--options",
        options_file.to_str().unwrap(),
        "--qscale",
        "50",
        "--dry-run",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains(
        "-compression_level 6 -qscale 50 -f webp B.webp",
    ));
}

#[test]
fn test_cli_encode_nonexistent_file() {
    let mut cmd = ffmpegbin_cmd();
    cmd.args(["encode", "-i", "/nonexistent/path/movie.mp4", "-o", "out.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[cfg(unix)]
#[test]
fn test_cli_encode_reports_tool_stderr() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("input.mp4");
    fs::write(&input, b"not really video").unwrap();
    let ffmpeg = fake_ffmpeg(temp.path(), "echo \"Invalid data found: $*\" >&2\nexit 1");

    let mut cmd = ffmpegbin_cmd();
    cmd.args(["--ffmpeg", ffmpeg.to_str().unwrap(), "encode", "-i"])
        .arg(&input)
        .args(["-o", "out.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exit status: 1"))
        .stderr(predicate::str::contains("Invalid data found: -i"));
}

#[cfg(unix)]
#[test]
fn test_cli_encode_passes_protocol_input_to_ffmpeg() {
    let temp = tempdir().unwrap();
    let ffmpeg = fake_ffmpeg(temp.path(), "echo \"$2\" >&2\nexit 1");

    let mut cmd = ffmpegbin_cmd();
    cmd.args(["--ffmpeg", ffmpeg.to_str().unwrap(), "encode"])
        .args(["-i", "http://127.0.0.1:9/clip.mp4", "-o", "out.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist").not())
        .stderr(predicate::str::contains("http://127.0.0.1:9/clip.mp4"));
}

#[cfg(unix)]
#[test]
fn test_cli_encode_pipes_stdin_to_stdout() {
    let temp = tempdir().unwrap();
    let ffmpeg = fake_ffmpeg(temp.path(), "exec cat");

    let mut cmd = ffmpegbin_cmd();
    cmd.args(["--ffmpeg", ffmpeg.to_str().unwrap(), "encode", "-i", "-", "-o", "-"])
        .write_stdin("media bytes")
        .assert()
        .success()
        .stdout("media bytes");
}
