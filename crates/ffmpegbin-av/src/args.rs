//! Translation of a job description into ffmpeg's argument order.
//!
//! ffmpeg is position sensitive: options placed before `-i` apply to the
//! input, options after it apply to the output. Seeking and trimming are
//! therefore emitted first, codec and filter options after the input, and
//! the output target last.

use crate::options::EncodeOptions;
use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::time::Duration;

/// Input marker telling ffmpeg to read from stdin.
pub const STDIN_MARKER: &str = "-";

/// Output marker telling ffmpeg to write to stdout.
pub const STDOUT_MARKER: &str = "pipe:";

/// Muxer flags appended to stream output so mp4 can be written to a
/// non-seekable pipe.
pub const FRAGMENTED_MOVFLAGS: &str = "+frag_keyframe+empty_moov";

/// Where ffmpeg reads from or writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// A file on disk.
    File(&'a Path),
    /// The process's stdin (for input) or stdout (for output).
    Pipe,
}

/// Build the full ffmpeg argument list for one job.
///
/// Paths are passed through as-is, so non UTF-8 file names reach ffmpeg
/// unchanged.
///
/// # Example
///
/// ```
/// use ffmpegbin_av::{build_args, EncodeOptions, Endpoint};
/// use std::path::Path;
/// use std::time::Duration;
///
/// let options = EncodeOptions {
///     seek: Some(Duration::from_secs(3)),
///     audio_bitrate: Some(126_000),
///     ..Default::default()
/// };
/// let args = build_args(
///     Endpoint::File(Path::new("in.mp4")),
///     &options,
///     Endpoint::File(Path::new("out.mp4")),
/// );
/// assert_eq!(
///     args,
///     ["-ss", "3", "-i", "in.mp4", "-y", "-b:a", "126000", "out.mp4"]
/// );
/// ```
pub fn build_args(
    input: Endpoint<'_>,
    options: &EncodeOptions,
    output: Endpoint<'_>,
) -> Vec<OsString> {
    let mut args = Vec::new();

    // Input-side options
    if let Some(seek) = options.seek {
        push(&mut args, "-ss", format_seconds(seek));
    }
    if let Some(duration) = options.duration.filter(|d| !d.is_zero()) {
        push(&mut args, "-t", format_seconds(duration));
    }

    match input {
        Endpoint::Pipe => push(&mut args, "-i", STDIN_MARKER),
        Endpoint::File(path) => push(&mut args, "-i", path),
    }

    // Never block on an overwrite prompt
    args.push("-y".into());

    if let Some(bitrate) = options.audio_bitrate.filter(|&b| b > 0) {
        push(&mut args, "-b:a", bitrate.to_string());
    }
    if let Some(bitrate) = options.video_bitrate.filter(|&b| b > 0) {
        push(&mut args, "-b:v", bitrate.to_string());
    }
    if let Some(codec) = non_empty(&options.video_codec) {
        push(&mut args, "-vcodec", codec);
    }
    if let Some(codec) = non_empty(&options.audio_codec) {
        push(&mut args, "-acodec", codec);
    }
    if let Some(preset) = non_empty(&options.preset) {
        push(&mut args, "-preset", preset);
    }
    if let Some(frames) = options.frames.filter(|&f| f > 0) {
        push(&mut args, "-vframes", frames.to_string());
    }
    if let Some(rate) = options.frame_rate.filter(|&r| r > 0.0) {
        push(&mut args, "-r", rate.to_string());
    }
    if let Some(count) = options.loop_count {
        push(&mut args, "-loop", count.to_string());
    }
    if options.lossless {
        push(&mut args, "-lossless", "1");
    }
    if let Some(level) = options.compression_level {
        push(&mut args, "-compression_level", level.to_string());
    }
    if let Some(scale) = options.qscale {
        push(&mut args, "-qscale", scale.to_string());
    }
    if let Some(graph) = non_empty(&options.filter_complex) {
        push(&mut args, "-filter_complex", graph);
    }
    if let Some(map) = non_empty(&options.map) {
        push(&mut args, "-map", map);
    }
    if options.remove_metadata {
        push(&mut args, "-map_metadata", "-1");
    }
    if options.no_video {
        args.push("-vn".into());
    }
    if let Some(format) = non_empty(&options.format) {
        push(&mut args, "-f", format);
    }

    match output {
        Endpoint::File(path) => args.push(path.as_os_str().to_owned()),
        Endpoint::Pipe => {
            let flags = options.movflags.as_deref().unwrap_or_default();
            push(&mut args, "-movflags", format!("{}{}", flags, FRAGMENTED_MOVFLAGS));
            args.push(STDOUT_MARKER.into());
        }
    }

    args
}

/// Render a time value the way ffmpeg accepts it on the command line.
///
/// Whole seconds are written as integers (`3`); anything else as decimal
/// seconds with trailing zeros removed (`2.5`).
pub fn format_seconds(value: Duration) -> String {
    if value.subsec_nanos() == 0 {
        return value.as_secs().to_string();
    }

    let text = format!("{}.{:09}", value.as_secs(), value.subsec_nanos());
    text.trim_end_matches('0').to_string()
}

/// Render arguments for display, replacing invalid UTF-8.
pub fn display_args(args: &[OsString]) -> String {
    args.iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

fn push(args: &mut Vec<OsString>, flag: &str, value: impl AsRef<OsStr>) {
    args.push(flag.into());
    args.push(value.as_ref().to_owned());
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
