//! # ffmpegbin-av
//!
//! Fluent builder around the `ffmpeg` command-line tool.
//!
//! This crate provides functionality for:
//! - Collecting encoding options (bitrates, codecs, trimming, filters, format)
//! - Translating them into ffmpeg's position-sensitive argument order
//! - Binding input and output to files or to in-memory streams
//! - Running ffmpeg and reporting failures together with its stderr
//!
//! ## Features
//!
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```no_run
//! use ffmpegbin_av::FFmpeg;
//! use std::fs::File;
//! use std::time::Duration;
//!
//! let mut input = File::open("input.mp4")?;
//! let mut output = File::create("output.mp4")?;
//!
//! FFmpeg::new()
//!     .input(&mut input)
//!     .output(&mut output)
//!     .format("mp4")
//!     .movflags("+faststart")
//!     .seek(Duration::from_secs(3))
//!     .duration(Duration::from_secs(5))
//!     .remove_metadata(true)
//!     .run()?;
//! # Ok::<(), ffmpegbin_av::Error>(())
//! ```

pub mod args;
mod error;
mod ffmpeg;
pub mod options;
pub mod process;
pub mod tools;

// Re-exports
pub use args::{build_args, display_args, Endpoint};
pub use error::{Error, Result};
pub use ffmpeg::FFmpeg;
pub use options::{parse_seconds, EncodeOptions};
pub use process::{ExecOutcome, Invocation, Process, ToolProcess};
pub use tools::{check_ffmpeg, ffmpeg_path, ToolInfo};
