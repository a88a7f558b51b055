//! Fluent builder for ffmpeg jobs.

use crate::args::{build_args, Endpoint};
use crate::options::EncodeOptions;
use crate::process::{Invocation, Process, ToolProcess};
use crate::{tools, Error, Result};
use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::Duration;

enum Source<'io> {
    File(PathBuf),
    Stream(Box<dyn Read + Send + 'io>),
}

enum Sink<'io> {
    File(PathBuf),
    Stream(Box<dyn Write + Send + 'io>),
}

impl Source<'_> {
    fn endpoint(&self) -> Endpoint<'_> {
        match self {
            Source::File(path) => Endpoint::File(path),
            Source::Stream(_) => Endpoint::Pipe,
        }
    }
}

impl Sink<'_> {
    fn endpoint(&self) -> Endpoint<'_> {
        match self {
            Sink::File(path) => Endpoint::File(path),
            Sink::Stream(_) => Endpoint::Pipe,
        }
    }
}

/// Everything configured for the next run.
#[derive(Default)]
struct Job<'io> {
    input: Option<Source<'io>>,
    output: Option<Sink<'io>>,
    options: EncodeOptions,
}

impl Job<'_> {
    fn args(&self) -> Result<Vec<OsString>> {
        let input = self.input.as_ref().ok_or(Error::UndefinedInput)?;
        let output = self.output.as_ref().ok_or(Error::UndefinedOutput)?;
        Ok(build_args(input.endpoint(), &self.options, output.endpoint()))
    }
}

/// Builder that configures and runs one ffmpeg job at a time.
///
/// Setters overwrite the previous value and never validate; problems are
/// reported by [`run`](Self::run). Each run consumes the configured job, so
/// the builder is empty again afterwards whether the run succeeded or not.
///
/// Streams passed to [`input`](Self::input) and [`output`](Self::output)
/// are only read or written during the run. Pass `&mut reader` to keep
/// ownership on the caller's side.
///
/// # Example
///
/// ```no_run
/// use ffmpegbin_av::FFmpeg;
/// use std::time::Duration;
///
/// FFmpeg::new()
///     .input_file("input.mp4")
///     .output_file("output.mp4")
///     .audio_bitrate(126_000)
///     .video_bitrate(440_000)
///     .seek(Duration::from_secs(3))
///     .duration(Duration::from_secs(5))
///     .run()?;
/// # Ok::<(), ffmpegbin_av::Error>(())
/// ```
pub struct FFmpeg<'io, P = Process> {
    process: P,
    job: Job<'io>,
}

impl FFmpeg<'_> {
    /// Create a builder that runs `ffmpeg` from `PATH`.
    pub fn new() -> Self {
        Self::with_process(Process::new(tools::FFMPEG))
    }

    /// Create a builder for an explicitly resolved executable.
    ///
    /// See [`tools::ffmpeg_path`] for the lookup order.
    pub fn locate(configured: Option<&std::path::Path>) -> Result<Self> {
        tools::ffmpeg_path(configured).map(|path| Self::with_process(Process::new(path)))
    }
}

impl Default for FFmpeg<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'io, P: ToolProcess> FFmpeg<'io, P> {
    /// Create a builder that executes through the given process runner.
    pub fn with_process(process: P) -> Self {
        Self {
            process,
            job: Job::default(),
        }
    }

    /// The process runner used for execution.
    pub fn process(&self) -> &P {
        &self.process
    }

    /// Read input from a file. Replaces any input stream.
    pub fn input_file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.job.input = Some(Source::File(path.into()));
        self
    }

    /// Read input from a stream piped to ffmpeg's stdin. Replaces any input file.
    pub fn input(&mut self, reader: impl Read + Send + 'io) -> &mut Self {
        self.job.input = Some(Source::Stream(Box::new(reader)));
        self
    }

    /// Write output to a file. Replaces any output stream.
    pub fn output_file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.job.output = Some(Sink::File(path.into()));
        self
    }

    /// Write output to a stream fed from ffmpeg's stdout. Replaces any output file.
    ///
    /// Stream output is written as fragmented mp4 (see [`movflags`](Self::movflags)).
    pub fn output(&mut self, writer: impl Write + Send + 'io) -> &mut Self {
        self.job.output = Some(Sink::Stream(Box::new(writer)));
        self
    }

    /// Replace all encoding options at once.
    pub fn options(&mut self, options: EncodeOptions) -> &mut Self {
        self.job.options = options;
        self
    }

    /// Set the output container format.
    pub fn format(&mut self, format: impl Into<String>) -> &mut Self {
        self.job.options.format = Some(format.into());
        self
    }

    /// Set the audio bitrate in bits per second.
    pub fn audio_bitrate(&mut self, bitrate: u32) -> &mut Self {
        self.job.options.audio_bitrate = Some(bitrate);
        self
    }

    /// Set the video bitrate in bits per second.
    pub fn video_bitrate(&mut self, bitrate: u32) -> &mut Self {
        self.job.options.video_bitrate = Some(bitrate);
        self
    }

    /// Set the video encoder (`-vcodec`).
    pub fn video_codec(&mut self, codec: impl Into<String>) -> &mut Self {
        self.job.options.video_codec = Some(codec.into());
        self
    }

    /// Set the audio encoder (`-acodec`).
    pub fn audio_codec(&mut self, codec: impl Into<String>) -> &mut Self {
        self.job.options.audio_codec = Some(codec.into());
        self
    }

    /// Start reading the input at this offset. Zero is emitted too.
    pub fn seek(&mut self, offset: Duration) -> &mut Self {
        self.job.options.seek = Some(offset);
        self
    }

    /// Limit how much of the input is processed.
    pub fn duration(&mut self, duration: Duration) -> &mut Self {
        self.job.options.duration = Some(duration);
        self
    }

    /// Stop after writing this many video frames.
    pub fn frames(&mut self, frames: u32) -> &mut Self {
        self.job.options.frames = Some(frames);
        self
    }

    /// Set the output frame rate (`-r`).
    pub fn frame_rate(&mut self, fps: f64) -> &mut Self {
        self.job.options.frame_rate = Some(fps);
        self
    }

    /// Loop count for animated image output, 0 loops forever.
    pub fn loop_count(&mut self, count: i32) -> &mut Self {
        self.job.options.loop_count = Some(count);
        self
    }

    /// Encode losslessly where the codec supports it (`-lossless 1`).
    pub fn lossless(&mut self, lossless: bool) -> &mut Self {
        self.job.options.lossless = lossless;
        self
    }

    /// Set the encoder compression level (`-compression_level`). Zero is emitted.
    pub fn compression_level(&mut self, level: i32) -> &mut Self {
        self.job.options.compression_level = Some(level);
        self
    }

    /// Set the quantizer scale (`-qscale`). Zero is emitted.
    pub fn qscale(&mut self, scale: u32) -> &mut Self {
        self.job.options.qscale = Some(scale);
        self
    }

    /// Set a filter graph, e.g. `[0:v]scale=320:-1[v]`.
    pub fn filter_complex(&mut self, graph: impl Into<String>) -> &mut Self {
        self.job.options.filter_complex = Some(graph.into());
        self
    }

    /// Select which streams go into the output, e.g. `0:a` or a filter label.
    pub fn map(&mut self, map: impl Into<String>) -> &mut Self {
        self.job.options.map = Some(map.into());
        self
    }

    /// Extra mp4 muxer flags for stream output, e.g. `+faststart`.
    ///
    /// `+frag_keyframe+empty_moov` is always appended since a pipe cannot
    /// be seeked back to write the index.
    pub fn movflags(&mut self, flags: impl Into<String>) -> &mut Self {
        self.job.options.movflags = Some(flags.into());
        self
    }

    /// Set the encoder preset (`-preset`).
    pub fn preset(&mut self, preset: impl Into<String>) -> &mut Self {
        self.job.options.preset = Some(preset.into());
        self
    }

    /// Drop global metadata from the output.
    pub fn remove_metadata(&mut self, remove: bool) -> &mut Self {
        self.job.options.remove_metadata = remove;
        self
    }

    /// Drop all video streams from the output.
    pub fn no_video(&mut self, no_video: bool) -> &mut Self {
        self.job.options.no_video = no_video;
        self
    }

    /// The arguments the next [`run`](Self::run) would pass to ffmpeg.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndefinedInput`] or [`Error::UndefinedOutput`] if
    /// either end of the job is missing.
    pub fn args(&self) -> Result<Vec<OsString>> {
        self.job.args()
    }

    /// Run the configured job and block until ffmpeg exits.
    ///
    /// The builder is reset before this returns, whatever the outcome.
    ///
    /// # Errors
    ///
    /// - [`Error::UndefinedInput`] / [`Error::UndefinedOutput`] if the job is
    ///   incomplete; ffmpeg is not started.
    /// - [`Error::ToolFailed`] if ffmpeg could not be launched or exited
    ///   unsuccessfully. The message ends with ffmpeg's stderr.
    pub fn run(&mut self) -> Result<()> {
        let job = std::mem::take(&mut self.job);
        let args = job.args()?;

        let program = self.process.program();
        let tool = program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| program.to_string_lossy().to_string());

        #[cfg(feature = "tracing")]
        tracing::debug!("Running {} {}", tool, crate::args::display_args(&args));

        let mut stdin = match job.input {
            Some(Source::Stream(reader)) => Some(reader),
            _ => None,
        };
        let mut stdout = match job.output {
            Some(Sink::Stream(writer)) => Some(writer),
            _ => None,
        };

        let outcome = self
            .process
            .execute(Invocation {
                args: &args,
                stdin: stdin.as_deref_mut(),
                stdout: stdout.as_deref_mut(),
            })
            .map_err(|e| Error::tool_failed(&tool, format!("failed to execute: {}", e)))?;

        if !outcome.success() {
            #[cfg(feature = "tracing")]
            tracing::debug!("{} failed with {}", tool, outcome.summary());

            return Err(Error::tool_failed_with_stderr(
                tool,
                outcome.summary(),
                &outcome.stderr,
            ));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("{} completed", tool);

        Ok(())
    }
}
