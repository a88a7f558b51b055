use clap::{Args, Parser, Subcommand};
use ffmpegbin_av::parse_seconds;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "ffmpegbin")]
#[command(author, version, about = "Build and run ffmpeg transcode jobs")]
pub struct Cli {
    /// Path to the ffmpeg executable (defaults to FFMPEG_PATH, then PATH)
    #[arg(long, global = true, env = "FFMPEGBIN_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transcode one input into one output
    Encode(EncodeArgs),

    /// Check that the ffmpeg executable is available
    CheckTools,

    /// Display version information
    Version,
}

#[derive(Args)]
pub struct EncodeArgs {
    /// Input file, or "-" to read from stdin
    #[arg(short, long)]
    pub input: Option<String>,

    /// Output file, or "-" to write fragmented output to stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// TOML file with encoding options; flags override its values
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Print the ffmpeg arguments instead of running ffmpeg
    #[arg(long)]
    pub dry_run: bool,

    /// With --dry-run, print the job as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    #[command(flatten)]
    pub encoding: EncodingFlags,
}

/// Encoding options settable from the command line.
#[derive(Args, Default)]
pub struct EncodingFlags {
    /// Output container format
    #[arg(short, long)]
    pub format: Option<String>,

    /// Audio bitrate in bits per second
    #[arg(long)]
    pub audio_bitrate: Option<u32>,

    /// Video bitrate in bits per second
    #[arg(long)]
    pub video_bitrate: Option<u32>,

    /// Video encoder
    #[arg(long)]
    pub video_codec: Option<String>,

    /// Audio encoder
    #[arg(long)]
    pub audio_codec: Option<String>,

    /// Start offset, in seconds or as HH:MM:SS[.ms]
    #[arg(long, value_parser = seconds)]
    pub seek: Option<Duration>,

    /// Amount of input to process, in seconds or as HH:MM:SS[.ms]
    #[arg(long, value_parser = seconds)]
    pub duration: Option<Duration>,

    /// Maximum number of video frames to write
    #[arg(long)]
    pub frames: Option<u32>,

    /// Output frame rate
    #[arg(long)]
    pub frame_rate: Option<f64>,

    /// Loop count for animated output (0 loops forever)
    #[arg(long = "loop", allow_negative_numbers = true)]
    pub loop_count: Option<i32>,

    /// Encode losslessly where the codec supports it
    #[arg(long)]
    pub lossless: bool,

    /// Encoder compression level
    #[arg(long, allow_negative_numbers = true)]
    pub compression_level: Option<i32>,

    /// Quantizer scale
    #[arg(long)]
    pub qscale: Option<u32>,

    /// Filter graph expression
    #[arg(long)]
    pub filter_complex: Option<String>,

    /// Stream mapping expression
    #[arg(long)]
    pub map: Option<String>,

    /// Extra mp4 muxer flags for stdout output, e.g. +faststart
    #[arg(long, allow_hyphen_values = true)]
    pub movflags: Option<String>,

    /// Encoder preset
    #[arg(long)]
    pub preset: Option<String>,

    /// Drop global metadata
    #[arg(long)]
    pub strip_metadata: bool,

    /// Drop all video streams
    #[arg(long)]
    pub no_video: bool,
}

fn seconds(value: &str) -> Result<Duration, String> {
    parse_seconds(value).map_err(|e| e.to_string())
}
