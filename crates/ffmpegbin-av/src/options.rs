//! Encoding options for a single ffmpeg job.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Scalar options that shape one transcode job.
///
/// Every field is optional. `None` means the caller never touched the
/// option and no flag is emitted for it. Fields where zero is a real value
/// for ffmpeg (`seek`, `loop_count`, `compression_level`, `qscale`) are
/// emitted whenever they are `Some`, including `Some(0)`.
///
/// Time values are (de)serialized as fractional seconds, so a TOML job file
/// can say `seek = 2.5`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    /// Output container format (`-f`).
    pub format: Option<String>,
    /// Audio bitrate in bits per second (`-b:a`).
    pub audio_bitrate: Option<u32>,
    /// Video bitrate in bits per second (`-b:v`).
    pub video_bitrate: Option<u32>,
    /// Video encoder name (`-vcodec`).
    pub video_codec: Option<String>,
    /// Audio encoder name (`-acodec`).
    pub audio_codec: Option<String>,
    /// Start offset into the input (`-ss`).
    #[serde(with = "seconds")]
    pub seek: Option<Duration>,
    /// Length of media to process (`-t`).
    #[serde(with = "seconds")]
    pub duration: Option<Duration>,
    /// Maximum number of video frames to write (`-vframes`).
    pub frames: Option<u32>,
    /// Output frame rate (`-r`).
    pub frame_rate: Option<f64>,
    /// Loop count for animated outputs (`-loop`), 0 loops forever.
    pub loop_count: Option<i32>,
    /// Lossless encoding for formats that support it (`-lossless 1`).
    pub lossless: bool,
    /// Encoder compression level (`-compression_level`).
    pub compression_level: Option<i32>,
    /// Quantizer scale (`-qscale`).
    pub qscale: Option<u32>,
    /// Filter graph expression (`-filter_complex`).
    pub filter_complex: Option<String>,
    /// Stream mapping expression (`-map`).
    pub map: Option<String>,
    /// Extra mov/mp4 muxer flags, only used for stream output (`-movflags`).
    pub movflags: Option<String>,
    /// Encoder preset (`-preset`).
    pub preset: Option<String>,
    /// Drop global metadata from the output (`-map_metadata -1`).
    pub remove_metadata: bool,
    /// Drop all video streams (`-vn`).
    pub no_video: bool,
}

/// Parse a time value given as seconds (`3`, `2.5`) or as a clock
/// position (`01:02:03.5`, `02:03`).
pub fn parse_seconds(value: &str) -> Result<Duration> {
    let value = value.trim();
    let invalid = || Error::InvalidInput(format!("invalid time value: {:?}", value));

    if value.is_empty() || value.split(':').count() > 3 {
        return Err(invalid());
    }

    let mut total = 0f64;
    for part in value.split(':') {
        let part: f64 = part.parse().map_err(|_| invalid())?;
        if !part.is_finite() || part < 0.0 {
            return Err(invalid());
        }
        total = total * 60.0 + part;
    }

    Duration::try_from_secs_f64(total).map_err(|_| invalid())
}

/// Serde adapter storing `Option<Duration>` as fractional seconds.
mod seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs_f64()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let secs = Option::<f64>::deserialize(d)?;
        secs.map(|s| {
            Duration::try_from_secs_f64(s)
                .map_err(|_| serde::de::Error::custom(format!("invalid duration: {}", s)))
        })
        .transpose()
    }
}
