//! Assembly of encoding options from a job file and command-line flags.

use crate::cli::EncodingFlags;
use anyhow::{Context, Result};
use ffmpegbin_av::EncodeOptions;
use std::path::Path;

/// Load encoding options from a TOML job file.
pub fn load_options(path: &Path) -> Result<EncodeOptions> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read options file: {:?}", path))?;

    let options: EncodeOptions = toml::from_str(&content)
        .with_context(|| format!("Failed to parse options file: {:?}", path))?;

    Ok(options)
}

/// Load the job file if given, then apply flags on top of it.
pub fn resolve_options(path: Option<&Path>, flags: EncodingFlags) -> Result<EncodeOptions> {
    let mut options = match path {
        Some(path) => load_options(path)?,
        None => EncodeOptions::default(),
    };

    apply_flags(&mut options, flags);
    Ok(options)
}

fn apply_flags(options: &mut EncodeOptions, flags: EncodingFlags) {
    fn set<T>(slot: &mut Option<T>, value: Option<T>) {
        if value.is_some() {
            *slot = value;
        }
    }

    set(&mut options.format, flags.format);
    set(&mut options.audio_bitrate, flags.audio_bitrate);
    set(&mut options.video_bitrate, flags.video_bitrate);
    set(&mut options.video_codec, flags.video_codec);
    set(&mut options.audio_codec, flags.audio_codec);
    set(&mut options.seek, flags.seek);
    set(&mut options.duration, flags.duration);
    set(&mut options.frames, flags.frames);
    set(&mut options.frame_rate, flags.frame_rate);
    set(&mut options.loop_count, flags.loop_count);
    set(&mut options.compression_level, flags.compression_level);
    set(&mut options.qscale, flags.qscale);
    set(&mut options.filter_complex, flags.filter_complex);
    set(&mut options.map, flags.map);
    set(&mut options.movflags, flags.movflags);
    set(&mut options.preset, flags.preset);

    // Switches can only be turned on from the command line
    options.lossless |= flags.lossless;
    options.remove_metadata |= flags.strip_metadata;
    options.no_video |= flags.no_video;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.toml");
        std::fs::write(
            &path,
            r#"
format = "mp4"
audio_bitrate = 96000
seek = 1.5
remove_metadata = true
"#,
        )
        .unwrap();

        let flags = EncodingFlags {
            audio_bitrate: Some(128_000),
            no_video: true,
            ..Default::default()
        };
        let options = resolve_options(Some(&path), flags).unwrap();

        assert_eq!(options.format.as_deref(), Some("mp4"));
        assert_eq!(options.audio_bitrate, Some(128_000));
        assert_eq!(options.seek, Some(Duration::from_millis(1500)));
        assert!(options.remove_metadata);
        assert!(options.no_video);
    }

    #[test]
    fn test_flags_without_file() {
        let flags = EncodingFlags {
            compression_level: Some(0),
            lossless: true,
            ..Default::default()
        };
        let options = resolve_options(None, flags).unwrap();
        assert_eq!(options.compression_level, Some(0));
        assert!(options.lossless);
        assert!(options.format.is_none());
    }

    #[test]
    fn test_unknown_file_is_an_error() {
        let err = load_options(Path::new("/nonexistent/job.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read options file"));
    }
}
