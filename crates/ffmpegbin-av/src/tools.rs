//! Discovery of the ffmpeg executable.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Name of the executable looked up on `PATH`.
pub const FFMPEG: &str = "ffmpeg";

/// Environment variable that overrides the `PATH` lookup.
pub const FFMPEG_PATH_ENV: &str = "FFMPEG_PATH";

/// Information about an external tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Check whether an ffmpeg executable runs and report its version.
///
/// ffmpeg prints its banner for `-version`; the first line is kept.
///
/// # Example
///
/// ```no_run
/// use ffmpegbin_av::check_ffmpeg;
///
/// let info = check_ffmpeg(None);
/// if info.available {
///     println!("ffmpeg version: {:?}", info.version);
/// }
/// ```
pub fn check_ffmpeg(configured: Option<&Path>) -> ToolInfo {
    let Ok(path) = ffmpeg_path(configured) else {
        return ToolInfo {
            name: FFMPEG.to_string(),
            available: false,
            version: None,
            path: None,
        };
    };

    match Command::new(&path).arg("-version").output() {
        Ok(output) if output.status.success() => ToolInfo {
            name: FFMPEG.to_string(),
            available: true,
            version: String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|s| s.to_string()),
            path: Some(path),
        },
        _ => ToolInfo {
            name: FFMPEG.to_string(),
            available: false,
            version: None,
            path: Some(path),
        },
    }
}

/// Resolve the ffmpeg executable.
///
/// A configured path wins if it exists, then the `FFMPEG_PATH` environment
/// variable, then a `PATH` lookup.
///
/// # Errors
///
/// Returns an error if none of these yields an executable.
pub fn ffmpeg_path(configured: Option<&Path>) -> Result<PathBuf> {
    let from_env = std::env::var_os(FFMPEG_PATH_ENV).map(PathBuf::from);
    resolve(FFMPEG, configured, from_env.as_deref())
}

fn resolve(name: &str, configured: Option<&Path>, from_env: Option<&Path>) -> Result<PathBuf> {
    for path in [configured, from_env].into_iter().flatten() {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }

        #[cfg(feature = "tracing")]
        tracing::warn!("Ignoring missing {} executable: {:?}", name, path);
    }

    which::which(name).map_err(|_| Error::tool_not_found(name))
}
