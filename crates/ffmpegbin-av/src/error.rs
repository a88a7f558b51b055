//! Error types for ffmpegbin-av.

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while assembling or running an ffmpeg job.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Neither an input file nor an input stream was set.
    #[error("undefined input")]
    UndefinedInput,

    /// Neither an output file nor an output stream was set.
    #[error("undefined output")]
    UndefinedOutput,

    /// A required external tool is not available.
    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// An external tool failed to launch or exited unsuccessfully.
    ///
    /// The message carries the failure summary followed by whatever the
    /// tool wrote to stderr.
    #[error("tool execution failed: {tool}: {message}")]
    ToolFailed { tool: String, message: String },

    /// Invalid input provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a tool not found error.
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Create a tool execution failed error.
    pub fn tool_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Build the composite failure from a summary and the tool's captured stderr.
    pub fn tool_failed_with_stderr(
        tool: impl Into<String>,
        summary: impl std::fmt::Display,
        stderr: &[u8],
    ) -> Self {
        let stderr = String::from_utf8_lossy(stderr);
        let stderr = stderr.trim();
        let message = if stderr.is_empty() {
            summary.to_string()
        } else {
            format!("{}. {}", summary, stderr)
        };
        Self::tool_failed(tool, message)
    }
}
