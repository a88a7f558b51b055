//! Process execution for the ffmpeg executable.
//!
//! [`ToolProcess`] is the seam between argument assembly and the operating
//! system. [`Process`] is the real implementation; tests substitute their
//! own to observe invocations without spawning anything.

use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

/// One call into the external tool.
///
/// `stdin` is fed to the child and `stdout` receives the child's output.
/// When either is `None` the corresponding channel is not connected.
pub struct Invocation<'a, 'io> {
    /// Arguments passed to the executable.
    pub args: &'a [OsString],
    /// Data to pipe into the process's stdin.
    pub stdin: Option<&'a mut (dyn Read + Send + 'io)>,
    /// Destination for the process's stdout.
    pub stdout: Option<&'a mut (dyn Write + Send + 'io)>,
}

/// Result of a process that was launched and ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Exit code, `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    /// Everything the process wrote to stderr.
    pub stderr: Vec<u8>,
}

impl ExecOutcome {
    /// Whether the process exited with status 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Short human readable description of how the process ended.
    pub fn summary(&self) -> String {
        match self.code {
            Some(code) => format!("exit status: {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Executes the external tool on behalf of [`FFmpeg`](crate::FFmpeg).
pub trait ToolProcess {
    /// Path of the executable, used in error messages.
    fn program(&self) -> &Path;

    /// Run the executable with the given arguments and streams, blocking
    /// until it exits.
    ///
    /// An `Err` means the process could not be launched or its pipes broke;
    /// a process that ran but failed is reported through
    /// [`ExecOutcome::code`].
    fn execute(&mut self, invocation: Invocation<'_, '_>) -> io::Result<ExecOutcome>;
}

/// [`ToolProcess`] backed by [`std::process::Command`].
#[derive(Debug, Clone)]
pub struct Process {
    program: PathBuf,
}

impl Process {
    /// Create a process runner for the given executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ToolProcess for Process {
    fn program(&self) -> &Path {
        &self.program
    }

    fn execute(&mut self, invocation: Invocation<'_, '_>) -> io::Result<ExecOutcome> {
        let Invocation {
            args,
            stdin,
            stdout,
        } = invocation;

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(if stdout.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stderr(Stdio::piped());

        let mut child = cmd.spawn()?;

        let child_stdin = child.stdin.take();
        let child_stdout = child.stdout.take();
        let child_stderr = child.stderr.take();

        // Feed stdin and drain stderr on helper threads while this thread
        // drains stdout, otherwise any full pipe would deadlock the child.
        let pumped = thread::scope(|s| -> io::Result<Vec<u8>> {
            let feeder = match (stdin, child_stdin) {
                (Some(reader), Some(mut pipe)) => Some(s.spawn(move || {
                    match io::copy(reader, &mut pipe) {
                        // ffmpeg may stop reading early, e.g. after `-t`
                        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                        other => other.map(|_| ()),
                    }
                })),
                _ => None,
            };

            let collector = s.spawn(move || -> io::Result<Vec<u8>> {
                let mut buf = Vec::new();
                if let Some(mut pipe) = child_stderr {
                    pipe.read_to_end(&mut buf)?;
                }
                Ok(buf)
            });

            let copied = match (stdout, child_stdout) {
                (Some(writer), Some(mut pipe)) => {
                    io::copy(&mut pipe, &mut *writer).and_then(|_| writer.flush())
                }
                _ => Ok(()),
            };

            let fed = match feeder {
                Some(handle) => join(handle),
                None => Ok(()),
            };
            let stderr = join(collector);

            copied?;
            fed?;
            stderr
        });

        if pumped.is_err() {
            let _ = child.kill();
        }
        let status = child.wait()?;
        let stderr = pumped?;

        Ok(ExecOutcome {
            code: status.code(),
            stderr,
        })
    }
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, io::Result<T>>) -> io::Result<T> {
    handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::other("pipe thread panicked")))
}
