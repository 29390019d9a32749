//! Builder for executing external tool commands under a run deadline.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use subburn_common::{Error, Result};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Output captured from a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit status.
    pub status: ExitStatus,
    /// Captured standard output, raw bytes.
    pub stdout: Vec<u8>,
    /// Captured standard error, raw bytes.
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    /// Standard output followed by standard error, as one byte sequence.
    pub fn combined(&self) -> Vec<u8> {
        let mut all = Vec::with_capacity(self.stdout.len() + self.stderr.len());
        all.extend_from_slice(&self.stdout);
        all.extend_from_slice(&self.stderr);
        all
    }

    /// [`combined`](Self::combined) decoded as lossy UTF-8.
    pub fn combined_lossy(&self) -> String {
        String::from_utf8_lossy(&self.combined()).into_owned()
    }
}

/// A builder for constructing and executing external tool invocations.
///
/// Each call to [`execute`](Self::execute) is exactly one attempt. When a
/// deadline is set and expires, the child is killed and the call fails.
///
/// # Example
///
/// ```no_run
/// use subburn_av::ToolCommand;
/// use std::path::PathBuf;
/// use std::time::Duration;
///
/// # async fn example() -> subburn_common::Result<()> {
/// let output = ToolCommand::new(PathBuf::from("ffmpeg"))
///     .arg("-version")
///     .timeout(Duration::from_secs(10))
///     .execute()
///     .await?;
/// println!("{}", output.combined_lossy());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    deadline: Option<Instant>,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            deadline: None,
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Bound execution by an absolute deadline shared with other commands.
    pub fn deadline(&mut self, deadline: Instant) -> &mut Self {
        self.deadline = Some(deadline);
        self
    }

    /// Bound execution by a duration starting now.
    pub fn timeout(&mut self, d: Duration) -> &mut Self {
        self.deadline = Some(Instant::now() + d);
        self
    }

    /// The arguments joined by single spaces, as logged and reported.
    pub fn joined_args(&self) -> String {
        self.args.join(" ")
    }

    /// Execute the command, capturing stdout and stderr.
    ///
    /// Both pipes are drained while the process runs, so whatever the tool
    /// printed before a failure or a deadline kill is still reported.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExternalTool`] if the process cannot be spawned, exits
    /// with a non-zero status, or is still running when the deadline expires.
    /// The error carries whatever output was captured.
    pub async fn execute(&self) -> Result<ToolOutput> {
        let program_name = self.program.to_string_lossy().to_string();
        let joined = self.joined_args();

        tracing::info!(command = %program_name, args = %joined, "Executing command");
        let started = std::time::Instant::now();

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::error!(
                    command = %program_name,
                    duration = ?started.elapsed(),
                    error = %e,
                    "Command failed to start"
                );
                return Err(self.failure(format!("failed to start: {e}"), String::new()));
            }
        };

        let stdout = Capture::start(child.stdout.take());
        let stderr = Capture::start(child.stderr.take());

        let waited = match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, child.wait()).await.ok(),
            None => Some(child.wait().await),
        };

        let status = match waited {
            Some(Ok(status)) => status,
            Some(Err(e)) => {
                let _ = child.kill().await;
                let captured = collect_after_kill(stdout, stderr).await;
                tracing::error!(
                    command = %program_name,
                    duration = ?started.elapsed(),
                    error = %e,
                    output = %captured,
                    "Command execution failed"
                );
                return Err(self.failure(format!("I/O error waiting for process: {e}"), captured));
            }
            None => {
                let _ = child.kill().await;
                let duration = started.elapsed();
                let captured = collect_after_kill(stdout, stderr).await;
                tracing::error!(
                    command = %program_name,
                    duration = ?duration,
                    output = %captured,
                    "Command killed at run deadline"
                );
                return Err(self.failure(format!("deadline exceeded after {duration:?}"), captured));
            }
        };

        // Pipes close when the process exits, unless a grandchild inherited
        // them; the run deadline still bounds the drain.
        let tool_output = ToolOutput {
            status,
            stdout: stdout.finish(self.deadline).await,
            stderr: stderr.finish(self.deadline).await,
        };
        let duration = started.elapsed();

        if !tool_output.status.success() {
            let captured = tool_output.combined_lossy();
            tracing::error!(
                command = %program_name,
                duration = ?duration,
                error = %tool_output.status,
                output = %captured,
                "Command execution failed"
            );
            return Err(self.failure(tool_output.status.to_string(), captured));
        }

        tracing::info!(command = %program_name, duration = ?duration, "Command executed successfully");
        Ok(tool_output)
    }

    fn failure(&self, reason: String, output: String) -> Error {
        Error::ExternalTool {
            program: self.program.to_string_lossy().to_string(),
            args: self.joined_args(),
            reason,
            output,
        }
    }
}

/// How long readers may keep draining after the process was killed.
const DRAIN_GRACE: Duration = Duration::from_millis(200);

/// Bytes read so far from one child pipe, filled by a background task.
struct Capture {
    buf: Arc<Mutex<Vec<u8>>>,
    task: Option<JoinHandle<()>>,
}

impl Capture {
    fn start<R>(pipe: Option<R>) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let task = pipe.map(|mut pipe| {
            let buf = Arc::clone(&buf);
            tokio::spawn(async move {
                let mut chunk = [0u8; 8192];
                loop {
                    match pipe.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => lock(&buf).extend_from_slice(&chunk[..n]),
                    }
                }
            })
        });
        Self { buf, task }
    }

    /// Wait for the reader to hit EOF (or `until`), then take the bytes.
    async fn finish(mut self, until: Option<Instant>) -> Vec<u8> {
        if let Some(mut task) = self.task.take() {
            let done = match until {
                Some(until) => tokio::time::timeout_at(until, &mut task).await.is_ok(),
                None => {
                    let _ = (&mut task).await;
                    true
                }
            };
            if !done {
                task.abort();
            }
        }
        std::mem::take(&mut *lock(&self.buf))
    }
}

fn lock(buf: &Mutex<Vec<u8>>) -> std::sync::MutexGuard<'_, Vec<u8>> {
    buf.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn collect_after_kill(stdout: Capture, stderr: Capture) -> String {
    let until = Some(Instant::now() + DRAIN_GRACE);
    let mut all = stdout.finish(until).await;
    all.extend(stderr.finish(until).await);
    String::from_utf8_lossy(&all).into_owned()
}
