//! Git command runner
//!
//! Every git invocation goes through here so that it gets a working
//! directory, captured output, and a hard timeout. A hung git (for example
//! on a network filesystem) is killed instead of blocking the caller forever.

use std::ffi::OsStr;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, trace};
use wait_timeout::ChildExt;

use crate::error::WorktreeError;

/// Default limit for a single git invocation
pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(60);

/// Grace period for draining pipes after the child exits
const OUTPUT_COLLECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Captured result of a finished git process
#[derive(Debug, Clone)]
pub struct GitOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Best human-readable explanation of a failure: stderr, then stdout,
    /// then the exit status.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        format!("git exited with {}", self.status)
    }
}

/// Failure to run git at all, as opposed to git reporting an error
#[derive(Debug, Error)]
pub enum GitRunError {
    #[error("failed to execute git {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for git {command}: {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {command} timed out after {}s", .timeout.as_secs())]
    TimedOut { command: String, timeout: Duration },
}

/// Short label for a git invocation, e.g. `worktree add`
pub fn describe<S: AsRef<OsStr>>(args: &[S]) -> String {
    args.iter()
        .take(2)
        .map(|a| a.as_ref().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run git and return its captured output, whatever the exit code.
///
/// # Arguments
/// * `args` - Git command arguments (e.g., `["worktree", "list", "--porcelain"]`)
/// * `repo_root` - Working directory for the git command
/// * `timeout` - Hard limit after which the child is killed
pub fn run_git<S: AsRef<OsStr>>(
    args: &[S],
    repo_root: &Path,
    timeout: Duration,
) -> Result<GitOutput, GitRunError> {
    let command = describe(args);
    let start = Instant::now();
    debug!(command = %command, cwd = %repo_root.display(), "running git");

    let mut child = Command::new("git")
        .args(args)
        .current_dir(repo_root)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| GitRunError::Spawn {
            command: command.clone(),
            source,
        })?;

    // Drain both pipes while waiting; a full pipe buffer would otherwise
    // block git and turn every large listing into a timeout.
    let stdout_rx = drain(child.stdout.take());
    let stderr_rx = drain(child.stderr.take());

    let wait_result = child
        .wait_timeout(timeout)
        .map_err(|source| GitRunError::Wait {
            command: command.clone(),
            source,
        })?;

    let status = match wait_result {
        Some(status) => status,
        None => {
            kill_child_process(&mut child);
            debug!(command = %command, "git timed out after {}s", timeout.as_secs());
            return Err(GitRunError::TimedOut { command, timeout });
        }
    };

    let stdout = stdout_rx
        .recv_timeout(OUTPUT_COLLECTION_TIMEOUT)
        .unwrap_or_default();
    let stderr = stderr_rx
        .recv_timeout(OUTPUT_COLLECTION_TIMEOUT)
        .unwrap_or_default();

    debug!(
        command = %command,
        status = %status,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "git finished"
    );
    trace!(stdout = %stdout, stderr = %stderr, "git output");

    Ok(GitOutput {
        status,
        stdout,
        stderr,
    })
}

/// Run git and require a zero exit code.
///
/// Spawn failures and non-zero exits are mapped through `on_failure` so each
/// operation reports its own error kind; timeouts always become
/// [`WorktreeError::Timeout`].
pub fn run_git_checked<S, F>(
    args: &[S],
    repo_root: &Path,
    timeout: Duration,
    on_failure: F,
) -> Result<GitOutput, WorktreeError>
where
    S: AsRef<OsStr>,
    F: FnOnce(String) -> WorktreeError,
{
    match run_git(args, repo_root, timeout) {
        Ok(output) if output.success() => Ok(output),
        Ok(output) => Err(on_failure(output.diagnostic())),
        Err(GitRunError::TimedOut { command, timeout }) => Err(WorktreeError::Timeout {
            command,
            seconds: timeout.as_secs(),
        }),
        Err(e) => Err(on_failure(e.to_string())),
    }
}

fn drain<R: Read + Send + 'static>(stream: Option<R>) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    match stream {
        Some(mut stream) => {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = stream.read_to_end(&mut buf);
                let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
            });
        }
        None => {
            let _ = tx.send(String::new());
        }
    }
    rx
}

fn kill_child_process(child: &mut Child) {
    // The child may already have exited; reap it either way.
    let _ = child.kill();
    let _ = child.wait();
}
