//! External command execution.
//!
//! Commands are described with the [`Cmd`] builder and executed through a
//! [`ToolRunner`], so the pipeline can be driven by a fake runner in tests.
//!
//! # Examples
//!
//! ```ignore
//! use crate::tools::{Cmd, ProcessRunner, ToolRunner};
//!
//! let cmd = Cmd::from_slice(&["npx", "svgo"])
//!     .args(["icon.svg", "--multipass"])
//!     .timeout(Some(Duration::from_secs(300)));
//! ProcessRunner.run(&cmd)?;
//! ```

use regex::Regex;
use std::{
    ffi::{OsStr, OsString},
    io::{self, Read},
    path::Path,
    process::{Child, Command, ExitStatus, Stdio},
    sync::OnceLock,
    thread,
    time::{Duration, Instant},
};
use thiserror::Error;

use crate::debug;

/// Interval between exit checks while a timed command runs.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

// ============================================================================
// Builder API
// ============================================================================

/// Command builder for external process execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    timeout: Option<Duration>,
}

impl Cmd {
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Create from a command array (e.g., `["svgo"]` or `["npx", "svgo"]`).
    pub fn from_slice<S: AsRef<OsStr>>(cmd: &[S]) -> Self {
        let mut iter = cmd.iter();
        let program = iter
            .next()
            .map(|s| s.as_ref().to_owned())
            .unwrap_or_default();
        let args: Vec<_> = iter.map(|s| s.as_ref().to_owned()).collect();
        Self {
            program,
            args,
            ..Default::default()
        }
    }

    /// Add a single argument. Empty arguments are dropped.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    /// Kill the process if it runs longer than this.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Program name for messages.
    pub fn name(&self) -> String {
        Path::new(&self.program)
            .file_name()
            .unwrap_or(&self.program)
            .to_string_lossy()
            .into_owned()
    }
}

// ============================================================================
// Runner
// ============================================================================

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to start `{name}`")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("`{name}` did not finish within {}s and was killed", .timeout.as_secs())]
    Timeout { name: String, timeout: Duration },

    #[error("{0}")]
    Failed(String),

    #[error("lost track of `{name}`")]
    Wait {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Captured result of a successful command.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Executes external commands.
pub trait ToolRunner: Send + Sync {
    /// Run to completion. Non-zero exit is an error.
    fn run(&self, cmd: &Cmd) -> Result<ToolOutput, ToolError>;

    /// Whether `program` can be found on `PATH`.
    fn is_available(&self, program: &OsStr) -> bool;
}

/// Runs real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn run(&self, cmd: &Cmd) -> Result<ToolOutput, ToolError> {
        let name = cmd.name();
        let mut command = Command::new(&cmd.program);
        command
            .args(&cmd.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // Own group, so a timeout also reaches tools behind a wrapper (`uvx vpype`)
            command.process_group(0);
        }

        debug!("exec"; "running {} ({} args)", name, cmd.args.len());
        let mut child = command.spawn().map_err(|source| ToolError::Spawn {
            name: name.clone(),
            source,
        })?;

        // Drain pipes on their own threads so a chatty tool cannot block on a
        // full pipe while we wait for it
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = wait(&mut child, cmd.timeout).map_err(|source| ToolError::Wait {
            name: name.clone(),
            source,
        })?;

        // Timed out: a survivor may still hold the pipes, so the drain threads are left behind
        let Some(status) = status else {
            return Err(ToolError::Timeout {
                name,
                timeout: cmd.timeout.unwrap_or_default(),
            });
        };

        let output = ToolOutput {
            stdout: stdout.join().unwrap_or_default(),
            stderr: stderr.join().unwrap_or_default(),
        };

        if status.success() {
            log_output(&name, &output);
            Ok(output)
        } else {
            Err(ToolError::Failed(format_error(&name, status, &output)))
        }
    }

    fn is_available(&self, program: &OsStr) -> bool {
        which::which(program).is_ok()
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

/// Wait for exit. `None` means the deadline passed and the child was killed.
fn wait(child: &mut Child, timeout: Option<Duration>) -> io::Result<Option<ExitStatus>> {
    let Some(timeout) = timeout else {
        return child.wait().map(Some);
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            kill(child);
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Kill the child and, on unix, every process in its group.
fn kill(child: &mut Child) {
    #[cfg(unix)]
    {
        let group = format!("-{}", child.id());
        let status = Command::new("kill")
            .args(["-KILL", "--", group.as_str()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        if let Err(e) = status {
            debug!("exec"; "failed to kill process group {}: {}", group, e);
        }
    }
    child.kill().ok();
}

// ============================================================================
// Helpers
// ============================================================================

/// Strip ANSI escape codes from string.
fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").unwrap());
    re.replace_all(s, "")
}

/// Tool chatter is only interesting with --verbose.
fn log_output(name: &str, output: &ToolOutput) {
    for stream in [&output.stdout, &output.stderr] {
        let text = String::from_utf8_lossy(stream);
        let text = strip_ansi(text.trim());
        if !text.is_empty() {
            debug!(name; "{}", text);
        }
    }
}

/// Format error message for failed command.
fn format_error(name: &str, status: ExitStatus, output: &ToolOutput) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let mut msg = format!("Command `{name}` failed with {status}");
    let stderr = strip_ansi(stderr.trim());
    if !stderr.is_empty() {
        msg.push('\n');
        msg.push_str(&stderr);
    }

    let stdout = strip_ansi(stdout.trim());
    if !stdout.is_empty() {
        msg.push_str("\nStdout:\n");
        msg.push_str(&stdout);
    }
    msg
}

// ============================================================================
// Tests
// ============================================================================
