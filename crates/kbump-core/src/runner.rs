//! External command execution.

use crate::error::{BumpError, Result};
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

/// One external process call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable, resolved through `PATH`.
    pub program: String,

    /// Arguments, passed verbatim.
    pub args: Vec<String>,

    /// Working directory; inherits the parent's when `None`.
    pub cwd: Option<PathBuf>,

    /// Extra environment for the child.
    pub env: Vec<(String, String)>,
}

impl Invocation {
    /// Create an invocation of `program` with `args`.
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
            env: Vec::new(),
        }
    }

    /// Run in `dir`.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set `key=value` in the child environment.
    pub fn env(mut self, key: &str, value: impl Into<String>) -> Self {
        self.env.push((key.to_string(), value.into()));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Result of a finished invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    /// Rendered command line.
    pub command: String,

    /// Exit code (0 = success, -1 when killed by a signal).
    pub exit_code: i32,

    /// Duration in milliseconds.
    pub duration_ms: u64,

    /// Whether the process reported success.
    pub success: bool,
}

impl StepResult {
    /// Whether this step passed (exit code 0).
    pub fn passed(&self) -> bool {
        self.success && self.exit_code == 0
    }
}

/// Runs invocations to completion.
///
/// `Err` means the process could not be started at all; a process that ran
/// and failed is an `Ok` with a non-zero exit code.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<StepResult>;
}

/// Spawns real child processes with inherited stdout/stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<StepResult> {
        let start = Instant::now();
        debug!(
            command = %invocation,
            cwd = ?invocation.cwd,
            "Spawning process"
        );

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = &invocation.cwd {
            command.current_dir(dir);
        }
        for (key, value) in &invocation.env {
            command.env(key, value);
        }

        let status = command.status().await.map_err(|source| BumpError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

        let result = StepResult {
            command: invocation.to_string(),
            exit_code: status.code().unwrap_or(-1),
            duration_ms: start.elapsed().as_millis() as u64,
            success: status.success(),
        };
        debug!(
            command = %result.command,
            exit_code = result.exit_code,
            duration_ms = result.duration_ms,
            "Process exited"
        );
        Ok(result)
    }
}

/// Run `invocation` and turn a non-zero exit into [`BumpError::NonZeroExit`].
pub async fn must_succeed(runner: &dyn CommandRunner, invocation: &Invocation) -> Result<StepResult> {
    let result = runner.run(invocation).await?;
    if !result.passed() {
        return Err(BumpError::NonZeroExit {
            command: result.command,
            code: result.exit_code,
        });
    }
    Ok(result)
}
