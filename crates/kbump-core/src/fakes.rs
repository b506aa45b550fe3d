//! In-memory fakes for the runner and host seams (testing only)
//!
//! `RecordingRunner` records every invocation and answers with scripted exit
//! codes; `RecordingHost` captures host signals instead of printing them.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{BumpError, Result};
use crate::host::Host;
use crate::runner::{CommandRunner, Invocation, StepResult};

// ---------------------------------------------------------------------------
// RecordingRunner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Scripted {
    Exit(i32),
    SpawnError,
}

/// Runner that never spawns anything.
///
/// Every call succeeds unless a rule registered with [`fail_when`] or
/// [`spawn_error_when`] matches its command line prefix.
///
/// [`fail_when`]: RecordingRunner::fail_when
/// [`spawn_error_when`]: RecordingRunner::spawn_error_when
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Invocation>>,
    rules: Mutex<Vec<(String, Scripted)>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit with `code` for commands starting with `prefix` (e.g. `"git push"`).
    pub fn fail_when(self, prefix: &str, code: i32) -> Self {
        self.rules
            .lock()
            .unwrap()
            .push((prefix.to_string(), Scripted::Exit(code)));
        self
    }

    /// Fail to start commands starting with `prefix`.
    pub fn spawn_error_when(self, prefix: &str) -> Self {
        self.rules
            .lock()
            .unwrap()
            .push((prefix.to_string(), Scripted::SpawnError));
        self
    }

    /// Invocations seen so far, in order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Rendered command lines seen so far, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.invocations().iter().map(ToString::to_string).collect()
    }

    /// Whether any call's command line starts with `prefix`.
    pub fn ran(&self, prefix: &str) -> bool {
        self.command_lines().iter().any(|c| c.starts_with(prefix))
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> Result<StepResult> {
        self.calls.lock().unwrap().push(invocation.clone());
        let command = invocation.to_string();

        let scripted = self
            .rules
            .lock()
            .unwrap()
            .iter()
            .find(|(prefix, _)| command.starts_with(prefix.as_str()))
            .map(|(_, s)| s.clone());

        match scripted {
            Some(Scripted::SpawnError) => Err(BumpError::Spawn {
                program: invocation.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            }),
            Some(Scripted::Exit(code)) => Ok(StepResult {
                command,
                exit_code: code,
                duration_ms: 0,
                success: code == 0,
            }),
            None => Ok(StepResult {
                command,
                exit_code: 0,
                duration_ms: 0,
                success: true,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingHost
// ---------------------------------------------------------------------------

/// Host that stores every signal for later assertions.
#[derive(Debug, Default)]
pub struct RecordingHost {
    paths: Mutex<Vec<PathBuf>>,
    warnings: Mutex<Vec<String>>,
    failures: Mutex<Vec<String>>,
    masks: Mutex<Vec<String>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().unwrap().clone()
    }

    pub fn masks(&self) -> Vec<String> {
        self.masks.lock().unwrap().clone()
    }
}

impl Host for RecordingHost {
    fn add_path(&self, dir: &Path) -> Result<()> {
        self.paths.lock().unwrap().push(dir.to_path_buf());
        Ok(())
    }

    fn warning(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }

    fn set_failed(&self, message: &str) {
        self.failures.lock().unwrap().push(message.to_string());
    }

    fn mask(&self, secret: &str) {
        self.masks.lock().unwrap().push(secret.to_string());
    }
}
