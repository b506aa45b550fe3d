//! Signaling to the CI host.
//!
//! The runner reads `::command::value` lines from stdout and picks up PATH
//! additions from the file named by `GITHUB_PATH`.

use crate::error::{BumpError, Result};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Host-side effects of a run.
pub trait Host: Send + Sync {
    /// Make executables in `dir` resolvable for this process and later steps.
    fn add_path(&self, dir: &Path) -> Result<()>;

    /// Surface a warning annotation.
    fn warning(&self, message: &str);

    /// Mark the run failed with `message`.
    fn set_failed(&self, message: &str);

    /// Redact `secret` from all further host output.
    fn mask(&self, secret: &str);
}

/// Escape a workflow command value.
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Render `::<command>::<value>`.
pub fn workflow_command(command: &str, value: &str) -> String {
    format!("::{}::{}", command, escape_data(value))
}

/// `dir` followed by the entries of `current`.
pub fn prepend_path(dir: &Path, current: Option<OsString>) -> Result<OsString> {
    let mut entries = vec![dir.to_path_buf()];
    if let Some(current) = current {
        entries.extend(std::env::split_paths(&current));
    }
    std::env::join_paths(entries).map_err(|e| BumpError::PathUpdate(e.to_string()))
}

/// Host speaking the GitHub Actions workflow-command protocol on stdout.
#[derive(Debug, Default, Clone)]
pub struct GithubActionsHost {
    github_path: Option<PathBuf>,
}

impl GithubActionsHost {
    pub fn new(github_path: Option<PathBuf>) -> Self {
        GithubActionsHost { github_path }
    }

    fn emit(&self, command: &str, value: &str) {
        println!("{}", workflow_command(command, value));
    }
}

impl Host for GithubActionsHost {
    fn add_path(&self, dir: &Path) -> Result<()> {
        if let Some(file) = &self.github_path {
            let mut f = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)?;
            writeln!(f, "{}", dir.display())?;
        }

        let updated = prepend_path(dir, std::env::var_os("PATH"))?;
        std::env::set_var("PATH", &updated);
        tracing::debug!(dir = %dir.display(), "Added to PATH");
        Ok(())
    }

    fn warning(&self, message: &str) {
        self.emit("warning", message);
    }

    fn set_failed(&self, message: &str) {
        self.emit("error", message);
    }

    fn mask(&self, secret: &str) {
        self.emit("add-mask", secret);
    }
}
