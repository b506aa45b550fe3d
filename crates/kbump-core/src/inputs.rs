//! Action inputs.
//!
//! The host passes each input `foo` as the environment variable `INPUT_FOO`
//! (uppercased, spaces replaced by `_`). Command-line overrides take
//! precedence over the environment.

use crate::error::{BumpError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Input names as declared by the action.
pub mod names {
    pub const KUSTOMIZE_PATH: &str = "kustomizePath";
    pub const NAME: &str = "name";
    pub const NEW_TAG: &str = "newTag";
    pub const NEW_NAME: &str = "newName";
    pub const DONT_PUSH: &str = "dontPush";
    pub const WORKING_DIRECTORY: &str = "workingDirectory";
}

/// Resolved, immutable inputs for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inputs {
    /// Overlay directory, relative to `working_directory`. May be empty.
    pub kustomize_path: String,
    /// Image name as it appears in the overlay.
    pub name: String,
    /// Replacement repository.
    pub new_name: String,
    /// Replacement tag.
    pub new_tag: String,
    /// Skip `git push`.
    pub dont_push: bool,
    /// Directory git and kustomize run relative to.
    pub working_directory: PathBuf,
}

/// Values supplied on the command line; `None` falls through to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputOverrides {
    pub kustomize_path: Option<String>,
    pub name: Option<String>,
    pub new_tag: Option<String>,
    pub new_name: Option<String>,
    pub dont_push: Option<String>,
    pub working_directory: Option<String>,
}

impl InputOverrides {
    fn get(&self, input: &str) -> Option<&String> {
        match input {
            names::KUSTOMIZE_PATH => self.kustomize_path.as_ref(),
            names::NAME => self.name.as_ref(),
            names::NEW_TAG => self.new_tag.as_ref(),
            names::NEW_NAME => self.new_name.as_ref(),
            names::DONT_PUSH => self.dont_push.as_ref(),
            names::WORKING_DIRECTORY => self.working_directory.as_ref(),
            _ => None,
        }
    }
}

/// Environment variable carrying input `name`.
pub fn input_env_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Raw input values from the host plus command-line overrides.
#[derive(Debug, Clone, Default)]
pub struct InputSource {
    vars: HashMap<String, String>,
    overrides: InputOverrides,
}

impl InputSource {
    /// Read `INPUT_*` variables from the process environment.
    pub fn from_env(overrides: InputOverrides) -> Self {
        Self::from_vars(
            std::env::vars().filter(|(k, _)| k.starts_with("INPUT_")),
            overrides,
        )
    }

    /// Build from explicit `(variable, value)` pairs.
    pub fn from_vars<I, K, V>(vars: I, overrides: InputOverrides) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        InputSource {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            overrides,
        }
    }

    /// Trimmed value of `name`; empty when unset unless `required`.
    pub fn get_input(&self, name: &str, required: bool) -> Result<String> {
        let raw = self
            .overrides
            .get(name)
            .or_else(|| self.vars.get(&input_env_name(name)))
            .map(|v| v.trim().to_string())
            .unwrap_or_default();

        if required && raw.is_empty() {
            return Err(BumpError::MissingInput(name.to_string()));
        }
        Ok(raw)
    }

    /// Resolve every input, failing on the first missing required one.
    pub fn resolve(&self) -> Result<Inputs> {
        let kustomize_path = self.get_input(names::KUSTOMIZE_PATH, false)?;
        let name = self.get_input(names::NAME, true)?;
        let new_tag = self.get_input(names::NEW_TAG, true)?;
        let new_name = self.get_input(names::NEW_NAME, true)?;
        let dont_push = !self.get_input(names::DONT_PUSH, false)?.is_empty();
        let working_directory = match self.get_input(names::WORKING_DIRECTORY, false)? {
            dir if dir.is_empty() => PathBuf::from("."),
            dir => PathBuf::from(dir),
        };

        Ok(Inputs {
            kustomize_path,
            name,
            new_name,
            new_tag,
            dont_push,
            working_directory,
        })
    }
}

impl Inputs {
    /// Directory kustomize edits: `working_directory/kustomize_path`.
    pub fn overlay_dir(&self) -> PathBuf {
        self.working_directory.join(&self.kustomize_path)
    }

    /// Pathspec handed to `git add`; the working directory itself when the
    /// overlay path is empty.
    pub fn pathspec(&self) -> &str {
        if self.kustomize_path.is_empty() {
            "."
        } else {
            &self.kustomize_path
        }
    }
}
