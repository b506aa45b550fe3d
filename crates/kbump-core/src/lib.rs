//! kustomize-bump core
//!
//! Points an image in a Kustomize overlay at a new name and tag, then
//! commits and (optionally) pushes the change. The run is a single ordered
//! pass driven by [`BumpPipeline`]:
//!
//! 1. resolve inputs
//! 2. provision kustomize through the tool cache
//! 3. `kustomize edit set image`
//! 4. write `.netrc`, set git identity
//! 5. `git add`, `git commit`, `git push`
//!
//! External processes, tool provisioning and host signaling sit behind
//! traits so the sequence can be exercised with the fakes in [`fakes`].

pub mod env;
pub mod error;
pub mod fakes;
pub mod git;
pub mod host;
pub mod inputs;
pub mod kustomize;
pub mod pipeline;
pub mod runner;
pub mod telemetry;

pub use env::{Credentials, RunEnv};
pub use error::{BumpError, Result};
pub use git::{commit_message, netrc_contents, GitDriver, GIT_USER_NAME};
pub use host::{GithubActionsHost, Host};
pub use inputs::{InputOverrides, InputSource, Inputs};
pub use kustomize::set_image_clause;
pub use pipeline::{BumpPipeline, Outcome, PipelineReport, PipelineState, DRY_RUN_WARNING};
pub use runner::{must_succeed, CommandRunner, Invocation, ProcessRunner, StepResult};
pub use telemetry::init_tracing;

pub use tool_cache::{ToolCache, ToolProvisioner, ToolSpec, KUSTOMIZE};
