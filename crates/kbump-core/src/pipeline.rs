//! Pipeline orchestration: fetch, mutate, configure, commit, push.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tool_cache::{ToolProvisioner, ToolSpec, KUSTOMIZE};
use tracing::{error, info};

use crate::env::RunEnv;
use crate::error::{BumpError, Result};
use crate::git::{commit_message, configure_credentials, GitDriver};
use crate::host::Host;
use crate::inputs::InputSource;
use crate::kustomize;
use crate::runner::CommandRunner;

/// Warning emitted when `DRYRUN=1` short-circuits the run.
pub const DRY_RUN_WARNING: &str = "DRYRUN=1 set, skipping kustomize and git";

/// States visited by a run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    ResolvingInputs,
    FetchingDeps,
    Mutating,
    ConfiguringGit,
    Staging,
    Committing,
    Pushing,
    PushSkipped,
    Done,
    Failed,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Every step ran.
    Done,
    /// `DRYRUN=1`: nothing external was touched.
    DryRun,
    /// A step failed; later steps never ran.
    Failed { message: String },
}

/// Result of a complete pipeline execution.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// States in the order they were entered.
    pub states: Vec<PipelineState>,

    /// Final outcome.
    pub outcome: Outcome,

    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

impl PipelineReport {
    /// Whether the run should exit successfully.
    pub fn success(&self) -> bool {
        !matches!(self.outcome, Outcome::Failed { .. })
    }

    /// Whether `state` was entered.
    pub fn visited(&self, state: PipelineState) -> bool {
        self.states.contains(&state)
    }
}

/// Orchestrator owning the external collaborators.
pub struct BumpPipeline {
    runner: Arc<dyn CommandRunner>,
    provisioner: Arc<dyn ToolProvisioner>,
    host: Arc<dyn Host>,
    tool: ToolSpec,
}

impl BumpPipeline {
    /// Create a pipeline provisioning [`KUSTOMIZE`].
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        provisioner: Arc<dyn ToolProvisioner>,
        host: Arc<dyn Host>,
    ) -> Self {
        BumpPipeline {
            runner,
            provisioner,
            host,
            tool: KUSTOMIZE,
        }
    }

    /// Provision `tool` instead of the default pin.
    pub fn with_tool(mut self, tool: ToolSpec) -> Self {
        self.tool = tool;
        self
    }

    /// Execute one run.
    ///
    /// Never returns an error: any failure becomes [`Outcome::Failed`], is
    /// reported to the host exactly once, and stops the remaining steps.
    /// Nothing already done (a commit, say) is undone.
    pub async fn run(&self, source: &InputSource, env: &RunEnv) -> PipelineReport {
        let start = Instant::now();
        let mut states = Vec::new();

        let outcome = match self.drive(source, env, &mut states).await {
            Ok(outcome) => {
                enter(&mut states, PipelineState::Done);
                outcome
            }
            Err(err) => {
                let message = err.to_string();
                enter(&mut states, PipelineState::Failed);
                error!(error = %message, "Pipeline failed");
                self.host.set_failed(&message);
                Outcome::Failed { message }
            }
        };

        PipelineReport {
            states,
            outcome,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    async fn drive(
        &self,
        source: &InputSource,
        env: &RunEnv,
        states: &mut Vec<PipelineState>,
    ) -> Result<Outcome> {
        enter(states, PipelineState::ResolvingInputs);
        let inputs = source.resolve()?;

        if env.dry_run {
            self.host.warning(DRY_RUN_WARNING);
            return Ok(Outcome::DryRun);
        }

        if let Some(token) = &env.token {
            self.host.mask(token);
        }

        enter(states, PipelineState::FetchingDeps);
        let provisioned = self.provisioner.ensure(&self.tool).await?;
        self.host.add_path(&provisioned.path)?;

        enter(states, PipelineState::Mutating);
        if !kustomize::set_image(self.runner.as_ref(), &inputs).await? {
            return Err(BumpError::MutationFailed);
        }

        enter(states, PipelineState::ConfiguringGit);
        let credentials = env.credentials()?;
        configure_credentials(self.runner.as_ref(), &inputs.working_directory, &credentials)
            .await?;

        let git = GitDriver::new(
            self.runner.as_ref(),
            &inputs.working_directory,
            &credentials.home,
        );

        enter(states, PipelineState::Staging);
        git.add(inputs.pathspec()).await?;

        enter(states, PipelineState::Committing);
        git.commit(&commit_message(&inputs)).await?;

        if inputs.dont_push {
            enter(states, PipelineState::PushSkipped);
            info!("dontPush set, leaving commit unpushed");
        } else {
            enter(states, PipelineState::Pushing);
            git.push().await?;
        }

        Ok(Outcome::Done)
    }
}

fn enter(states: &mut Vec<PipelineState>, state: PipelineState) {
    info!(state = ?state, "Entering state");
    states.push(state);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(outcome: Outcome) -> PipelineReport {
        PipelineReport {
            states: vec![PipelineState::ResolvingInputs],
            outcome,
            duration_ms: 1,
        }
    }

    #[test]
    fn test_report_success() {
        assert!(report(Outcome::Done).success());
        assert!(report(Outcome::DryRun).success());
        assert!(!report(Outcome::Failed {
            message: "Kustomize failed".to_string()
        })
        .success());
    }

    #[test]
    fn test_report_visited() {
        let r = report(Outcome::Done);
        assert!(r.visited(PipelineState::ResolvingInputs));
        assert!(!r.visited(PipelineState::Pushing));
    }

    #[test]
    fn test_report_serializes() {
        let r = report(Outcome::Failed {
            message: "Kustomize failed".to_string(),
        });
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["outcome"]["status"], "failed");
        assert_eq!(json["outcome"]["message"], "Kustomize failed");
        assert_eq!(json["states"][0], "resolving_inputs");
    }
}
