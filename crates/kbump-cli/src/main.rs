//! kustomize-bump: point a Kustomize overlay at a new image and commit it.
//!
//! Inputs come from the `INPUT_*` environment the CI host sets for an action
//! step; every input can also be given as a flag, which takes precedence.
//!
//! Exit status is 0 on success or dry run and 1 after a failure has been
//! reported to the host.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use kbump_core::{
    init_tracing, BumpPipeline, GithubActionsHost, InputOverrides, InputSource, ProcessRunner,
    RunEnv,
};
use tool_cache::{HttpDownloader, ToolCache};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "kustomize-bump")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Set an image in a Kustomize overlay, then commit and push", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines and a JSON run report
    #[arg(long)]
    json: bool,

    /// Overlay directory relative to the working directory [input: kustomizePath]
    #[arg(long)]
    kustomize_path: Option<String>,

    /// Image name to replace [input: name]
    #[arg(long)]
    name: Option<String>,

    /// New image tag [input: newTag]
    #[arg(long)]
    new_tag: Option<String>,

    /// New image repository [input: newName]
    #[arg(long)]
    new_name: Option<String>,

    /// Any non-empty value skips `git push` [input: dontPush]
    #[arg(long)]
    dont_push: Option<String>,

    /// Repository checkout to operate in [input: workingDirectory]
    #[arg(long)]
    working_directory: Option<String>,
}

impl Cli {
    fn overrides(&self) -> InputOverrides {
        InputOverrides {
            kustomize_path: self.kustomize_path.clone(),
            name: self.name.clone(),
            new_tag: self.new_tag.clone(),
            new_name: self.new_name.clone(),
            dont_push: self.dont_push.clone(),
            working_directory: self.working_directory.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    let env = RunEnv::from_env();
    let source = InputSource::from_env(cli.overrides());

    let downloader = HttpDownloader::new().context("Failed to create HTTP client")?;
    let cache = ToolCache::new(env.cache_root(), env.staging_dir(), Arc::new(downloader));
    let host = GithubActionsHost::new(env.github_path.clone());

    let pipeline = BumpPipeline::new(Arc::new(ProcessRunner), Arc::new(cache), Arc::new(host));
    let report = pipeline.run(&source, &env).await;

    info!(
        outcome = ?report.outcome,
        duration_ms = report.duration_ms,
        "Run finished"
    );
    if cli.json {
        eprintln!("{}", serde_json::to_string(&report)?);
    }

    Ok(if report.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
