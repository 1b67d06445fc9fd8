//! Drift report command implementation
//!
//! Lists the organization's repositories, compares the two branches in each of
//! them concurrently and prints the report once every comparison is done.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::watch;

use crate::cli::Args;
use crate::core::{
    get_compare_concurrency, render_report, ConfigError, DiffOrchestrator, RunConfig, RunLimits,
};
use crate::forge::{GithubClient, RepositoryDirectory};
use crate::utils::{create_progress_bar, expand_home, read_token_file};

/// Picks the token from `--token`/`GITHUB_TOKEN`, falling back to the token file
pub fn resolve_token(args: &Args) -> Result<String> {
    if let Some(token) = args.token.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }

    let path = expand_home(&args.token_file);
    match read_token_file(&path)? {
        Some(token) => Ok(token),
        None => Err(ConfigError::MissingCredential {
            path: path.display().to_string(),
        }
        .into()),
    }
}

/// Builds the timing limits from the command line; zero disables the per-task timeout
pub fn run_limits(args: &Args) -> RunLimits {
    RunLimits {
        task_timeout: (args.timeout > 0).then(|| Duration::from_secs(args.timeout)),
        deadline: args.deadline.map(Duration::from_secs),
    }
}

/// Lists the repositories of the configured organization, runs every comparison
/// and returns the rendered report
///
/// A directory failure or cancellation while listing aborts before any
/// comparison starts. An interrupted or deadline-limited run is an error too,
/// never a partial report.
pub async fn run_report(
    directory: &dyn RepositoryDirectory,
    orchestrator: &DiffOrchestrator,
    config: &RunConfig,
) -> Result<String> {
    let repos = orchestrator
        .unless_cancelled(directory.list_repositories(config.org()))
        .await?
        .with_context(|| format!("failed to list repositories of {}", config.org()))?;

    tracing::info!(org = config.org(), repos = repos.len(), "comparing branches");

    let entries = orchestrator.run(&repos, config).await?;
    render_report(&entries, config)
}

/// Handles the drift report command
pub async fn handle_diff_command(args: Args) -> Result<()> {
    let config = RunConfig::new(&args.org, &args.base, &args.head, args.display_flags())?;
    let token = resolve_token(&args)?;
    let client = Arc::new(GithubClient::new(&args.api_url, Some(token))?);

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling outstanding comparisons");
            let _ = cancel_tx.send(true);
        }
    });

    let progress = create_progress_bar(config.org())?;
    let orchestrator = DiffOrchestrator::new(client.clone())
        .with_concurrency(get_compare_concurrency(args.jobs, args.sequential))
        .with_limits(run_limits(&args))
        .with_cancellation(cancel_rx)
        .with_progress(progress.clone());

    let report = run_report(client.as_ref(), &orchestrator, &config).await;
    progress.finish_and_clear();
    ctrl_c.abort();
    let report = report?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(report.as_bytes())?;
    stdout.flush()?;

    Ok(())
}
