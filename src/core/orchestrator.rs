//! Concurrent fan-out of branch comparisons across repositories
//!
//! Every repository gets exactly one comparison task. Tasks share nothing but the
//! read-only comparator and branch names; each resolves to one
//! [`ComparisonOutcome`], tagged with the repository's index so the collected
//! outcomes come back in input order no matter which request finished first.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use indicatif::ProgressBar;
use tokio::sync::{watch, Semaphore};
use tokio::time::Instant;

use super::config::{DriftFilter, RunConfig, RunLimits};
use super::diff::{ComparisonOutcome, ReportEntry, RunSummary};
use super::error::{CompareError, RunError};
use crate::forge::BranchComparator;

/// Drives one [`BranchComparator::diff`] call per repository
pub struct DiffOrchestrator {
    comparator: Arc<dyn BranchComparator>,
    concurrency: Option<usize>,
    limits: RunLimits,
    cancel: Option<watch::Receiver<bool>>,
    progress: Option<ProgressBar>,
}

impl DiffOrchestrator {
    pub fn new(comparator: Arc<dyn BranchComparator>) -> Self {
        Self {
            comparator,
            concurrency: None,
            limits: RunLimits::default(),
            cancel: None,
            progress: None,
        }
    }

    /// Caps the number of comparisons in flight. Without a cap every repository
    /// runs at once.
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = Some(limit.max(1));
        self
    }

    pub fn with_limits(mut self, limits: RunLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Pending comparisons resolve as [`CompareError::Cancelled`] once the
    /// receiver observes `true`.
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|cancel| *cancel.borrow())
    }

    /// Awaits `work` unless the run is cancelled first. Used for the steps
    /// that precede the fan-out, such as listing repositories.
    pub async fn unless_cancelled<F>(&self, work: F) -> Result<F::Output>
    where
        F: std::future::Future,
    {
        let Some(cancel) = &self.cancel else {
            return Ok(work.await);
        };
        let mut cancel = cancel.clone();
        if *cancel.borrow() {
            return Err(RunError::InterruptedListing.into());
        }
        tokio::select! {
            output = work => Ok(output),
            _ = wait_for_cancel(&mut cancel) => Err(RunError::InterruptedListing.into()),
        }
    }

    /// Compares `base` and `head` in every repository and returns one outcome
    /// per repository, in the order of `repos`.
    pub async fn collect(
        &self,
        org: &str,
        repos: &[String],
        base: &str,
        head: &str,
    ) -> Result<Vec<ComparisonOutcome>> {
        let total = repos.len();
        let semaphore = self.concurrency.map(|n| Arc::new(Semaphore::new(n)));
        let deadline = self.limits.deadline.map(|d| Instant::now() + d);

        if let Some(progress) = &self.progress {
            progress.set_length(total as u64);
        }

        let mut futures = FuturesUnordered::new();
        for (index, repo) in repos.iter().enumerate() {
            let comparator = Arc::clone(&self.comparator);
            let semaphore = semaphore.clone();
            let cancel = self.cancel.clone();
            let task_timeout = self.limits.task_timeout;

            futures.push(async move {
                let _permit = match &semaphore {
                    Some(semaphore) => match semaphore.acquire().await {
                        Ok(permit) => Some(permit),
                        Err(_) => {
                            return (index, failure(repo, CompareError::Cancelled));
                        }
                    },
                    None => None,
                };

                let compare = comparator.diff(org, repo, base, head);
                let result = run_bounded(compare, task_timeout, deadline, cancel).await;

                let outcome = match result {
                    Ok(diff) => {
                        tracing::debug!(
                            repo = %repo,
                            ahead = diff.ahead,
                            behind = diff.behind,
                            "compared"
                        );
                        ComparisonOutcome::Success(diff)
                    }
                    Err(error) => {
                        tracing::debug!(repo = %repo, error = %error, "comparison failed");
                        failure(repo, error)
                    }
                };
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<ComparisonOutcome>> = vec![None; total];
        while let Some((index, outcome)) = futures.next().await {
            if let Some(progress) = &self.progress {
                progress.inc(1);
            }
            slots[index] = Some(outcome);
        }

        let outcomes: Vec<ComparisonOutcome> = slots.into_iter().flatten().collect();
        if outcomes.len() != total {
            anyhow::bail!("collected {} of {} comparison outcomes", outcomes.len(), total);
        }
        Ok(outcomes)
    }

    /// Runs the comparison for `config` and applies the selection policy
    ///
    /// Fails with [`RunError`] when cancellation or the run deadline stopped
    /// any comparison, since the selected entries would silently omit those
    /// repositories.
    pub async fn run(&self, repos: &[String], config: &RunConfig) -> Result<Vec<ReportEntry>> {
        let outcomes = self
            .collect(config.org(), repos, config.base(), config.head())
            .await?;

        let entries: Vec<ReportEntry> = outcomes
            .iter()
            .filter_map(|outcome| select(outcome, config))
            .collect();

        let summary = RunSummary::from_outcomes(&outcomes, entries.len());
        tracing::info!(
            org = config.org(),
            base = config.base(),
            head = config.head(),
            compared = summary.compared,
            drifted = summary.drifted,
            even = summary.even,
            failed = summary.failed,
            shown = summary.shown,
            "drift run finished"
        );

        check_completed(&outcomes, self.is_cancelled())?;
        Ok(entries)
    }
}

/// Turns outcomes stopped by a whole-run event into a [`RunError`]
fn check_completed(outcomes: &[ComparisonOutcome], cancelled: bool) -> Result<(), RunError> {
    let total = outcomes.len();
    let stopped_by = |target: &CompareError| {
        outcomes
            .iter()
            .filter(|o| matches!(o, ComparisonOutcome::Failure { error, .. } if error == target))
            .count()
    };

    let stopped = stopped_by(&CompareError::Cancelled);
    if stopped > 0 || cancelled {
        return Err(RunError::Interrupted { stopped, total });
    }
    let stopped = stopped_by(&CompareError::DeadlineExceeded);
    if stopped > 0 {
        return Err(RunError::DeadlineExceeded { stopped, total });
    }
    Ok(())
}

fn failure(repo: &str, error: CompareError) -> ComparisonOutcome {
    ComparisonOutcome::Failure {
        repo: repo.to_string(),
        error,
    }
}

/// Awaits `compare` unless the task timeout, the run deadline or cancellation
/// fires first
async fn run_bounded<F, T>(
    compare: F,
    task_timeout: Option<Duration>,
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
) -> Result<T, CompareError>
where
    F: std::future::Future<Output = Result<T, CompareError>>,
{
    let task_deadline = task_timeout.map(|t| (Instant::now() + t, CompareError::TimedOut(t)));
    let run_deadline = deadline.map(|at| (at, CompareError::DeadlineExceeded));
    let limit = match (task_deadline, run_deadline) {
        (Some(task), Some(run)) => Some(if run.0 < task.0 { run } else { task }),
        (task, run) => task.or(run),
    };

    let bounded = async move {
        match limit {
            Some((at, elapsed)) => tokio::time::timeout_at(at, compare)
                .await
                .unwrap_or(Err(elapsed)),
            None => compare.await,
        }
    };

    match cancel {
        Some(mut cancel) => {
            if *cancel.borrow() {
                return Err(CompareError::Cancelled);
            }
            tokio::select! {
                result = bounded => result,
                _ = wait_for_cancel(&mut cancel) => Err(CompareError::Cancelled),
            }
        }
        None => bounded.await,
    }
}

async fn wait_for_cancel(cancel: &mut watch::Receiver<bool>) {
    loop {
        if cancel.changed().await.is_err() {
            // Sender dropped without cancelling: never fire
            std::future::pending::<()>().await;
        }
        if *cancel.borrow() {
            return;
        }
    }
}

/// Applies the selection policy to one outcome
///
/// Precedence: failures are kept only under show-all; an even diff is dropped
/// unless show-all; ahead-only and behind-only drop diffs with a zero count on
/// their side even under show-all.
pub fn select(outcome: &ComparisonOutcome, config: &RunConfig) -> Option<ReportEntry> {
    match outcome {
        ComparisonOutcome::Failure { repo, error } => config.show_all().then(|| ReportEntry::Error {
            repo: repo.clone(),
            message: error.to_string(),
        }),
        ComparisonOutcome::Success(diff) => {
            if diff.is_even() && !config.show_all() {
                return None;
            }
            match config.filter() {
                DriftFilter::AheadOnly if diff.ahead == 0 => None,
                DriftFilter::BehindOnly if diff.behind == 0 => None,
                _ => Some(ReportEntry::Diff(diff.clone())),
            }
        }
    }
}
