//! Branch diff records and per-repository outcomes

use serde::{Deserialize, Serialize};

use super::error::CompareError;

/// Result of comparing the head branch against the base branch in one repository
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchDiff {
    pub name: String,
    pub base_hash: String,
    pub head_hash: String,
    pub url: String,
    /// Commits reachable from head but not from base
    pub ahead: u64,
    /// Commits reachable from base but not from head
    pub behind: u64,
}

impl BranchDiff {
    /// True when the two branches point at equivalent history
    pub fn is_even(&self) -> bool {
        self.ahead == 0 && self.behind == 0
    }
}

/// Exactly one of these is produced for every repository in a run
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComparisonOutcome {
    Success(BranchDiff),
    Failure { repo: String, error: CompareError },
}

impl ComparisonOutcome {
    pub fn repo(&self) -> &str {
        match self {
            ComparisonOutcome::Success(diff) => &diff.name,
            ComparisonOutcome::Failure { repo, .. } => repo,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ComparisonOutcome::Failure { .. })
    }
}

/// An outcome that survived the selection policy and will be rendered
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportEntry {
    Diff(BranchDiff),
    Error { repo: String, message: String },
}

impl ReportEntry {
    pub fn repo(&self) -> &str {
        match self {
            ReportEntry::Diff(diff) => &diff.name,
            ReportEntry::Error { repo, .. } => repo,
        }
    }
}

/// Tally of a finished run, used for logging
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub compared: usize,
    pub drifted: usize,
    pub even: usize,
    pub failed: usize,
    pub shown: usize,
}

impl RunSummary {
    pub fn from_outcomes<'a>(
        outcomes: impl IntoIterator<Item = &'a ComparisonOutcome>,
        shown: usize,
    ) -> Self {
        let mut summary = Self {
            shown,
            ..Default::default()
        };
        for outcome in outcomes {
            summary.compared += 1;
            match outcome {
                ComparisonOutcome::Success(diff) if diff.is_even() => summary.even += 1,
                ComparisonOutcome::Success(_) => summary.drifted += 1,
                ComparisonOutcome::Failure { .. } => summary.failed += 1,
            }
        }
        summary
    }
}
