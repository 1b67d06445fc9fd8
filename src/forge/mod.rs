//! Forge collaborators: repository listing and branch comparison
//!
//! The orchestrator only sees the two traits below. [`github::GithubClient`]
//! implements both against the GitHub REST API.

pub mod github;

use async_trait::async_trait;

use crate::core::{BranchDiff, CompareError, DirectoryError};

pub use github::GithubClient;

/// Ahead/behind counts between two commits plus a link a human can open
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comparison {
    pub ahead: u64,
    pub behind: u64,
    pub url: String,
}

/// Enumerates the repositories owned by an organization
#[async_trait]
pub trait RepositoryDirectory: Send + Sync {
    /// Returns every repository name of `org`, deduplicated, paging internally
    async fn list_repositories(&self, org: &str) -> Result<Vec<String>, DirectoryError>;
}

/// Resolves branches and compares commits inside a single repository
#[async_trait]
pub trait BranchComparator: Send + Sync {
    /// Resolves `branch` to the commit hash it points at
    async fn resolve_branch(
        &self,
        org: &str,
        repo: &str,
        branch: &str,
    ) -> Result<String, CompareError>;

    /// Compares `head_commit` against `base_commit`
    async fn compare(
        &self,
        org: &str,
        repo: &str,
        base_commit: &str,
        head_commit: &str,
    ) -> Result<Comparison, CompareError>;

    /// Resolves both branches and compares them
    async fn diff(
        &self,
        org: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<BranchDiff, CompareError> {
        let base_hash = self.resolve_branch(org, repo, base).await?;
        let head_hash = self.resolve_branch(org, repo, head).await?;
        let comparison = self.compare(org, repo, &base_hash, &head_hash).await?;

        Ok(BranchDiff {
            name: repo.to_string(),
            base_hash,
            head_hash,
            url: comparison.url,
            ahead: comparison.ahead,
            behind: comparison.behind,
        })
    }
}
