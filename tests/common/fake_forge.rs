//! In-memory forge implementing both collaborator traits

use async_trait::async_trait;
use repo_drift::core::{CompareError, DirectoryError};
use repo_drift::forge::{BranchComparator, Comparison, RepositoryDirectory};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A repository as the fake forge sees it
#[derive(Clone, Debug)]
pub struct FakeRepo {
    branches: Vec<String>,
    ahead: u64,
    behind: u64,
    delay: Duration,
    compare_error: Option<CompareError>,
}

impl FakeRepo {
    /// A repository with `main` and `feature` branches and the given drift
    pub fn new(ahead: u64, behind: u64) -> Self {
        Self {
            branches: vec!["main".to_string(), "feature".to_string()],
            ahead,
            behind,
            delay: Duration::ZERO,
            compare_error: None,
        }
    }

    pub fn without_branch(mut self, branch: &str) -> Self {
        self.branches.retain(|b| b != branch);
        self
    }

    /// Makes the compare call take `millis` milliseconds
    pub fn with_delay(mut self, millis: u64) -> Self {
        self.delay = Duration::from_millis(millis);
        self
    }

    pub fn failing(mut self, error: CompareError) -> Self {
        self.compare_error = Some(error);
        self
    }
}

pub fn sha(repo: &str, branch: &str) -> String {
    format!("{repo}-{branch}-sha")
}

/// Fake forge that records how it was called
#[derive(Default)]
pub struct FakeForge {
    order: Vec<String>,
    repos: HashMap<String, FakeRepo>,
    directory_error: bool,
    listing_delay: Duration,
    pub compare_calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeForge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repo(mut self, name: &str, repo: FakeRepo) -> Self {
        self.order.push(name.to_string());
        self.repos.insert(name.to_string(), repo);
        self
    }

    /// Makes `list_repositories` fail as if the organization did not exist
    pub fn with_directory_error(mut self) -> Self {
        self.directory_error = true;
        self
    }

    /// Makes `list_repositories` take `millis` milliseconds
    pub fn with_listing_delay(mut self, millis: u64) -> Self {
        self.listing_delay = Duration::from_millis(millis);
        self
    }

    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn compare_calls(&self) -> usize {
        self.compare_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RepositoryDirectory for FakeForge {
    async fn list_repositories(&self, org: &str) -> Result<Vec<String>, DirectoryError> {
        if !self.listing_delay.is_zero() {
            tokio::time::sleep(self.listing_delay).await;
        }
        if self.directory_error {
            return Err(DirectoryError::OrgNotFound(org.to_string()));
        }
        Ok(self.order.clone())
    }
}

#[async_trait]
impl BranchComparator for FakeForge {
    async fn resolve_branch(
        &self,
        _org: &str,
        repo: &str,
        branch: &str,
    ) -> Result<String, CompareError> {
        let fake = self.repos.get(repo).ok_or_else(|| CompareError::Api {
            status: 404,
            message: "Not Found".to_string(),
        })?;
        if fake.branches.iter().any(|b| b == branch) {
            Ok(sha(repo, branch))
        } else {
            Err(CompareError::BranchNotFound {
                branch: branch.to_string(),
            })
        }
    }

    async fn compare(
        &self,
        org: &str,
        repo: &str,
        base_commit: &str,
        head_commit: &str,
    ) -> Result<Comparison, CompareError> {
        self.compare_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let fake = self.repos[repo].clone();
        if !fake.delay.is_zero() {
            tokio::time::sleep(fake.delay).await;
        } else {
            tokio::task::yield_now().await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(error) = fake.compare_error {
            return Err(error);
        }
        Ok(Comparison {
            ahead: fake.ahead,
            behind: fake.behind,
            url: format!("https://github.com/{org}/{repo}/compare/{base_commit}...{head_commit}"),
        })
    }
}
