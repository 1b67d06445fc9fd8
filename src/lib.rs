//! # repo-drift
//!
//! `repo-drift` compares two branches in every repository of a GitHub
//! organization and reports how many commits the head branch is ahead of and
//! behind the base branch. It powers the `repo-drift` CLI tool.
//!
//! ## Core Features
//!
//! - **Concurrent Fan-out**: One comparison per repository, all in flight at once.
//! - **Partial Failure**: A missing branch or an inaccessible repository never aborts the run.
//! - **Deterministic Output**: Reports follow the organization's repository order.
//! - **Three Formats**: Full, short and JSON reports.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use repo_drift::core::{render_report, DiffOrchestrator, DisplayFlags, RunConfig};
//! use repo_drift::forge::{GithubClient, RepositoryDirectory};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Arc::new(GithubClient::new("https://api.github.com", None)?);
//!     let config = RunConfig::new("rust-lang", "master", "beta", DisplayFlags::default())?;
//!     let repos = client.list_repositories(config.org()).await?;
//!     let entries = DiffOrchestrator::new(client).run(&repos, &config).await?;
//!     print!("{}", render_report(&entries, &config)?);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod core;
pub mod forge;
pub mod utils;
