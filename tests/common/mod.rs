//! Common test utilities and helpers
#![allow(dead_code, unused_imports)]

pub mod fake_forge;
pub mod mock_server;

pub use self::fake_forge::{FakeForge, FakeRepo};
pub use self::mock_server::{MockResponse, MockServer};

use repo_drift::core::{DisplayFlags, RunConfig};

/// Builds a `main` vs `feature` run for the `acme` organization
pub fn run_config(flags: DisplayFlags) -> RunConfig {
    RunConfig::new("acme", "main", "feature", flags).expect("valid run config")
}

pub fn names(repos: &[&str]) -> Vec<String> {
    repos.iter().map(|r| r.to_string()).collect()
}
