//! Error types for drift runs

use std::time::Duration;

use thiserror::Error;

/// Invalid combinations of run options, caught before any request is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("--ahead and --behind can only be used exclusively")]
    ConflictingFilters,

    #[error("--short and --json can only be used exclusively")]
    ConflictingFormats,

    /// Neither a token value nor a readable token file was supplied.
    #[error("either --token or a non-empty token file must be provided (looked in {path})")]
    MissingCredential { path: String },
}

/// Per-repository comparison failure. Recoverable: recorded as a failed outcome,
/// never aborts sibling repositories.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CompareError {
    #[error("branch \"{branch}\" not found")]
    BranchNotFound { branch: String },

    /// The repository itself is missing or hidden from the credential.
    #[error("repository \"{repo}\" not found or not accessible")]
    RepositoryInaccessible { repo: String },

    /// The forge answered with a non-success status.
    #[error("comparison failed: {message} ({status})")]
    Api { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    #[error("run deadline exceeded")]
    DeadlineExceeded,

    #[error("cancelled before completion")]
    Cancelled,
}

/// Failure to enumerate an organization's repositories. Always fatal.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("organization \"{0}\" not found")]
    OrgNotFound(String),

    #[error("not authorized to list repositories: {0}")]
    Unauthorized(String),

    #[error("listing repositories failed: {message} ({status})")]
    Api { status: u16, message: String },

    #[error("listing repositories failed: {0}")]
    Transport(String),
}

/// A whole-run stop condition. The report would be incomplete, so it is not
/// printed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunError {
    #[error("run interrupted before comparisons started")]
    InterruptedListing,

    #[error("run interrupted: {stopped} of {total} comparisons cancelled")]
    Interrupted { stopped: usize, total: usize },

    #[error("run deadline exceeded: {stopped} of {total} comparisons unfinished")]
    DeadlineExceeded { stopped: usize, total: usize },
}
