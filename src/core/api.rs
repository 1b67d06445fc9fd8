//! Public API for the core module.
//!
//! This module provides the stable public API for drift reporting:
//! - Diff records and per-repository outcomes
//! - Run configuration and validation
//! - The concurrent diff orchestrator and its selection policy
//! - Text and JSON rendering
//!
//! Internal implementation details are not exposed through this API.

// Data model
pub use super::diff::{BranchDiff, ComparisonOutcome, ReportEntry, RunSummary};
pub use super::error::{CompareError, ConfigError, DirectoryError, RunError};

// Configuration
pub use super::config::{
    get_compare_concurrency, DisplayFlags, DriftFilter, OutputFormat, RunConfig, RunLimits,
};
pub use super::config::{
    COMPARING_MESSAGE, DEFAULT_API_URL, DEFAULT_CONCURRENT_CAP, DEFAULT_TASK_TIMEOUT_SECS,
    DEFAULT_TOKEN_FILE, NAME_COLUMN_WIDTH, PROGRESS_TEMPLATE,
};

// Orchestration
pub use super::orchestrator::{select, DiffOrchestrator};

// Rendering
pub use super::render::{
    format_row, render_entry, render_error, render_full, render_report, render_short,
    render_structured,
};
