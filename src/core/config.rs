//! Run configuration and tuning constants

use std::time::Duration;

use super::error::ConfigError;

// Concurrency Configuration
//
// Comparisons are network-bound round trips against the forge API. One task runs per
// repository; the cap only keeps very large organizations from opening hundreds of
// connections at once.

// Default concurrency cap to prevent overwhelming GitHub's concurrent request limits
pub const DEFAULT_CONCURRENT_CAP: usize = 64;

// Per-repository timeout for the resolve/resolve/compare sequence
pub const DEFAULT_TASK_TIMEOUT_SECS: u64 = 60;

// Display formatting constants
pub const NAME_COLUMN_WIDTH: usize = 45;

// Credentials
pub const DEFAULT_TOKEN_FILE: &str = "~/.repo-drift-token";
pub const DEFAULT_API_URL: &str = "https://api.github.com";

// Progress bar configuration
pub const PROGRESS_TEMPLATE: &str = "{spinner} {prefix:.bold} {pos}/{len} {wide_msg}";
pub const COMPARING_MESSAGE: &str = "comparing branches...";

/// Determines how many comparisons may be in flight at once
///
/// Priority order:
/// 1. --sequential flag → 1
/// 2. --jobs N flag → N
/// 3. Default → DEFAULT_CONCURRENT_CAP, i.e. one task per repository for most organizations
pub fn get_compare_concurrency(jobs: Option<usize>, sequential: bool) -> usize {
    if sequential {
        return 1;
    }

    if let Some(n) = jobs {
        return n.max(1);
    }

    DEFAULT_CONCURRENT_CAP
}

/// Which side of the drift the report cares about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DriftFilter {
    /// Report both counts
    #[default]
    Both,
    /// Only repositories whose head is ahead of base
    AheadOnly,
    /// Only repositories whose head is behind base
    BehindOnly,
}

impl DriftFilter {
    pub fn shows_ahead(self) -> bool {
        self != DriftFilter::BehindOnly
    }

    pub fn shows_behind(self) -> bool {
        self != DriftFilter::AheadOnly
    }
}

/// Output representation of the report
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Three lines per repository: counts, hashes, comparison URL
    #[default]
    Full,
    /// One line per repository
    Short,
    /// A single JSON array written after the run
    Structured,
}

/// Raw display switches as they come off the command line
#[derive(Clone, Copy, Debug, Default)]
pub struct DisplayFlags {
    pub show_all: bool,
    pub ahead_only: bool,
    pub behind_only: bool,
    pub short: bool,
    pub structured: bool,
}

/// Immutable configuration for one drift run
///
/// Built once through [`RunConfig::new`], which rejects contradictory flags, and
/// only ever handed out by reference afterwards.
#[derive(Clone, Debug)]
pub struct RunConfig {
    org: String,
    base: String,
    head: String,
    show_all: bool,
    filter: DriftFilter,
    format: OutputFormat,
}

impl RunConfig {
    pub fn new(
        org: impl Into<String>,
        base: impl Into<String>,
        head: impl Into<String>,
        flags: DisplayFlags,
    ) -> Result<Self, ConfigError> {
        let org = org.into();
        let base = base.into();
        let head = head.into();

        let fields = [
            ("organization", &org),
            ("base branch", &base),
            ("head branch", &head),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(field));
            }
        }

        let filter = match (flags.ahead_only, flags.behind_only) {
            (true, true) => return Err(ConfigError::ConflictingFilters),
            (true, false) => DriftFilter::AheadOnly,
            (false, true) => DriftFilter::BehindOnly,
            (false, false) => DriftFilter::Both,
        };

        let format = match (flags.short, flags.structured) {
            (true, true) => return Err(ConfigError::ConflictingFormats),
            (true, false) => OutputFormat::Short,
            (false, true) => OutputFormat::Structured,
            (false, false) => OutputFormat::Full,
        };

        Ok(Self {
            org,
            base,
            head,
            show_all: flags.show_all,
            filter,
            format,
        })
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn head(&self) -> &str {
        &self.head
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    pub fn filter(&self) -> DriftFilter {
        self.filter
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// Timing limits applied by the orchestrator
#[derive(Clone, Copy, Debug)]
pub struct RunLimits {
    /// Upper bound on a single repository's comparison
    pub task_timeout: Option<Duration>,
    /// Upper bound on the whole run, measured from its start
    pub deadline: Option<Duration>,
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            task_timeout: Some(Duration::from_secs(DEFAULT_TASK_TIMEOUT_SECS)),
            deadline: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflicting_filters_rejected() {
        let flags = DisplayFlags {
            ahead_only: true,
            behind_only: true,
            ..Default::default()
        };
        let err = RunConfig::new("org", "main", "dev", flags).unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingFilters));
    }

    #[test]
    fn test_conflicting_formats_rejected() {
        let flags = DisplayFlags {
            short: true,
            structured: true,
            ..Default::default()
        };
        let err = RunConfig::new("org", "main", "dev", flags).unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingFormats));
    }

    #[test]
    fn test_empty_branch_rejected() {
        let err = RunConfig::new("org", "  ", "dev", DisplayFlags::default()).unwrap_err();
        assert_eq!(err.to_string(), "base branch must not be empty");
    }

    #[test]
    fn test_flags_map_to_modes() {
        let flags = DisplayFlags {
            show_all: true,
            behind_only: true,
            short: true,
            ..Default::default()
        };
        let config = RunConfig::new("org", "main", "dev", flags).unwrap();
        assert!(config.show_all());
        assert_eq!(config.filter(), DriftFilter::BehindOnly);
        assert_eq!(config.format(), OutputFormat::Short);
        assert!(!config.filter().shows_ahead());
        assert!(config.filter().shows_behind());
    }

    #[test]
    fn test_concurrency_priority() {
        assert_eq!(get_compare_concurrency(Some(8), true), 1);
        assert_eq!(get_compare_concurrency(Some(0), false), 1);
        assert_eq!(get_compare_concurrency(Some(8), false), 8);
        assert_eq!(get_compare_concurrency(None, false), DEFAULT_CONCURRENT_CAP);
    }
}
