//! Command line arguments

use clap::Parser;

use crate::core::{DisplayFlags, DEFAULT_API_URL, DEFAULT_TOKEN_FILE};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "repo-drift",
    version,
    about = "Compare two branches across every repository of a GitHub organization",
    long_about = None
)]
pub struct Args {
    /// Organization that owns the repositories
    pub org: String,

    /// Branch to compare against
    pub base: String,

    /// Branch whose drift from base is reported
    pub head: String,

    /// GitHub personal access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// File containing a GitHub personal access token
    #[arg(long, default_value = DEFAULT_TOKEN_FILE)]
    pub token_file: String,

    /// Show all repositories, including up to date branches and failed comparisons
    #[arg(short = 'a', long = "all")]
    pub show_all: bool,

    /// Show only the ahead count, hiding repositories that are not ahead
    #[arg(long = "ahead", conflicts_with = "behind_only")]
    pub ahead_only: bool,

    /// Show only the behind count, hiding repositories that are not behind
    #[arg(long = "behind")]
    pub behind_only: bool,

    /// One line per repository
    #[arg(short, long, conflicts_with = "json")]
    pub short: bool,

    /// Print a single JSON array once every repository is compared
    #[arg(long)]
    pub json: bool,

    /// Maximum number of concurrent comparisons [default: 64]
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Compare one repository at a time
    #[arg(long)]
    pub sequential: bool,

    /// Per-repository timeout in seconds (0 disables it)
    #[arg(long, default_value_t = crate::core::DEFAULT_TASK_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Overall time limit for the run in seconds
    #[arg(long)]
    pub deadline: Option<u64>,

    /// GitHub API root, for GitHub Enterprise
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Increase log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn display_flags(&self) -> DisplayFlags {
        DisplayFlags {
            show_all: self.show_all,
            ahead_only: self.ahead_only,
            behind_only: self.behind_only,
            short: self.short,
            structured: self.json,
        }
    }
}
