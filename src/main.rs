//! repo-drift: report how far one branch has drifted from another across every
//! repository of a GitHub organization.

use anyhow::Result;
use clap::Parser;

use repo_drift::cli::Args;
use repo_drift::commands::handle_diff_command;
use repo_drift::utils::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    handle_diff_command(args).await
}
