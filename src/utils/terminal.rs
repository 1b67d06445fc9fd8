//! Terminal utilities: progress display and log initialization

use anyhow::Result;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing_subscriber::EnvFilter;

use crate::core::{COMPARING_MESSAGE, PROGRESS_TEMPLATE};

/// Creates the stderr progress bar shown while comparisons run
///
/// The bar draws nothing when stderr is not a terminal, so piped output stays clean.
pub fn create_progress_bar(org: &str) -> Result<ProgressBar> {
    let style = ProgressStyle::default_spinner().template(PROGRESS_TEMPLATE)?;
    let pb = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
    pb.set_style(style);
    pb.set_prefix(org.to_string());
    pb.set_message(COMPARING_MESSAGE);
    Ok(pb)
}

/// Installs the global tracing subscriber writing to stderr
///
/// `RUST_LOG` wins when set; otherwise the level follows the `-v` count.
pub fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("repo_drift={default_level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
