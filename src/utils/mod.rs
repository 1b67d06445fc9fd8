pub(crate) mod fs;
pub(crate) mod terminal;

// Public API - utilities used by commands
pub use fs::{expand_home, read_token_file};
pub use terminal::{create_progress_bar, init_logging};
