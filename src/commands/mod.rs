//! Command implementations

pub mod diff;

pub use diff::handle_diff_command;
