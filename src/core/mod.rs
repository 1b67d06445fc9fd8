// Internal modules - not part of public API
pub(crate) mod config;
pub(crate) mod diff;
pub(crate) mod error;
pub(crate) mod orchestrator;
pub(crate) mod render;

// Public API - curated exports only
pub mod api;

// Re-export key items at module level for convenience
pub use api::*;
