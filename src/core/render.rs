//! Text and JSON rendering of report entries
//!
//! Rendering is pure: every function returns the text to print and leaves the
//! writing to the caller.

use anyhow::Result;

use super::config::{DriftFilter, OutputFormat, RunConfig, NAME_COLUMN_WIDTH};
use super::diff::{BranchDiff, ReportEntry};

/// Formats one output row: the name padded to the name column, two separating
/// spaces, then the message. Names at or past the column are printed whole with
/// no padding.
pub fn format_row(name: &str, message: &str) -> String {
    format!("{name:<width$}  {message}\n", width = NAME_COLUMN_WIDTH)
}

fn counts(diff: &BranchDiff, filter: DriftFilter) -> Vec<String> {
    let mut parts = Vec::with_capacity(3);
    if filter.shows_ahead() {
        parts.push(format!("ahead by {}", diff.ahead));
    }
    if filter.shows_behind() {
        parts.push(format!("behind by {}", diff.behind));
    }
    parts
}

/// Three rows: counts, `base -> head` hashes, comparison URL
pub fn render_full(diff: &BranchDiff, filter: DriftFilter) -> String {
    let mut out = format_row(&diff.name, &counts(diff, filter).join(", "));
    out.push_str(&format_row("", &format!("  {} -> {}", diff.base_hash, diff.head_hash)));
    out.push_str(&format_row("", &format!("  {}", diff.url)));
    out
}

/// One row: counts followed by the comparison URL
pub fn render_short(diff: &BranchDiff, filter: DriftFilter) -> String {
    let mut parts = counts(diff, filter);
    parts.push(diff.url.clone());
    format_row(&diff.name, &parts.join(", "))
}

pub fn render_error(repo: &str, message: &str) -> String {
    format_row(repo, message)
}

/// Renders one entry in the text format selected by `config`
///
/// Structured output is a whole-run document; in that mode an entry renders
/// as its short form.
pub fn render_entry(entry: &ReportEntry, config: &RunConfig) -> String {
    match entry {
        ReportEntry::Error { repo, message } => render_error(repo, message),
        ReportEntry::Diff(diff) => match config.format() {
            OutputFormat::Full => render_full(diff, config.filter()),
            OutputFormat::Short | OutputFormat::Structured => render_short(diff, config.filter()),
        },
    }
}

/// Renders the kept diffs of a run as a single JSON array. Error entries are
/// not part of the structured document.
pub fn render_structured(entries: &[ReportEntry]) -> Result<String> {
    let diffs: Vec<&BranchDiff> = entries
        .iter()
        .filter_map(|entry| match entry {
            ReportEntry::Diff(diff) => Some(diff),
            ReportEntry::Error { .. } => None,
        })
        .collect();

    let mut json = serde_json::to_string_pretty(&diffs)?;
    json.push('\n');
    Ok(json)
}

/// Renders a full run in the format selected by `config`
pub fn render_report(entries: &[ReportEntry], config: &RunConfig) -> Result<String> {
    if config.format() == OutputFormat::Structured {
        return render_structured(entries);
    }
    Ok(entries.iter().map(|entry| render_entry(entry, config)).collect())
}
