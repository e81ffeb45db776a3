//! Pattern extraction over raw HTML directory listings.
//!
//! Listings are not parsed as HTML. The server renders each entry as an
//! anchor with a fixed shape, so matching the tail of the anchor is enough.

use regex::Regex;
use std::sync::LazyLock;

static WORKFLOW_DIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[0-9]+\.[0-9]+_[^/]+/">"#).expect("valid workflow regex"));

static DQM_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"DQM.*\.root">"#).expect("valid DQM file regex"));

/// Workflow directory names in document order. Duplicates are kept.
pub fn workflow_dirs(html: &str) -> Vec<String> {
    WORKFLOW_DIR_RE
        .find_iter(html)
        .map(|m| m.as_str().trim_end_matches("/\">").to_string())
        .collect()
}

/// First `DQM*.root` file in a workflow listing, if any
pub fn dqm_file(html: &str) -> Option<String> {
    DQM_FILE_RE
        .find(html)
        .map(|m| m.as_str().trim_end_matches("\">").to_string())
}
