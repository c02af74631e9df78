use crate::error::{GhiError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = ".ghi.yaml";
pub const DEFAULT_ISSUES_DIR: &str = "issues";
pub const TMP_DIR: &str = "tmp";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn issues_dir(root: &Path, dir: &str) -> PathBuf {
    root.join(dir)
}

/// Returns `<root>/<dir>/<number>.md`.
pub fn issue_path(root: &Path, dir: &str, number: &str) -> PathBuf {
    issues_dir(root, dir).join(format!("{number}.md"))
}

/// Scratch directory for remote snapshots used by `diff`.
pub fn scratch_dir(root: &Path, dir: &str) -> PathBuf {
    issues_dir(root, dir).join(TMP_DIR)
}

// ---------------------------------------------------------------------------
// Issue number validation
// ---------------------------------------------------------------------------

static NUMBER_RE: OnceLock<Regex> = OnceLock::new();

fn number_re() -> &'static Regex {
    NUMBER_RE.get_or_init(|| Regex::new(r"^[0-9]+$").unwrap())
}

pub fn validate_issue_number(number: &str) -> Result<()> {
    if !number_re().is_match(number) {
        return Err(GhiError::InvalidIssueNumber(number.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
