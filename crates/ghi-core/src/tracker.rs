//! The remote side of a sync: anything that can view, edit, create, and
//! close issues. [`crate::gh::GhCli`] is the production implementation.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Title and body of a remote issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueData {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// The repository commands run against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

pub trait IssueTracker {
    fn fetch(&self, number: &str) -> Result<IssueData>;

    /// Replace the issue body with the contents of `body_file`. The title is
    /// only changed when `title` is non-blank.
    fn update(&self, number: &str, title: Option<&str>, body_file: &Path) -> Result<()>;

    /// Create an issue with an empty body and return its number.
    fn create(&self, title: &str) -> Result<String>;

    fn close(&self, number: &str) -> Result<()>;

    fn reopen(&self, number: &str) -> Result<()>;

    fn resolve_repository(&self) -> Result<Repository>;
}
