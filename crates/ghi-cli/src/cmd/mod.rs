pub mod create;
pub mod diff;
pub mod pull;
pub mod push;
pub mod repo;
pub mod state;

use anyhow::Context;
use ghi_core::{config::Config, paths};
use std::path::{Path, PathBuf};

/// Resolved root plus its configuration, shared by every command.
pub struct Workspace {
    pub root: PathBuf,
    pub config: Config,
}

impl Workspace {
    pub fn load(root: PathBuf) -> anyhow::Result<Self> {
        let config = Config::load(&root)
            .with_context(|| format!("failed to load {}", paths::CONFIG_FILE))?;
        Ok(Self { root, config })
    }

    pub fn issue_path(&self, number: &str) -> PathBuf {
        paths::issue_path(&self.root, &self.config.issues_dir, number)
    }

    pub fn scratch_dir(&self) -> PathBuf {
        paths::scratch_dir(&self.root, &self.config.issues_dir)
    }

    /// `path` relative to the root when it lives underneath it.
    pub fn display(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
