use crate::error::{GhiError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Project settings from `.ghi.yaml`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory, relative to the root, holding `<n>.md` files.
    #[serde(default = "default_issues_dir")]
    pub issues_dir: String,
    /// Program name or path of the GitHub CLI; relative paths are taken from the root.
    #[serde(default = "default_gh")]
    pub gh: String,
    /// Program name or root-relative path of git, used by `diff`.
    #[serde(default = "default_git")]
    pub git: String,
    /// Ceiling for any single external command.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Target repository as `owner/name`; gh infers it from the checkout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
}

fn default_issues_dir() -> String {
    paths::DEFAULT_ISSUES_DIR.to_string()
}

fn default_gh() -> String {
    "gh".to_string()
}

fn default_git() -> String {
    "git".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            issues_dir: default_issues_dir(),
            gh: default_gh(),
            git: default_git(),
            timeout_seconds: default_timeout(),
            repo: None,
        }
    }
}

impl Config {
    /// Load `<root>/.ghi.yaml`, falling back to defaults when it is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = if data.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(&data)?
        };
        cfg.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.issues_dir.trim().is_empty() {
            return Err(GhiError::InvalidConfig("issues_dir must not be empty".into()));
        }
        if self.timeout_seconds == 0 {
            return Err(GhiError::InvalidConfig(
                "timeout_seconds must be greater than zero".into(),
            ));
        }
        for (key, value) in [("gh", &self.gh), ("git", &self.git)] {
            if value.trim().is_empty() {
                return Err(GhiError::InvalidConfig(format!("{key} must not be empty")));
            }
        }
        if let Some(repo) = &self.repo {
            let valid = matches!(
                repo.split_once('/'),
                Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/')
            );
            if !valid {
                return Err(GhiError::InvalidConfig(format!(
                    "repo '{repo}' must be in the form <owner>/<name>"
                )));
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
