//! [`IssueTracker`] backed by the authenticated `gh` CLI.
//!
//! Failures are classified by gh's exit status: 4 means authentication is
//! required, anything else non-zero is passed through with gh's stderr.

use crate::config::Config;
use crate::error::{GhiError, Result};
use crate::paths;
use crate::process::{find_program, run_with_timeout, Captured};
use crate::tracker::{IssueData, IssueTracker, Repository};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// gh's documented exit status for "authentication required".
const EXIT_AUTH_REQUIRED: i32 = 4;

#[derive(Debug, Clone)]
pub struct GhCli {
    program: String,
    repo: Option<String>,
    cwd: PathBuf,
    timeout: Duration,
}

impl GhCli {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            repo: None,
            cwd: cwd.into(),
            timeout,
        }
    }

    pub fn from_config(root: &Path, config: &Config) -> Self {
        let gh = Self::new(config.gh.clone(), root, config.timeout());
        match &config.repo {
            Some(repo) => gh.with_repo(repo.clone()),
            None => gh,
        }
    }

    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    fn binary(&self) -> Result<PathBuf> {
        find_program(&self.program, &self.cwd).ok_or(GhiError::GhNotInstalled)
    }

    /// `gh issue <args...> [--repo R]`
    fn issue_args<I, S>(&self, args: I) -> Vec<OsString>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut argv: Vec<OsString> = vec!["issue".into()];
        argv.extend(args.into_iter().map(Into::into));
        if let Some(repo) = &self.repo {
            argv.push("--repo".into());
            argv.push(repo.into());
        }
        argv
    }

    fn run(&self, argv: Vec<OsString>) -> Result<Captured> {
        let mut cmd = Command::new(self.binary()?);
        cmd.args(&argv).current_dir(&self.cwd);
        let out = run_with_timeout(cmd, self.timeout)?;
        if !out.success() {
            return Err(classify_failure(&out));
        }
        Ok(out)
    }
}

impl IssueTracker for GhCli {
    fn fetch(&self, number: &str) -> Result<IssueData> {
        let out = self.run(self.issue_args(["view", number, "--json", "title,body"]))?;
        parse_issue(&out.stdout)
    }

    fn update(&self, number: &str, title: Option<&str>, body_file: &Path) -> Result<()> {
        let mut args: Vec<OsString> = vec!["edit".into(), number.into()];
        if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
            args.push("--title".into());
            args.push(title.into());
        }
        args.push("--body-file".into());
        args.push(body_file.into());
        self.run(self.issue_args(args))?;
        Ok(())
    }

    fn create(&self, title: &str) -> Result<String> {
        let out = self.run(self.issue_args(["create", "--title", title, "--body", ""]))?;
        parse_created_number(&out.stdout)
    }

    fn close(&self, number: &str) -> Result<()> {
        self.run(self.issue_args(["close", number]))?;
        Ok(())
    }

    fn reopen(&self, number: &str) -> Result<()> {
        self.run(self.issue_args(["reopen", number]))?;
        Ok(())
    }

    fn resolve_repository(&self) -> Result<Repository> {
        let mut argv: Vec<OsString> = vec!["repo".into(), "view".into()];
        if let Some(repo) = &self.repo {
            argv.push(repo.into());
        }
        argv.push("--json".into());
        argv.push("owner,name".into());
        let out = self.run(argv)?;
        parse_repository(&out.stdout)
    }
}

// ---------------------------------------------------------------------------
// Output parsing
// ---------------------------------------------------------------------------

fn classify_failure(out: &Captured) -> GhiError {
    if out.code == Some(EXIT_AUTH_REQUIRED) {
        return GhiError::AuthRequired;
    }
    let stderr = out.stderr_trimmed();
    if stderr.is_empty() {
        match out.code {
            Some(code) => GhiError::GhFailed(format!("exited with status {code}")),
            None => GhiError::GhFailed("terminated by signal".to_string()),
        }
    } else {
        GhiError::GhFailed(stderr.to_string())
    }
}

fn parse_issue(stdout: &[u8]) -> Result<IssueData> {
    serde_json::from_slice(stdout).map_err(|e| GhiError::UnexpectedOutput(e.to_string()))
}

/// `gh issue create` prints the new issue's URL; its last path segment is the number.
fn parse_created_number(stdout: &[u8]) -> Result<String> {
    let text = String::from_utf8_lossy(stdout);
    let url = text
        .lines()
        .map(str::trim)
        .rfind(|l| !l.is_empty())
        .ok_or_else(|| GhiError::UnexpectedOutput("gh issue create printed nothing".into()))?;
    let number = url.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
    paths::validate_issue_number(number).map_err(|_| {
        GhiError::UnexpectedOutput(format!("no issue number in '{url}'"))
    })?;
    Ok(number.to_string())
}

#[derive(Deserialize)]
struct RepoView {
    name: String,
    owner: RepoOwner,
}

#[derive(Deserialize)]
struct RepoOwner {
    login: String,
}

fn parse_repository(stdout: &[u8]) -> Result<Repository> {
    let view: RepoView =
        serde_json::from_slice(stdout).map_err(|e| GhiError::UnexpectedOutput(e.to_string()))?;
    Ok(Repository {
        owner: view.owner.login,
        name: view.name,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
