//! Comparing a local issue file with a snapshot of the remote issue via
//! `git diff --no-index`.

use crate::error::{GhiError, Result};
use crate::process::{find_program, run_with_timeout};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::time::Duration;
use tempfile::{Builder, NamedTempFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOutcome {
    Identical,
    Different,
}

#[derive(Debug, Clone)]
pub struct DiffReport {
    pub outcome: DiffOutcome,
    /// Unified diff as printed by git; empty when identical.
    pub output: Vec<u8>,
}

/// Write the encoded remote issue to `remote-<number>-*.md` inside `dir`.
/// The file is removed when the returned handle is dropped.
pub fn write_snapshot(dir: &Path, number: &str, content: &[u8]) -> Result<NamedTempFile> {
    std::fs::create_dir_all(dir)?;
    let mut tmp = Builder::new()
        .prefix(&format!("remote-{number}-"))
        .suffix(".md")
        .tempfile_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    Ok(tmp)
}

/// Run `git diff --no-index [extra_args...] -- <remote> <local>`.
///
/// A relative `git` path is looked up under `root`.
///
/// Exit status 0 means identical, 1 means differences; anything else is a
/// [`GhiError::DiffFailed`].
pub fn run_diff(
    git: &str,
    root: &Path,
    remote: &Path,
    local: &Path,
    extra_args: &[String],
    timeout: Duration,
) -> Result<DiffReport> {
    let git = find_program(git, root).ok_or(GhiError::GitNotInstalled)?;
    let mut cmd = Command::new(git);
    cmd.args(["diff", "--no-index"])
        .args(extra_args)
        .arg("--")
        .arg(remote)
        .arg(local);

    let out = run_with_timeout(cmd, timeout)?;
    let outcome = match out.code {
        Some(0) => DiffOutcome::Identical,
        Some(1) => DiffOutcome::Different,
        other => {
            if !out.stderr_trimmed().is_empty() {
                tracing::warn!(stderr = %out.stderr_trimmed(), "git diff failed");
            }
            return Err(GhiError::DiffFailed(other.unwrap_or(-1)));
        }
    };
    Ok(DiffReport {
        outcome,
        output: out.stdout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn git_available() -> bool {
        which::which("git").is_ok()
    }

    #[test]
    fn snapshot_is_removed_on_drop() {
        let dir = TempDir::new().unwrap();
        let scratch = dir.path().join("issues/tmp");
        let snap = write_snapshot(&scratch, "9", b"---\ntitle: x\n---\n").unwrap();
        let path = snap.path().to_path_buf();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("remote-9-") && name.ends_with(".md"), "{name}");
        assert_eq!(std::fs::read(&path).unwrap(), b"---\ntitle: x\n---\n");
        drop(snap);
        assert!(!path.exists());
    }

    #[test]
    fn identical_files() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.md");
        let b = dir.path().join("b.md");
        std::fs::write(&a, "same\n").unwrap();
        std::fs::write(&b, "same\n").unwrap();
        let report = run_diff("git", dir.path(), &a, &b, &[], Duration::from_secs(30)).unwrap();
        assert_eq!(report.outcome, DiffOutcome::Identical);
        assert!(report.output.is_empty());
    }

    #[test]
    fn different_files() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.md");
        let b = dir.path().join("b.md");
        std::fs::write(&a, "remote line\n").unwrap();
        std::fs::write(&b, "local line\n").unwrap();
        let report = run_diff(
            "git",
            dir.path(),
            &a,
            &b,
            &["--no-color".to_string()],
            Duration::from_secs(30),
        )
        .unwrap();
        assert_eq!(report.outcome, DiffOutcome::Different);
        let text = String::from_utf8_lossy(&report.output);
        assert!(text.contains("-remote line"), "{text}");
        assert!(text.contains("+local line"), "{text}");
    }

    #[test]
    fn bad_option_is_failure() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.md");
        std::fs::write(&a, "x\n").unwrap();
        let err = run_diff(
            "git",
            dir.path(),
            &a,
            &a,
            &["--definitely-not-an-option".to_string()],
            Duration::from_secs(30),
        )
        .unwrap_err();
        assert!(matches!(err, GhiError::DiffFailed(_)), "got {err:?}");
    }

    #[cfg(unix)]
    #[test]
    fn relative_git_resolves_under_root() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let tools = dir.path().join("tools");
        std::fs::create_dir(&tools).unwrap();
        let fake = tools.join("git");
        std::fs::write(&fake, "#!/bin/sh\necho \"$@\"\nexit 1\n").unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let report = run_diff(
            "./tools/git",
            dir.path(),
            Path::new("remote.md"),
            Path::new("local.md"),
            &[],
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(report.outcome, DiffOutcome::Different);
        assert_eq!(
            String::from_utf8_lossy(&report.output),
            "diff --no-index -- remote.md local.md\n"
        );
    }

    #[test]
    fn missing_git_is_reported() {
        let err = run_diff(
            "ghi-no-such-git",
            Path::new("."),
            Path::new("a"),
            Path::new("b"),
            &[],
            Duration::from_secs(1),
        )
        .unwrap_err();
        assert!(matches!(err, GhiError::GitNotInstalled));
    }
}
