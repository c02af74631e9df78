use super::Workspace;
use anyhow::Context;
use ghi_core::{
    diff::{self, DiffOutcome},
    frontmatter::{self, Frontmatter},
    paths,
    tracker::IssueTracker,
    GhiError,
};
use std::io::Write;

/// Print a diff of the remote issue (old side) against the local file (new side).
///
/// Returns the outcome so the caller can exit with 1 when the two differ.
pub fn run(
    ws: &Workspace,
    tracker: &dyn IssueTracker,
    number: &str,
    extra_args: &[String],
) -> anyhow::Result<DiffOutcome> {
    paths::validate_issue_number(number)
        .context("usage: ghi diff <issue-number> [-- EXTRA_GIT_DIFF_ARGS...]")?;

    let local = ws.issue_path(number);
    if !local.is_file() {
        return Err(GhiError::IssueFileNotFound {
            path: ws.display(&local).into(),
            number: number.to_string(),
        }
        .into());
    }

    let issue = tracker.fetch(number)?;
    let content = frontmatter::encode(&Frontmatter::with_title(issue.title), issue.body.as_bytes())
        .context("failed to encode remote markdown")?;

    let scratch = ws.scratch_dir();
    let snapshot = diff::write_snapshot(&scratch, number, &content)
        .context("failed to write remote snapshot")?;

    let report = diff::run_diff(
        &ws.config.git,
        &ws.root,
        snapshot.path(),
        &local,
        extra_args,
        ws.config.timeout(),
    );
    drop(snapshot);
    // Only succeeds once the scratch dir is empty.
    let _ = std::fs::remove_dir(&scratch);
    let report = report?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(&report.output)
        .context("failed to write diff output")?;

    if report.outcome == DiffOutcome::Identical {
        writeln!(
            stdout,
            "No differences: {} matches remote.",
            ws.display(&local)
        )?;
    }
    Ok(report.outcome)
}
