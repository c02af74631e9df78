use super::Workspace;
use crate::output::print_json;
use anyhow::Context;
use ghi_core::{
    frontmatter::{self, Frontmatter},
    io, paths,
    tracker::IssueTracker,
};

pub fn run(ws: &Workspace, tracker: &dyn IssueTracker, number: &str, json: bool) -> anyhow::Result<()> {
    paths::validate_issue_number(number).context("usage: ghi pull <issue-number>")?;

    let issue = tracker.fetch(number)?;
    let content = frontmatter::encode(&Frontmatter::with_title(issue.title), issue.body.as_bytes())
        .context("failed to encode markdown")?;

    let path = ws.issue_path(number);
    io::atomic_write(&path, &content, io::FILE_MODE)
        .with_context(|| format!("failed to write {}", ws.display(&path)))?;
    tracing::debug!(number, path = %path.display(), "pulled issue");

    if json {
        print_json(&serde_json::json!({
            "number": number,
            "path": ws.display(&path),
        }))?;
    } else {
        println!("Saved to {}", ws.display(&path));
    }
    Ok(())
}
