use super::Workspace;
use crate::output::print_json;
use anyhow::Context;
use ghi_core::{
    frontmatter::{self, Frontmatter},
    io,
    tracker::IssueTracker,
    GhiError,
};

/// Create a remote issue and seed its local file so it can be edited and pushed.
pub fn run(ws: &Workspace, tracker: &dyn IssueTracker, title: &str, json: bool) -> anyhow::Result<()> {
    if title.trim().is_empty() {
        return Err(anyhow::Error::new(GhiError::EmptyTitle).context("usage: ghi create <title>"));
    }

    let number = tracker.create(title)?;

    let content = frontmatter::encode(&Frontmatter::with_title(title), b"")
        .context("failed to encode markdown")?;
    let path = ws.issue_path(&number);
    io::atomic_write(&path, &content, io::FILE_MODE)
        .with_context(|| format!("created issue #{number} but failed to write {}", ws.display(&path)))?;

    if json {
        print_json(&serde_json::json!({
            "number": number,
            "path": ws.display(&path),
        }))?;
    } else {
        println!("Created issue #{number}, saved to {}", ws.display(&path));
    }
    Ok(())
}
