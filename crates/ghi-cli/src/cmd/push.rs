use super::Workspace;
use crate::output::print_json;
use anyhow::Context;
use ghi_core::{frontmatter, paths, tracker::IssueTracker, GhiError};
use std::io::Write;

pub fn run(ws: &Workspace, tracker: &dyn IssueTracker, number: &str, json: bool) -> anyhow::Result<()> {
    paths::validate_issue_number(number).context("usage: ghi push <issue-number>")?;

    let path = ws.issue_path(number);
    let raw = match std::fs::read(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(GhiError::IssueFileNotFound {
                path: ws.display(&path).into(),
                number: number.to_string(),
            }
            .into());
        }
        Err(e) => {
            return Err(anyhow::Error::new(GhiError::Io(e))
                .context(format!("failed to read {}", ws.display(&path))));
        }
    };

    let (meta, body) = frontmatter::decode(&raw)
        .with_context(|| format!("invalid frontmatter in {}", ws.display(&path)))?;

    // gh reads the body from a file so arbitrary bytes survive the trip.
    let mut body_file = tempfile::Builder::new()
        .prefix("ghi-body-")
        .suffix(".txt")
        .tempfile()
        .context("failed to create temp file")?;
    body_file
        .write_all(&body)
        .and_then(|_| body_file.flush())
        .context("failed to write temp file")?;

    let title = Some(meta.title.as_str()).filter(|t| !t.trim().is_empty());
    tracker.update(number, title, body_file.path())?;
    tracing::debug!(number, path = %path.display(), "pushed issue");

    if json {
        print_json(&serde_json::json!({
            "number": number,
            "path": ws.display(&path),
            "title": title,
        }))?;
    } else {
        println!("Updated issue #{number} from {}", ws.display(&path));
    }
    Ok(())
}
