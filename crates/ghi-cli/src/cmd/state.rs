use super::Workspace;
use crate::output::print_json;
use anyhow::Context;
use ghi_core::{paths, tracker::IssueTracker};

pub fn close(ws: &Workspace, tracker: &dyn IssueTracker, number: &str, json: bool) -> anyhow::Result<()> {
    paths::validate_issue_number(number).context("usage: ghi close <issue-number>")?;
    tracker.close(number)?;
    report(ws, number, "closed", json)
}

pub fn reopen(ws: &Workspace, tracker: &dyn IssueTracker, number: &str, json: bool) -> anyhow::Result<()> {
    paths::validate_issue_number(number).context("usage: ghi reopen <issue-number>")?;
    tracker.reopen(number)?;
    report(ws, number, "open", json)
}

fn report(ws: &Workspace, number: &str, state: &str, json: bool) -> anyhow::Result<()> {
    tracing::debug!(number, state, root = %ws.root.display(), "changed issue state");
    if json {
        print_json(&serde_json::json!({
            "number": number,
            "state": state,
        }))?;
    } else if state == "closed" {
        println!("Closed issue #{number}");
    } else {
        println!("Reopened issue #{number}");
    }
    Ok(())
}
