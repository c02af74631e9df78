use crate::output::print_json;
use ghi_core::tracker::IssueTracker;

pub fn run(tracker: &dyn IssueTracker, json: bool) -> anyhow::Result<()> {
    let repo = tracker.resolve_repository()?;
    if json {
        print_json(&repo)?;
    } else {
        println!("{repo}");
    }
    Ok(())
}
