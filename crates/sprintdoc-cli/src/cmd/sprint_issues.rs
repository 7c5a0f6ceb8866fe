use super::open_session;
use crate::output::{print_json, print_table};
use crate::prompts::DialoguerPrompter;
use anyhow::Context;
use sprintdoc_core::config::CredentialStore;
use sprintdoc_core::types::format_points;

pub fn run(store: &CredentialStore, sprint_id: u64, json: bool) -> anyhow::Result<()> {
    let mut prompter = DialoguerPrompter::new();
    let Some(session) = open_session(store, &mut prompter)? else {
        return Ok(());
    };

    let issues = session
        .client()
        .get_sprint_issues(sprint_id)
        .with_context(|| format!("failed to fetch issues for sprint {sprint_id}"))?;

    if json {
        return print_json(&issues);
    }

    if issues.is_empty() {
        println!("No issues in sprint {sprint_id}.");
        return Ok(());
    }

    let rows = issues
        .iter()
        .map(|issue| {
            vec![
                issue.key.clone(),
                issue.summary().to_string(),
                issue.status_name().to_string(),
                issue.type_name().to_string(),
                issue.assignee_name().unwrap_or("-").to_string(),
                issue
                    .story_points()
                    .map(format_points)
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    print_table(&["KEY", "SUMMARY", "STATUS", "TYPE", "ASSIGNEE", "POINTS"], rows);
    Ok(())
}
