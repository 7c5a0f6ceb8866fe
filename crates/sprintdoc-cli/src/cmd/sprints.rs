use super::open_session;
use crate::output::print_json;
use crate::prompts::DialoguerPrompter;
use anyhow::Context;
use sprintdoc_core::collect::collect_active_sprints;
use sprintdoc_core::config::CredentialStore;
use sprintdoc_core::report;

pub fn run(store: &CredentialStore, json: bool) -> anyhow::Result<()> {
    let mut prompter = DialoguerPrompter::new();
    let Some(session) = open_session(store, &mut prompter)? else {
        return Ok(());
    };
    let client = session.client();

    let boards = client
        .get_all_boards()
        .context("failed to list Jira boards")?;
    let sprints = collect_active_sprints(client, &boards);
    let reports = report::sprint_reports(client, sprints);

    if json {
        return print_json(&reports);
    }

    if boards.is_empty() {
        eprintln!("No Jira boards found.");
        return Ok(());
    }
    if reports.is_empty() {
        eprintln!("No active sprints found on any board.");
        return Ok(());
    }
    println!("{}", report::sprint_summary(&reports));
    Ok(())
}
