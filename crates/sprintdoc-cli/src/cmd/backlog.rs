use super::open_session;
use crate::output::print_json;
use crate::prompts::DialoguerPrompter;
use anyhow::Context;
use sprintdoc_core::collect::collect_backlogs;
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
    let backlogs = collect_backlogs(client, &boards);

    if json {
        return print_json(&backlogs);
    }

    if backlogs.is_empty() {
        eprintln!("No backlog items found on any board.");
        return Ok(());
    }
    tracing::info!(
        boards = backlogs.len(),
        items = report::backlog_item_count(&backlogs),
        "backlog collected"
    );
    println!("{}", report::backlog_summary(&backlogs));
    Ok(())
}
