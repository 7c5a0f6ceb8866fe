use super::open_session;
use crate::output::print_json;
use crate::prompts::DialoguerPrompter;
use anyhow::Context;
use chrono::Utc;
use sprintdoc_core::config::CredentialStore;
use sprintdoc_core::paths;
use sprintdoc_core::workflow::{DocsWorkflow, Outcome, WorkflowOptions};
use std::path::PathBuf;

pub fn run(
    store: &CredentialStore,
    workspace: Option<PathBuf>,
    test_output: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let workspace = match workspace {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let test_output_dir = test_output.unwrap_or_else(|| paths::test_output_dir(&workspace));

    let mut prompter = DialoguerPrompter::new();
    let Some(session) = open_session(store, &mut prompter)? else {
        return Ok(());
    };

    let options = WorkflowOptions {
        workspace,
        test_output_dir,
        generated_at: Utc::now(),
    };
    let outcome = DocsWorkflow::new(session.client(), &mut prompter, options)
        .run()
        .context("sprint documentation failed")?;

    let published = match outcome {
        Outcome::Published(published) => published,
        Outcome::Stopped(reason) => {
            if json {
                return print_json(&serde_json::json!({
                    "published": false,
                    "reason": reason.message(),
                }));
            }
            return Ok(());
        }
    };

    if json {
        #[derive(serde::Serialize)]
        struct PublishedOutput<'a> {
            published: bool,
            page_id: &'a str,
            page_url: &'a str,
            space_key: &'a str,
            title: &'a str,
            issue_count: usize,
            planning_count: usize,
            saved: Vec<String>,
        }

        return print_json(&PublishedOutput {
            published: true,
            page_id: &published.page_id,
            page_url: &published.page_url,
            space_key: &published.space_key,
            title: published.document.title(),
            issue_count: published.issue_count,
            planning_count: published.planning_count,
            saved: published
                .saved
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
        });
    }

    println!("Published: {}", published.document.title());
    println!("  space:    {}", published.space_key);
    println!("  issues:   {}", published.issue_count);
    println!("  planning: {}", published.planning_count);
    println!("  url:      {}", published.page_url);
    for path in &published.saved {
        println!("  saved:    {}", path.display());
    }
    Ok(())
}
