pub mod backlog;
pub mod code;
pub mod config;
pub mod docs;
pub mod open;
pub mod setup;
pub mod sprint_issues;
pub mod sprints;

use crate::prompts::DialoguerPrompter;
use anyhow::Context;
use sprintdoc_core::config::CredentialStore;
use sprintdoc_core::prompt::{Notice, Prompter, Step};
use sprintdoc_core::session::Session;
use std::path::Path;

pub fn credential_store(path: Option<&Path>) -> anyhow::Result<CredentialStore> {
    match path {
        Some(p) => Ok(CredentialStore::new(p)),
        None => CredentialStore::at_default_location().context("cannot locate config file"),
    }
}

/// Session for a command, prompting for credentials when incomplete.
/// `None` when the user abandoned setup.
pub fn open_session(
    store: &CredentialStore,
    prompter: &mut DialoguerPrompter,
) -> anyhow::Result<Option<Session>> {
    match Session::open(store, prompter).context("failed to load credentials")? {
        Step::Continue(session) => Ok(Some(session)),
        Step::Cancelled => {
            prompter.notify(
                Notice::Info,
                "Configuration cancelled. Run 'sprintdoc setup' when ready.",
            );
            Ok(None)
        }
    }
}
