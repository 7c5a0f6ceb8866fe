use crate::prompts::DialoguerPrompter;
use anyhow::Context;
use sprintdoc_core::config::CredentialStore;
use sprintdoc_core::prompt::Step;

pub fn run(store: &CredentialStore) -> anyhow::Result<()> {
    let mut prompter = DialoguerPrompter::new();
    match store.setup(&mut prompter).context("setup failed")? {
        Step::Continue(creds) => {
            println!("Saved credentials for {} to {}", creds.site, store.path().display());
        }
        Step::Cancelled => println!("Setup cancelled; nothing was saved."),
    }
    Ok(())
}
