use super::open_session;
use crate::prompts::DialoguerPrompter;
use anyhow::Context;
use sprintdoc_core::config::CredentialStore;
use sprintdoc_core::prompt::Prompter;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OpenTarget {
    /// Jira "Your work"
    Jira,
    /// Confluence space directory
    Wiki,
}

impl OpenTarget {
    pub fn url(self, site: &str) -> String {
        match self {
            OpenTarget::Jira => format!("https://{site}/jira/your-work"),
            OpenTarget::Wiki => format!("https://{site}/wiki/spaces"),
        }
    }
}

pub fn run(store: &CredentialStore, target: OpenTarget) -> anyhow::Result<()> {
    let mut prompter = DialoguerPrompter::new();
    let Some(session) = open_session(store, &mut prompter)? else {
        return Ok(());
    };

    let url = target.url(session.site());
    println!("{url}");
    prompter
        .open(&url)
        .with_context(|| format!("failed to open {url}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_use_site_host() {
        assert_eq!(
            OpenTarget::Jira.url("acme.atlassian.net"),
            "https://acme.atlassian.net/jira/your-work"
        );
        assert_eq!(
            OpenTarget::Wiki.url("acme.atlassian.net"),
            "https://acme.atlassian.net/wiki/spaces"
        );
    }
}
