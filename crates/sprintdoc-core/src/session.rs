use crate::client::AtlassianClient;
use crate::config::{CredentialStore, Credentials};
use crate::error::Result;
use crate::prompt::{Prompter, Step};

/// Everything a command needs to talk to Jira and Confluence.
///
/// Built once per command invocation from resolved credentials and handed
/// to the command handler; nothing outlives the invocation.
pub struct Session {
    credentials: Credentials,
    client: AtlassianClient,
}

impl Session {
    pub fn new(credentials: Credentials) -> Result<Self> {
        let client = AtlassianClient::new(&credentials)?;
        Ok(Self {
            credentials,
            client,
        })
    }

    /// Resolve credentials from `store` (prompting when incomplete) and open a
    /// session. `Cancelled` when the user abandons setup.
    pub fn open(store: &CredentialStore, prompter: &mut dyn Prompter) -> Result<Step<Self>> {
        match store.get_credentials(prompter)? {
            Step::Continue(credentials) => Ok(Step::Continue(Self::new(credentials)?)),
            Step::Cancelled => Ok(Step::Cancelled),
        }
    }

    pub fn client(&self) -> &AtlassianClient {
        &self.client
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn site(&self) -> &str {
        &self.credentials.site
    }
}
