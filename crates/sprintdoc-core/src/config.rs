//! Credential storage.
//!
//! Four settings are needed before any remote call: the Atlassian account
//! email, its API token, the site host, and the AI provider key. They live
//! in a single YAML file; when any is missing the user is walked through an
//! interactive setup and all four are written back together.

use crate::error::Result;
use crate::io;
use crate::paths;
use crate::prompt::{Notice, Prompter, Step, TextPrompt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const SITE_SUFFIX: &str = ".atlassian.net";
pub const MIN_TOKEN_LEN: usize = 10;
pub const AI_KEY_PREFIX: &str = "sk-";

// ---------------------------------------------------------------------------
// Config (on-disk shape)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub ai_key: String,
    /// Overrides `https://{site}` as the API root (proxies, self-hosted gateways).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Config {
    pub fn is_complete(&self) -> bool {
        [&self.email, &self.token, &self.site, &self.ai_key]
            .iter()
            .all(|v| !v.trim().is_empty())
    }

    /// Names of the settings that are still empty.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        if self.token.trim().is_empty() {
            missing.push("token");
        }
        if self.site.trim().is_empty() {
            missing.push("site");
        }
        if self.ai_key.trim().is_empty() {
            missing.push("ai_key");
        }
        missing
    }

    pub fn credentials(&self) -> Option<Credentials> {
        if !self.is_complete() {
            return None;
        }
        Some(Credentials {
            email: self.email.trim().to_string(),
            token: self.token.trim().to_string(),
            site: normalize_site(&self.site),
            ai_key: self.ai_key.trim().to_string(),
            base_url: self
                .base_url
                .as_deref()
                .map(|u| u.trim().trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty()),
        })
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub token: String,
    /// Host only, e.g. `acme.atlassian.net`.
    pub site: String,
    pub ai_key: String,
    pub base_url: Option<String>,
}

impl Credentials {
    /// Root URL for REST calls.
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.clone(),
            None => format!("https://{}", self.site),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("token", &mask(&self.token))
            .field("site", &self.site)
            .field("ai_key", &mask(&self.ai_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Hide all but the last four characters of a secret.
pub fn mask(secret: &str) -> String {
    let count = secret.chars().count();
    if count == 0 {
        return String::new();
    }
    if count <= 8 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{tail}", "*".repeat(count - 4))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Strip an `http(s)://` scheme and trailing slashes.
pub fn normalize_site(site: &str) -> String {
    let s = site.trim();
    let s = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"))
        .unwrap_or(s);
    s.trim_end_matches('/').to_string()
}

pub fn validate_email(value: &str) -> std::result::Result<(), String> {
    if value.trim().is_empty() || !value.contains('@') {
        return Err("Please enter a valid email address".to_string());
    }
    Ok(())
}

pub fn validate_site(value: &str) -> std::result::Result<(), String> {
    if !normalize_site(value).ends_with(SITE_SUFFIX) {
        return Err(format!(
            "Please enter your Atlassian site (ending with {SITE_SUFFIX})"
        ));
    }
    Ok(())
}

pub fn validate_token(value: &str) -> std::result::Result<(), String> {
    if value.trim().chars().count() < MIN_TOKEN_LEN {
        return Err("Please enter a valid API token".to_string());
    }
    Ok(())
}

pub fn validate_ai_key(value: &str) -> std::result::Result<(), String> {
    if !value.trim().starts_with(AI_KEY_PREFIX) {
        return Err(format!(
            "Please enter a valid OpenAI API key (starts with {AI_KEY_PREFIX})"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CredentialStore
// ---------------------------------------------------------------------------

/// The YAML file holding the four credentials.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store at `~/.sprintdoc/config.yaml`.
    pub fn at_default_location() -> Result<Self> {
        Ok(Self::new(paths::default_config_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file; a missing file is an empty config.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = std::fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(&data)?)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let data = serde_yaml::to_string(config)?;
        io::atomic_write_private(&self.path, data.as_bytes())
    }

    /// Stored credentials, prompting for all four when any is missing.
    pub fn get_credentials(&self, prompter: &mut dyn Prompter) -> Result<Step<Credentials>> {
        let current = self.load()?;
        if let Some(creds) = current.credentials() {
            return Ok(Step::Continue(creds));
        }
        tracing::info!(missing = ?current.missing(), "credentials incomplete, starting setup");
        self.prompt_and_save(&current, prompter)
    }

    /// Re-run the interactive setup regardless of what is stored.
    pub fn setup(&self, prompter: &mut dyn Prompter) -> Result<Step<Credentials>> {
        let current = self.load()?;
        self.prompt_and_save(&current, prompter)
    }

    fn prompt_and_save(
        &self,
        current: &Config,
        prompter: &mut dyn Prompter,
    ) -> Result<Step<Credentials>> {
        prompter.notify(
            Notice::Info,
            "First time setup: please configure your Atlassian and OpenAI credentials.",
        );

        let Some(email) = prompter.text(
            TextPrompt::new("Enter your Atlassian email address")
                .initial(&current.email)
                .validate(validate_email),
        )?
        else {
            return Ok(Step::Cancelled);
        };

        let Some(site) = prompter.text(
            TextPrompt::new("Enter your Atlassian site (e.g., yourcompany.atlassian.net)")
                .initial(&current.site)
                .validate(validate_site),
        )?
        else {
            return Ok(Step::Cancelled);
        };

        let Some(token) = prompter.text(
            TextPrompt::new(
                "Enter your Atlassian API token (create at: https://id.atlassian.com/manage-profile/security/api-tokens)",
            )
            .initial(&current.token)
            .secret()
            .validate(validate_token),
        )?
        else {
            return Ok(Step::Cancelled);
        };

        let Some(ai_key) = prompter.text(
            TextPrompt::new("Enter your OpenAI API key (get from: https://platform.openai.com/api-keys)")
                .initial(&current.ai_key)
                .secret()
                .validate(validate_ai_key),
        )?
        else {
            return Ok(Step::Cancelled);
        };

        let updated = Config {
            email: email.trim().to_string(),
            token: token.trim().to_string(),
            site: normalize_site(&site),
            ai_key: ai_key.trim().to_string(),
            base_url: current.base_url.clone(),
        };
        self.save(&updated)?;
        tracing::info!(path = %self.path.display(), "credentials saved");
        prompter.notify(
            Notice::Info,
            "Configuration saved! You can now use sprintdoc.",
        );

        Ok(updated.credentials().into())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
