use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use sprintdoc_core::config::{mask, normalize_site, CredentialStore};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the stored settings with secrets masked
    Show,

    /// Print the config file location
    Path,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(store: &CredentialStore, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(store, json),
        ConfigSubcommand::Path => path(store, json),
    }
}

const NOT_SET: &str = "(not set)";

fn or_not_set(value: String) -> String {
    if value.trim().is_empty() {
        NOT_SET.to_string()
    } else {
        value
    }
}

fn show(store: &CredentialStore, json: bool) -> anyhow::Result<()> {
    let config = store
        .load()
        .with_context(|| format!("failed to read {}", store.path().display()))?;

    if json {
        #[derive(serde::Serialize)]
        struct ConfigOutput {
            path: String,
            email: String,
            site: String,
            token: String,
            ai_key: String,
            base_url: Option<String>,
            complete: bool,
            missing: Vec<&'static str>,
        }

        return print_json(&ConfigOutput {
            path: store.path().display().to_string(),
            email: config.email.clone(),
            site: normalize_site(&config.site),
            token: mask(&config.token),
            ai_key: mask(&config.ai_key),
            base_url: config.base_url.clone(),
            complete: config.is_complete(),
            missing: config.missing(),
        });
    }

    let rows = vec![
        vec!["path".to_string(), store.path().display().to_string()],
        vec!["email".to_string(), or_not_set(config.email.clone())],
        vec!["site".to_string(), or_not_set(normalize_site(&config.site))],
        vec!["token".to_string(), or_not_set(mask(&config.token))],
        vec!["ai_key".to_string(), or_not_set(mask(&config.ai_key))],
        vec![
            "base_url".to_string(),
            or_not_set(config.base_url.clone().unwrap_or_default()),
        ],
    ];
    print_table(&["SETTING", "VALUE"], rows);

    let missing = config.missing();
    if !missing.is_empty() {
        println!(
            "\nIncomplete: {} missing. Run 'sprintdoc setup'.",
            missing.join(", ")
        );
    }
    Ok(())
}

fn path(store: &CredentialStore, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(&serde_json::json!({
            "path": store.path().display().to_string(),
            "exists": store.path().exists(),
        }))
    } else {
        println!("{}", store.path().display());
        Ok(())
    }
}
