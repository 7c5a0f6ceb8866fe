mod cmd;
mod output;
mod prompts;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, open::OpenTarget};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sprintdoc",
    about = "Sprint documentation and code scaffolds from Jira and Confluence",
    version,
    propagate_version = true
)]
struct Cli {
    /// Credentials file (default: ~/.sprintdoc/config.yaml)
    #[arg(long = "config", global = true, env = "SPRINTDOC_CONFIG", value_name = "FILE")]
    config_file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Log progress to stderr
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enter or replace the stored Atlassian and AI credentials
    Setup,

    /// Inspect the stored configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Scaffold code for a Jira issue using the project's coding standards
    Code {
        /// Issue key, e.g. PROJ-1
        issue_key: String,

        /// Print the assembled AI prompt instead of the scaffold
        #[arg(long)]
        prompt: bool,
    },

    /// Summarise the active sprints across all boards
    Sprints,

    /// List the issues of one sprint
    SprintIssues {
        /// Sprint id (see `sprintdoc sprints --json`)
        sprint_id: u64,
    },

    /// Summarise the backlog of every board
    Backlog,

    /// Open Jira or Confluence in the browser
    Open {
        #[arg(value_enum)]
        target: OpenTarget,
    },

    /// Generate sprint documentation and publish it to Confluence
    Docs {
        /// Directory searched for planning documents and receiving local copies
        #[arg(long, value_name = "DIR")]
        workspace: Option<PathBuf>,

        /// Directory for test copies (default: <workspace>/test-output)
        #[arg(long, value_name = "DIR")]
        test_output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = cmd::credential_store(cli.config_file.as_deref()).and_then(|store| {
        match cli.command {
            Commands::Setup => cmd::setup::run(&store),
            Commands::Config { subcommand } => cmd::config::run(&store, subcommand, cli.json),
            Commands::Code { issue_key, prompt } => {
                cmd::code::run(&store, &issue_key, prompt, cli.json)
            }
            Commands::Sprints => cmd::sprints::run(&store, cli.json),
            Commands::SprintIssues { sprint_id } => {
                cmd::sprint_issues::run(&store, sprint_id, cli.json)
            }
            Commands::Backlog => cmd::backlog::run(&store, cli.json),
            Commands::Open { target } => cmd::open::run(&store, target),
            Commands::Docs {
                workspace,
                test_output,
            } => cmd::docs::run(&store, workspace, test_output, cli.json),
        }
    });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
