use super::open_session;
use crate::output::print_json;
use crate::prompts::DialoguerPrompter;
use anyhow::Context;
use sprintdoc_core::codegen::{self, CodeContext};
use sprintdoc_core::config::CredentialStore;
use sprintdoc_core::prompt::Step;

pub fn run(
    store: &CredentialStore,
    issue_key: &str,
    show_prompt: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut prompter = DialoguerPrompter::new();
    let Some(session) = open_session(store, &mut prompter)? else {
        return Ok(());
    };

    let ctx = match codegen::gather_context(session.client(), &mut prompter, issue_key)
        .with_context(|| format!("failed to gather context for {issue_key}"))?
    {
        Step::Continue(ctx) => ctx,
        Step::Cancelled => {
            eprintln!("Code generation cancelled.");
            return Ok(());
        }
    };

    let prompt = codegen::build_prompt(&ctx);
    let code = codegen::scaffold(&ctx);

    if json {
        #[derive(serde::Serialize)]
        struct CodeOutput<'a> {
            #[serde(flatten)]
            context: &'a CodeContext,
            issue_url: String,
            prompt: &'a str,
            code: &'a str,
        }

        return print_json(&CodeOutput {
            context: &ctx,
            issue_url: session.client().browse_url(&ctx.issue_key),
            prompt: &prompt,
            code: &code,
        });
    }

    if show_prompt {
        println!("{prompt}");
    } else {
        println!("{code}");
    }
    Ok(())
}
