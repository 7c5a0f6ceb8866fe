//! Story-to-code scaffolding.
//!
//! Gathers the issue, its project, and the project's coding standards page,
//! then assembles the prompt a code model would receive and a TypeScript
//! scaffold annotated with that context. No model is called.

use crate::client::AtlassianClient;
use crate::error::Result;
use crate::prompt::{Choice, Notice, Prompter, Step, TextPrompt};
use crate::render::NO_DESCRIPTION;
use crate::resolver::{validate_issue_key, validate_project_key, ContextResolver};
use crate::types::Description;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

static TAG_RE: OnceLock<Regex> = OnceLock::new();
static SPACE_RE: OnceLock<Regex> = OnceLock::new();

/// Everything the prompt and scaffold are built from.
#[derive(Debug, Clone, Serialize)]
pub struct CodeContext {
    pub project_key: String,
    pub issue_key: String,
    pub summary: String,
    pub description: String,
    pub standards_page_id: String,
    pub standards: String,
    pub warnings: Vec<String>,
}

/// Tags become spaces, entities are decoded, whitespace runs collapse to one
/// space.
pub fn html_to_text(html: &str) -> String {
    let tags = TAG_RE.get_or_init(|| Regex::new(r"<[^>]*>").unwrap());
    let spaces = SPACE_RE.get_or_init(|| Regex::new(r"\s+").unwrap());
    let text = tags.replace_all(html, " ");
    let text = html_escape::decode_html_entities(&text);
    spaces.replace_all(&text, " ").trim().to_string()
}

pub fn description_text(description: Option<&Description>) -> String {
    description
        .and_then(Description::plain_text)
        .unwrap_or_else(|| NO_DESCRIPTION.to_string())
}

/// Ask whether to keep the detected project or enter one by hand.
pub fn prompt_for_project(
    prompter: &mut dyn Prompter,
    issue_key: &str,
    detected: &str,
) -> Result<Step<String>> {
    let choices = [
        Choice::new(format!("Use detected project: {detected}")),
        Choice::new("Enter different project key manually"),
    ];
    let message = format!(
        "Issue {issue_key} seems to belong to project {detected}. How would you like to proceed?"
    );
    match prompter.select(&message, &choices)? {
        Some(0) => Ok(Step::Continue(detected.to_string())),
        Some(_) => {
            let entered = prompter.text(
                TextPrompt::new("Enter the correct project key")
                    .placeholder("e.g., MYPROJ")
                    .validate(validate_project_key),
            )?;
            Ok(entered.map(|k| k.trim().to_string()).into())
        }
        None => Ok(Step::Cancelled),
    }
}

/// Validate the issue, settle its project, and fetch that project's coding
/// standards.
pub fn gather_context(
    client: &AtlassianClient,
    prompter: &mut dyn Prompter,
    issue_key: &str,
) -> Result<Step<CodeContext>> {
    validate_issue_key(issue_key)?;
    let resolver = ContextResolver::new(client);
    let resolved = resolver.resolve_project(issue_key)?;

    let project_key = if resolved.warnings.is_empty() {
        resolved.project_key
    } else {
        prompter.notify(
            Notice::Warning,
            &format!("Issue validation warnings: {}", resolved.warnings.join("; ")),
        );
        match prompt_for_project(prompter, issue_key, &resolved.project_key)? {
            Step::Continue(key) => key,
            Step::Cancelled => return Ok(Step::Cancelled),
        }
    };

    let standards_page_id = resolver.resolve_documentation_space(&project_key);
    let page = client.get_page(&standards_page_id)?;
    tracing::info!(issue_key, project_key = %project_key, page_id = %standards_page_id, "gathered code context");

    Ok(Step::Continue(CodeContext {
        issue_key: issue_key.to_string(),
        summary: resolved.issue.summary().to_string(),
        description: description_text(resolved.issue.fields.description.as_ref()),
        standards: html_to_text(page.storage_value()),
        standards_page_id,
        project_key,
        warnings: resolved.warnings,
    }))
}

pub fn build_prompt(ctx: &CodeContext) -> String {
    format!(
        "You are a senior developer following team coding standards. \
Generate TypeScript code for this Jira story:

PROJECT CONTEXT:
Project Key: {project}
Issue: {issue}

JIRA STORY:
Title: {summary}
Description: {description}

TEAM CODING STANDARDS (Project: {project}):
{standards}

Generate clean, well-documented TypeScript code that follows the team standards. Include:
1. Proper typing and interfaces
2. Error handling as specified in standards
3. Comments explaining the approach
4. TODO comments for review points

Code:",
        project = ctx.project_key,
        issue = ctx.issue_key,
        summary = ctx.summary,
        description = ctx.description,
        standards = ctx.standards,
    )
}

/// PascalCase identifier from a story summary; `Story` when nothing usable.
pub fn type_name(summary: &str) -> String {
    let name: String = summary
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();
    match name.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => name,
        Some(_) => format!("Story{name}"),
        None => "Story".to_string(),
    }
}

pub fn scaffold(ctx: &CodeContext) -> String {
    let name = type_name(&ctx.summary);
    format!(
        "// Generated code for: {summary}
// Project: {project} | Issue: {issue}
// Following team coding standards from Confluence (Page ID: {page})

interface {name}Request {{
\t// TODO: fields required by {issue}
}}

interface {name}Response {{
\tsuccess: boolean;
\terror?: string;
}}

class {name}Service {{
\t/**
\t * {summary}
\t * Follows {project} team patterns.
\t * TODO: review against the coding standards page before merging
\t */
\tasync execute(request: {name}Request): Promise<{name}Response> {{
\t\ttry {{
\t\t\t// TODO: implement {issue}
\t\t\treturn {{ success: true }};
\t\t}} catch (error) {{
\t\t\tconsole.error('{name} failed:', error);
\t\t\treturn {{ success: false, error: '{name} unavailable' }};
\t\t}}
\t}}
}}

export {{ {name}Service, {name}Request, {name}Response }};
",
        summary = ctx.summary,
        project = ctx.project_key,
        issue = ctx.issue_key,
        page = ctx.standards_page_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SprintdocError;
    use crate::prompt::testing::{Answer, ScriptedPrompter};
    use crate::resolver::FALLBACK_STANDARDS_PAGE_ID;
    use mockito::Matcher;
    use serde_json::json;

    fn context() -> CodeContext {
        CodeContext {
            project_key: "WEB".to_string(),
            issue_key: "WEB-7".to_string(),
            summary: "Add OAuth login".to_string(),
            description: "Users sign in with Google".to_string(),
            standards_page_id: "77".to_string(),
            standards: "Use async/await".to_string(),
            warnings: vec![],
        }
    }

    /// Issue WEB-7 in `project`, no project space, demo standards page.
    fn seed(server: &mut mockito::ServerGuard, project: &str) {
        server
            .mock("GET", "/rest/api/3/issue/WEB-7")
            .with_status(200)
            .with_body(
                json!({
                    "key": "WEB-7",
                    "fields": {
                        "summary": "Add OAuth login",
                        "project": { "key": project },
                        "description": { "type": "doc", "content": [
                            { "type": "paragraph", "content": [{ "type": "text", "text": "Sign in with Google" }] }
                        ]}
                    }
                })
                .to_string(),
            )
            .create();
        server
            .mock("GET", "/wiki/rest/api/space")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({ "results": [] }).to_string())
            .create();
        server
            .mock("GET", "/wiki/rest/api/content/491523")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({
                    "id": FALLBACK_STANDARDS_PAGE_ID,
                    "body": { "storage": { "value": "<h1>Demo</h1>\n<p>Use   async/await</p>" } }
                })
                .to_string(),
            )
            .create();
    }

    fn client(server: &mockito::ServerGuard) -> AtlassianClient {
        AtlassianClient::with_base_url(server.url(), "dev@acme.com", "tok-1234567890").unwrap()
    }

    #[test]
    fn html_is_flattened() {
        assert_eq!(
            html_to_text("<h1>Rules</h1>\n<ul><li>Tabs</li>  <li>Tests</li></ul>"),
            "Rules Tabs Tests"
        );
        assert_eq!(html_to_text(""), "");
    }

    #[test]
    fn html_entities_are_decoded() {
        assert_eq!(
            html_to_text("<p>Use &lt;Result&gt; &amp; avoid&nbsp;panics</p>"),
            "Use <Result> & avoid panics"
        );
    }

    #[test]
    fn type_names() {
        assert_eq!(type_name("Add OAuth login"), "AddOAuthLogin");
        assert_eq!(type_name("fix: user-profile page"), "FixUserProfilePage");
        assert_eq!(type_name("2FA support"), "Story2FASupport");
        assert_eq!(type_name("!!!"), "Story");
    }

    #[test]
    fn prompt_carries_context() {
        let prompt = build_prompt(&context());
        assert!(prompt.contains("Project Key: WEB"));
        assert!(prompt.contains("Issue: WEB-7"));
        assert!(prompt.contains("Title: Add OAuth login"));
        assert!(prompt.contains("Description: Users sign in with Google"));
        assert!(prompt.contains("TEAM CODING STANDARDS (Project: WEB):\nUse async/await"));
        assert!(prompt.ends_with("Code:"));
    }

    #[test]
    fn scaffold_is_annotated() {
        let code = scaffold(&context());
        assert!(code.starts_with("// Generated code for: Add OAuth login"));
        assert!(code.contains("// Project: WEB | Issue: WEB-7"));
        assert!(code.contains("(Page ID: 77)"));
        assert!(code.contains("class AddOAuthLoginService {"));
        assert!(code.contains("export { AddOAuthLoginService, AddOAuthLoginRequest, AddOAuthLoginResponse };"));
    }

    #[test]
    fn gather_uses_fallback_standards() {
        let mut server = mockito::Server::new();
        seed(&mut server, "WEB");
        let mut prompter = ScriptedPrompter::new(vec![]);
        let ctx = gather_context(&client(&server), &mut prompter, "WEB-7")
            .unwrap()
            .continued()
            .unwrap();
        assert_eq!(ctx.project_key, "WEB");
        assert_eq!(ctx.standards_page_id, FALLBACK_STANDARDS_PAGE_ID);
        assert_eq!(ctx.standards, "Demo Use async/await");
        assert_eq!(ctx.description, "Sign in with Google");
        assert!(prompter.notices.is_empty());
    }

    #[test]
    fn mismatch_asks_for_project() {
        let mut server = mockito::Server::new();
        seed(&mut server, "NEW");
        let mut prompter = ScriptedPrompter::new(vec![
            Answer::SelectLabel("Enter different project key manually"),
            Answer::Text(Some(" WEB ".to_string())),
        ]);
        let ctx = gather_context(&client(&server), &mut prompter, "WEB-7")
            .unwrap()
            .continued()
            .unwrap();
        assert_eq!(ctx.project_key, "WEB");
        assert_eq!(ctx.warnings.len(), 1);
        assert_eq!(prompter.notices[0].0, Notice::Warning);
    }

    #[test]
    fn mismatch_cancelled() {
        let mut server = mockito::Server::new();
        seed(&mut server, "NEW");
        let mut prompter = ScriptedPrompter::new(vec![Answer::Select(None)]);
        let step = gather_context(&client(&server), &mut prompter, "WEB-7").unwrap();
        assert!(step.is_cancelled());
    }

    #[test]
    fn malformed_key_is_rejected_before_any_request() {
        let server = mockito::Server::new();
        let mut prompter = ScriptedPrompter::new(vec![]);
        let err = gather_context(&client(&server), &mut prompter, "not a key").unwrap_err();
        assert!(matches!(err, SprintdocError::InvalidIssueKey(_)));
    }
}
