//! Works out which project an issue belongs to and where that project keeps
//! its coding standards in Confluence.
//!
//! Space and page discovery is a naming-convention guess: a fixed list of
//! space search terms, a fixed list of page title phrases, and a demo page
//! used whenever nothing project-specific turns up. Lookup failures never
//! surface; they only steer resolution towards the fallback page.

use crate::client::AtlassianClient;
use crate::error::{Result, SprintdocError};
use crate::types::{key_prefix, Issue};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// The shared "Demo Team Coding Standards" page.
pub const FALLBACK_STANDARDS_PAGE_ID: &str = "491523";

/// Page title phrases in priority order.
pub const STANDARDS_TITLE_PHRASES: [&str; 4] = [
    "coding standards",
    "development standards",
    "team standards",
    "coding guidelines",
];

/// Space search terms for a project key, in the order they are tried.
pub fn space_search_terms(project_key: &str) -> [String; 5] {
    [
        project_key.to_string(),
        format!("{project_key} Software Development"),
        format!("{project_key} Development"),
        format!("{project_key} Team"),
        format!("{project_key} Project"),
    ]
}

// ---------------------------------------------------------------------------
// Key validation
// ---------------------------------------------------------------------------

static PROJECT_KEY_RE: OnceLock<Regex> = OnceLock::new();
static ISSUE_KEY_RE: OnceLock<Regex> = OnceLock::new();

fn project_key_re() -> &'static Regex {
    PROJECT_KEY_RE.get_or_init(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").unwrap())
}

fn issue_key_re() -> &'static Regex {
    ISSUE_KEY_RE.get_or_init(|| Regex::new(r"^[A-Z][A-Z0-9_]*-[0-9]+$").unwrap())
}

/// Prompt validator for a manually entered project key.
pub fn validate_project_key(input: &str) -> std::result::Result<(), String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Project key cannot be empty".to_string());
    }
    if !project_key_re().is_match(input) {
        return Err("Project key should start with a letter and contain only uppercase letters, \
                    numbers, and underscores"
            .to_string());
    }
    Ok(())
}

pub fn validate_issue_key(key: &str) -> Result<()> {
    if !issue_key_re().is_match(key) {
        return Err(SprintdocError::InvalidIssueKey(key.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct IssueContext {
    pub is_valid: bool,
    pub issue: Option<Issue>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectResolution {
    pub project_key: String,
    pub issue: Issue,
    pub warnings: Vec<String>,
}

pub struct ContextResolver<'a> {
    client: &'a AtlassianClient,
}

impl<'a> ContextResolver<'a> {
    pub fn new(client: &'a AtlassianClient) -> Self {
        Self { client }
    }

    /// Fetch the issue and check that its key prefix matches its project.
    ///
    /// A mismatch is a warning, not a failure. Only a failed fetch makes the
    /// context invalid.
    pub fn validate_issue_context(&self, issue_key: &str) -> IssueContext {
        let issue = match self.client.get_issue(issue_key) {
            Ok(issue) => issue,
            Err(e) => {
                return IssueContext {
                    is_valid: false,
                    issue: None,
                    warnings: vec![format!("Failed to validate issue {issue_key}: {e}")],
                }
            }
        };

        let mut warnings = Vec::new();
        let expected = key_prefix(issue_key);
        let project_key = issue.project_key().unwrap_or("");
        if project_key != expected {
            warnings.push(format!(
                "Issue key prefix '{expected}' doesn't match project key '{project_key}'. \
                 This may indicate a key collision or data inconsistency."
            ));
        }

        IssueContext {
            is_valid: true,
            issue: Some(issue),
            warnings,
        }
    }

    /// The project an issue belongs to, with any consistency warnings.
    pub fn resolve_project(&self, issue_key: &str) -> Result<ProjectResolution> {
        let context = self.validate_issue_context(issue_key);
        let issue = match (context.is_valid, context.issue) {
            (true, Some(issue)) => issue,
            _ => {
                return Err(SprintdocError::remote(
                    "resolve project for issue",
                    issue_key,
                    context.warnings.join("; "),
                ))
            }
        };
        let project_key = issue
            .project_key()
            .unwrap_or_else(|| key_prefix(issue_key))
            .to_string();
        Ok(ProjectResolution {
            project_key,
            issue,
            warnings: context.warnings,
        })
    }

    /// The coding standards page id for a project. Never fails: when no
    /// project-specific page is found the fallback page id is returned.
    pub fn resolve_documentation_space(&self, project_key: &str) -> String {
        tracing::debug!(project_key, "searching for Confluence space");
        for term in space_search_terms(project_key) {
            let spaces = match self.client.find_spaces_by_key(&term) {
                Ok(spaces) => spaces,
                Err(e) => {
                    tracing::debug!(term = %term, error = %e, "space search failed");
                    continue;
                }
            };
            let Some(space) = spaces.first() else {
                continue;
            };
            tracing::debug!(space = %space.key, project_key, "found Confluence space");
            let page_id = self.find_coding_standards_in_space(&space.key);
            if page_id != FALLBACK_STANDARDS_PAGE_ID {
                tracing::info!(page_id = %page_id, project_key, "found project coding standards");
                return page_id;
            }
        }

        tracing::info!(project_key, "no project-specific Confluence space, using demo standards");
        FALLBACK_STANDARDS_PAGE_ID.to_string()
    }

    /// First page in `space_key` whose title matches a standards phrase.
    pub fn find_coding_standards_in_space(&self, space_key: &str) -> String {
        for phrase in STANDARDS_TITLE_PHRASES {
            let cql = format!("space=\"{space_key}\" AND title~\"{phrase}\"");
            match self.client.search_content(&cql) {
                Ok(pages) => {
                    if let Some(page) = pages.first() {
                        return page.id.clone();
                    }
                }
                Err(e) => {
                    tracing::debug!(space_key, phrase, error = %e, "standards search failed");
                }
            }
        }
        FALLBACK_STANDARDS_PAGE_ID.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client(server: &mockito::ServerGuard) -> AtlassianClient {
        AtlassianClient::with_base_url(server.url(), "dev@acme.com", "tok-1234567890").unwrap()
    }

    fn issue_body(key: &str, project: &str) -> String {
        json!({
            "key": key,
            "fields": { "summary": "Login page", "project": { "key": project } }
        })
        .to_string()
    }

    fn space_mock(server: &mut mockito::ServerGuard, term: &str, body: serde_json::Value) -> mockito::Mock {
        server
            .mock("GET", "/wiki/rest/api/space")
            .match_query(Matcher::UrlEncoded("spaceKey".into(), term.into()))
            .with_status(200)
            .with_body(body.to_string())
            .create()
    }

    fn cql(space: &str, phrase: &str) -> String {
        format!("space=\"{space}\" AND title~\"{phrase}\"")
    }

    fn content_mock(
        server: &mut mockito::ServerGuard,
        space: &str,
        phrase: &str,
        body: serde_json::Value,
    ) -> mockito::Mock {
        server
            .mock("GET", "/wiki/rest/api/content/search")
            .match_query(Matcher::UrlEncoded("cql".into(), cql(space, phrase)))
            .with_status(200)
            .with_body(body.to_string())
            .create()
    }

    #[test]
    fn matching_prefix_has_no_warnings() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/rest/api/3/issue/WEB-1")
            .with_status(200)
            .with_body(issue_body("WEB-1", "WEB"))
            .create();

        let c = client(&server);
        let ctx = ContextResolver::new(&c).validate_issue_context("WEB-1");
        assert!(ctx.is_valid);
        assert!(ctx.warnings.is_empty());
    }

    #[test]
    fn mismatched_prefix_is_valid_with_warning() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/rest/api/3/issue/OLD-7")
            .with_status(200)
            .with_body(issue_body("OLD-7", "NEW"))
            .create();

        let c = client(&server);
        let resolver = ContextResolver::new(&c);
        let ctx = resolver.validate_issue_context("OLD-7");
        assert!(ctx.is_valid);
        assert_eq!(ctx.warnings.len(), 1);
        assert!(ctx.warnings[0].contains("'OLD'"));
        assert!(ctx.warnings[0].contains("'NEW'"));

        let resolved = resolver.resolve_project("OLD-7").unwrap();
        assert_eq!(resolved.project_key, "NEW");
        assert_eq!(resolved.warnings.len(), 1);
    }

    #[test]
    fn failed_fetch_is_invalid_context_and_resolve_error() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/rest/api/3/issue/WEB-9")
            .with_status(404)
            .create();

        let c = client(&server);
        let resolver = ContextResolver::new(&c);
        let ctx = resolver.validate_issue_context("WEB-9");
        assert!(!ctx.is_valid);
        assert!(ctx.issue.is_none());
        assert!(ctx.warnings[0].starts_with("Failed to validate issue WEB-9"));

        let err = resolver.resolve_project("WEB-9").unwrap_err();
        assert!(err.to_string().contains("WEB-9"));
    }

    #[test]
    fn documentation_space_falls_back_when_everything_fails() {
        let c = AtlassianClient::with_base_url("http://127.0.0.1:9", "dev@acme.com", "tok-1234567890")
            .unwrap();
        let page = ContextResolver::new(&c).resolve_documentation_space("WEB");
        assert_eq!(page, FALLBACK_STANDARDS_PAGE_ID);
    }

    #[test]
    fn documentation_space_falls_back_on_server_errors() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", Matcher::Any)
            .with_status(500)
            .create();

        let c = client(&server);
        assert_eq!(
            ContextResolver::new(&c).resolve_documentation_space("WEB"),
            FALLBACK_STANDARDS_PAGE_ID
        );
    }

    #[test]
    fn first_matching_phrase_wins() {
        let mut server = mockito::Server::new();
        space_mock(&mut server, "WEB", json!({ "results": [{ "key": "WEB", "name": "Web" }] }));
        content_mock(&mut server, "WEB", "coding standards", json!({ "results": [] }));
        content_mock(
            &mut server,
            "WEB",
            "development standards",
            json!({ "results": [{ "id": "555", "title": "Development Standards" }] }),
        );
        let later = server
            .mock("GET", "/wiki/rest/api/content/search")
            .match_query(Matcher::UrlEncoded("cql".into(), cql("WEB", "team standards")))
            .with_status(200)
            .with_body(json!({ "results": [{ "id": "666" }] }).to_string())
            .expect(0)
            .create();

        let c = client(&server);
        assert_eq!(ContextResolver::new(&c).resolve_documentation_space("WEB"), "555");
        later.assert();
    }

    #[test]
    fn fallback_page_match_moves_to_next_term() {
        let mut server = mockito::Server::new();
        // "WEB" space exists but only links the demo page.
        space_mock(&mut server, "WEB", json!({ "results": [{ "key": "WEB", "name": "Web" }] }));
        content_mock(
            &mut server,
            "WEB",
            "coding standards",
            json!({ "results": [{ "id": FALLBACK_STANDARDS_PAGE_ID }] }),
        );
        space_mock(&mut server, "WEB Software Development", json!({ "results": [] }));
        space_mock(
            &mut server,
            "WEB Development",
            json!({ "results": [{ "key": "WEBDEV", "name": "Web Development" }] }),
        );
        for phrase in STANDARDS_TITLE_PHRASES {
            if phrase != "coding standards" {
                content_mock(&mut server, "WEB", phrase, json!({ "results": [] }));
            }
        }
        content_mock(
            &mut server,
            "WEBDEV",
            "coding standards",
            json!({ "results": [{ "id": "1234" }] }),
        );

        let c = client(&server);
        assert_eq!(ContextResolver::new(&c).resolve_documentation_space("WEB"), "1234");
    }

    #[test]
    fn standards_search_failures_skip_to_next_phrase() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/wiki/rest/api/content/search")
            .match_query(Matcher::UrlEncoded("cql".into(), cql("DEV", "coding standards")))
            .with_status(500)
            .create();
        content_mock(&mut server, "DEV", "development standards", json!({}));
        content_mock(
            &mut server,
            "DEV",
            "team standards",
            json!({ "results": [{ "id": "42" }] }),
        );

        let c = client(&server);
        assert_eq!(ContextResolver::new(&c).find_coding_standards_in_space("DEV"), "42");
    }

    #[test]
    fn no_page_in_space_returns_fallback() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/wiki/rest/api/content/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({ "results": [] }).to_string())
            .create();

        let c = client(&server);
        assert_eq!(
            ContextResolver::new(&c).find_coding_standards_in_space("DEV"),
            FALLBACK_STANDARDS_PAGE_ID
        );
    }

    #[test]
    fn key_validation() {
        assert!(validate_project_key("WEB").is_ok());
        assert!(validate_project_key("WEB_2").is_ok());
        assert!(validate_project_key("web").is_err());
        assert!(validate_project_key("2WEB").is_err());
        assert!(validate_project_key("").is_err());

        assert!(validate_issue_key("WEB-12").is_ok());
        assert!(matches!(
            validate_issue_key("WEB12"),
            Err(SprintdocError::InvalidIssueKey(_))
        ));
        assert!(validate_issue_key("web-1").is_err());
    }

    #[test]
    fn search_terms_order() {
        let terms = space_search_terms("WEB");
        assert_eq!(terms[0], "WEB");
        assert_eq!(terms[1], "WEB Software Development");
        assert_eq!(terms[4], "WEB Project");
    }
}
