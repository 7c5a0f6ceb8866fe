//! Blocking Jira / Confluence REST client.
//!
//! Every operation is exactly one HTTP round trip carrying a Basic auth
//! header. Failures are reported as [`SprintdocError::Remote`] tagged with
//! the operation and the board, sprint, issue, or page it targeted. Nothing
//! is retried.

use crate::config::Credentials;
use crate::error::{Result, SprintdocError};
use crate::types::{Board, ConfluencePage, ConfluenceSpace, Issue, Sprint};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const JIRA_API: &str = "/rest/api/3";
const AGILE_API: &str = "/rest/agile/1.0";
const WIKI_API: &str = "/wiki/rest/api";

/// Longest slice of an error response body kept in error messages.
const ERROR_BODY_LIMIT: usize = 300;

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Values<T> {
    #[serde(default = "Vec::new")]
    values: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Issues {
    #[serde(default)]
    issues: Vec<Issue>,
}

#[derive(Debug, Deserialize)]
struct Results<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

// ---------------------------------------------------------------------------
// Create-page request
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct NewPage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    title: &'a str,
    space: SpaceRef<'a>,
    body: NewPageBody<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    ancestors: Vec<PageRef<'a>>,
}

#[derive(Debug, Serialize)]
struct SpaceRef<'a> {
    key: &'a str,
}

#[derive(Debug, Serialize)]
struct PageRef<'a> {
    id: &'a str,
}

#[derive(Debug, Serialize)]
struct NewPageBody<'a> {
    storage: Storage<'a>,
}

#[derive(Debug, Serialize)]
struct Storage<'a> {
    value: &'a str,
    representation: &'static str,
}

// ---------------------------------------------------------------------------
// AtlassianClient
// ---------------------------------------------------------------------------

pub struct AtlassianClient {
    http: Client,
    base_url: String,
    auth: String,
}

impl AtlassianClient {
    pub fn new(credentials: &Credentials) -> Result<Self> {
        Self::with_base_url(
            credentials.base_url(),
            &credentials.email,
            &credentials.token,
        )
    }

    /// Client rooted at an explicit URL instead of `https://{site}`.
    pub fn with_base_url(base_url: impl Into<String>, email: &str, token: &str) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let mut builder =
            Client::builder().user_agent(concat!("sprintdoc/", env!("CARGO_PKG_VERSION")));
        if is_loopback(&base_url) {
            builder = builder.no_proxy();
        }
        let http = builder
            .build()
            .map_err(|e| SprintdocError::HttpClient(e.to_string()))?;
        Ok(Self {
            http,
            base_url,
            auth: basic_auth_header(email, token),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Browser URL of a published page.
    pub fn page_url(&self, space_key: &str, page_id: &str) -> String {
        format!("{}/wiki/spaces/{space_key}/pages/{page_id}", self.base_url)
    }

    /// Browser URL of an issue.
    pub fn browse_url(&self, issue_key: &str) -> String {
        format!("{}/browse/{issue_key}", self.base_url)
    }

    // -----------------------------------------------------------------------
    // Jira
    // -----------------------------------------------------------------------

    pub fn get_issue(&self, issue_key: &str) -> Result<Issue> {
        self.get(
            "get issue",
            issue_key,
            &format!("{JIRA_API}/issue/{issue_key}"),
            &[],
        )
    }

    pub fn get_all_boards(&self) -> Result<Vec<Board>> {
        let page: Values<Board> =
            self.get("get boards", &self.base_url, &format!("{AGILE_API}/board"), &[])?;
        Ok(page.values)
    }

    pub fn get_active_sprints(&self, board_id: u64) -> Result<Vec<Sprint>> {
        let page: Values<Sprint> = self.get(
            "get active sprints for board",
            &board_id.to_string(),
            &format!("{AGILE_API}/board/{board_id}/sprint"),
            &[("state", "active")],
        )?;
        Ok(page.values)
    }

    pub fn get_sprint_issues(&self, sprint_id: u64) -> Result<Vec<Issue>> {
        let page: Issues = self.get(
            "get sprint issues for sprint",
            &sprint_id.to_string(),
            &format!("{AGILE_API}/sprint/{sprint_id}/issue"),
            &[],
        )?;
        Ok(page.issues)
    }

    pub fn get_backlog_issues(&self, board_id: u64) -> Result<Vec<Issue>> {
        let page: Issues = self.get(
            "get backlog for board",
            &board_id.to_string(),
            &format!("{AGILE_API}/board/{board_id}/backlog"),
            &[],
        )?;
        Ok(page.issues)
    }

    // -----------------------------------------------------------------------
    // Confluence
    // -----------------------------------------------------------------------

    pub fn get_page(&self, page_id: &str) -> Result<ConfluencePage> {
        self.get(
            "get Confluence page",
            page_id,
            &format!("{WIKI_API}/content/{page_id}"),
            &[("expand", "body.storage")],
        )
    }

    pub fn search_spaces(&self) -> Result<Vec<ConfluenceSpace>> {
        let page: Results<ConfluenceSpace> = self.get(
            "search Confluence spaces",
            &self.base_url,
            &format!("{WIKI_API}/space"),
            &[],
        )?;
        Ok(page.results)
    }

    /// Spaces whose key equals `term`.
    pub fn find_spaces_by_key(&self, term: &str) -> Result<Vec<ConfluenceSpace>> {
        let page: Results<ConfluenceSpace> = self.get(
            "find Confluence space",
            term,
            &format!("{WIKI_API}/space"),
            &[("spaceKey", term), ("expand", "description")],
        )?;
        Ok(page.results)
    }

    /// Content matching a CQL query.
    pub fn search_content(&self, cql: &str) -> Result<Vec<ConfluencePage>> {
        let page: Results<ConfluencePage> = self.get(
            "search Confluence content",
            cql,
            &format!("{WIKI_API}/content/search"),
            &[("cql", cql)],
        )?;
        Ok(page.results)
    }

    pub fn create_page(
        &self,
        space_key: &str,
        title: &str,
        content: &str,
        parent_page_id: Option<&str>,
    ) -> Result<ConfluencePage> {
        let operation = "create Confluence page";
        let target = format!("'{title}' in space {space_key}");
        let body = NewPage {
            kind: "page",
            title,
            space: SpaceRef { key: space_key },
            body: NewPageBody {
                storage: Storage {
                    value: content,
                    representation: "storage",
                },
            },
            ancestors: parent_page_id.map(|id| PageRef { id }).into_iter().collect(),
        };
        let url = format!("{}{WIKI_API}/content", self.base_url);
        tracing::debug!(%url, operation, "POST");
        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, &self.auth)
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .map_err(|e| SprintdocError::remote(operation, target.as_str(), e))?;
        decode(operation, &target, response)
    }

    // -----------------------------------------------------------------------
    // Transport
    // -----------------------------------------------------------------------

    fn get<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        target: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, operation, "GET");
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, &self.auth)
            .header(ACCEPT, "application/json")
            .query(query)
            .send()
            .map_err(|e| SprintdocError::remote(operation, target, e))?;
        decode(operation, target, response)
    }
}

fn decode<T: DeserializeOwned>(
    operation: &'static str,
    target: &str,
    response: Response,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        let snippet: String = body.chars().take(ERROR_BODY_LIMIT).collect();
        return Err(SprintdocError::remote(
            operation,
            target,
            format!("HTTP {status}: {}", snippet.trim()),
        ));
    }
    response
        .json::<T>()
        .map_err(|e| SprintdocError::remote(operation, target, e))
}

fn is_loopback(base_url: &str) -> bool {
    let host = base_url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(base_url);
    host.starts_with("127.0.0.1") || host.starts_with("localhost") || host.starts_with("[::1]")
}

/// `Basic base64(email:token)`
pub fn basic_auth_header(email: &str, token: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{email}:{token}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
