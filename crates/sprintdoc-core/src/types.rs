//! Jira and Confluence entities as returned by the REST APIs.
//!
//! Payloads are loosely shaped, so every nested field that the APIs may omit
//! is an `Option` or carries `#[serde(default)]`. Accessors apply the display
//! defaults used throughout reports and rendered documents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

// ---------------------------------------------------------------------------
// Sprint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SprintState {
    Active,
    Closed,
    Future,
    #[default]
    #[serde(other)]
    Other,
}

impl SprintState {
    pub fn as_str(self) -> &'static str {
        match self {
            SprintState::Active => "active",
            SprintState::Closed => "closed",
            SprintState::Future => "future",
            SprintState::Other => "unknown",
        }
    }
}

impl fmt::Display for SprintState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: SprintState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_board_id: Option<u64>,
}

impl Sprint {
    pub fn is_active(&self) -> bool {
        self.state == SprintState::Active
    }

    /// The sprint goal, treating an empty string as unset.
    pub fn goal(&self) -> Option<&str> {
        self.goal.as_deref().filter(|g| !g.trim().is_empty())
    }
}

/// An active sprint paired with the board it was found on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSprint {
    pub board: Board,
    pub sprint: Sprint,
}

impl BoardSprint {
    /// `"{sprint} ({board})"`, the label used in pickers and reports.
    pub fn label(&self) -> String {
        format!("{} ({})", self.sprint.name, self.board.name)
    }
}

// ---------------------------------------------------------------------------
// Issue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NamedField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuetype: Option<NamedField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<NamedField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<User>,
    #[serde(
        rename = "storyPoints",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub story_points: Option<f64>,
    /// Story point estimate on cloud sites. The field id is site-specific, so
    /// anything other than a number reads as unset.
    #[serde(
        rename = "customfield_10016",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub estimate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectRef>,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(serde_json::Value::as_f64))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedField {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "displayName", default)]
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectRef {
    #[serde(default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

const UNKNOWN: &str = "Unknown";

impl Issue {
    pub fn summary(&self) -> &str {
        &self.fields.summary
    }

    pub fn status_name(&self) -> &str {
        named_or_unknown(self.fields.status.as_ref())
    }

    pub fn type_name(&self) -> &str {
        named_or_unknown(self.fields.issuetype.as_ref())
    }

    pub fn priority_name(&self) -> Option<&str> {
        self.fields
            .priority
            .as_ref()
            .map(|p| p.name.as_str())
            .filter(|n| !n.is_empty())
    }

    pub fn assignee_name(&self) -> Option<&str> {
        self.fields
            .assignee
            .as_ref()
            .map(|a| a.display_name.as_str())
            .filter(|n| !n.is_empty())
    }

    /// Story points, omitted when unset or zero.
    pub fn story_points(&self) -> Option<f64> {
        self.fields
            .story_points
            .or(self.fields.estimate)
            .filter(|p| *p != 0.0)
    }

    pub fn project_key(&self) -> Option<&str> {
        self.fields
            .project
            .as_ref()
            .map(|p| p.key.as_str())
            .filter(|k| !k.is_empty())
    }

    /// The part of the key before the first `-`.
    pub fn key_prefix(&self) -> &str {
        key_prefix(&self.key)
    }

    /// `"{key}: {summary}"`
    pub fn label(&self) -> String {
        format!("{}: {}", self.key, self.summary())
    }
}

fn named_or_unknown(field: Option<&NamedField>) -> &str {
    field
        .map(|f| f.name.as_str())
        .filter(|n| !n.is_empty())
        .unwrap_or(UNKNOWN)
}

/// The project prefix of an issue key (`"WEB-12"` → `"WEB"`).
pub fn key_prefix(key: &str) -> &str {
    key.split('-').next().unwrap_or(key)
}

/// Formats story points without a trailing `.0` for whole numbers.
pub fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{}", points as i64)
    } else {
        format!("{points}")
    }
}

// ---------------------------------------------------------------------------
// Description
// ---------------------------------------------------------------------------

/// An issue description: a plain string (server / v2 API) or an Atlassian
/// Document Format tree (cloud v3 API).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Document(RichTextNode),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichTextNode {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<RichTextNode>,
}

impl RichTextNode {
    fn collect_text(&self, out: &mut Vec<String>) {
        if let Some(text) = &self.text {
            out.push(text.clone());
        }
        for child in &self.content {
            child.collect_text(out);
        }
    }

    /// One line per top-level block, text runs within a block joined by a space.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|block| {
                let mut runs = Vec::new();
                block.collect_text(&mut runs);
                runs.join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Description {
    /// Plain text for display; `None` when nothing readable is present.
    pub fn plain_text(&self) -> Option<String> {
        let text = match self {
            Description::Text(s) => s.clone(),
            Description::Document(doc) => doc.plain_text(),
            Description::Other(_) => String::new(),
        };
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn is_structured(&self) -> bool {
        !matches!(self, Description::Text(_))
    }
}

// ---------------------------------------------------------------------------
// Confluence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfluenceSpace {
    pub key: String,
    #[serde(default)]
    pub name: String,
}

impl ConfluenceSpace {
    /// `"{name} ({key})"`; [`parse_space_label`] reverses it.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.key)
    }
}

/// Extract the key from the trailing `(KEY)` of a space label.
pub fn parse_space_label(label: &str) -> Option<&str> {
    let inner = label.trim_end().strip_suffix(')')?;
    let open = inner.rfind('(')?;
    let key = &inner[open + 1..];
    if key.is_empty() || key.contains(')') {
        None
    } else {
        Some(key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfluencePage {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<PageBody>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageValue {
    #[serde(default)]
    pub value: String,
}

impl ConfluencePage {
    /// The storage-format body, empty when the response omitted it.
    pub fn storage_value(&self) -> &str {
        self.body
            .as_ref()
            .and_then(|b| b.storage.as_ref())
            .map(|s| s.value.as_str())
            .unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// PlanningDocument
// ---------------------------------------------------------------------------

/// A markdown file from the workspace included as extra context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanningDocument {
    pub path: PathBuf,
    /// Path relative to the workspace root, `/`-separated.
    pub relative_path: String,
    pub content: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
