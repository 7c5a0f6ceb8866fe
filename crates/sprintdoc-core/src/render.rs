//! Sprint documentation rendering.
//!
//! [`render`] is pure: it produces the Confluence storage-format body and a
//! markdown body with the same sections in the same order, both built from
//! the shared section tables below.

use crate::types::{format_points, Board, Issue, PlanningDocument, Sprint};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::fmt::Write as _;

pub const TITLE_PREFIX_TEST: &str = "[TEST] ";
pub const NOT_SET: &str = "Not set";
pub const NO_GOAL: &str = "No goal set";
pub const NO_DESCRIPTION: &str = "No description provided";
/// Shown for a rich-text description that has no readable text.
pub const STRUCTURED_DESCRIPTION: &str = "See Jira for full description";

pub const SECTION_OVERVIEW: &str = "Sprint Overview";
pub const SECTION_PLANNING: &str = "Planning Documentation Context";
pub const SECTION_PLAN: &str = "Technical Implementation Plan";
pub const SECTION_METRICS: &str = "Success Metrics";
pub const SECTION_PUBLISHED: &str = "Confluence Documentation";

const GENERATOR: &str = "sprintdoc";

const ARCHITECTURE: [(&str, &str); 5] = [
    ("API Integration", "Implementing robust API clients for seamless data exchange"),
    ("Error Handling", "Comprehensive error management and user feedback"),
    ("Performance", "Optimized for large datasets and concurrent operations"),
    ("Security", "Following Atlassian security best practices"),
    ("Testing", "Comprehensive unit and integration tests for all components"),
];

const DEVELOPMENT_STANDARDS: [&str; 5] = [
    "Strong typing for safety and a better developer experience",
    "Unit tests with >90% coverage target",
    "Linting for code quality and consistency",
    "Conventional commits for clear git history",
    "Code reviews required for all changes",
];

const DEFINITION_OF_DONE: [&str; 8] = [
    "Feature implemented according to requirements",
    "Unit tests written and passing",
    "Integration tests verify end-to-end functionality",
    "Code reviewed and approved by team lead",
    "Documentation updated (both technical and user-facing)",
    "Demo scenario validated with stakeholders",
    "No breaking changes to existing functionality",
    "Performance impact assessed and documented",
];

const SUCCESS_METRICS: [(&str, &str); 5] = [
    ("Workflow Completion Time", "< 5 minutes per issue"),
    ("Code Generation Accuracy", "Following team standards compliance"),
    ("Jira-Git Traceability", "100% linked commits and PRs"),
    ("User Experience", "Intuitive command-line workflow"),
    ("Documentation Quality", "Comprehensive and actionable by team"),
];

// ---------------------------------------------------------------------------
// Input / output
// ---------------------------------------------------------------------------

pub struct DocumentInput<'a> {
    pub sprint: &'a Sprint,
    pub board: &'a Board,
    pub issues: &'a [Issue],
    /// Number of issues in the sprint, selected or not.
    pub total_issues: usize,
    pub planning_docs: &'a [PlanningDocument],
    /// `""` for production pages, [`TITLE_PREFIX_TEST`] for test pages.
    pub title_prefix: &'a str,
    pub generated_at: DateTime<Utc>,
}

/// A rendered page. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    title: String,
    markup_body: String,
    markdown_body: String,
}

impl GeneratedDocument {
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Confluence storage format.
    pub fn markup_body(&self) -> &str {
        &self.markup_body
    }

    pub fn markdown_body(&self) -> &str {
        &self.markdown_body
    }

    /// Markdown body followed by a link to the published page.
    pub fn local_copy(&self, page_url: &str) -> String {
        format!("{}{}", self.markdown_body, published_link_section(page_url))
    }
}

pub fn document_title(prefix: &str, sprint_name: &str) -> String {
    format!("{prefix}Sprint Documentation: {sprint_name}")
}

pub fn items_heading(count: usize) -> String {
    format!("Selected Sprint Items ({count} issues)")
}

/// Markdown section pointing at the published page.
pub fn published_link_section(page_url: &str) -> String {
    format!(
        "\n## {SECTION_PUBLISHED}\n\n**Full documentation created**: [{page_url}]({page_url})\n"
    )
}

pub fn render(input: &DocumentInput<'_>) -> GeneratedDocument {
    let title = document_title(input.title_prefix, &input.sprint.name);
    let facts = overview_facts(input);
    GeneratedDocument {
        markup_body: render_markup(input, &title, &facts),
        markdown_body: render_markdown(input, &title, &facts),
        title,
    }
}

// ---------------------------------------------------------------------------
// Field formatting
// ---------------------------------------------------------------------------

/// `M/D/YYYY` for a Jira timestamp or date; [`NOT_SET`] when absent or
/// unparseable.
pub fn format_date(value: Option<&str>) -> String {
    value
        .and_then(parse_date)
        .map(|d| format!("{}/{}/{}", d.month(), d.day(), d.year()))
        .unwrap_or_else(|| NOT_SET.to_string())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    // Jira sometimes omits the colon in the offset: 2024-01-01T09:00:00.000+0000
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Escape text for inclusion in storage-format markup.
pub fn escape_xml(text: &str) -> String {
    html_escape::encode_double_quoted_attribute(text).into_owned()
}

/// The description shown for an issue.
pub fn description_text(issue: &Issue) -> String {
    match &issue.fields.description {
        None => NO_DESCRIPTION.to_string(),
        Some(d) => match d.plain_text() {
            Some(text) => text,
            None if d.is_structured() => STRUCTURED_DESCRIPTION.to_string(),
            None => NO_DESCRIPTION.to_string(),
        },
    }
}

/// Label/value rows of one issue block, optional rows left out.
fn issue_facts(issue: &Issue) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Status", issue.status_name().to_string()),
        ("Type", issue.type_name().to_string()),
        ("Priority", issue.priority_name().unwrap_or(NOT_SET).to_string()),
    ];
    if let Some(assignee) = issue.assignee_name() {
        rows.push(("Assignee", assignee.to_string()));
    }
    if let Some(points) = issue.story_points() {
        rows.push(("Story Points", format_points(points)));
    }
    rows
}

fn overview_facts(input: &DocumentInput<'_>) -> Vec<(&'static str, String)> {
    let sprint = input.sprint;
    vec![
        ("Sprint Name", sprint.name.clone()),
        ("Board", input.board.name.clone()),
        ("State", sprint.state.to_string()),
        ("Start Date", format_date(sprint.start_date.as_deref())),
        ("End Date", format_date(sprint.end_date.as_deref())),
        ("Goal", sprint.goal().unwrap_or(NO_GOAL).to_string()),
        (
            "Selected Issues",
            format!("{} of {} total", input.issues.len(), input.total_issues),
        ),
        (
            "Planning Docs",
            format!("{} included", input.planning_docs.len()),
        ),
    ]
}

fn generated_on(at: &DateTime<Utc>) -> String {
    format!(
        "{}/{}/{} at {} UTC",
        at.month(),
        at.day(),
        at.year(),
        at.format("%H:%M:%S")
    )
}

// ---------------------------------------------------------------------------
// Storage format
// ---------------------------------------------------------------------------

fn markup_row(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(
        out,
        "<tr><td><strong>{}</strong></td><td>{}</td></tr>",
        escape_xml(label),
        escape_xml(value)
    );
}

fn markup_paragraphs(out: &mut String, text: &str) {
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let _ = writeln!(out, "<p>{}</p>", escape_xml(line));
    }
}

fn render_markup(input: &DocumentInput<'_>, title: &str, facts: &[(&str, String)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<h1>{}</h1>", escape_xml(title));

    let _ = writeln!(out, "<h2>{SECTION_OVERVIEW}</h2>");
    out.push_str("<table>\n");
    for (label, value) in facts {
        markup_row(&mut out, label, value);
    }
    out.push_str("</table>\n");

    let _ = writeln!(out, "<h2>{}</h2>", items_heading(input.issues.len()));
    for issue in input.issues {
        let _ = writeln!(out, "<h3>{}</h3>", escape_xml(&issue.label()));
        out.push_str("<table>\n");
        for (label, value) in issue_facts(issue) {
            markup_row(&mut out, label, &value);
        }
        out.push_str("</table>\n<h4>Description</h4>\n");
        markup_paragraphs(&mut out, &description_text(issue));
    }

    if !input.planning_docs.is_empty() {
        let _ = writeln!(out, "<h2>{SECTION_PLANNING}</h2>");
        for doc in input.planning_docs {
            let _ = writeln!(out, "<h3>{}</h3>", escape_xml(&doc.relative_path));
            let _ = writeln!(out, "<pre>{}</pre>", escape_xml(&doc.content));
        }
    }

    let _ = writeln!(out, "<h2>{SECTION_PLAN}</h2>");
    out.push_str("<h3>Architecture Overview</h3>\n");
    let _ = writeln!(
        out,
        "<p>This sprint focuses on <strong>{}</strong> with the following technical approach:</p>",
        escape_xml(&input.sprint.name.to_lowercase())
    );
    out.push_str("<ul>\n");
    for (label, text) in ARCHITECTURE {
        let _ = writeln!(
            out,
            "<li><strong>{}:</strong> {}</li>",
            escape_xml(label),
            escape_xml(text)
        );
    }
    out.push_str("</ul>\n<h3>Development Standards</h3>\n<ul>\n");
    for item in DEVELOPMENT_STANDARDS {
        let _ = writeln!(out, "<li>{}</li>", escape_xml(item));
    }
    out.push_str("</ul>\n<h3>Definition of Done</h3>\n<ul>\n");
    for item in DEFINITION_OF_DONE {
        let _ = writeln!(out, "<li>{}</li>", escape_xml(item));
    }
    out.push_str("</ul>\n");

    let _ = writeln!(out, "<h2>{SECTION_METRICS}</h2>");
    out.push_str("<table>\n");
    for (metric, target) in SUCCESS_METRICS {
        markup_row(&mut out, metric, target);
    }
    out.push_str("</table>\n");

    let context = if input.planning_docs.is_empty() {
        "selected Jira issues"
    } else {
        "selected Jira issues and planning documents"
    };
    let _ = writeln!(
        out,
        "<p><em>Generated by {GENERATOR} on {} using {context} as context.</em></p>",
        escape_xml(&generated_on(&input.generated_at))
    );
    out
}

// ---------------------------------------------------------------------------
// Markdown
// ---------------------------------------------------------------------------

fn render_markdown(input: &DocumentInput<'_>, title: &str, facts: &[(&str, String)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {title}\n");
    let _ = writeln!(
        out,
        "> **Generated on**: {}\n> **Sprint**: {} ({})\n",
        generated_on(&input.generated_at),
        input.sprint.name,
        input.board.name
    );

    let _ = writeln!(out, "## {SECTION_OVERVIEW}\n");
    for (label, value) in facts {
        let _ = writeln!(out, "- **{label}**: {value}");
    }
    out.push('\n');

    let _ = writeln!(out, "## {}\n", items_heading(input.issues.len()));
    for issue in input.issues {
        let _ = writeln!(out, "### {}\n", issue.label());
        for (label, value) in issue_facts(issue) {
            let _ = writeln!(out, "- **{label}**: {value}");
        }
        let _ = writeln!(out, "\n**Description**:\n\n{}\n", description_text(issue));
    }

    if !input.planning_docs.is_empty() {
        let _ = writeln!(out, "## {SECTION_PLANNING}\n");
        for doc in input.planning_docs {
            let _ = writeln!(out, "### {}\n\n{}\n\n---\n", doc.relative_path, doc.content.trim_end());
        }
    }

    let _ = writeln!(out, "## {SECTION_PLAN}\n");
    let _ = writeln!(
        out,
        "### Architecture Overview\n\nThis sprint focuses on **{}** with the following technical approach:\n",
        input.sprint.name.to_lowercase()
    );
    for (label, text) in ARCHITECTURE {
        let _ = writeln!(out, "- **{label}**: {text}");
    }
    out.push_str("\n### Development Standards\n\n");
    for item in DEVELOPMENT_STANDARDS {
        let _ = writeln!(out, "- {item}");
    }
    out.push_str("\n### Definition of Done\n\n");
    for item in DEFINITION_OF_DONE {
        let _ = writeln!(out, "- [x] {item}");
    }
    out.push('\n');

    let _ = writeln!(out, "## {SECTION_METRICS}\n");
    out.push_str("| Metric | Target |\n|--------|--------|\n");
    for (metric, target) in SUCCESS_METRICS {
        let _ = writeln!(out, "| **{metric}** | {target} |");
    }
    out.push('\n');

    let _ = writeln!(out, "---\n\n*Generated automatically by {GENERATOR}*");
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
