//! Markdown summaries of active sprints and board backlogs.

use crate::client::AtlassianClient;
use crate::collect::BoardBacklog;
use crate::render::{format_date, NOT_SET, NO_GOAL};
use crate::types::{format_points, BoardSprint, Description, Issue};
use serde::Serialize;
use std::fmt::Write as _;

/// Issues listed per sprint before the remainder is summarised.
pub const SPRINT_ISSUE_LIMIT: usize = 10;
/// Characters of a backlog description shown before truncation.
pub const DESCRIPTION_LIMIT: usize = 200;

const STRUCTURED_IN_JIRA: &str = "Description available in Jira";

// ---------------------------------------------------------------------------
// Sprints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SprintReport {
    #[serde(flatten)]
    pub sprint: BoardSprint,
    /// `None` when the sprint's issues could not be fetched.
    pub issues: Option<Vec<Issue>>,
}

/// Fetch the issues of every sprint. A failed fetch is recorded as `None`.
pub fn sprint_reports(client: &AtlassianClient, sprints: Vec<BoardSprint>) -> Vec<SprintReport> {
    sprints
        .into_iter()
        .map(|sprint| {
            let issues = match client.get_sprint_issues(sprint.sprint.id) {
                Ok(issues) => Some(issues),
                Err(e) => {
                    tracing::warn!(sprint = %sprint.sprint.name, error = %e, "could not fetch sprint issues");
                    None
                }
            };
            SprintReport { sprint, issues }
        })
        .collect()
}

pub fn sprint_summary(reports: &[SprintReport]) -> String {
    let mut out = String::from("# Current Active Sprints\n\n");
    for report in reports {
        let sprint = &report.sprint.sprint;
        let _ = writeln!(out, "## {}", report.sprint.label());
        let _ = writeln!(out, "- **State**: {}", sprint.state);
        let _ = writeln!(out, "- **Start**: {}", format_date(sprint.start_date.as_deref()));
        let _ = writeln!(out, "- **End**: {}", format_date(sprint.end_date.as_deref()));
        let _ = writeln!(out, "- **Goal**: {}\n", sprint.goal().unwrap_or(NO_GOAL));

        match &report.issues {
            None => out.push_str("### Could not fetch sprint issues\n"),
            Some(issues) if issues.is_empty() => out.push_str("### No issues in this sprint\n"),
            Some(issues) => {
                let _ = writeln!(out, "### Issues ({}):", issues.len());
                for issue in issues.iter().take(SPRINT_ISSUE_LIMIT) {
                    let _ = writeln!(
                        out,
                        "- **{}**: {} ({})",
                        issue.key,
                        issue.summary(),
                        issue.status_name()
                    );
                }
                if issues.len() > SPRINT_ISSUE_LIMIT {
                    let _ = writeln!(
                        out,
                        "- ... and {} more issues",
                        issues.len() - SPRINT_ISSUE_LIMIT
                    );
                }
            }
        }
        out.push_str("\n---\n\n");
    }
    out
}

// ---------------------------------------------------------------------------
// Backlog
// ---------------------------------------------------------------------------

/// Backlog description: plain text cut to [`DESCRIPTION_LIMIT`] characters,
/// or a pointer to Jira for rich-text descriptions.
pub fn backlog_description(description: &Description) -> String {
    let text = match description {
        Description::Text(s) => s.as_str(),
        _ => STRUCTURED_IN_JIRA,
    };
    if text.chars().count() > DESCRIPTION_LIMIT {
        let cut: String = text.chars().take(DESCRIPTION_LIMIT).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

pub fn backlog_summary(backlogs: &[BoardBacklog]) -> String {
    let mut out = String::from("# Project Backlog Items\n\n");
    for backlog in backlogs {
        let _ = writeln!(
            out,
            "## {} Backlog ({} items)\n",
            backlog.board.name,
            backlog.issues.len()
        );
        for issue in &backlog.issues {
            let _ = writeln!(out, "### {}", issue.label());
            let _ = writeln!(out, "- **Status**: {}", issue.status_name());
            let _ = writeln!(out, "- **Priority**: {}", issue.priority_name().unwrap_or(NOT_SET));
            let _ = writeln!(out, "- **Type**: {}", issue.type_name());
            if let Some(assignee) = issue.assignee_name() {
                let _ = writeln!(out, "- **Assignee**: {assignee}");
            }
            if let Some(points) = issue.story_points() {
                let _ = writeln!(out, "- **Story Points**: {}", format_points(points));
            }
            if let Some(description) = &issue.fields.description {
                let _ = writeln!(out, "- **Description**: {}", backlog_description(description));
            }
            out.push('\n');
        }
        out.push_str("---\n\n");
    }
    out
}

pub fn backlog_item_count(backlogs: &[BoardBacklog]) -> usize {
    backlogs.iter().map(|b| b.issues.len()).sum()
}
