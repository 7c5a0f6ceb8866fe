//! Per-board aggregation that tolerates individual board failures.
//!
//! Boards are visited one at a time in the order the API returned them. A
//! board whose request fails is logged and skipped; the rest still count.

use crate::client::AtlassianClient;
use crate::types::{Board, BoardSprint, Issue};
use serde::Serialize;

/// Active sprints across `boards`, paired with their board.
pub fn collect_active_sprints(client: &AtlassianClient, boards: &[Board]) -> Vec<BoardSprint> {
    let mut out = Vec::new();
    for board in boards {
        match client.get_active_sprints(board.id) {
            Ok(sprints) => {
                out.extend(
                    sprints
                        .into_iter()
                        .filter(|s| s.is_active())
                        .map(|sprint| BoardSprint {
                            board: board.clone(),
                            sprint,
                        }),
                );
            }
            Err(e) => {
                tracing::warn!(board = %board.name, board_id = board.id, error = %e, "skipping board");
            }
        }
    }
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardBacklog {
    pub board: Board,
    pub issues: Vec<Issue>,
}

/// Backlog issues per board, in board order. Boards that failed or have an
/// empty backlog are left out.
pub fn collect_backlogs(client: &AtlassianClient, boards: &[Board]) -> Vec<BoardBacklog> {
    let mut out = Vec::new();
    for board in boards {
        match client.get_backlog_issues(board.id) {
            Ok(issues) if issues.is_empty() => {}
            Ok(issues) => out.push(BoardBacklog {
                board: board.clone(),
                issues,
            }),
            Err(e) => {
                tracing::warn!(board = %board.name, board_id = board.id, error = %e, "skipping backlog");
            }
        }
    }
    out
}
