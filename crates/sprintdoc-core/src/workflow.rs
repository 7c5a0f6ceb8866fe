//! Sprint documentation workflow.
//!
//! Board discovery, sprint and issue selection, optional planning documents,
//! target space and mode selection, then render and publish. Each state
//! produces the next state or a terminal [`Outcome`]. Remote failures abort
//! the run with an error; a dismissed prompt or an empty result stops it
//! with a [`StopReason`].

use crate::client::AtlassianClient;
use crate::collect::collect_active_sprints;
use crate::error::{Result, SprintdocError};
use crate::io::atomic_write;
use crate::paths::{local_copy_filename, test_copy_filename};
use crate::planning;
use crate::prompt::{Choice, Notice, Prompter};
use crate::render::{self, DocumentInput, GeneratedDocument, TITLE_PREFIX_TEST};
use crate::types::{parse_space_label, Board, BoardSprint, Issue, PlanningDocument};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

pub const ACTION_OPEN: &str = "Open in Confluence";
pub const ACTION_LOCAL_COPY: &str = "Create Local Copy";
pub const ACTION_TEST_COPY: &str = "Save Test Copy";
pub const ACTION_OPEN_TEST_FILE: &str = "Open Test File";

pub const PLANNING_YES: &str = "Yes - Select planning documents";
pub const PLANNING_NO: &str = "No - Generate from Jira issues only";

pub const MODE_PRODUCTION: &str = "Production Documentation";
pub const MODE_TEST: &str = "Test Documentation (with [TEST] prefix)";

// ---------------------------------------------------------------------------
// Options and outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct WorkflowOptions {
    /// Root searched for planning documents and where local copies land.
    pub workspace: PathBuf,
    pub test_output_dir: PathBuf,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    NoBoards,
    NoActiveSprints,
    SprintNotChosen,
    NoIssuesInSprint,
    NoIssuesSelected,
    NoSpaces,
    SpaceNotChosen,
    ModeNotChosen,
}

impl StopReason {
    pub fn message(self) -> &'static str {
        match self {
            StopReason::NoBoards => "No Jira boards found.",
            StopReason::NoActiveSprints => "No active sprints found on any board.",
            StopReason::SprintNotChosen => "No sprint selected.",
            StopReason::NoIssuesInSprint => {
                "No issues found in the selected sprint. Add issues to the sprint in Jira and try again."
            }
            StopReason::NoIssuesSelected => "No issues selected. Documentation generation cancelled.",
            StopReason::NoSpaces => "No Confluence spaces found.",
            StopReason::SpaceNotChosen => "No Confluence space selected.",
            StopReason::ModeNotChosen => "No documentation mode selected.",
        }
    }

    /// Stops caused by missing data rather than the user backing out.
    pub fn is_empty_result(self) -> bool {
        matches!(
            self,
            StopReason::NoBoards
                | StopReason::NoActiveSprints
                | StopReason::NoIssuesInSprint
                | StopReason::NoSpaces
        )
    }
}

#[derive(Debug, Clone)]
pub struct PublishedDocument {
    pub page_id: String,
    pub page_url: String,
    pub space_key: String,
    pub issue_count: usize,
    pub planning_count: usize,
    pub document: GeneratedDocument,
    /// Local markdown copies written after publishing.
    pub saved: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Published(PublishedDocument),
    Stopped(StopReason),
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// What has been chosen so far once issues are picked.
struct Selection {
    chosen: BoardSprint,
    issues: Vec<Issue>,
    total_issues: usize,
    planning_docs: Vec<PlanningDocument>,
}

enum State {
    Boards,
    CollectSprints(Vec<Board>),
    SelectSprint(Vec<BoardSprint>),
    SelectIssues(BoardSprint),
    SelectPlanningDocs(Selection),
    SelectTargetSpace(Selection),
    SelectMode(Selection, String),
    Publish(Selection, String, &'static str),
}

enum Transition {
    Next(State),
    Done(Outcome),
}

fn stop(reason: StopReason) -> Result<Transition> {
    Ok(Transition::Done(Outcome::Stopped(reason)))
}

pub struct DocsWorkflow<'a> {
    client: &'a AtlassianClient,
    prompter: &'a mut dyn Prompter,
    options: WorkflowOptions,
}

impl<'a> DocsWorkflow<'a> {
    pub fn new(
        client: &'a AtlassianClient,
        prompter: &'a mut dyn Prompter,
        options: WorkflowOptions,
    ) -> Self {
        Self {
            client,
            prompter,
            options,
        }
    }

    pub fn run(mut self) -> Result<Outcome> {
        let mut state = State::Boards;
        loop {
            match self.step(state)? {
                Transition::Next(next) => state = next,
                Transition::Done(outcome) => {
                    if let Outcome::Stopped(reason) = &outcome {
                        let level = if reason.is_empty_result() {
                            Notice::Warning
                        } else {
                            Notice::Info
                        };
                        tracing::info!(?reason, "documentation workflow stopped");
                        self.prompter.notify(level, reason.message());
                    }
                    return Ok(outcome);
                }
            }
        }
    }

    fn step(&mut self, state: State) -> Result<Transition> {
        match state {
            State::Boards => self.boards(),
            State::CollectSprints(boards) => self.collect_sprints(&boards),
            State::SelectSprint(sprints) => self.select_sprint(sprints),
            State::SelectIssues(chosen) => self.select_issues(chosen),
            State::SelectPlanningDocs(selection) => self.select_planning_docs(selection),
            State::SelectTargetSpace(selection) => self.select_target_space(selection),
            State::SelectMode(selection, space_key) => self.select_mode(selection, space_key),
            State::Publish(selection, space_key, prefix) => {
                self.publish(selection, &space_key, prefix)
            }
        }
    }

    fn boards(&mut self) -> Result<Transition> {
        let boards = self.client.get_all_boards()?;
        if boards.is_empty() {
            return stop(StopReason::NoBoards);
        }
        tracing::debug!(count = boards.len(), "found boards");
        Ok(Transition::Next(State::CollectSprints(boards)))
    }

    fn collect_sprints(&mut self, boards: &[Board]) -> Result<Transition> {
        let sprints = collect_active_sprints(self.client, boards);
        if sprints.is_empty() {
            return stop(StopReason::NoActiveSprints);
        }
        Ok(Transition::Next(State::SelectSprint(sprints)))
    }

    fn select_sprint(&mut self, mut sprints: Vec<BoardSprint>) -> Result<Transition> {
        let choices: Vec<Choice> = sprints
            .iter()
            .map(|bs| Choice::with_detail(bs.label(), bs.sprint.state.to_string()))
            .collect();
        match self
            .prompter
            .select("Select a sprint to document", &choices)?
        {
            Some(i) if i < sprints.len() => {
                Ok(Transition::Next(State::SelectIssues(sprints.swap_remove(i))))
            }
            _ => stop(StopReason::SprintNotChosen),
        }
    }

    fn select_issues(&mut self, chosen: BoardSprint) -> Result<Transition> {
        let mut issues = self.client.get_sprint_issues(chosen.sprint.id)?;
        if issues.is_empty() {
            return stop(StopReason::NoIssuesInSprint);
        }
        let total_issues = issues.len();
        let choices: Vec<Choice> = issues
            .iter()
            .map(|i| Choice::with_detail(i.label(), format!("{} • {}", i.status_name(), i.type_name())))
            .collect();
        let message = format!("Select issues to document from {}", chosen.sprint.name);
        let picked = match self.prompter.multi_select(&message, &choices)? {
            Some(picked) if !picked.is_empty() => picked,
            _ => return stop(StopReason::NoIssuesSelected),
        };

        let mut keep = vec![false; issues.len()];
        for i in picked {
            if let Some(slot) = keep.get_mut(i) {
                *slot = true;
            }
        }
        let mut flags = keep.into_iter();
        issues.retain(|_| flags.next().unwrap_or(false));
        if issues.is_empty() {
            return stop(StopReason::NoIssuesSelected);
        }

        Ok(Transition::Next(State::SelectPlanningDocs(Selection {
            chosen,
            issues,
            total_issues,
            planning_docs: Vec::new(),
        })))
    }

    fn select_planning_docs(&mut self, mut selection: Selection) -> Result<Transition> {
        let root = self.options.workspace.clone();
        let found = planning::discover(&root);
        if found.is_empty() {
            return Ok(Transition::Next(State::SelectTargetSpace(selection)));
        }

        let ask = [Choice::new(PLANNING_YES), Choice::new(PLANNING_NO)];
        if self
            .prompter
            .select("Include planning documents from the workspace?", &ask)?
            != Some(0)
        {
            return Ok(Transition::Next(State::SelectTargetSpace(selection)));
        }

        let choices: Vec<Choice> = found
            .iter()
            .map(|p| Choice::new(planning::relative_path(&root, p)))
            .collect();
        if let Some(picked) = self
            .prompter
            .multi_select("Select planning documents", &choices)?
        {
            let paths: Vec<PathBuf> = picked.into_iter().filter_map(|i| found.get(i).cloned()).collect();
            selection.planning_docs = planning::load(&root, &paths);
        }
        Ok(Transition::Next(State::SelectTargetSpace(selection)))
    }

    fn select_target_space(&mut self, selection: Selection) -> Result<Transition> {
        let spaces = self.client.search_spaces()?;
        if spaces.is_empty() {
            return stop(StopReason::NoSpaces);
        }
        let choices: Vec<Choice> = spaces.iter().map(|s| Choice::new(s.label())).collect();
        let Some(i) = self
            .prompter
            .select("Select a Confluence space for the documentation", &choices)?
        else {
            return stop(StopReason::SpaceNotChosen);
        };
        let label = choices
            .get(i)
            .map(|c| c.label.as_str())
            .ok_or_else(|| SprintdocError::InvalidSpaceLabel(format!("choice #{i}")))?;
        let key = parse_space_label(label)
            .ok_or_else(|| SprintdocError::InvalidSpaceLabel(label.to_string()))?;
        Ok(Transition::Next(State::SelectMode(selection, key.to_string())))
    }

    fn select_mode(&mut self, selection: Selection, space_key: String) -> Result<Transition> {
        let choices = [
            Choice::with_detail(MODE_PRODUCTION, "Create official sprint documentation"),
            Choice::with_detail(MODE_TEST, "Create a test page for review"),
        ];
        let prefix = match self.prompter.select("Documentation mode", &choices)? {
            Some(0) => "",
            Some(1) => TITLE_PREFIX_TEST,
            _ => return stop(StopReason::ModeNotChosen),
        };
        Ok(Transition::Next(State::Publish(selection, space_key, prefix)))
    }

    fn publish(
        &mut self,
        selection: Selection,
        space_key: &str,
        prefix: &'static str,
    ) -> Result<Transition> {
        let document = render::render(&DocumentInput {
            sprint: &selection.chosen.sprint,
            board: &selection.chosen.board,
            issues: &selection.issues,
            total_issues: selection.total_issues,
            planning_docs: &selection.planning_docs,
            title_prefix: prefix,
            generated_at: self.options.generated_at,
        });

        let page = self.client.create_page(
            space_key,
            document.title(),
            document.markup_body(),
            None,
        )?;
        let page_url = self.client.page_url(space_key, &page.id);
        tracing::info!(page_id = %page.id, space_key, "published sprint documentation");

        let mut published = PublishedDocument {
            page_id: page.id,
            page_url,
            space_key: space_key.to_string(),
            issue_count: selection.issues.len(),
            planning_count: selection.planning_docs.len(),
            document,
            saved: Vec::new(),
        };
        self.prompter.notify(
            Notice::Info,
            &format!(
                "Sprint documentation created! ({} issues, {} planning docs)",
                published.issue_count, published.planning_count
            ),
        );
        self.after_publish(&selection.chosen.sprint.name, &mut published);
        Ok(Transition::Done(Outcome::Published(published)))
    }

    /// The page already exists at this point, so a failed follow-up only
    /// warns and the run still ends as published.
    fn after_publish(&mut self, sprint_name: &str, published: &mut PublishedDocument) {
        if let Err(e) = self.follow_up(sprint_name, published) {
            tracing::warn!(error = %e, page_url = %published.page_url, "post-publish action failed");
            self.prompter.notify(
                Notice::Warning,
                &format!(
                    "Documentation was published at {}, but the follow-up action failed: {e}",
                    published.page_url
                ),
            );
        }
    }

    fn follow_up(&mut self, sprint_name: &str, published: &mut PublishedDocument) -> Result<()> {
        let actions = [
            Choice::new(ACTION_OPEN),
            Choice::new(ACTION_LOCAL_COPY),
            Choice::new(ACTION_TEST_COPY),
        ];
        match self.prompter.select("What next?", &actions)? {
            Some(0) => self.prompter.open(&published.page_url)?,
            Some(1) => {
                let path = self.options.workspace.join(local_copy_filename(sprint_name));
                atomic_write(&path, published.document.local_copy(&published.page_url).as_bytes())?;
                self.prompter
                    .notify(Notice::Info, &format!("Local copy saved: {}", path.display()));
                published.saved.push(path);
            }
            Some(2) => {
                let timestamp = self.options.generated_at.format("%Y-%m-%dT%H-%M-%S").to_string();
                let path = self
                    .options
                    .test_output_dir
                    .join(test_copy_filename(sprint_name, &timestamp));
                atomic_write(&path, published.document.local_copy(&published.page_url).as_bytes())?;
                self.prompter
                    .notify(Notice::Info, &format!("Test copy saved: {}", path.display()));
                let open = [Choice::new(ACTION_OPEN_TEST_FILE)];
                if self.prompter.select("Open the test file?", &open)? == Some(0) {
                    self.prompter.open(&path.to_string_lossy())?;
                }
                published.saved.push(path);
            }
            _ => {}
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::testing::{Answer, ScriptedPrompter};
    use chrono::TimeZone;
    use mockito::{Matcher, Mock, ServerGuard};
    use serde_json::json;
    use tempfile::TempDir;

    fn client(server: &ServerGuard) -> AtlassianClient {
        AtlassianClient::with_base_url(server.url(), "dev@acme.com", "tok-1234567890").unwrap()
    }

    fn options(dir: &TempDir) -> WorkflowOptions {
        WorkflowOptions {
            workspace: dir.path().to_path_buf(),
            test_output_dir: dir.path().join("test-output"),
            generated_at: Utc.with_ymd_and_hms(2024, 1, 3, 9, 30, 15).unwrap(),
        }
    }

    /// One board "Web" with active sprint 10 holding WEB-1 and WEB-2, and
    /// one Confluence space DEV.
    fn seed(server: &mut ServerGuard) {
        server
            .mock("GET", "/rest/agile/1.0/board")
            .with_status(200)
            .with_body(json!({ "values": [{ "id": 1, "name": "Web" }] }).to_string())
            .create();
        server
            .mock("GET", "/rest/agile/1.0/board/1/sprint")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({ "values": [{
                    "id": 10, "name": "Sprint 5", "state": "active",
                    "startDate": "2024-01-01T09:00:00.000Z", "endDate": "2024-01-14T17:00:00.000Z"
                }]})
                .to_string(),
            )
            .create();
        server
            .mock("GET", "/rest/agile/1.0/sprint/10/issue")
            .with_status(200)
            .with_body(
                json!({ "issues": [
                    { "key": "WEB-1", "fields": { "summary": "Fix bug",
                      "status": { "name": "Done" }, "issuetype": { "name": "Bug" } } },
                    { "key": "WEB-2", "fields": { "summary": "Add login",
                      "status": { "name": "To Do" }, "issuetype": { "name": "Story" } } }
                ]})
                .to_string(),
            )
            .create();
        server
            .mock("GET", "/wiki/rest/api/space")
            .with_status(200)
            .with_body(json!({ "results": [{ "key": "DEV", "name": "Development" }] }).to_string())
            .create();
    }

    fn create_mock(server: &mut ServerGuard, title: &str) -> Mock {
        server
            .mock("POST", "/wiki/rest/api/content")
            .match_body(Matcher::PartialJson(json!({
                "title": title,
                "space": { "key": "DEV" }
            })))
            .with_status(200)
            .with_body(json!({ "id": "9001", "title": title }).to_string())
            .create()
    }

    fn run(server: &ServerGuard, dir: &TempDir, prompter: &mut ScriptedPrompter) -> Outcome {
        let c = client(server);
        DocsWorkflow::new(&c, prompter, options(dir)).run().unwrap()
    }

    #[test]
    fn publishes_selected_issues() {
        let mut server = mockito::Server::new();
        seed(&mut server);
        let create = create_mock(&mut server, "Sprint Documentation: Sprint 5");
        let dir = TempDir::new().unwrap();

        let mut prompter = ScriptedPrompter::new(vec![
            Answer::SelectLabel("Sprint 5 (Web)"),
            Answer::Multi(Some(vec![0])),
            Answer::SelectLabel("Development (DEV)"),
            Answer::SelectLabel(MODE_PRODUCTION),
            Answer::SelectLabel(ACTION_OPEN),
        ]);
        let outcome = run(&server, &dir, &mut prompter);
        create.assert();

        let Outcome::Published(published) = outcome else {
            panic!("expected published outcome");
        };
        assert_eq!(published.page_id, "9001");
        assert_eq!(published.issue_count, 1);
        assert!(published.page_url.ends_with("/wiki/spaces/DEV/pages/9001"));
        let body = published.document.markup_body();
        assert!(body.contains("1 of 2 total"));
        assert!(body.contains("WEB-1: Fix bug"));
        assert!(!body.contains("WEB-2"));
        assert_eq!(prompter.opened, vec![published.page_url.clone()]);
        assert_eq!(prompter.offered[1], vec!["WEB-1: Fix bug", "WEB-2: Add login"]);
    }

    #[test]
    fn zero_selection_never_publishes() {
        let mut server = mockito::Server::new();
        seed(&mut server);
        let create = server
            .mock("POST", "/wiki/rest/api/content")
            .expect(0)
            .create();
        let dir = TempDir::new().unwrap();

        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Select(Some(0)),
            Answer::Multi(Some(vec![])),
        ]);
        let outcome = run(&server, &dir, &mut prompter);
        create.assert();
        assert!(matches!(outcome, Outcome::Stopped(StopReason::NoIssuesSelected)));
        assert_eq!(prompter.notices_containing("No issues selected"), 1);
    }

    #[test]
    fn no_boards_stops_early() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/rest/agile/1.0/board")
            .with_status(200)
            .with_body(json!({ "values": [] }).to_string())
            .create();
        let dir = TempDir::new().unwrap();
        let mut prompter = ScriptedPrompter::new(vec![]);
        let outcome = run(&server, &dir, &mut prompter);
        assert!(matches!(outcome, Outcome::Stopped(StopReason::NoBoards)));
        assert_eq!(prompter.notices[0].0, Notice::Warning);
    }

    #[test]
    fn empty_sprint_stops_with_guidance() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/rest/agile/1.0/board")
            .with_status(200)
            .with_body(json!({ "values": [{ "id": 1, "name": "Web" }] }).to_string())
            .create();
        server
            .mock("GET", "/rest/agile/1.0/board/1/sprint")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({ "values": [{ "id": 10, "name": "Sprint 5", "state": "active" }] }).to_string())
            .create();
        server
            .mock("GET", "/rest/agile/1.0/sprint/10/issue")
            .with_status(200)
            .with_body(json!({ "issues": [] }).to_string())
            .create();
        let dir = TempDir::new().unwrap();
        let mut prompter = ScriptedPrompter::new(vec![Answer::Select(Some(0))]);
        let outcome = run(&server, &dir, &mut prompter);
        assert!(matches!(outcome, Outcome::Stopped(StopReason::NoIssuesInSprint)));
        assert_eq!(prompter.notices_containing("Add issues to the sprint"), 1);
    }

    #[test]
    fn sprint_fetch_failure_is_an_error() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/rest/agile/1.0/board")
            .with_status(200)
            .with_body(json!({ "values": [{ "id": 1, "name": "Web" }] }).to_string())
            .create();
        server
            .mock("GET", "/rest/agile/1.0/board/1/sprint")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({ "values": [{ "id": 10, "name": "Sprint 5", "state": "active" }] }).to_string())
            .create();
        server
            .mock("GET", "/rest/agile/1.0/sprint/10/issue")
            .with_status(503)
            .create();
        let dir = TempDir::new().unwrap();
        let c = client(&server);
        let mut prompter = ScriptedPrompter::new(vec![Answer::Select(Some(0))]);
        let err = DocsWorkflow::new(&c, &mut prompter, options(&dir))
            .run()
            .unwrap_err();
        assert!(err.to_string().contains("get sprint issues for sprint (10)"));
    }

    #[test]
    fn cancelled_mode_stops_without_publishing() {
        let mut server = mockito::Server::new();
        seed(&mut server);
        let create = server
            .mock("POST", "/wiki/rest/api/content")
            .expect(0)
            .create();
        let dir = TempDir::new().unwrap();
        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Select(Some(0)),
            Answer::Multi(Some(vec![0, 1])),
            Answer::Select(Some(0)),
            Answer::Select(None),
        ]);
        let outcome = run(&server, &dir, &mut prompter);
        create.assert();
        assert!(matches!(outcome, Outcome::Stopped(StopReason::ModeNotChosen)));
    }

    #[test]
    fn planning_docs_and_test_copy() {
        let mut server = mockito::Server::new();
        seed(&mut server);
        let create = create_mock(&mut server, "[TEST] Sprint Documentation: Sprint 5");
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/plan.md"), "Roadmap for Q1").unwrap();
        std::fs::write(dir.path().join("notes.md"), "Scratch").unwrap();

        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Select(Some(0)),
            Answer::Multi(Some(vec![0, 1])),
            Answer::SelectLabel(PLANNING_YES),
            Answer::Multi(Some(vec![0])),
            Answer::Select(Some(0)),
            Answer::SelectLabel(MODE_TEST),
            Answer::SelectLabel(ACTION_TEST_COPY),
            Answer::SelectLabel(ACTION_OPEN_TEST_FILE),
        ]);
        let outcome = run(&server, &dir, &mut prompter);
        create.assert();

        let Outcome::Published(published) = outcome else {
            panic!("expected published outcome");
        };
        assert_eq!(published.planning_count, 1);
        assert_eq!(prompter.offered[3], vec!["docs/plan.md", "notes.md"]);

        let expected = dir
            .path()
            .join("test-output")
            .join("test-sprint-doc-Sprint-5-2024-01-03T09-30-15.md");
        assert_eq!(published.saved, vec![expected.clone()]);
        let saved = std::fs::read_to_string(&expected).unwrap();
        assert!(saved.contains("Roadmap for Q1"));
        assert!(saved.contains(&published.page_url));
        assert_eq!(prompter.opened, vec![expected.to_string_lossy().to_string()]);
    }

    #[test]
    fn failed_test_copy_still_reports_published_page() {
        let mut server = mockito::Server::new();
        seed(&mut server);
        let create = create_mock(&mut server, "[TEST] Sprint Documentation: Sprint 5");
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "occupied").unwrap();

        let c = client(&server);
        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Select(Some(0)),
            Answer::Multi(Some(vec![0])),
            Answer::Select(Some(0)),
            Answer::SelectLabel(MODE_TEST),
            Answer::SelectLabel(ACTION_TEST_COPY),
        ]);
        let opts = WorkflowOptions {
            test_output_dir: blocker.join("test-output"),
            ..options(&dir)
        };
        let outcome = DocsWorkflow::new(&c, &mut prompter, opts).run().unwrap();
        create.assert();

        let Outcome::Published(published) = outcome else {
            panic!("expected published outcome");
        };
        assert_eq!(published.page_id, "9001");
        assert!(published.saved.is_empty());
        assert_eq!(prompter.notices_containing("follow-up action failed"), 1);
        let (level, message) = prompter.notices.last().unwrap();
        assert_eq!(*level, Notice::Warning);
        assert!(message.contains(&published.page_url));
    }

    #[test]
    fn declining_planning_docs_and_saving_local_copy() {
        let mut server = mockito::Server::new();
        seed(&mut server);
        create_mock(&mut server, "Sprint Documentation: Sprint 5");
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("plan.md"), "Roadmap").unwrap();

        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Select(Some(0)),
            Answer::Multi(Some(vec![1])),
            Answer::SelectLabel(PLANNING_NO),
            Answer::Select(Some(0)),
            Answer::SelectLabel(MODE_PRODUCTION),
            Answer::SelectLabel(ACTION_LOCAL_COPY),
        ]);
        let outcome = run(&server, &dir, &mut prompter);
        let Outcome::Published(published) = outcome else {
            panic!("expected published outcome");
        };
        assert_eq!(published.planning_count, 0);
        let path = dir.path().join("sprint-documentation-Sprint-5.md");
        assert_eq!(published.saved, vec![path.clone()]);
        let saved = std::fs::read_to_string(path).unwrap();
        assert!(saved.contains("WEB-2: Add login"));
        assert!(!saved.contains("Roadmap"));
    }
}
