use crate::error::{Result, SprintdocError};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const CONFIG_DIR: &str = ".sprintdoc";
pub const CONFIG_FILE: &str = "config.yaml";
pub const TEST_OUTPUT_DIR: &str = "test-output";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `~/.sprintdoc/config.yaml`
pub fn default_config_path() -> Result<PathBuf> {
    let home = home::home_dir().ok_or(SprintdocError::HomeNotFound)?;
    Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
}

pub fn test_output_dir(workspace: &Path) -> PathBuf {
    workspace.join(TEST_OUTPUT_DIR)
}

/// Replace every character outside `[A-Za-z0-9]` with `-`.
pub fn slugify(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

pub fn local_copy_filename(sprint_name: &str) -> String {
    format!("sprint-documentation-{}.md", slugify(sprint_name))
}

/// `timestamp` is expected in `YYYY-MM-DDTHH-MM-SS` form.
pub fn test_copy_filename(sprint_name: &str, timestamp: &str) -> String {
    format!("test-sprint-doc-{}-{timestamp}.md", slugify(sprint_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_replaces_each_non_alphanumeric() {
        assert_eq!(slugify("Sprint 5"), "Sprint-5");
        assert_eq!(slugify("Q1: API / UI"), "Q1--API---UI");
        assert_eq!(slugify("Ünïcode"), "-n-code");
    }

    #[test]
    fn filenames() {
        assert_eq!(
            local_copy_filename("Sprint 5"),
            "sprint-documentation-Sprint-5.md"
        );
        assert_eq!(
            test_copy_filename("Sprint 5", "2024-01-01T10-20-30"),
            "test-sprint-doc-Sprint-5-2024-01-01T10-20-30.md"
        );
    }

    #[test]
    fn test_output_dir_is_under_workspace() {
        let dir = test_output_dir(Path::new("/work"));
        assert_eq!(dir, PathBuf::from("/work/test-output"));
    }
}
