use thiserror::Error;

#[derive(Debug, Error)]
pub enum SprintdocError {
    #[error("failed to {operation} ({target}): {detail}")]
    Remote {
        operation: &'static str,
        target: String,
        detail: String,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("invalid issue key '{0}': expected PROJECT-NUMBER")]
    InvalidIssueKey(String),

    #[error("could not determine space key from '{0}'")]
    InvalidSpaceLabel(String),

    #[error("prompt failed: {0}")]
    Prompt(String),

    #[error("interactive input required but stdin is not a terminal")]
    NonInteractive,

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SprintdocError {
    pub(crate) fn remote(
        operation: &'static str,
        target: impl Into<String>,
        detail: impl ToString,
    ) -> Self {
        SprintdocError::Remote {
            operation,
            target: target.into(),
            detail: detail.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SprintdocError>;
