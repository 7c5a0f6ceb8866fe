//! The interactive seam between workflows and whatever drives them.
//!
//! Workflows never talk to a terminal directly. They ask a [`Prompter`] for
//! input and receive `None` when the user dismissed the prompt, which ends
//! the current run without an error.

use crate::error::Result;

/// The result of one interactive step: carry on with a value, or stop because
/// the user backed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<T> {
    Continue(T),
    Cancelled,
}

impl<T> Step<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Step::Cancelled)
    }

    pub fn continued(self) -> Option<T> {
        match self {
            Step::Continue(v) => Some(v),
            Step::Cancelled => None,
        }
    }
}

impl<T> From<Option<T>> for Step<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Step::Continue(v),
            None => Step::Cancelled,
        }
    }
}

/// Severity of a message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Info,
    Warning,
}

/// Returns `Err(message)` when the value is not acceptable.
pub type Validator = fn(&str) -> std::result::Result<(), String>;

/// A free-text question.
#[derive(Debug, Clone, Copy)]
pub struct TextPrompt<'a> {
    pub message: &'a str,
    /// Prefilled value; empty for none.
    pub initial: &'a str,
    pub placeholder: Option<&'a str>,
    /// Hide the typed characters.
    pub secret: bool,
    pub validate: Option<Validator>,
}

impl<'a> TextPrompt<'a> {
    pub fn new(message: &'a str) -> Self {
        Self {
            message,
            initial: "",
            placeholder: None,
            secret: false,
            validate: None,
        }
    }

    pub fn initial(mut self, value: &'a str) -> Self {
        self.initial = value;
        self
    }

    pub fn placeholder(mut self, value: &'a str) -> Self {
        self.placeholder = Some(value);
        self
    }

    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    pub fn validate(mut self, validator: Validator) -> Self {
        self.validate = Some(validator);
        self
    }
}

/// One entry of a pick list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub detail: Option<String>,
}

impl Choice {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            detail: None,
        }
    }

    pub fn with_detail(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            detail: Some(detail.into()),
        }
    }
}

/// Interactive user interface used by credential setup and workflows.
///
/// Every question returns `Ok(None)` when the user dismisses it. Errors are
/// reserved for the interface itself failing (closed terminal, no TTY).
pub trait Prompter {
    /// Ask for a line of text. Implementations re-ask until `validate` passes.
    fn text(&mut self, prompt: TextPrompt<'_>) -> Result<Option<String>>;

    /// Pick exactly one item; returns its index.
    fn select(&mut self, message: &str, choices: &[Choice]) -> Result<Option<usize>>;

    /// Pick any number of items; returns their indices in list order.
    fn multi_select(&mut self, message: &str, choices: &[Choice]) -> Result<Option<Vec<usize>>>;

    /// Show a message.
    fn notify(&mut self, level: Notice, message: &str);

    /// Open a URL or file with the system handler.
    fn open(&mut self, target: &str) -> Result<()>;
}
