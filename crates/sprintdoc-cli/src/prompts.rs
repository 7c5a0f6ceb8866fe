use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, MultiSelect, Password, Select};
use sprintdoc_core::config::mask;
use sprintdoc_core::prompt::{Choice, Notice, Prompter, TextPrompt};
use sprintdoc_core::{Result, SprintdocError};
use std::io::{self, IsTerminal};

/// [`Prompter`] backed by terminal prompts.
///
/// Esc / `q` dismisses a pick list; an empty answer dismisses a text prompt.
/// Secret prompts keep the stored value when left empty.
#[derive(Default)]
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_terminal(&self) -> Result<()> {
        if io::stdin().is_terminal() {
            Ok(())
        } else {
            Err(SprintdocError::NonInteractive)
        }
    }
}

fn prompt_err(e: dialoguer::Error) -> SprintdocError {
    SprintdocError::Prompt(e.to_string())
}

fn display(choice: &Choice) -> String {
    match &choice.detail {
        Some(detail) => format!("{}  [{detail}]", choice.label),
        None => choice.label.clone(),
    }
}

impl Prompter for DialoguerPrompter {
    fn text(&mut self, prompt: TextPrompt<'_>) -> Result<Option<String>> {
        self.ensure_terminal()?;

        if prompt.secret {
            let message = if prompt.initial.is_empty() {
                prompt.message.to_string()
            } else {
                format!(
                    "{} (leave empty to keep {})",
                    prompt.message,
                    mask(prompt.initial)
                )
            };
            loop {
                let value = Password::with_theme(&self.theme)
                    .with_prompt(&message)
                    .allow_empty_password(true)
                    .interact()
                    .map_err(prompt_err)?;
                let value = if value.is_empty() {
                    prompt.initial.to_string()
                } else {
                    value
                };
                if value.is_empty() {
                    return Ok(None);
                }
                match prompt.validate.map(|v| v(&value)) {
                    Some(Err(msg)) => eprintln!("{msg}"),
                    _ => return Ok(Some(value)),
                }
            }
        }

        let message = match prompt.placeholder {
            Some(placeholder) => format!("{} ({placeholder})", prompt.message),
            None => prompt.message.to_string(),
        };
        let validate = prompt.validate;
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(message)
            .allow_empty(true)
            .validate_with(move |value: &String| -> std::result::Result<(), String> {
                match validate {
                    Some(v) if !value.is_empty() => v(value),
                    _ => Ok(()),
                }
            });
        if !prompt.initial.is_empty() {
            input = input.with_initial_text(prompt.initial);
        }
        let value = input.interact_text().map_err(prompt_err)?;
        Ok(Some(value).filter(|v| !v.trim().is_empty()))
    }

    fn select(&mut self, message: &str, choices: &[Choice]) -> Result<Option<usize>> {
        self.ensure_terminal()?;
        let items: Vec<String> = choices.iter().map(display).collect();
        Select::with_theme(&self.theme)
            .with_prompt(message)
            .items(&items)
            .default(0)
            .interact_opt()
            .map_err(prompt_err)
    }

    fn multi_select(&mut self, message: &str, choices: &[Choice]) -> Result<Option<Vec<usize>>> {
        self.ensure_terminal()?;
        let items: Vec<String> = choices.iter().map(display).collect();
        MultiSelect::with_theme(&self.theme)
            .with_prompt(format!("{message} (space to toggle, enter to confirm)"))
            .items(&items)
            .interact_opt()
            .map_err(prompt_err)
    }

    fn notify(&mut self, level: Notice, message: &str) {
        match level {
            Notice::Info => eprintln!("{message}"),
            Notice::Warning => eprintln!("warning: {message}"),
        }
    }

    fn open(&mut self, target: &str) -> Result<()> {
        tracing::debug!(url = target, "opening");
        open::that(target)?;
        Ok(())
    }
}
