//! Terminal prompts backed by `dialoguer`.
//!
//! Every interactive widget the commands use lives here. In non-interactive
//! mode (`--yes`, `CI`, `SSH_CLI_YES`) nothing reads from the terminal:
//! confirmations return their default and inputs take their default or fail.

use anyhow::{Context, Result, bail};

use crate::application::ports::UserPrompt;

/// Label of the first entry of every selection list.
pub const CANCEL_ITEM: &str = "Cancel";

/// Production `UserPrompt` plus the richer widgets used by the shell.
pub struct DialoguerPrompt {
    non_interactive: bool,
}

impl DialoguerPrompt {
    #[must_use]
    pub fn new(non_interactive: bool) -> Self {
        Self { non_interactive }
    }

    /// Pick one of `items`. A `Cancel` entry is listed first and is the
    /// default; choosing it (or pressing Esc) returns `None`.
    ///
    /// # Errors
    ///
    /// Returns an error in non-interactive mode or if the terminal prompt
    /// fails.
    pub fn select(&self, prompt: &str, items: &[String]) -> Result<Option<usize>> {
        if self.non_interactive {
            bail!("{prompt}: a value is required in non-interactive mode");
        }
        let mut entries = Vec::with_capacity(items.len() + 1);
        entries.push(CANCEL_ITEM.to_string());
        entries.extend(items.iter().cloned());
        let choice = dialoguer::Select::new()
            .with_prompt(prompt)
            .items(&entries)
            .default(0)
            .interact_opt()
            .context("reading selection")?;
        Ok(choice.and_then(|idx| idx.checked_sub(1)))
    }

    /// Read a line of text, re-prompting until `validate` accepts it.
    ///
    /// # Errors
    ///
    /// Returns an error in non-interactive mode when there is no default, if
    /// the default fails `validate`, or if the terminal prompt fails.
    pub fn input<V>(&self, prompt: &str, default: Option<&str>, mut validate: V) -> Result<String>
    where
        V: FnMut(&str) -> Result<(), String>,
    {
        if self.non_interactive {
            let Some(value) = default else {
                bail!("{prompt}: a value is required in non-interactive mode");
            };
            validate(value).map_err(|reason| anyhow::anyhow!("{prompt}: {reason}"))?;
            return Ok(value.to_string());
        }
        let mut input = dialoguer::Input::<String>::new().with_prompt(prompt);
        if let Some(value) = default {
            input = input.default(value.to_string());
        }
        input
            .validate_with(|value: &String| validate(value))
            .interact_text()
            .context("reading input")
    }

    /// Read a key passphrase twice without echo. Empty is allowed.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails.
    pub fn passphrase(&self, prompt: &str) -> Result<String> {
        if self.non_interactive {
            return Ok(String::new());
        }
        dialoguer::Password::new()
            .with_prompt(prompt)
            .with_confirmation("Repeat passphrase", "Passphrases do not match")
            .allow_empty_password(true)
            .interact()
            .context("reading passphrase")
    }
}

impl UserPrompt for DialoguerPrompt {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
