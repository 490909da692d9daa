//! Application service: hand the terminal to `ssh` or the editor.
//!
//! Neither call has a timeout; both inherit stdio and only their exit status
//! is interpreted.

use std::process::ExitStatus;

use anyhow::{Context, Result, bail};

use crate::application::ports::{CommandRunner, HostRecordStore, HostStoreLoader};
use crate::domain::{HostError, Settings};

/// Open an interactive session to a managed host.
///
/// # Errors
///
/// Returns `HostError::NotFound` if `name` is not a managed host, or an error
/// if `ssh` cannot be started.
pub async fn connect(
    loader: &impl HostStoreLoader,
    runner: &impl CommandRunner,
    settings: &Settings,
    name: &str,
) -> Result<ExitStatus> {
    let store = loader.load(&settings.config_path)?;
    if !store.hosts().contains(name) {
        return Err(HostError::NotFound(name.to_string()).into());
    }
    tracing::debug!(program = %settings.ssh_program, host = name, "connecting");
    runner
        .run_status(&settings.ssh_program, &["--", name])
        .await
        .with_context(|| format!("starting {}", settings.ssh_program))
}

/// Open the config file in the configured editor.
///
/// `EDITOR` may carry arguments (`code --wait`); it is split with shell
/// quoting rules.
///
/// # Errors
///
/// Returns an error if the editor value is empty or unparsable, or the
/// editor cannot be started.
pub async fn open_editor(runner: &impl CommandRunner, settings: &Settings) -> Result<ExitStatus> {
    let Some(words) = shlex::split(&settings.editor) else {
        bail!("cannot parse editor command: {}", settings.editor);
    };
    let Some((program, args)) = words.split_first() else {
        bail!("editor command is empty");
    };
    let config = settings.config_path.to_string_lossy();
    let mut argv: Vec<&str> = args.iter().map(String::as_str).collect();
    argv.push(&config);
    tracing::debug!(%program, "opening editor");
    runner
        .run_status(program, &argv)
        .await
        .with_context(|| format!("starting editor {program}"))
}
