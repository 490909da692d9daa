//! `ssh-cli cleanup [--all]`: remove key pairs no host references.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::cleanup_service;
use crate::commands::Outcome;
use crate::domain::OperationState;

/// Run `ssh-cli cleanup [--all]`.
///
/// Without `--all` (or `--yes`) each orphaned pair is confirmed separately.
///
/// # Errors
///
/// Returns an error if the config file or key directory cannot be read, or a
/// prompt fails.
pub fn run(app: &AppContext, all: bool) -> Result<Outcome> {
    let confirm_per_item = !(all || app.non_interactive);
    let report = cleanup_service::sweep(
        &app.loader,
        &app.settings,
        &app.keys(),
        &app.prompt,
        confirm_per_item,
    )?;
    app.renderer().render_sweep(&report)?;
    Ok(match report.state() {
        OperationState::Committed => Outcome::Done,
        _ => Outcome::Failed,
    })
}
