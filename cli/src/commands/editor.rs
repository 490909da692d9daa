//! `ssh-cli edit`: open the SSH config in `$EDITOR`, then offer a cleanup.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::session;
use crate::commands::{Outcome, cleanup};

/// Run `ssh-cli edit`.
///
/// Hand-edits can drop `IdentityFile` lines, so an orphan sweep is offered
/// once the editor exits successfully.
///
/// # Errors
///
/// Returns an error if the editor cannot be started or the cleanup fails.
pub async fn run(app: &AppContext) -> Result<Outcome> {
    let status = session::open_editor(&app.runner, &app.settings).await?;
    if !status.success() {
        app.output.warn(&format!(
            "{} exited with {}",
            app.settings.editor,
            status
                .code()
                .map_or_else(|| "a signal".to_string(), |c| format!("code {c}"))
        ));
        return Ok(Outcome::Failed);
    }

    if app.confirm("Look for orphaned key files now?", false)? {
        return cleanup::run(app, false);
    }
    Ok(Outcome::Done)
}
