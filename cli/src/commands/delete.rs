//! `ssh-cli delete [NAME]`: remove a host with its key pair and known_hosts entries.

use anyhow::Result;

use crate::app::AppContext;
use crate::commands::{Outcome, resolve_host};
use crate::domain::OperationState;

/// Run `ssh-cli delete [NAME]`.
///
/// Every cleanup step is attempted; a step that fails is reported and the
/// command exits non-zero, but the host record is still removed.
///
/// # Errors
///
/// Returns an error if the host does not exist or the config file cannot be
/// loaded or written.
pub async fn run(app: &AppContext, name: Option<&str>) -> Result<Outcome> {
    let Some(name) = resolve_host(app, name)? else {
        return Ok(Outcome::Cancelled);
    };

    if !app.non_interactive
        && !app.confirm(
            &format!("Delete host '{name}', its key pair and known_hosts entries?"),
            false,
        )?
    {
        app.output.info("Cancelled.");
        return Ok(Outcome::Cancelled);
    }

    let report = app.lifecycle().delete_host(&name, &app.reporter()).await?;
    app.renderer().render_deleted(&report)?;
    Ok(match report.state() {
        OperationState::Committed => Outcome::Done,
        _ => Outcome::Failed,
    })
}
