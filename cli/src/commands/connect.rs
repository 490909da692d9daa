//! `ssh-cli connect [NAME]`: hand the terminal to `ssh`.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::session;
use crate::commands::{Outcome, resolve_host};

/// Run `ssh-cli connect [NAME]`.
///
/// # Errors
///
/// Returns an error if the host does not exist or `ssh` cannot be started.
pub async fn run(app: &AppContext, name: Option<&str>) -> Result<Outcome> {
    let Some(name) = resolve_host(app, name)? else {
        return Ok(Outcome::Cancelled);
    };
    let status = session::connect(&app.loader, &app.runner, &app.settings, &name).await?;
    if status.success() {
        let local = std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
        app.output.info(&format!("Welcome back on {local}!"));
        Ok(Outcome::Done)
    } else {
        let code = status
            .code()
            .map_or_else(|| "a signal".to_string(), |c| format!("code {c}"));
        app.output
            .warn(&format!("{} exited with {code}", app.settings.ssh_program));
        Ok(Outcome::Failed)
    }
}
