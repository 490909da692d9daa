//! `ssh-cli config`: show effective settings.

use anyhow::Result;

use crate::app::AppContext;
use crate::commands::Outcome;

/// Run `ssh-cli config`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(app: &AppContext) -> Result<Outcome> {
    app.renderer().render_settings(&app.settings)?;
    Ok(Outcome::Done)
}
