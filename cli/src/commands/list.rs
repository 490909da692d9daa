//! `ssh-cli list`: table of hosts with their public keys.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::listing;
use crate::commands::Outcome;

/// Run `ssh-cli list`.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded.
pub fn run(app: &AppContext) -> Result<Outcome> {
    let hosts = listing::list_hosts(&app.loader, &app.settings, &app.keys())?;
    app.renderer().render_hosts(&hosts, &app.settings)?;
    Ok(Outcome::Done)
}
