//! `ssh-cli show [NAME]`: every directive of one host.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::listing;
use crate::commands::{Outcome, resolve_host};

/// Run `ssh-cli show [NAME]`.
///
/// # Errors
///
/// Returns an error if the host does not exist or the config file cannot be
/// loaded.
pub fn run(app: &AppContext, name: Option<&str>) -> Result<Outcome> {
    let Some(name) = resolve_host(app, name)? else {
        return Ok(Outcome::Cancelled);
    };
    let detail = listing::show_host(&app.loader, &app.settings, &app.keys(), &name)?;
    app.renderer().render_host(&detail)?;
    Ok(Outcome::Done)
}
