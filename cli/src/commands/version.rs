//! Version command

use anyhow::Result;

use crate::app::AppContext;
use crate::commands::Outcome;

/// Run the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(app: &AppContext) -> Result<Outcome> {
    app.renderer().render_version(env!("CARGO_PKG_VERSION"))?;
    Ok(Outcome::Done)
}
