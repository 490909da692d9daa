//! `ssh-cli shell`: interactive menu looping over every operation.

use anyhow::{Result, bail};

use crate::app::AppContext;
use crate::commands::{Operation, Outcome};

/// Run `ssh-cli shell` until the user picks Cancel.
///
/// A failing operation is reported and the menu is shown again.
///
/// # Errors
///
/// Returns an error in non-interactive mode or if the menu prompt fails.
pub async fn run(app: &AppContext) -> Result<Outcome> {
    if app.non_interactive {
        bail!("the interactive shell needs a terminal; run a subcommand instead");
    }

    let names: Vec<&str> = Operation::all().map(Operation::name).collect();
    let labels: Vec<String> = Operation::all()
        .map(|op| format!("{:<8} {}", op.name(), op.help()))
        .collect();

    loop {
        println!();
        let Some(idx) = app.prompt.select("What do you want to do?", &labels)? else {
            return Ok(Outcome::Done);
        };
        let Some(op) = Operation::from_name(names[idx]) else {
            continue;
        };
        tracing::debug!(operation = op.name(), "shell dispatch");
        match op.execute(app).await {
            Ok(Outcome::Cancelled) => app.output.info("Cancelled."),
            Ok(_) => {}
            Err(e) => app.output.error(&format!("{e:#}")),
        }
    }
}
