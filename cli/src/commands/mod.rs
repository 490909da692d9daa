//! Command implementations.
//!
//! Each operation is a closed variant of `Operation`; the interactive shell
//! dispatches through `Operation::from_name`, the CLI through its subcommands.
//! Commands gather input, call one application service and render the result.

pub mod cleanup;
pub mod config;
pub mod connect;
pub mod create;
pub mod delete;
pub mod editor;
pub mod list;
pub mod shell;
pub mod show;
pub mod version;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::listing;

/// How an operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Completed; any warnings were already printed.
    Done,
    /// The user declined or picked Cancel; nothing was changed.
    Cancelled,
    /// Ran to the end but at least one step failed.
    Failed,
}

/// The user-facing operations offered by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Delete,
    List,
    Show,
    Cleanup,
    Connect,
    Editor,
}

/// Name → operation lookup table, in menu order.
const OPERATIONS: [(&str, Operation); 7] = [
    ("list", Operation::List),
    ("show", Operation::Show),
    ("connect", Operation::Connect),
    ("create", Operation::Create),
    ("delete", Operation::Delete),
    ("edit", Operation::Editor),
    ("cleanup", Operation::Cleanup),
];

impl Operation {
    /// Every operation, in menu order.
    #[must_use]
    pub fn all() -> impl Iterator<Item = Self> {
        OPERATIONS.iter().map(|(_, op)| *op)
    }

    /// Look up an operation by its menu name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        OPERATIONS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, op)| *op)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        OPERATIONS
            .iter()
            .find(|(_, op)| *op == self)
            .map_or("", |(n, _)| n)
    }

    #[must_use]
    pub fn help(self) -> &'static str {
        match self {
            Self::Create => "Add a host and optionally generate its key pair",
            Self::Delete => "Delete a host with its key pair and known_hosts entries",
            Self::List => "List hosts",
            Self::Show => "Show all settings of a host",
            Self::Cleanup => "Remove key pairs no host uses",
            Self::Connect => "Connect to a host",
            Self::Editor => "Edit the SSH config file",
        }
    }

    /// Run the operation, prompting for every input it needs.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    pub async fn execute(self, app: &AppContext) -> Result<Outcome> {
        match self {
            Self::Create => create::run(app, &create::CreateArgs::default()).await,
            Self::Delete => delete::run(app, None).await,
            Self::List => list::run(app),
            Self::Show => show::run(app, None),
            Self::Cleanup => cleanup::run(app, false),
            Self::Connect => connect::run(app, None).await,
            Self::Editor => editor::run(app).await,
        }
    }
}

/// Use `name` if given, otherwise let the user pick a host.
///
/// Returns `None` when the user cancels or there are no hosts.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded or the prompt fails.
pub(crate) fn resolve_host(app: &AppContext, name: Option<&str>) -> Result<Option<String>> {
    if let Some(name) = name {
        return Ok(Some(name.to_string()));
    }
    let names = listing::host_names(&app.loader, &app.settings)?;
    if names.is_empty() {
        if !app.is_json() {
            app.output
                .info(&format!("No hosts in {}", app.settings.config_path.display()));
        }
        return Ok(None);
    }
    let choice = app.prompt.select("Host", &names)?;
    Ok(choice.map(|idx| names[idx].clone()))
}
