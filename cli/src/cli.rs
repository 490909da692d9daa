//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands::{self, Outcome};

/// Manage SSH config hosts and their key pairs
#[derive(Parser)]
#[command(
    name = "ssh-cli",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Answer prompts with their defaults and confirm destructive actions
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Interactive menu over every operation
    Shell,

    /// List hosts with their public keys
    List,

    /// Show all directives of a host
    Show {
        /// Host name (prompted for when omitted)
        name: Option<String>,
    },

    /// Open an SSH session to a host
    Connect {
        /// Host name (prompted for when omitted)
        name: Option<String>,
    },

    /// Add a host, optionally with a new key pair
    Create(commands::create::CreateArgs),

    /// Delete a host, its key pair and its known_hosts entries
    Delete {
        /// Host name (prompted for when omitted)
        name: Option<String>,
    },

    /// Edit the SSH config in $EDITOR
    Edit,

    /// Remove key pairs no host references
    Cleanup {
        /// Remove every orphan without asking per pair
        #[arg(long)]
        all: bool,
    },

    /// Show effective settings
    Config,

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if settings cannot be read or the command fails.
    pub async fn run(self) -> Result<Outcome> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            command,
        } = self;
        let flags = AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes },
        };
        let app = AppContext::new(&flags)?;

        match command {
            Command::Shell => commands::shell::run(&app).await,
            Command::List => commands::list::run(&app),
            Command::Show { name } => commands::show::run(&app, name.as_deref()),
            Command::Connect { name } => commands::connect::run(&app, name.as_deref()).await,
            Command::Create(args) => commands::create::run(&app, &args).await,
            Command::Delete { name } => commands::delete::run(&app, name.as_deref()).await,
            Command::Edit => commands::editor::run(&app).await,
            Command::Cleanup { all } => commands::cleanup::run(&app, all),
            Command::Config => commands::config::run(&app),
            Command::Version => commands::version::run(&app),
        }
    }
}
