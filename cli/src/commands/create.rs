//! `ssh-cli create`: add a host, optionally with a new key pair.
//!
//! Missing flags are prompted for. The pending record is shown and only
//! written after the user confirms; declining deletes the generated key pair.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::listing;
use crate::commands::Outcome;
use crate::domain::validate::{parse_port, suggested_name, validate_hostname, validate_name};
use crate::domain::{
    CreateReport, HostCandidate, HostError, KeyRequest, OperationState, PublicKeyStatus,
};
use crate::output::{Renderer, TerminalReporter, progress};

/// Arguments for the create command.
#[derive(Args, Default)]
pub struct CreateArgs {
    /// Domain name or IP address to connect to
    #[arg(long)]
    pub hostname: Option<String>,

    /// Host name used with `ssh <name>` (defaults to the first label of the hostname)
    #[arg(long)]
    pub name: Option<String>,

    /// Remote user (defaults to $USER)
    #[arg(long)]
    pub user: Option<String>,

    /// Remote port (defaults to $SSH_DEFAULT_PORT or 22)
    #[arg(long)]
    pub port: Option<String>,

    /// Generate a key pair without asking
    #[arg(long, conflicts_with = "no_key")]
    pub key: bool,

    /// Do not generate a key pair
    #[arg(long)]
    pub no_key: bool,
}

/// Run `ssh-cli create`.
///
/// # Errors
///
/// Returns an error if input is invalid, key generation fails or the config
/// file cannot be written. No key file is left behind in any error case.
pub async fn run(app: &AppContext, args: &CreateArgs) -> Result<Outcome> {
    let existing = listing::host_names(&app.loader, &app.settings)?;
    let candidate = gather_candidate(app, args, &existing)?;

    let generate = if args.key {
        true
    } else if args.no_key {
        false
    } else {
        app.confirm("Generate a key pair for this host?", true)?
    };
    let key = if generate {
        Some(KeyRequest {
            key_type: app.settings.key_type.clone(),
            passphrase: app.prompt.passphrase("Key passphrase (empty for none)")?,
        })
    } else {
        None
    };

    let lifecycle = app.lifecycle();
    let pending = if key.is_some() && app.output.show_progress() && !app.is_json() {
        let pb = progress::spinner(&format!(
            "Generating {} key pair for '{}'...",
            app.settings.key_type, candidate.name
        ));
        let silent = TerminalReporter::new(&app.output).muted(true);
        match lifecycle.create_host(&candidate, key.as_ref(), &silent).await {
            Ok(pending) => {
                progress::finish_ok(&pb, "Key pair generated");
                pending
            }
            Err(e) => {
                progress::finish_error(&pb, "Could not create host");
                return Err(e);
            }
        }
    } else {
        lifecycle
            .create_host(&candidate, key.as_ref(), &app.reporter())
            .await?
    };

    if let Renderer::Human(r) = app.renderer() {
        r.render_record(pending.record());
    }
    let save = match app.confirm("Save this host?", true) {
        Ok(save) => save,
        Err(e) => {
            lifecycle.discard(pending);
            return Err(e);
        }
    };

    if !save {
        let record = pending.record().clone();
        let rollback = lifecycle.discard(pending);
        app.renderer().render_created(&CreateReport {
            state: OperationState::RolledBack,
            record,
            public_key: PublicKeyStatus::None,
            rollback,
        })?;
        return Ok(Outcome::Cancelled);
    }

    let record = lifecycle.commit(pending)?;
    let public_key = lifecycle.keys().public_key(&record);
    app.renderer().render_created(&CreateReport {
        state: OperationState::Committed,
        record,
        public_key,
        rollback: None,
    })?;
    Ok(Outcome::Done)
}

/// Fill a `HostCandidate` from flags, prompting for whatever is missing.
///
/// Prompted values are validated as they are typed. A `--hostname` flag is
/// checked up front so a bad value fails before any other prompt; the
/// remaining flag values are validated by the lifecycle service.
fn gather_candidate(
    app: &AppContext,
    args: &CreateArgs,
    existing: &[String],
) -> Result<HostCandidate> {
    let hostname = match &args.hostname {
        Some(hostname) => {
            validate_hostname(hostname)?;
            hostname.clone()
        }
        None => app.prompt.input("Hostname (domain or IP)", None, |v| {
            validate_hostname(v).map_err(|e| e.to_string())
        })?,
    };

    let name = match &args.name {
        Some(name) => name.clone(),
        None => {
            let suggestion = suggested_name(&hostname);
            app.prompt.input("Name", suggestion.as_deref(), |v| {
                validate_name(v).map_err(|e| e.to_string())?;
                if existing.iter().any(|n| n == v) {
                    return Err(HostError::AlreadyExists(v.to_string()).to_string());
                }
                Ok(())
            })?
        }
    };

    let user = match &args.user {
        Some(user) => user.clone(),
        None => app
            .prompt
            .input("User", app.settings.default_user.as_deref(), |v| {
                if v.trim().is_empty() {
                    Err("User cannot be empty.".to_string())
                } else {
                    Ok(())
                }
            })?,
    };

    let port = match &args.port {
        Some(port) => parse_port(port)?,
        None => {
            let default = app.settings.default_port.to_string();
            let typed = app.prompt.input("Port", Some(&default), |v| {
                parse_port(v).map(|_| ()).map_err(|e| e.to_string())
            })?;
            parse_port(&typed)?
        }
    };

    Ok(HostCandidate {
        name,
        hostname,
        user: Some(user),
        port: Some(port),
    })
}
