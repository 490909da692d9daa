//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::domain::config::RECOGNIZED_VARS;
use crate::domain::{
    CreateReport, DeleteReport, FileRemoval, HostDetail, HostRecord, HostSummary,
    OperationState, PairRemoval, PublicKeyStatus, Settings, StepOutcome, SweepOutcome,
    SweepReport,
};
use crate::output::OutputContext;

const NAME_WIDTH: usize = 16;
const HOSTNAME_WIDTH: usize = 28;
const KEY_WIDTH: usize = 30;
const USER_WIDTH: usize = 12;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        self.ctx.info(&format!("ssh-cli v{version}"));
    }

    /// Render the host table.
    pub fn render_hosts(&self, hosts: &[HostSummary], settings: &Settings) {
        if hosts.is_empty() {
            self.ctx.info(&format!(
                "No hosts in {}. Add one: ssh-cli create",
                settings.config_path.display()
            ));
            return;
        }
        if self.ctx.quiet {
            return;
        }

        println!(
            "  {}",
            format!(
                "{:<NAME_WIDTH$} {:<HOSTNAME_WIDTH$} {:<KEY_WIDTH$} {:<USER_WIDTH$} {}",
                "NAME", "HOSTNAME", "PUBLIC KEY", "USER", "PORT"
            )
            .style(self.ctx.styles.header)
        );
        for host in hosts {
            let name = fit(&host.name, NAME_WIDTH);
            println!(
                "  {} {:<HOSTNAME_WIDTH$} {:<KEY_WIDTH$} {:<USER_WIDTH$} {}",
                format!("{name:<NAME_WIDTH$}").style(self.ctx.styles.host),
                fit(host.hostname.as_deref().unwrap_or("--"), HOSTNAME_WIDTH),
                fit(&public_key_cell(&host.public_key), KEY_WIDTH),
                fit(host.user.as_deref().unwrap_or("--"), USER_WIDTH),
                host.port,
            );
        }
    }

    /// Render every directive of one host and its public key.
    pub fn render_host(&self, detail: &HostDetail) {
        if self.ctx.quiet {
            return;
        }
        self.render_record(&detail.record);
        println!();
        match &detail.public_key {
            PublicKeyStatus::Present(key) => {
                self.ctx.header("Public key:");
                println!("  {key}");
            }
            status => self.ctx.kv("Public key:", &public_key_cell(status)),
        }
    }

    /// Render a record as it will be written to the config file.
    pub fn render_record(&self, record: &HostRecord) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.header(&format!("Host {}", record.name));
        for (keyword, value) in record.directives() {
            self.ctx.kv(&format!("  {keyword:<14}"), &value);
        }
    }

    /// Render the result of `ssh-cli create`.
    pub fn render_created(&self, report: &CreateReport) {
        match report.state {
            OperationState::Committed => {
                self.ctx
                    .success(&format!("Host '{}' saved", report.record.name));
                if let PublicKeyStatus::Present(key) = &report.public_key {
                    self.ctx.info("Public key (add it to the server's authorized_keys):");
                    if !self.ctx.quiet {
                        println!("  {key}");
                    }
                }
            }
            OperationState::RolledBack | OperationState::PartiallyFailed => {
                self.ctx
                    .warn(&format!("Host '{}' discarded", report.record.name));
                if let Some(removal) = &report.rollback {
                    self.render_pair_removal(removal);
                }
            }
        }
    }

    /// Render the result of `ssh-cli delete`, one line per sub-step.
    pub fn render_deleted(&self, report: &DeleteReport) {
        if let Some(removal) = &report.keys {
            self.render_pair_removal(removal);
        }
        for removal in &report.trust_store {
            match &removal.outcome {
                StepOutcome::Done => self
                    .ctx
                    .success(&format!("Removed '{}' from known_hosts", removal.target)),
                StepOutcome::Failed(reason) => self.ctx.warn(&format!(
                    "Could not remove '{}' from known_hosts: {reason}",
                    removal.target
                )),
            }
        }
        match report.state() {
            OperationState::Committed => {
                self.ctx.success(&format!("Host '{}' deleted", report.name));
            }
            _ => self.ctx.warn(&format!(
                "Host '{}' deleted, but some cleanup steps did not complete",
                report.name
            )),
        }
    }

    /// Render the result of a cleanup sweep.
    pub fn render_sweep(&self, report: &SweepReport) {
        if report.is_noop() {
            self.ctx.success("No orphaned key files");
            return;
        }
        for item in &report.items {
            match item {
                SweepOutcome::Removed { removal } | SweepOutcome::Failed { removal } => {
                    self.render_pair_removal(removal);
                }
                SweepOutcome::Skipped { pair } => self.ctx.info(&format!("Kept {pair}")),
            }
        }
        let summary = format!(
            "{} removed, {} kept, {} failed",
            report.removed(),
            report.skipped(),
            report.failed()
        );
        if report.state() == OperationState::Committed {
            self.ctx.success(&summary);
        } else {
            self.ctx.warn(&summary);
        }
    }

    /// Render the effective settings.
    pub fn render_settings(&self, settings: &Settings) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.header("Settings");
        println!();
        let rows = [
            ("config_path:", settings.config_path.display().to_string()),
            ("key_dir:", settings.key_dir.display().to_string()),
            ("key_type:", settings.key_type.clone()),
            (
                "default_user:",
                settings
                    .default_user
                    .clone()
                    .unwrap_or_else(|| "(not set)".to_string()),
            ),
            ("default_port:", settings.default_port.to_string()),
            ("editor:", settings.editor.clone()),
            ("ssh_program:", settings.ssh_program.clone()),
            ("keygen_program:", settings.keygen_program.clone()),
            (
                "process_timeout:",
                format!("{}s", settings.process_timeout.as_secs()),
            ),
        ];
        for (key, value) in rows {
            println!("  {key:<20} {value}");
        }
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in RECOGNIZED_VARS {
            println!(
                "    {:<18} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
    }

    fn render_pair_removal(&self, removal: &PairRemoval) {
        let private = removal.pair.private_path().display().to_string();
        let public = removal.pair.public_path().display().to_string();
        for (path, outcome) in [(private, &removal.private), (public, &removal.public)] {
            match outcome {
                FileRemoval::Removed => self.ctx.success(&format!("Removed {path}")),
                FileRemoval::NotFound => self.ctx.warn(&format!("{path} was already gone")),
                FileRemoval::Failed(reason) => {
                    self.ctx.error(&format!("Could not remove {path}: {reason}"));
                }
            }
        }
    }
}

/// Table cell for a public key: abbreviated key, `not found`, or `--`.
#[must_use]
pub fn public_key_cell(status: &PublicKeyStatus) -> String {
    match status {
        PublicKeyStatus::None => "--".to_string(),
        PublicKeyStatus::NotFound(_) => "not found".to_string(),
        PublicKeyStatus::Present(key) => abbreviate_key(key),
    }
}

/// `ssh-ed25519 AAAAC3Nz…Xk9a`: algorithm plus the ends of the key blob.
#[must_use]
pub fn abbreviate_key(key: &str) -> String {
    let mut parts = key.split_whitespace();
    let (Some(algo), Some(blob)) = (parts.next(), parts.next()) else {
        return key.to_string();
    };
    let chars: Vec<char> = blob.chars().collect();
    if chars.len() <= 12 {
        return format!("{algo} {blob}");
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{algo} {head}…{tail}")
}

/// Truncate `s` to `width` characters, marking the cut with `…`.
#[must_use]
pub fn fit(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
