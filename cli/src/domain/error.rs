//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs` or `std::process`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Host errors ───────────────────────────────────────────────────────────────

/// Errors related to host record validation and lookup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("Not a valid hostname, must be a domain or an IP address: '{0}'")]
    InvalidHostname(String),

    #[error("Host name cannot be empty.")]
    EmptyName,

    #[error(
        "Invalid host name '{0}': use letters, digits, '.', '_' or '-' and do not start with '.' or '-'"
    )]
    InvalidName(String),

    #[error("Invalid host name '{0}': names ending in '.pub' are reserved for public keys")]
    ReservedName(String),

    #[error("Host '{0}' already exists, delete it first.")]
    AlreadyExists(String),

    #[error("Port must be a number between 1 and 65535 (got '{0}')")]
    InvalidPort(String),

    #[error("Host '{0}' not found.")]
    NotFound(String),
}

// ── Key errors ────────────────────────────────────────────────────────────────

/// Errors related to key pair generation.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("{program} failed ({}): {stderr}", exit_label(.code))]
    ProcessFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Key file already exists at {}. Run 'ssh-cli cleanup' or remove it first.", .0.display())]
    AlreadyExists(PathBuf),

    #[error("{program} succeeded but {} was not written", .path.display())]
    Incomplete { program: String, path: PathBuf },
}

#[allow(clippy::ref_option)] // thiserror binds fields by reference
fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {c}"),
        None => "terminated by signal".to_string(),
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to settings and the config file location.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found at {}. Create it first (e.g. touch {}).", .0.display(), .0.display())]
    MissingConfigFile(PathBuf),

    #[error("Invalid value for {var}: '{value}' ({reason})")]
    InvalidValue {
        var: String,
        value: String,
        reason: String,
    },

    #[error("Cannot determine home directory; set {0} explicitly")]
    NoHomeDir(String),
}
