//! Settings read once at process start.
//!
//! Pure functions only: the variable lookup and home directory are passed in
//! so construction is testable without touching the process environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::domain::error::ConfigError;
use crate::domain::host::DEFAULT_SSH_PORT;
use crate::domain::keys::expand_home;
use crate::domain::validate::parse_port;

// ── Recognized variables ─────────────────────────────────────────────────────

pub const ENV_CONFIG_PATH: &str = "SSH_CONFIG_PATH";
pub const ENV_KEY_DIR: &str = "SSH_KEY_DIR";
pub const ENV_KEY_TYPE: &str = "SSH_KEY_TYPE";
pub const ENV_USER: &str = "USER";
pub const ENV_DEFAULT_PORT: &str = "SSH_DEFAULT_PORT";
pub const ENV_EDITOR: &str = "EDITOR";
pub const ENV_SSH: &str = "SSH_CLI_SSH";
pub const ENV_KEYGEN: &str = "SSH_CLI_KEYGEN";
pub const ENV_TIMEOUT: &str = "SSH_CLI_TIMEOUT";

/// Every variable `Settings::from_lookup` reads, in display order.
pub const RECOGNIZED_VARS: &[&str] = &[
    ENV_CONFIG_PATH,
    ENV_KEY_DIR,
    ENV_KEY_TYPE,
    ENV_USER,
    ENV_DEFAULT_PORT,
    ENV_EDITOR,
    ENV_SSH,
    ENV_KEYGEN,
    ENV_TIMEOUT,
];

pub const DEFAULT_KEY_TYPE: &str = "ed25519";
pub const DEFAULT_EDITOR: &str = "nano";
pub const DEFAULT_SSH_PROGRAM: &str = "ssh";
pub const DEFAULT_KEYGEN_PROGRAM: &str = "ssh-keygen";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Immutable tool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub config_path: PathBuf,
    pub key_dir: PathBuf,
    pub key_type: String,
    pub default_user: Option<String>,
    pub default_port: u16,
    /// Editor invocation; may carry arguments (`code -w`).
    pub editor: String,
    pub ssh_program: String,
    pub keygen_program: String,
    /// Applies to key generation and trust-store edits, not interactive sessions.
    #[serde(serialize_with = "serialize_secs")]
    pub process_timeout: Duration,
    /// Used to expand `~/` in identity file paths.
    #[serde(skip)]
    pub home: Option<PathBuf>,
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_secs())
}

impl Settings {
    /// Build settings from a variable lookup and the user's home directory.
    ///
    /// Empty variables are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a malformed port or timeout and
    /// `ConfigError::NoHomeDir` when a path default needs a home directory that
    /// is unknown.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        home: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let ssh_dir = || {
            home.map(|h| h.join(".ssh"))
                .ok_or_else(|| ConfigError::NoHomeDir(ENV_CONFIG_PATH.to_string()))
        };

        let config_path = match var(ENV_CONFIG_PATH) {
            Some(p) => expand_home(Path::new(&p), home),
            None => ssh_dir()?.join("config"),
        };
        let key_dir = match var(ENV_KEY_DIR) {
            Some(p) => expand_home(Path::new(&p), home),
            None => ssh_dir()
                .map_err(|_| ConfigError::NoHomeDir(ENV_KEY_DIR.to_string()))?
                .join("keys"),
        };

        let default_port = match var(ENV_DEFAULT_PORT) {
            Some(p) => parse_port(&p).map_err(|e| ConfigError::InvalidValue {
                var: ENV_DEFAULT_PORT.to_string(),
                value: p.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_SSH_PORT,
        };

        let process_timeout = match var(ENV_TIMEOUT) {
            Some(t) => match t.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: ENV_TIMEOUT.to_string(),
                        value: t,
                        reason: "must be a positive number of seconds".to_string(),
                    });
                }
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            config_path,
            key_dir,
            key_type: var(ENV_KEY_TYPE).unwrap_or_else(|| DEFAULT_KEY_TYPE.to_string()),
            default_user: var(ENV_USER),
            default_port,
            editor: var(ENV_EDITOR).unwrap_or_else(|| DEFAULT_EDITOR.to_string()),
            ssh_program: var(ENV_SSH).unwrap_or_else(|| DEFAULT_SSH_PROGRAM.to_string()),
            keygen_program: var(ENV_KEYGEN).unwrap_or_else(|| DEFAULT_KEYGEN_PROGRAM.to_string()),
            process_timeout,
            home: home.map(Path::to_path_buf),
        })
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
