//! Host record types.
//!
//! Pure data: no I/O, no async, no filesystem access.

use std::path::PathBuf;

use serde::Serialize;

/// Port used when a record or candidate does not specify one.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Directives managed by this tool inside a `Host` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostField {
    HostName,
    User,
    Port,
    IdentityFile,
}

impl HostField {
    /// Canonical keyword as written to the config file.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::HostName => "HostName",
            Self::User => "User",
            Self::Port => "Port",
            Self::IdentityFile => "IdentityFile",
        }
    }

    /// Case-insensitive lookup from a config keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        [Self::HostName, Self::User, Self::Port, Self::IdentityFile]
            .into_iter()
            .find(|f| f.keyword().eq_ignore_ascii_case(keyword))
    }
}

/// A named SSH connection profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostRecord {
    /// Lookup key, unique across the store.
    pub name: String,
    pub hostname: Option<String>,
    pub user: Option<String>,
    pub port: Option<u16>,
    /// Private key path; the public key lives at `<identity_file>.pub`.
    pub identity_file: Option<PathBuf>,
    /// Directives this tool does not manage, in file order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<(String, String)>,
}

impl HostRecord {
    /// Port with the SSH default applied.
    #[must_use]
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_SSH_PORT)
    }

    /// All directives in display order, managed ones first.
    #[must_use]
    pub fn directives(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if let Some(hostname) = &self.hostname {
            out.push((HostField::HostName.keyword().to_string(), hostname.clone()));
        }
        if let Some(user) = &self.user {
            out.push((HostField::User.keyword().to_string(), user.clone()));
        }
        if let Some(port) = self.port {
            out.push((HostField::Port.keyword().to_string(), port.to_string()));
        }
        if let Some(identity) = &self.identity_file {
            out.push((
                HostField::IdentityFile.keyword().to_string(),
                identity.display().to_string(),
            ));
        }
        out.extend(self.extra.iter().cloned());
        out
    }

    /// Trust-store entries to forget when the record is deleted: the alias,
    /// then the real hostname (`[host]:port` form for non-default ports).
    #[must_use]
    pub fn trust_store_targets(&self) -> Vec<String> {
        let mut targets = vec![self.name.clone()];
        if let Some(hostname) = self.hostname.as_deref().filter(|h| *h != self.name) {
            let port = self.effective_port();
            if port == DEFAULT_SSH_PORT {
                targets.push(hostname.to_string());
            } else {
                targets.push(format!("[{hostname}]:{port}"));
            }
        }
        targets
    }
}

/// User input for a new host, before validation.
#[derive(Debug, Clone, Default)]
pub struct HostCandidate {
    pub name: String,
    pub hostname: String,
    /// Falls back to the configured default user when `None`.
    pub user: Option<String>,
    /// Falls back to the configured default port when `None`.
    pub port: Option<u16>,
}

/// Request to generate a key pair alongside a new host.
#[derive(Debug, Clone)]
pub struct KeyRequest {
    /// Algorithm passed to the key generator, e.g. `ed25519`.
    pub key_type: String,
    /// Empty string means no passphrase.
    pub passphrase: String,
}

/// Row shown by `ssh-cli list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostSummary {
    pub name: String,
    pub hostname: Option<String>,
    pub user: Option<String>,
    pub port: u16,
    pub public_key: PublicKeyStatus,
}

/// A record with its public key, as shown by `ssh-cli show`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostDetail {
    #[serde(flatten)]
    pub record: HostRecord,
    pub public_key: PublicKeyStatus,
}

/// Lookup result for a record's public key file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum PublicKeyStatus {
    /// The record has no identity file.
    None,
    /// The identity file is set but `<identity_file>.pub` is absent.
    NotFound(PathBuf),
    Present(String),
}
