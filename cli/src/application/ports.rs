//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::domain::{HostField, HostRecord};

// ── Host Record Store Ports ───────────────────────────────────────────────────

/// In-memory view of the host records in the SSH config file.
///
/// Mutations touch the working copy only; nothing reaches disk until
/// `persist` is called.
pub trait HostRecordStore {
    /// Names of all managed host records.
    fn hosts(&self) -> BTreeSet<String>;
    /// Look up a record by name.
    fn get(&self, name: &str) -> Option<HostRecord>;
    /// Every `IdentityFile` value in the file, unexpanded.
    ///
    /// Covers global directives and every block, managed or not, and every
    /// occurrence within a block.
    fn identity_files(&self) -> Vec<PathBuf>;
    /// Append a new record.
    ///
    /// # Errors
    ///
    /// Returns an error if a record with the same name already exists.
    fn add(&mut self, record: &HostRecord) -> Result<()>;
    /// Set one managed directive of an existing record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not exist.
    fn set(&mut self, name: &str, field: HostField, value: &str) -> Result<()>;
    /// Remove a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not exist.
    fn remove(&mut self, name: &str) -> Result<()>;
    /// Write the store back, preserving every directive it does not manage.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn persist(&self, path: &Path) -> Result<()>;
}

/// Loads a fresh `HostRecordStore` at the start of each operation.
pub trait HostStoreLoader {
    type Store: HostRecordStore;
    /// Load the store from `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingConfigFile` if the file does not exist, or
    /// an error if it cannot be read.
    fn load(&self, path: &Path) -> Result<Self::Store>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program with captured output and the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds the
    /// timeout. A non-zero exit is not an error.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program attached to the terminal and return its exit status.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts the key directory filesystem operations.
///
/// IO errors keep their `std::io::Error` source in the anyhow chain so callers
/// can tell "not found" from other failures.
pub trait LocalFs {
    /// Returns `true` if `path` exists.
    fn exists(&self, path: &Path) -> bool;
    /// Create a directory (and parents) with owner-only permissions.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    fn create_private_dir(&self, path: &Path) -> Result<()>;
    /// Regular files directly inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;
    /// Read a file as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> Result<String>;
    /// Remove a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be removed.
    fn remove_file(&self, path: &Path) -> Result<()>;
}

/// Returns `true` if the error chain contains an IO "not found" error.
#[must_use]
pub fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
    })
}

// ── User Interaction Ports ────────────────────────────────────────────────────

/// Minimal "ask the user" interface the core blocks on.
pub trait UserPrompt {
    /// Ask a yes/no question.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
