//! Application service: key pair files on disk.
//!
//! Creates pairs through the external key generator, removes them as a pair,
//! and reconciles the key directory against the host records.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::application::ports::{CommandRunner, LocalFs, is_not_found};
use crate::domain::keys::{expand_home, orphaned_pairs};
use crate::domain::{
    FileRemoval, HostRecord, KeyError, KeyFilePair, PairRemoval, PublicKeyStatus, Settings,
};

/// Owns every read, write and delete of key pair files.
pub struct KeyFileManager<'a, R, F> {
    runner: &'a R,
    fs: &'a F,
    settings: &'a Settings,
}

impl<'a, R: CommandRunner, F: LocalFs> KeyFileManager<'a, R, F> {
    #[must_use]
    pub fn new(runner: &'a R, fs: &'a F, settings: &'a Settings) -> Self {
        Self {
            runner,
            fs,
            settings,
        }
    }

    /// Deterministic pair location for a host name.
    #[must_use]
    pub fn pair_for(&self, host_name: &str) -> KeyFilePair {
        KeyFilePair::for_host(&self.settings.key_dir, host_name)
    }

    /// Pair referenced by an identity file value from the config.
    #[must_use]
    pub fn pair_from_identity(&self, identity_file: &Path) -> KeyFilePair {
        KeyFilePair::new(expand_home(identity_file, self.settings.home.as_deref()))
    }

    /// Generate a new key pair for `host_name`.
    ///
    /// `host_name` must already be validated. Either both files exist
    /// afterwards or neither does.
    ///
    /// # Errors
    ///
    /// Returns `KeyError::AlreadyExists` if either target file is present,
    /// `KeyError::ProcessFailed` if the generator exits non-zero,
    /// `KeyError::Incomplete` if it exits zero without writing both files, or
    /// an error if the generator cannot be run.
    pub async fn create(
        &self,
        host_name: &str,
        key_type: &str,
        passphrase: &str,
    ) -> Result<KeyFilePair> {
        let pair = self.pair_for(host_name);
        for path in [pair.private_path().to_path_buf(), pair.public_path()] {
            if self.fs.exists(&path) {
                return Err(KeyError::AlreadyExists(path).into());
            }
        }

        self.fs.create_private_dir(&self.settings.key_dir)?;

        let program = self.settings.keygen_program.as_str();
        let comment = format!("key_for_{host_name}");
        let base = pair.private_path().to_string_lossy().into_owned();
        tracing::debug!(program, host = host_name, key_type, "generating key pair");

        let output = match self
            .runner
            .run(
                program,
                &[
                    "-t",
                    key_type,
                    "-C",
                    comment.as_str(),
                    "-f",
                    base.as_str(),
                    "-N",
                    passphrase,
                    "-q",
                ],
            )
            .await
        {
            Ok(output) => output,
            Err(e) => {
                self.remove_partial(&pair);
                return Err(e.context(format!("generating key pair for '{host_name}'")));
            }
        };

        if !output.status.success() {
            self.remove_partial(&pair);
            return Err(KeyError::ProcessFailed {
                program: program.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        for path in [pair.private_path().to_path_buf(), pair.public_path()] {
            if !self.fs.exists(&path) {
                self.remove_partial(&pair);
                return Err(KeyError::Incomplete {
                    program: program.to_string(),
                    path,
                }
                .into());
            }
        }

        Ok(pair)
    }

    /// Remove both files of a pair. Each removal is attempted independently.
    #[must_use]
    pub fn delete(&self, pair: &KeyFilePair) -> PairRemoval {
        PairRemoval {
            pair: pair.clone(),
            private: self.remove_one(pair.private_path()),
            public: self.remove_one(&pair.public_path()),
        }
    }

    /// Key pairs in the key directory that none of `identities` references.
    ///
    /// `identities` are raw `IdentityFile` values; a leading `~/` is expanded
    /// against the home directory. A missing key directory has no orphans.
    ///
    /// # Errors
    ///
    /// Returns an error if the key directory exists but cannot be listed.
    pub fn list_orphans(
        &self,
        identities: impl IntoIterator<Item = PathBuf>,
    ) -> Result<BTreeSet<KeyFilePair>> {
        let found = match self.fs.list_files(&self.settings.key_dir) {
            Ok(files) => files,
            Err(e) if is_not_found(&e) => {
                tracing::debug!(dir = %self.settings.key_dir.display(), "key directory missing");
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        let home = self.settings.home.as_deref();
        let used = identities.into_iter().map(|p| expand_home(&p, home));
        Ok(orphaned_pairs(found, used))
    }

    /// Public key of a record; never fails.
    #[must_use]
    pub fn public_key(&self, record: &HostRecord) -> PublicKeyStatus {
        let Some(identity) = record.identity_file.as_deref() else {
            return PublicKeyStatus::None;
        };
        let path = self.pair_from_identity(identity).public_path();
        match self.fs.read_to_string(&path) {
            Ok(content) => PublicKeyStatus::Present(content.trim().to_string()),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "public key unreadable");
                PublicKeyStatus::NotFound(path)
            }
        }
    }

    fn remove_one(&self, path: &Path) -> FileRemoval {
        match self.fs.remove_file(path) {
            Ok(()) => FileRemoval::Removed,
            Err(e) if is_not_found(&e) => FileRemoval::NotFound,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "key file removal failed");
                FileRemoval::Failed(format!("{e:#}"))
            }
        }
    }

    /// Best-effort removal of whatever a failed generation left behind.
    fn remove_partial(&self, pair: &KeyFilePair) {
        let removal = self.delete(pair);
        if removal.has_failure() {
            tracing::warn!(pair = %pair, "could not remove partial key files");
        }
    }
}
