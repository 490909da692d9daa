//! Application service: create and delete a single host record.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Create is fail-fast with rollback of the generated key pair; delete runs
//! every cleanup step and reports each one.

use anyhow::{Context, Result};

use crate::application::ports::{
    CommandRunner, HostRecordStore, HostStoreLoader, LocalFs, ProgressReporter,
};
use crate::application::services::key_files::KeyFileManager;
use crate::domain::validate::{validate_hostname, validate_name};
use crate::domain::{
    DeleteReport, HostCandidate, HostError, HostField, HostRecord, KeyFilePair, KeyRequest,
    PairRemoval, Settings, StepOutcome, TrustStoreRemoval,
};

/// A validated record held in a working copy of the store, not yet persisted.
///
/// Must be passed to `HostLifecycle::commit` or `HostLifecycle::discard`.
#[must_use = "a pending host must be committed or discarded"]
pub struct PendingHost<S> {
    store: S,
    record: HostRecord,
    key_pair: Option<KeyFilePair>,
}

impl<S> PendingHost<S> {
    /// The record as it will be written.
    pub fn record(&self) -> &HostRecord {
        &self.record
    }

    /// The key pair generated for this record, if any.
    pub fn key_pair(&self) -> Option<&KeyFilePair> {
        self.key_pair.as_ref()
    }
}

/// Orchestrates host record creation and deletion.
pub struct HostLifecycle<'a, L, R, F> {
    loader: &'a L,
    runner: &'a R,
    keys: KeyFileManager<'a, R, F>,
    settings: &'a Settings,
}

impl<'a, L, R, F> HostLifecycle<'a, L, R, F>
where
    L: HostStoreLoader,
    R: CommandRunner,
    F: LocalFs,
{
    #[must_use]
    pub fn new(loader: &'a L, runner: &'a R, fs: &'a F, settings: &'a Settings) -> Self {
        Self {
            loader,
            runner,
            keys: KeyFileManager::new(runner, fs, settings),
            settings,
        }
    }

    /// Key file operations bound to the same settings.
    #[must_use]
    pub fn keys(&self) -> &KeyFileManager<'a, R, F> {
        &self.keys
    }

    /// Validate `candidate`, add it to a fresh working copy of the store and
    /// optionally generate its key pair.
    ///
    /// Validation order: hostname, name, uniqueness. Nothing is written to disk
    /// unless a key pair is requested; nothing is persisted until `commit`.
    ///
    /// # Errors
    ///
    /// Returns a `HostError` validation variant, a store load error, or the
    /// key generation error. On any error no key file is left behind.
    pub async fn create_host(
        &self,
        candidate: &HostCandidate,
        key: Option<&KeyRequest>,
        reporter: &impl ProgressReporter,
    ) -> Result<PendingHost<L::Store>> {
        validate_hostname(&candidate.hostname)?;
        validate_name(&candidate.name)?;

        let mut store = self.loader.load(&self.settings.config_path)?;
        if store.hosts().contains(&candidate.name) {
            return Err(HostError::AlreadyExists(candidate.name.clone()).into());
        }

        let mut record = HostRecord {
            name: candidate.name.clone(),
            hostname: Some(candidate.hostname.clone()),
            user: candidate
                .user
                .clone()
                .or_else(|| self.settings.default_user.clone()),
            port: Some(candidate.port.unwrap_or(self.settings.default_port)),
            identity_file: None,
            extra: Vec::new(),
        };
        store.add(&record)?;

        let mut key_pair = None;
        if let Some(request) = key {
            reporter.step(&format!(
                "generating {} key pair for '{}'...",
                request.key_type, record.name
            ));
            let pair = self
                .keys
                .create(&record.name, &request.key_type, &request.passphrase)
                .await?;
            let identity = pair.private_path().to_string_lossy().into_owned();
            if let Err(e) = store.set(&record.name, HostField::IdentityFile, &identity) {
                self.roll_back(&record.name, &pair);
                return Err(e);
            }
            record.identity_file = Some(pair.private_path().to_path_buf());
            key_pair = Some(pair);
        }

        Ok(PendingHost {
            store,
            record,
            key_pair,
        })
    }

    /// Persist a pending host.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written; the generated key pair
    /// is removed in that case.
    pub fn commit(&self, pending: PendingHost<L::Store>) -> Result<HostRecord> {
        let PendingHost {
            store,
            record,
            key_pair,
        } = pending;
        if let Err(e) = store.persist(&self.settings.config_path) {
            if let Some(pair) = &key_pair {
                self.roll_back(&record.name, pair);
            }
            return Err(e.context(format!("saving host '{}'", record.name)));
        }
        tracing::debug!(host = %record.name, "host saved");
        Ok(record)
    }

    /// Drop a pending host and delete any key pair generated for it.
    ///
    /// A removal that fails is logged as well as returned.
    pub fn discard(&self, pending: PendingHost<L::Store>) -> Option<PairRemoval> {
        let name = pending.record.name;
        pending.key_pair.map(|pair| self.roll_back(&name, &pair))
    }

    fn roll_back(&self, host: &str, pair: &KeyFilePair) -> PairRemoval {
        let removal = self.keys.delete(pair);
        if removal.has_failure() {
            tracing::warn!(
                host,
                pair = %pair,
                private = ?removal.private,
                public = ?removal.public,
                "key pair rollback failed, files left behind"
            );
        } else {
            tracing::debug!(host, pair = %pair, "rolled back key pair");
        }
        removal
    }

    /// Delete a host record with its key pair and trust-store entries.
    ///
    /// The caller must have obtained confirmation. Key and trust-store
    /// cleanup run first and never block the record removal; their results
    /// are in the report.
    ///
    /// # Errors
    ///
    /// Returns `HostError::NotFound` if `name` is not in the store, or an
    /// error if the store cannot be loaded or persisted.
    pub async fn delete_host(
        &self,
        name: &str,
        reporter: &impl ProgressReporter,
    ) -> Result<DeleteReport> {
        let mut store = self.loader.load(&self.settings.config_path)?;
        let record = store
            .get(name)
            .ok_or_else(|| HostError::NotFound(name.to_string()))?;

        let keys = record.identity_file.as_deref().map(|identity| {
            reporter.step(&format!("removing key files for '{name}'..."));
            self.keys.delete(&self.keys.pair_from_identity(identity))
        });

        let mut trust_store = Vec::new();
        for target in record.trust_store_targets() {
            reporter.step(&format!("removing '{target}' from known_hosts..."));
            let outcome = self.forget_host(&target).await;
            trust_store.push(TrustStoreRemoval { target, outcome });
        }

        store.remove(name)?;
        store
            .persist(&self.settings.config_path)
            .with_context(|| format!("saving config after removing '{name}'"))?;

        Ok(DeleteReport {
            name: name.to_string(),
            keys,
            trust_store,
        })
    }

    async fn forget_host(&self, target: &str) -> StepOutcome {
        let program = self.settings.keygen_program.as_str();
        tracing::debug!(program, target, "removing trust-store entry");
        match self.runner.run(program, &["-R", target]).await {
            Ok(output) if output.status.success() => StepOutcome::Done,
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                let reason = if stderr.is_empty() {
                    output.status.code().map_or_else(
                        || "terminated by signal".to_string(),
                        |c| format!("exit code {c}"),
                    )
                } else {
                    stderr
                };
                tracing::warn!(target, %reason, "trust-store removal failed");
                StepOutcome::Failed(reason)
            }
            Err(e) => {
                tracing::warn!(target, error = %e, "trust-store removal failed");
                StepOutcome::Failed(format!("{e:#}"))
            }
        }
    }
}
