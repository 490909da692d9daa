//! Shared test helpers: in-memory host store, fake process runner and a
//! filesystem wrapper with failure injection.

#![allow(dead_code, clippy::expect_used)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use ssh_cli::application::ports::{
    CommandRunner, HostRecordStore, HostStoreLoader, LocalFs, ProgressReporter,
};
use ssh_cli::domain::{ConfigError, HostError, HostField, HostRecord, Settings};
use ssh_cli::infra::fs::StdFs;

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
/// On Windows `ExitStatusExt::from_raw` takes the exit code directly.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Settings ─────────────────────────────────────────────────────────────────

/// Settings rooted in a temp directory; the config file lives at
/// `<root>/config` and keys under `<root>/keys`.
pub fn settings(root: &Path) -> Settings {
    Settings {
        config_path: root.join("config"),
        key_dir: root.join("keys"),
        key_type: "ed25519".to_string(),
        default_user: Some("alice".to_string()),
        default_port: 22,
        editor: "nano".to_string(),
        ssh_program: "ssh".to_string(),
        keygen_program: "ssh-keygen".to_string(),
        process_timeout: Duration::from_secs(5),
        home: Some(root.to_path_buf()),
    }
}

pub fn record(name: &str) -> HostRecord {
    HostRecord {
        name: name.to_string(),
        hostname: Some(format!("{name}.example.com")),
        user: Some("alice".to_string()),
        port: Some(22),
        identity_file: None,
        extra: Vec::new(),
    }
}

/// Write a key pair the way `ssh-keygen` would.
pub fn write_pair(base: &Path) {
    std::fs::create_dir_all(base.parent().expect("parent")).expect("mkdir");
    std::fs::write(base, "PRIVATE").expect("write private");
    let mut public = base.as_os_str().to_owned();
    public.push(".pub");
    std::fs::write(PathBuf::from(public), "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAITEST key\n")
        .expect("write public");
}

// ── Mock: no-op progress reporter ────────────────────────────────────────────

pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

// ── Mock: in-memory host store ───────────────────────────────────────────────

/// Loader handing out working copies of a shared, "persisted" record map.
#[derive(Clone, Default)]
pub struct MemoryLoader {
    persisted: Arc<Mutex<BTreeMap<String, HostRecord>>>,
    persist_calls: Arc<Mutex<u32>>,
    fail_persist: bool,
    missing: bool,
    /// `IdentityFile` lines outside any record, e.g. in a `Host *` block.
    unmanaged_identities: Vec<PathBuf>,
}

impl MemoryLoader {
    pub fn with_records(records: impl IntoIterator<Item = HostRecord>) -> Self {
        let loader = Self::default();
        {
            let mut map = loader.persisted.lock().expect("lock");
            for r in records {
                map.insert(r.name.clone(), r);
            }
        }
        loader
    }

    /// Every `persist` call fails.
    pub fn failing_persist(mut self) -> Self {
        self.fail_persist = true;
        self
    }

    /// An `IdentityFile` line in a block the store does not manage.
    pub fn with_unmanaged_identity(mut self, path: impl Into<PathBuf>) -> Self {
        self.unmanaged_identities.push(path.into());
        self
    }

    /// `load` fails as if the config file did not exist.
    pub fn missing_file(mut self) -> Self {
        self.missing = true;
        self
    }

    pub fn persisted_names(&self) -> BTreeSet<String> {
        self.persisted.lock().expect("lock").keys().cloned().collect()
    }

    pub fn persisted(&self, name: &str) -> Option<HostRecord> {
        self.persisted.lock().expect("lock").get(name).cloned()
    }

    pub fn persist_count(&self) -> u32 {
        *self.persist_calls.lock().expect("lock")
    }
}

pub struct MemoryHostStore {
    records: BTreeMap<String, HostRecord>,
    loader: MemoryLoader,
}

impl HostStoreLoader for MemoryLoader {
    type Store = MemoryHostStore;

    fn load(&self, path: &Path) -> Result<MemoryHostStore> {
        if self.missing {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()).into());
        }
        Ok(MemoryHostStore {
            records: self.persisted.lock().expect("lock").clone(),
            loader: self.clone(),
        })
    }
}

impl HostRecordStore for MemoryHostStore {
    fn hosts(&self) -> BTreeSet<String> {
        self.records.keys().cloned().collect()
    }

    fn get(&self, name: &str) -> Option<HostRecord> {
        self.records.get(name).cloned()
    }

    fn identity_files(&self) -> Vec<PathBuf> {
        let in_records = self.records.values().flat_map(|r| {
            let repeated = r
                .extra
                .iter()
                .filter(|(k, _)| HostField::from_keyword(k) == Some(HostField::IdentityFile))
                .map(|(_, v)| PathBuf::from(v));
            r.identity_file.clone().into_iter().chain(repeated)
        });
        in_records
            .chain(self.loader.unmanaged_identities.iter().cloned())
            .collect()
    }

    fn add(&mut self, record: &HostRecord) -> Result<()> {
        if self.records.contains_key(&record.name) {
            return Err(HostError::AlreadyExists(record.name.clone()).into());
        }
        self.records.insert(record.name.clone(), record.clone());
        Ok(())
    }

    fn set(&mut self, name: &str, field: HostField, value: &str) -> Result<()> {
        let record = self
            .records
            .get_mut(name)
            .ok_or_else(|| HostError::NotFound(name.to_string()))?;
        match field {
            HostField::HostName => record.hostname = Some(value.to_string()),
            HostField::User => record.user = Some(value.to_string()),
            HostField::Port => record.port = Some(value.parse().context("port")?),
            HostField::IdentityFile => record.identity_file = Some(PathBuf::from(value)),
        }
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        self.records
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| HostError::NotFound(name.to_string()).into())
    }

    fn persist(&self, _path: &Path) -> Result<()> {
        *self.loader.persist_calls.lock().expect("lock") += 1;
        if self.loader.fail_persist {
            anyhow::bail!("disk full");
        }
        *self.loader.persisted.lock().expect("lock") = self.records.clone();
        Ok(())
    }
}

// ── Mock: fake ssh-keygen ────────────────────────────────────────────────────

/// What the fake key generator does when asked to create a pair.
#[derive(Clone, Copy)]
pub enum Keygen {
    /// Writes both files and exits 0.
    Succeed,
    /// Writes the private file, then exits non-zero.
    FailAfterPartialWrite,
    /// Writes only the private file and exits 0.
    PrivateOnly,
    /// Cannot be started.
    SpawnError,
}

/// `CommandRunner` that emulates `ssh-keygen` against the real filesystem and
/// records every invocation.
pub struct FakeRunner {
    keygen: Keygen,
    forget_fails: bool,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeRunner {
    pub fn new(keygen: Keygen) -> Self {
        Self {
            keygen,
            forget_fails: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `ssh-keygen -R` exits non-zero.
    pub fn failing_forget(mut self) -> Self {
        self.forget_fails = true;
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().expect("lock").clone()
    }

    /// Targets passed to `-R`, in call order.
    pub fn forgotten(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.get(1).map(String::as_str) == Some("-R"))
            .filter_map(|c| c.get(2).cloned())
            .collect()
    }

    pub fn keygen_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.iter().any(|a| a == "-f"))
            .count()
    }
}

impl CommandRunner for FakeRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().map(|a| (*a).to_string()));
        self.calls.lock().expect("lock").push(call);

        if args.first() == Some(&"-R") {
            return Ok(if self.forget_fails {
                err_output(255, b"do_known_hosts: cannot open known_hosts")
            } else {
                ok_output(b"")
            });
        }

        let base = args
            .iter()
            .position(|a| *a == "-f")
            .and_then(|i| args.get(i + 1))
            .map(PathBuf::from)
            .context("fake ssh-keygen called without -f")?;
        match self.keygen {
            Keygen::Succeed => {
                write_pair(&base);
                Ok(ok_output(b""))
            }
            Keygen::FailAfterPartialWrite => {
                std::fs::write(&base, "PARTIAL").expect("write");
                Ok(err_output(1, b"Saving key failed: disk quota exceeded\n"))
            }
            Keygen::PrivateOnly => {
                std::fs::write(&base, "PRIVATE").expect("write");
                Ok(ok_output(b""))
            }
            Keygen::SpawnError => anyhow::bail!("failed to spawn {program}"),
        }
    }

    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().map(|a| (*a).to_string()));
        self.calls.lock().expect("lock").push(call);
        Ok(exit_status(0))
    }
}

// ── Filesystem with failure injection ────────────────────────────────────────

/// `StdFs` whose `remove_file` fails with permission denied for chosen paths.
pub struct FailingFs {
    deny_remove: Vec<PathBuf>,
}

impl FailingFs {
    pub fn deny_remove(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            deny_remove: paths.into_iter().collect(),
        }
    }
}

impl LocalFs for FailingFs {
    fn exists(&self, path: &Path) -> bool {
        StdFs.exists(path)
    }

    fn create_private_dir(&self, path: &Path) -> Result<()> {
        StdFs.create_private_dir(path)
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        StdFs.list_files(dir)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        StdFs.read_to_string(path)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        if self.deny_remove.iter().any(|p| p == path) {
            return Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied))
                .with_context(|| format!("removing file {}", path.display()));
        }
        StdFs.remove_file(path)
    }
}
