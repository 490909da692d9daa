//! Key pair naming and orphan detection.
//!
//! Pure functions only: directory listings and record sets are passed in.

use std::collections::{BTreeSet, HashSet};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Extension of the public half of a key pair.
pub const PUBLIC_KEY_EXT: &str = "pub";

/// A private key file `P` and its public counterpart `P.pub`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct KeyFilePair {
    base: PathBuf,
}

impl KeyFilePair {
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Pair for a host: `<key_dir>/<host_name>`.
    #[must_use]
    pub fn for_host(key_dir: &Path, host_name: &str) -> Self {
        Self::new(key_dir.join(host_name))
    }

    #[must_use]
    pub fn private_path(&self) -> &Path {
        &self.base
    }

    /// `<base>.pub`: appended, never a replaced extension (`id.old` → `id.old.pub`).
    #[must_use]
    pub fn public_path(&self) -> PathBuf {
        let mut s: OsString = self.base.clone().into_os_string();
        s.push(".");
        s.push(PUBLIC_KEY_EXT);
        PathBuf::from(s)
    }
}

impl std::fmt::Display for KeyFilePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.base.display())
    }
}

/// Returns `true` for `*.pub` files.
#[must_use]
pub fn is_public_key_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == PUBLIC_KEY_EXT)
}

/// Expands a leading `~/` against `home`. Other paths are returned as-is.
#[must_use]
pub fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Key pairs present in `found_files` but not referenced by `used_identities`.
///
/// `found_files` is one directory listing; `.pub` files are ignored, every
/// other file is a private key base. A base whose public path is itself a
/// referenced identity is kept, since removing the pair would delete it.
#[must_use]
pub fn orphaned_pairs<F, U>(found_files: F, used_identities: U) -> BTreeSet<KeyFilePair>
where
    F: IntoIterator<Item = PathBuf>,
    U: IntoIterator<Item = PathBuf>,
{
    let used: HashSet<PathBuf> = used_identities.into_iter().collect();
    found_files
        .into_iter()
        .filter(|path| !is_public_key_file(path))
        .filter(|path| !used.contains(path))
        .map(KeyFilePair::new)
        .filter(|pair| !used.contains(&pair.public_path()))
        .collect()
}

// ── Removal outcomes ──────────────────────────────────────────────────────────

/// Result of removing one file of a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "reason", rename_all = "snake_case")]
pub enum FileRemoval {
    Removed,
    NotFound,
    Failed(String),
}

impl FileRemoval {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Aggregate result of removing both files of a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairRemoval {
    pub pair: KeyFilePair,
    pub private: FileRemoval,
    pub public: FileRemoval,
}

impl PairRemoval {
    /// Both files existed and were removed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.private == FileRemoval::Removed && self.public == FileRemoval::Removed
    }

    /// At least one removal failed for a reason other than absence.
    #[must_use]
    pub fn has_failure(&self) -> bool {
        self.private.is_failed() || self.public.is_failed()
    }
}
