//! Unit tests for `KeyFileManager`.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use ssh_cli::application::ports::is_not_found;
use ssh_cli::application::services::key_files::KeyFileManager;
use ssh_cli::domain::{FileRemoval, KeyError, KeyFilePair, PublicKeyStatus};
use ssh_cli::infra::fs::StdFs;
use tempfile::TempDir;

use crate::helpers::{FailingFs, FakeRunner, Keygen, record, settings, write_pair};

// ── create ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_runs_keygen_with_expected_arguments() {
    let dir = TempDir::new().expect("tempdir");
    let settings = settings(dir.path());
    let runner = FakeRunner::new(Keygen::Succeed);
    let keys = KeyFileManager::new(&runner, &StdFs, &settings);

    let pair = keys.create("web", "ed25519", "secret").await.expect("create");

    let base = settings.key_dir.join("web");
    assert_eq!(pair.private_path(), base);
    assert!(pair.private_path().exists());
    assert!(pair.public_path().exists());

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0],
        vec![
            "ssh-keygen".to_string(),
            "-t".to_string(),
            "ed25519".to_string(),
            "-C".to_string(),
            "key_for_web".to_string(),
            "-f".to_string(),
            base.to_string_lossy().into_owned(),
            "-N".to_string(),
            "secret".to_string(),
            "-q".to_string(),
        ]
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_create_makes_key_dir_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().expect("tempdir");
    let settings = settings(dir.path());
    let runner = FakeRunner::new(Keygen::Succeed);
    let keys = KeyFileManager::new(&runner, &StdFs, &settings);

    keys.create("web", "ed25519", "").await.expect("create");

    let mode = std::fs::metadata(&settings.key_dir)
        .expect("metadata")
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o700);
}

#[tokio::test]
async fn test_create_refuses_to_overwrite_existing_private_key() {
    let dir = TempDir::new().expect("tempdir");
    let settings = settings(dir.path());
    let base = settings.key_dir.join("web");
    std::fs::create_dir_all(&settings.key_dir).expect("mkdir");
    std::fs::write(&base, "EXISTING").expect("write");
    let runner = FakeRunner::new(Keygen::Succeed);
    let keys = KeyFileManager::new(&runner, &StdFs, &settings);

    let err = keys.create("web", "ed25519", "").await.expect_err("exists");

    assert!(matches!(
        err.downcast_ref::<KeyError>(),
        Some(KeyError::AlreadyExists(p)) if *p == base
    ));
    assert_eq!(runner.keygen_calls(), 0);
    assert_eq!(std::fs::read_to_string(&base).expect("read"), "EXISTING");
}

#[tokio::test]
async fn test_create_refuses_when_only_public_key_exists() {
    let dir = TempDir::new().expect("tempdir");
    let settings = settings(dir.path());
    std::fs::create_dir_all(&settings.key_dir).expect("mkdir");
    std::fs::write(settings.key_dir.join("web.pub"), "ssh-ed25519 AAAA").expect("write");
    let runner = FakeRunner::new(Keygen::Succeed);
    let keys = KeyFileManager::new(&runner, &StdFs, &settings);

    let err = keys.create("web", "ed25519", "").await.expect_err("exists");

    assert!(matches!(
        err.downcast_ref::<KeyError>(),
        Some(KeyError::AlreadyExists(_))
    ));
    assert_eq!(runner.keygen_calls(), 0);
}

#[tokio::test]
async fn test_create_failure_removes_partial_files() {
    let dir = TempDir::new().expect("tempdir");
    let settings = settings(dir.path());
    let runner = FakeRunner::new(Keygen::FailAfterPartialWrite);
    let keys = KeyFileManager::new(&runner, &StdFs, &settings);

    let err = keys.create("web", "ed25519", "").await.expect_err("fails");

    match err.downcast_ref::<KeyError>() {
        Some(KeyError::ProcessFailed { code, stderr, .. }) => {
            assert_eq!(*code, Some(1));
            assert_eq!(stderr, "Saving key failed: disk quota exceeded");
        }
        other => panic!("expected ProcessFailed, got {other:?}"),
    }
    let pair = keys.pair_for("web");
    assert!(!pair.private_path().exists());
    assert!(!pair.public_path().exists());
}

#[tokio::test]
async fn test_create_with_missing_public_key_is_incomplete_and_cleaned_up() {
    let dir = TempDir::new().expect("tempdir");
    let settings = settings(dir.path());
    let runner = FakeRunner::new(Keygen::PrivateOnly);
    let keys = KeyFileManager::new(&runner, &StdFs, &settings);

    let err = keys.create("web", "ed25519", "").await.expect_err("incomplete");

    let pair = keys.pair_for("web");
    assert!(matches!(
        err.downcast_ref::<KeyError>(),
        Some(KeyError::Incomplete { path, .. }) if *path == pair.public_path()
    ));
    assert!(!pair.private_path().exists());
}

#[tokio::test]
async fn test_create_spawn_error_is_propagated() {
    let dir = TempDir::new().expect("tempdir");
    let settings = settings(dir.path());
    let runner = FakeRunner::new(Keygen::SpawnError);
    let keys = KeyFileManager::new(&runner, &StdFs, &settings);

    let err = keys.create("web", "ed25519", "").await.expect_err("spawn");

    assert!(format!("{err:#}").contains("failed to spawn ssh-keygen"));
    assert!(!keys.pair_for("web").private_path().exists());
}

// ── delete ───────────────────────────────────────────────────────────────────

#[test]
fn test_delete_removes_both_files() {
    let dir = TempDir::new().expect("tempdir");
    let settings = settings(dir.path());
    let runner = FakeRunner::new(Keygen::Succeed);
    let keys = KeyFileManager::new(&runner, &StdFs, &settings);
    let pair = keys.pair_for("web");
    write_pair(pair.private_path());

    let removal = keys.delete(&pair);

    assert!(removal.is_complete());
    assert!(!pair.private_path().exists());
    assert!(!pair.public_path().exists());
}

#[test]
fn test_delete_of_missing_files_reports_not_found() {
    let dir = TempDir::new().expect("tempdir");
    let settings = settings(dir.path());
    let runner = FakeRunner::new(Keygen::Succeed);
    let keys = KeyFileManager::new(&runner, &StdFs, &settings);

    let removal = keys.delete(&keys.pair_for("ghost"));

    assert_eq!(removal.private, FileRemoval::NotFound);
    assert_eq!(removal.public, FileRemoval::NotFound);
    assert!(!removal.has_failure());
}

#[test]
fn test_delete_attempts_public_key_after_private_failure() {
    let dir = TempDir::new().expect("tempdir");
    let settings = settings(dir.path());
    let pair = KeyFilePair::for_host(&settings.key_dir, "web");
    write_pair(pair.private_path());
    let fs = FailingFs::deny_remove([pair.private_path().to_path_buf()]);
    let runner = FakeRunner::new(Keygen::Succeed);
    let keys = KeyFileManager::new(&runner, &fs, &settings);

    let removal = keys.delete(&pair);

    assert!(removal.private.is_failed());
    assert_eq!(removal.public, FileRemoval::Removed);
    assert!(pair.private_path().exists());
    assert!(!pair.public_path().exists());
}

// ── list_orphans ─────────────────────────────────────────────────────────────

#[test]
fn test_list_orphans_with_missing_key_dir_is_empty() {
    let dir = TempDir::new().expect("tempdir");
    let settings = settings(dir.path());
    let runner = FakeRunner::new(Keygen::Succeed);
    let keys = KeyFileManager::new(&runner, &StdFs, &settings);

    let orphans = keys.list_orphans(std::iter::empty()).expect("orphans");

    assert!(orphans.is_empty());
}

#[test]
fn test_list_orphans_excludes_referenced_pairs() {
    let dir = TempDir::new().expect("tempdir");
    let settings = settings(dir.path());
    for name in ["a", "b", "c"] {
        write_pair(&settings.key_dir.join(name));
    }
    let runner = FakeRunner::new(Keygen::Succeed);
    let keys = KeyFileManager::new(&runner, &StdFs, &settings);

    // `b` is referenced through `~/` relative to the settings home.
    let identities = [settings.key_dir.join("a"), PathBuf::from("~/keys/b")];

    let orphans = keys.list_orphans(identities).expect("orphans");

    let names: Vec<PathBuf> = orphans
        .iter()
        .map(|p| p.private_path().to_path_buf())
        .collect();
    assert_eq!(names, vec![settings.key_dir.join("c")]);
}

#[test]
fn test_list_orphans_ignores_lone_public_keys() {
    let dir = TempDir::new().expect("tempdir");
    let settings = settings(dir.path());
    std::fs::create_dir_all(&settings.key_dir).expect("mkdir");
    std::fs::write(settings.key_dir.join("old.pub"), "ssh-ed25519 AAAA").expect("write");
    let runner = FakeRunner::new(Keygen::Succeed);
    let keys = KeyFileManager::new(&runner, &StdFs, &settings);

    assert!(keys.list_orphans(std::iter::empty()).expect("orphans").is_empty());
}

#[test]
fn test_list_orphans_on_a_file_path_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let mut settings = settings(dir.path());
    settings.key_dir = dir.path().join("not-a-dir");
    std::fs::write(&settings.key_dir, "").expect("write");
    let runner = FakeRunner::new(Keygen::Succeed);
    let keys = KeyFileManager::new(&runner, &StdFs, &settings);

    let err = keys.list_orphans(std::iter::empty()).expect_err("not a directory");

    assert!(!is_not_found(&err));
}

// ── public_key ───────────────────────────────────────────────────────────────

#[test]
fn test_public_key_status_variants() {
    let dir = TempDir::new().expect("tempdir");
    let settings = settings(dir.path());
    let runner = FakeRunner::new(Keygen::Succeed);
    let keys = KeyFileManager::new(&runner, &StdFs, &settings);

    let without = record("plain");
    assert_eq!(keys.public_key(&without), PublicKeyStatus::None);

    let mut missing = record("missing");
    missing.identity_file = Some(settings.key_dir.join("missing"));
    assert_eq!(
        keys.public_key(&missing),
        PublicKeyStatus::NotFound(settings.key_dir.join("missing.pub"))
    );

    write_pair(&settings.key_dir.join("web"));
    let mut present = record("web");
    present.identity_file = Some(PathBuf::from("~/keys/web"));
    assert_eq!(
        keys.public_key(&present),
        PublicKeyStatus::Present("ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAITEST key".to_string())
    );
}
