//! Unit tests for `connect` and `open_editor`.

#![allow(clippy::expect_used)]

use ssh_cli::application::services::session::{connect, open_editor};
use ssh_cli::domain::HostError;
use tempfile::TempDir;

use crate::helpers::{FakeRunner, Keygen, MemoryLoader, record, settings};

#[tokio::test]
async fn test_connect_runs_ssh_with_host_name() {
    let dir = TempDir::new().expect("tempdir");
    let settings = settings(dir.path());
    let loader = MemoryLoader::with_records([record("web")]);
    let runner = FakeRunner::new(Keygen::Succeed);

    let status = connect(&loader, &runner, &settings, "web")
        .await
        .expect("connect");

    assert!(status.success());
    assert_eq!(
        runner.calls(),
        vec![vec!["ssh".to_string(), "--".to_string(), "web".to_string()]]
    );
}

#[tokio::test]
async fn test_connect_never_passes_host_name_as_an_option() {
    let dir = TempDir::new().expect("tempdir");
    let settings = settings(dir.path());
    // Hand-written `Host -oProxyCommand=...` block.
    let name = "-oProxyCommand=touch /tmp/x";
    let loader = MemoryLoader::with_records([record(name)]);
    let runner = FakeRunner::new(Keygen::Succeed);

    connect(&loader, &runner, &settings, name)
        .await
        .expect("connect");

    let calls = runner.calls();
    assert_eq!(calls[0][1], "--");
    assert_eq!(calls[0][2], name);
}

#[tokio::test]
async fn test_connect_to_unknown_host_does_not_start_ssh() {
    let dir = TempDir::new().expect("tempdir");
    let settings = settings(dir.path());
    let loader = MemoryLoader::with_records([record("web")]);
    let runner = FakeRunner::new(Keygen::Succeed);

    let err = connect(&loader, &runner, &settings, "db")
        .await
        .expect_err("unknown host");

    assert_eq!(
        err.downcast_ref::<HostError>(),
        Some(&HostError::NotFound("db".to_string()))
    );
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_open_editor_splits_arguments_and_appends_config_path() {
    let dir = TempDir::new().expect("tempdir");
    let mut settings = settings(dir.path());
    settings.editor = "code --wait \"--profile=ssh work\"".to_string();
    let runner = FakeRunner::new(Keygen::Succeed);

    open_editor(&runner, &settings).await.expect("editor");

    assert_eq!(
        runner.calls(),
        vec![vec![
            "code".to_string(),
            "--wait".to_string(),
            "--profile=ssh work".to_string(),
            settings.config_path.to_string_lossy().into_owned(),
        ]]
    );
}

#[tokio::test]
async fn test_open_editor_rejects_blank_or_unbalanced_values() {
    let dir = TempDir::new().expect("tempdir");
    let mut settings = settings(dir.path());
    let runner = FakeRunner::new(Keygen::Succeed);

    settings.editor = "   ".to_string();
    assert!(open_editor(&runner, &settings).await.is_err());

    settings.editor = "vim \"unterminated".to_string();
    assert!(open_editor(&runner, &settings).await.is_err());

    assert!(runner.calls().is_empty());
}
