//! Throwaway SSH environment for driving the binary.
//!
//! Every command runs with `SSH_CONFIG_PATH`, `SSH_KEY_DIR` and `HOME` inside
//! a temp directory, so no test reads or writes the real `~/.ssh`.

#![allow(clippy::expect_used, dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Config with a global section, two managed hosts and a wildcard block.
pub const SAMPLE_CONFIG: &str = "\
# personal hosts
AddKeysToAgent yes

Host web
    HostName web.example.com
    User deploy
    Port 2222
    ForwardAgent yes

Host db
    HostName 10.0.0.5
    User alice

Host *
    ServerAliveInterval 60
";

pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    /// Empty sandbox: no config file, no key directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    /// Sandbox whose config file holds `content`.
    pub fn with_config(content: &str) -> Self {
        let sandbox = Self::new();
        std::fs::write(sandbox.config_path(), content).expect("write config");
        sandbox
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    pub fn key_dir(&self) -> PathBuf {
        self.dir.path().join("keys")
    }

    pub fn config(&self) -> String {
        std::fs::read_to_string(self.config_path()).expect("read config")
    }

    /// Write a key pair under the key directory.
    pub fn write_pair(&self, name: &str) -> PathBuf {
        std::fs::create_dir_all(self.key_dir()).expect("mkdir");
        let base = self.key_dir().join(name);
        std::fs::write(&base, "PRIVATE\n").expect("write private");
        std::fs::write(
            self.key_dir().join(format!("{name}.pub")),
            format!("ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIFake key_for_{name}\n"),
        )
        .expect("write public");
        base
    }

    /// A stand-in key generator that writes the pair `ssh-keygen -f` would.
    #[cfg(unix)]
    pub fn fake_keygen(&self) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = self.dir.path().join("fake-keygen");
        std::fs::write(
            &script,
            r#"#!/bin/sh
base=""
while [ $# -gt 0 ]; do
    case "$1" in
        -f) base="$2"; shift ;;
    esac
    shift
done
[ -n "$base" ] || exit 0
printf 'PRIVATE\n' > "$base"
printf 'ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIStub key\n' > "$base.pub"
"#,
        )
        .expect("write script");
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
            .expect("chmod script");
        script
    }

    /// `ssh-cli` pinned to this sandbox. External programs default to `true`
    /// so trust-store edits succeed without touching `~/.ssh/known_hosts`.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ssh-cli"));
        for var in [
            "SSH_KEY_TYPE",
            "SSH_DEFAULT_PORT",
            "EDITOR",
            "SSH_CLI_SSH",
            "SSH_CLI_TIMEOUT",
            "SSH_CLI_LOG",
        ] {
            cmd.env_remove(var);
        }
        cmd.env("NO_COLOR", "1")
            .env("HOME", self.root())
            .env("USER", "alice")
            .env("SSH_CONFIG_PATH", self.config_path())
            .env("SSH_KEY_DIR", self.key_dir())
            .env("SSH_CLI_KEYGEN", "true");
        cmd
    }
}

/// Parse the single JSON document a `--json` run prints.
pub fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}
