//! OpenSSH client config file: implements `HostRecordStore`.
//!
//! The file is kept as raw lines grouped into a preamble and `Host` / `Match`
//! blocks. Only the lines a mutation touches are rewritten; everything else,
//! comments and unknown directives included, round-trips unchanged.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{HostRecordStore, HostStoreLoader};
use crate::domain::{ConfigError, HostError, HostField, HostRecord};

const INDENT: &str = "    ";

/// One `Keyword value` line, parsed.
#[derive(Debug, PartialEq, Eq)]
struct Directive<'a> {
    indent: &'a str,
    keyword: &'a str,
    value: String,
}

/// Parse a config line. Returns `None` for blank lines and comments.
fn parse_directive(line: &str) -> Option<Directive<'_>> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let indent = &line[..line.len() - trimmed.len()];
    let end = trimmed
        .find(|c: char| c.is_whitespace() || c == '=')
        .unwrap_or(trimmed.len());
    let keyword = &trimmed[..end];
    let rest = trimmed[end..].trim_start();
    let rest = rest.strip_prefix('=').unwrap_or(rest).trim();
    Some(Directive {
        indent,
        keyword,
        value: unquote(rest).to_string(),
    })
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn quote(value: &str) -> String {
    if value.contains(char::is_whitespace) {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

/// A `Host` or `Match` line and every line up to the next one.
#[derive(Debug, Clone)]
struct Block {
    header: String,
    /// Set when the header is `Host <single literal pattern>`.
    managed_name: Option<String>,
    body: Vec<String>,
}

impl Block {
    fn from_header(header: String) -> Self {
        let managed_name = parse_directive(&header).and_then(|d| {
            if !d.keyword.eq_ignore_ascii_case("host") {
                return None;
            }
            let mut patterns = d.value.split_whitespace();
            match (patterns.next(), patterns.next()) {
                (Some(p), None) if !p.contains(['*', '?', '!']) => Some(unquote(p).to_string()),
                _ => None,
            }
        });
        Self {
            header,
            managed_name,
            body: Vec::new(),
        }
    }

    fn to_record(&self, name: &str) -> HostRecord {
        let mut record = HostRecord {
            name: name.to_string(),
            hostname: None,
            user: None,
            port: None,
            identity_file: None,
            extra: Vec::new(),
        };
        for d in self.body.iter().filter_map(|l| parse_directive(l)) {
            // ssh uses the first value it sees for each keyword
            match HostField::from_keyword(d.keyword) {
                Some(HostField::HostName) if record.hostname.is_none() => {
                    record.hostname = Some(d.value);
                }
                Some(HostField::User) if record.user.is_none() => record.user = Some(d.value),
                Some(HostField::Port) if record.port.is_none() => match d.value.parse() {
                    Ok(port) => record.port = Some(port),
                    Err(_) => record.extra.push((d.keyword.to_string(), d.value)),
                },
                Some(HostField::IdentityFile) if record.identity_file.is_none() => {
                    record.identity_file = Some(PathBuf::from(d.value));
                }
                _ => record.extra.push((d.keyword.to_string(), d.value)),
            }
        }
        record
    }

    fn set(&mut self, field: HostField, value: &str) {
        let existing = self.body.iter().position(|l| {
            parse_directive(l).is_some_and(|d| HostField::from_keyword(d.keyword) == Some(field))
        });
        if let Some(idx) = existing {
            let indent = parse_directive(&self.body[idx])
                .map(|d| d.indent.to_string())
                .unwrap_or_default();
            self.body[idx] = format!("{indent}{} {}", field.keyword(), quote(value));
            return;
        }

        let indent = self
            .body
            .iter()
            .find_map(|l| parse_directive(l).map(|d| d.indent.to_string()))
            .unwrap_or_else(|| INDENT.to_string());
        let insert_at = self
            .body
            .iter()
            .rposition(|l| !l.trim().is_empty())
            .map_or(0, |i| i + 1);
        self.body.insert(
            insert_at,
            format!("{indent}{} {}", field.keyword(), quote(value)),
        );
    }
}

/// In-memory working copy of an SSH client config file.
#[derive(Debug, Clone, Default)]
pub struct SshConfigFile {
    /// Global directives before the first block.
    preamble: Vec<String>,
    blocks: Vec<Block>,
}

impl SshConfigFile {
    /// Split config text into preamble and blocks.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut file = Self::default();
        for line in content.lines() {
            let starts_block = parse_directive(line).is_some_and(|d| {
                d.keyword.eq_ignore_ascii_case("host") || d.keyword.eq_ignore_ascii_case("match")
            });
            if starts_block {
                file.blocks.push(Block::from_header(line.to_string()));
            } else if let Some(block) = file.blocks.last_mut() {
                block.body.push(line.to_string());
            } else {
                file.preamble.push(line.to_string());
            }
        }
        file
    }

    /// Config text with a trailing newline.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let lines = self.preamble.iter().chain(
            self.blocks
                .iter()
                .flat_map(|b| std::iter::once(&b.header).chain(b.body.iter())),
        );
        for line in lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    fn block(&self, name: &str) -> Option<&Block> {
        self.blocks
            .iter()
            .find(|b| b.managed_name.as_deref() == Some(name))
    }

    fn block_mut(&mut self, name: &str) -> Option<&mut Block> {
        self.blocks
            .iter_mut()
            .find(|b| b.managed_name.as_deref() == Some(name))
    }

    fn last_lines_mut(&mut self) -> &mut Vec<String> {
        match self.blocks.last_mut() {
            Some(block) => &mut block.body,
            None => &mut self.preamble,
        }
    }
}

impl HostRecordStore for SshConfigFile {
    fn hosts(&self) -> BTreeSet<String> {
        self.blocks
            .iter()
            .filter_map(|b| b.managed_name.clone())
            .collect()
    }

    fn get(&self, name: &str) -> Option<HostRecord> {
        self.block(name).map(|b| b.to_record(name))
    }

    fn identity_files(&self) -> Vec<PathBuf> {
        self.preamble
            .iter()
            .chain(self.blocks.iter().flat_map(|b| b.body.iter()))
            .filter_map(|l| parse_directive(l))
            .filter(|d| HostField::from_keyword(d.keyword) == Some(HostField::IdentityFile))
            .map(|d| PathBuf::from(d.value))
            .collect()
    }

    fn add(&mut self, record: &HostRecord) -> Result<()> {
        if self.block(&record.name).is_some() {
            return Err(HostError::AlreadyExists(record.name.clone()).into());
        }

        let is_empty = self.preamble.is_empty() && self.blocks.is_empty();
        let tail = self.last_lines_mut();
        if !is_empty && tail.last().is_none_or(|l| !l.trim().is_empty()) {
            tail.push(String::new());
        }

        let mut block = Block::from_header(format!("Host {}", record.name));
        block.body = record
            .directives()
            .into_iter()
            .map(|(keyword, value)| format!("{INDENT}{keyword} {}", quote(&value)))
            .collect();
        self.blocks.push(block);
        Ok(())
    }

    fn set(&mut self, name: &str, field: HostField, value: &str) -> Result<()> {
        let block = self
            .block_mut(name)
            .ok_or_else(|| HostError::NotFound(name.to_string()))?;
        block.set(field, value);
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        let idx = self
            .blocks
            .iter()
            .position(|b| b.managed_name.as_deref() == Some(name))
            .ok_or_else(|| HostError::NotFound(name.to_string()))?;
        self.blocks.remove(idx);
        if idx == self.blocks.len() {
            let tail = self.last_lines_mut();
            while tail.last().is_some_and(|l| l.trim().is_empty()) {
                tail.pop();
            }
        }
        Ok(())
    }

    fn persist(&self, path: &Path) -> Result<()> {
        // A symlinked config is written through to its target
        let target = resolve_symlink(path)?;
        let path = target.as_path();

        // Atomic write via temp file then rename
        let mut temp_path = path.as_os_str().to_owned();
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);

        std::fs::write(&temp_path, self.render())
            .with_context(|| format!("writing temp file {}", temp_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("setting permissions on {}", temp_path.display()))?;
        }

        std::fs::rename(&temp_path, path)
            .with_context(|| format!("finalizing config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config written");
        Ok(())
    }
}

/// The file a symlink at `path` points to, or `path` itself.
fn resolve_symlink(path: &Path) -> Result<PathBuf> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => std::fs::canonicalize(path)
            .with_context(|| format!("resolving symlink {}", path.display())),
        _ => Ok(path.to_path_buf()),
    }
}

/// Loads `SshConfigFile` from disk.
pub struct SshConfigLoader;

impl HostStoreLoader for SshConfigLoader {
    type Store = SshConfigFile;

    fn load(&self, path: &Path) -> Result<SshConfigFile> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::MissingConfigFile(path.to_path_buf()).into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("reading config file {}", path.display()));
            }
        };
        Ok(SshConfigFile::parse(&content))
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
