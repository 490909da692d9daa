//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed document on
//! stdout; failures print the error object from `format_error`.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::{
    ConfigError, CreateReport, DeleteReport, HostDetail, HostError, HostSummary, KeyError,
    Settings, SweepReport,
};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Stable machine-readable code for the first typed error in the chain.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<HostError>() {
            return match e {
                HostError::InvalidHostname(_) => "invalid_hostname",
                HostError::EmptyName => "empty_name",
                HostError::InvalidName(_) | HostError::ReservedName(_) => "invalid_name",
                HostError::AlreadyExists(_) => "host_exists",
                HostError::InvalidPort(_) => "invalid_port",
                HostError::NotFound(_) => "host_not_found",
            };
        }
        if let Some(e) = cause.downcast_ref::<KeyError>() {
            return match e {
                KeyError::ProcessFailed { .. } => "keygen_failed",
                KeyError::AlreadyExists(_) => "key_exists",
                KeyError::Incomplete { .. } => "keygen_incomplete",
            };
        }
        if let Some(e) = cause.downcast_ref::<ConfigError>() {
            return match e {
                ConfigError::MissingConfigFile(_) => "missing_config",
                ConfigError::InvalidValue { .. } => "invalid_setting",
                ConfigError::NoHomeDir(_) => "no_home_dir",
            };
        }
    }
    "error"
}

/// Renders domain types as JSON documents on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        print_json(&serde_json::json!({ "version": version }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_hosts(&self, hosts: &[HostSummary]) -> Result<()> {
        print_json(&serde_json::json!({ "hosts": hosts }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_host(&self, detail: &HostDetail) -> Result<()> {
        print_json(detail)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_created(&self, report: &CreateReport) -> Result<()> {
        print_json(report)
    }

    /// The report plus its derived `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_deleted(&self, report: &DeleteReport) -> Result<()> {
        let mut value = serde_json::to_value(report).context("JSON serialization failed")?;
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "state".to_string(),
                serde_json::to_value(report.state()).context("JSON serialization failed")?,
            );
        }
        print_json(&value)
    }

    /// The report plus its counters and derived `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_sweep(&self, report: &SweepReport) -> Result<()> {
        print_json(&serde_json::json!({
            "state": report.state(),
            "removed": report.removed(),
            "skipped": report.skipped(),
            "failed": report.failed(),
            "items": report.items,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_settings(&self, settings: &Settings) -> Result<()> {
        print_json(settings)
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{text}");
    Ok(())
}
