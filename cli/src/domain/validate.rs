//! Pure input validation: no I/O, no async.
//!
//! Rules run in the order `create` applies them: hostname, then name, then
//! uniqueness (which needs the store and lives in the application layer).

use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::HostError;
use crate::domain::keys::is_public_key_file;

/// Domain name: two or more dot-separated labels, alphabetic or IDNA TLD.
pub static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern: cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(
        r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+(?:[A-Za-z]{2,63}|xn--[A-Za-z0-9-]{1,59})$",
    )
    .expect("valid regex")
});

/// Host names become key file names and `Host` patterns; checked before any
/// path interpolation to prevent path traversal (CWE-22).
pub static HOST_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9._-]*$").expect("valid regex")
});

const MAX_DOMAIN_LEN: usize = 253;

/// Returns `true` if `value` is a domain name or an IPv4/IPv6 literal.
#[must_use]
pub fn is_valid_hostname(value: &str) -> bool {
    is_domain(value) || value.parse::<Ipv4Addr>().is_ok() || value.parse::<Ipv6Addr>().is_ok()
}

fn is_domain(value: &str) -> bool {
    value.len() <= MAX_DOMAIN_LEN && DOMAIN_RE.is_match(value)
}

/// Validates the hostname a new record will connect to.
///
/// # Errors
///
/// Returns `HostError::InvalidHostname` if `value` is neither a domain nor an
/// IP address.
pub fn validate_hostname(value: &str) -> Result<(), HostError> {
    if is_valid_hostname(value) {
        Ok(())
    } else {
        Err(HostError::InvalidHostname(value.to_string()))
    }
}

/// Validates the name (lookup key) of a new record.
///
/// # Errors
///
/// Returns `HostError::EmptyName` for an empty name and
/// `HostError::InvalidName` when it contains characters that are unsafe in a
/// file name or a `Host` pattern, and `HostError::ReservedName` for a name
/// ending in `.pub`.
pub fn validate_name(name: &str) -> Result<(), HostError> {
    if name.is_empty() {
        return Err(HostError::EmptyName);
    }
    if !HOST_NAME_RE.is_match(name) {
        return Err(HostError::InvalidName(name.to_string()));
    }
    // `<name>.pub` would collide with the public half of key pair `<name>`
    if is_public_key_file(Path::new(name)) {
        return Err(HostError::ReservedName(name.to_string()));
    }
    Ok(())
}

/// Parses a port typed by the user.
///
/// # Errors
///
/// Returns `HostError::InvalidPort` unless `value` is an integer in 1..=65535.
pub fn parse_port(value: &str) -> Result<u16, HostError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HostError::InvalidPort(value.to_string()));
    }
    match trimmed.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(HostError::InvalidPort(value.to_string())),
    }
}

/// Suggested record name for a hostname: the first label of a domain.
/// IP literals get no suggestion.
#[must_use]
pub fn suggested_name(hostname: &str) -> Option<String> {
    if !is_domain(hostname) {
        return None;
    }
    hostname
        .split('.')
        .next()
        .filter(|label| !label.is_empty())
        .map(str::to_string)
}
