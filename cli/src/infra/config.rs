//! Reads `Settings` from the process environment.

use anyhow::Result;

use crate::domain::Settings;

/// Build `Settings` from `std::env` and the user's home directory.
///
/// # Errors
///
/// Returns a `ConfigError` if a variable is malformed or a default path needs
/// a home directory that cannot be determined.
pub fn load_settings() -> Result<Settings> {
    let home = dirs::home_dir();
    let settings = Settings::from_lookup(|name| std::env::var(name).ok(), home.as_deref())?;
    tracing::debug!(
        config = %settings.config_path.display(),
        keys = %settings.key_dir.display(),
        "settings loaded"
    );
    Ok(settings)
}
