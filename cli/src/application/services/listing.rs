//! Application service: read-only host views.

use anyhow::Result;

use crate::application::ports::{CommandRunner, HostRecordStore, HostStoreLoader, LocalFs};
use crate::application::services::key_files::KeyFileManager;
use crate::domain::{HostDetail, HostError, HostSummary, Settings};

/// Every managed host, sorted by name, with its public key status.
///
/// # Errors
///
/// Returns an error if the store cannot be loaded.
pub fn list_hosts<L, R, F>(
    loader: &L,
    settings: &Settings,
    keys: &KeyFileManager<'_, R, F>,
) -> Result<Vec<HostSummary>>
where
    L: HostStoreLoader,
    R: CommandRunner,
    F: LocalFs,
{
    let store = loader.load(&settings.config_path)?;
    Ok(store
        .hosts()
        .iter()
        .filter_map(|name| store.get(name))
        .map(|record| HostSummary {
            public_key: keys.public_key(&record),
            port: record.effective_port(),
            name: record.name,
            hostname: record.hostname,
            user: record.user,
        })
        .collect())
}

/// One host with all its directives.
///
/// # Errors
///
/// Returns `HostError::NotFound` if `name` is not in the store, or an error
/// if the store cannot be loaded.
pub fn show_host<L, R, F>(
    loader: &L,
    settings: &Settings,
    keys: &KeyFileManager<'_, R, F>,
    name: &str,
) -> Result<HostDetail>
where
    L: HostStoreLoader,
    R: CommandRunner,
    F: LocalFs,
{
    let store = loader.load(&settings.config_path)?;
    let record = store
        .get(name)
        .ok_or_else(|| HostError::NotFound(name.to_string()))?;
    Ok(HostDetail {
        public_key: keys.public_key(&record),
        record,
    })
}

/// Sorted host names, for selection menus.
///
/// # Errors
///
/// Returns an error if the store cannot be loaded.
pub fn host_names<L: HostStoreLoader>(loader: &L, settings: &Settings) -> Result<Vec<String>> {
    Ok(loader.load(&settings.config_path)?.hosts().into_iter().collect())
}
