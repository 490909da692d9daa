//! Application service: orphaned key pair sweep.

use anyhow::Result;

use crate::application::ports::{
    CommandRunner, HostRecordStore, HostStoreLoader, LocalFs, UserPrompt,
};
use crate::application::services::key_files::KeyFileManager;
use crate::domain::{Settings, SweepOutcome, SweepReport};

/// Remove every key pair in the key directory that no `IdentityFile` line of
/// the config file references, in any block.
///
/// With `confirm_per_item`, each pair is offered to `prompt` first and a
/// decline is recorded as skipped. A failed removal is recorded and the sweep
/// moves on to the next pair.
///
/// # Errors
///
/// Returns an error if the store cannot be loaded, the key directory cannot
/// be listed, or a confirmation prompt fails.
pub fn sweep<L, R, F>(
    loader: &L,
    settings: &Settings,
    keys: &KeyFileManager<'_, R, F>,
    prompt: &impl UserPrompt,
    confirm_per_item: bool,
) -> Result<SweepReport>
where
    L: HostStoreLoader,
    R: CommandRunner,
    F: LocalFs,
{
    let store = loader.load(&settings.config_path)?;
    let orphans = keys.list_orphans(store.identity_files())?;

    let mut report = SweepReport::default();
    for pair in orphans {
        if confirm_per_item {
            let question = format!(
                "Remove key files `{}` and `{}`?",
                pair.private_path().display(),
                pair.public_path().display()
            );
            if !prompt.confirm(&question, false)? {
                report.items.push(SweepOutcome::Skipped { pair });
                continue;
            }
        }

        let removal = keys.delete(&pair);
        if removal.has_failure() {
            report.items.push(SweepOutcome::Failed { removal });
        } else {
            report.items.push(SweepOutcome::Removed { removal });
        }
    }

    tracing::debug!(
        removed = report.removed(),
        skipped = report.skipped(),
        failed = report.failed(),
        "sweep finished"
    );
    Ok(report)
}
