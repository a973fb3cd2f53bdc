use anyhow::Result;

use crate::catalog::Catalog;
use crate::engine::progress::ProgressStore;

/// Only a strictly newer remote version counts as an update; a downgrade is ignored.
pub fn needs_update(remote: u64, local: u64) -> bool {
    remote > local
}

/// Merge a newer catalog into progress: register every word id (existing
/// records are left untouched) and ratchet `dataVersionSeen` forward.
///
/// Returns whether an update was applied.
pub fn sync(catalog: &Catalog, progress: &mut ProgressStore) -> Result<bool> {
    let remote = catalog.meta.data_version;
    let local = progress.data_version_seen();
    if !needs_update(remote, local) {
        tracing::debug!(remote, local, "catalog version already seen");
        return Ok(false);
    }

    for id in catalog.word_ids() {
        progress.get(id);
    }
    progress.set_data_version_seen(remote);
    progress.persist()?;

    tracing::info!(from = local, to = remote, "catalog version updated");
    Ok(true)
}
