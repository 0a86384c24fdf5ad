use crate::{Error, Result};
use std::fs;
use std::path::Path;

/// Copies the store file byte-for-byte to `backup`, overwriting any previous
/// backup. Returns the number of bytes written.
///
/// Must run before the store is opened for writing so the copy always holds
/// the pre-migration state.
pub fn backup_store(store: &Path, backup: &Path) -> Result<u64> {
    if !store.is_file() {
        return Err(Error::StoreNotFound {
            path: store.to_path_buf(),
        });
    }
    if same_file(store, backup) {
        return Err(Error::SamePath {
            path: store.to_path_buf(),
        });
    }

    let bytes = fs::copy(store, backup).map_err(|source| Error::Backup {
        from: store.to_path_buf(),
        to: backup.to_path_buf(),
        source,
    })?;

    #[cfg(feature = "tracing")]
    tracing::info!(
        store = %store.display(),
        backup = %backup.display(),
        bytes,
        "store backed up"
    );

    Ok(bytes)
}

pub(crate) fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
