//! Error types for identifier migrations.
//!
//! ## Error Cases
//! - `SamePath`: the backup would overwrite the store it is meant to protect.
//! - `StoreNotFound`: the store file does not exist.
//! - `Backup`: copying the store to its backup location failed.
//! - `Open`: SQLite refused to open the store.
//! - `MissingCollection` / `MissingColumn`: the store does not have the shape
//!   the collection table expects. Raised before any row is touched.
//! - `Sqlite`: a query or commit failed mid-migration.

use std::path::PathBuf;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for identifier migrations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The store and backup paths point at the same file.
    #[error("backup path {path} is the store itself")]
    SamePath { path: PathBuf },

    /// The store file is missing.
    #[error("store {path} not found")]
    StoreNotFound { path: PathBuf },

    /// The store could not be duplicated to the backup location.
    #[error("failed to back up {from} to {to}: {source}")]
    Backup {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// SQLite could not open the store.
    #[error("failed to open store {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A collection named in the collection table has no backing table.
    #[error("collection `{collection}` does not exist")]
    MissingCollection { collection: &'static str },

    /// A column named in the collection table is absent from its table.
    #[error("column `{collection}.{column}` does not exist")]
    MissingColumn {
        collection: &'static str,
        column: &'static str,
    },

    /// Any other SQLite failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_paths_involved() {
        let err = Error::Backup {
            from: PathBuf::from("aster.db"),
            to: PathBuf::from("aster_backup.db"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("failed to back up aster.db to aster_backup.db"));

        let err = Error::StoreNotFound {
            path: PathBuf::from("/srv/aster.db"),
        };
        assert_eq!(err.to_string(), "store /srv/aster.db not found");
    }
}
