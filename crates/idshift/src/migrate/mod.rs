//! # Store migration
//!
//! [`Migrator`] owns the path to a SQLite store and rewrites every identifier
//! named by its [`Plan`] into the safe integer range.
//!
//! A run proceeds in a fixed order:
//!
//! 1. The store file is copied verbatim to the backup path.
//! 2. The store is opened read-write (never created).
//! 3. Every planned `(collection, column)` is checked to exist.
//! 4. Each pass rewrites its columns and commits.
//!
//! ## Commit modes
//!
//! - [`CommitMode::Phased`] commits after every pass. Primary identifiers are
//!   durable before any reference to them is touched, but an interruption
//!   between passes leaves references pointing at pre-shift values until the
//!   backup is restored and the whole run repeated.
//! - [`CommitMode::Atomic`] wraps every pass in a single transaction, so the
//!   store is either fully converted or untouched.
//!
//! Both modes are idempotent: a second run over a converted store finds no
//! identifier above the threshold and writes nothing.


use crate::{
    Conversion, Error, MAX_SAFE_INTEGER, MigrationReport, Pass, PassReport, Plan, Result, Target,
    backup_store, downshift,
};
use rusqlite::{Connection, OpenFlags, params};
use std::path::{Path, PathBuf};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Default location of the chat store.
pub const DEFAULT_STORE: &str = "aster.db";

/// Default location of the pre-migration copy.
pub const DEFAULT_BACKUP: &str = "aster_backup_uuidconversion.db";

/// Where commits fall during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommitMode {
    /// Commit once per pass.
    #[default]
    Phased,
    /// Commit once after the last pass.
    Atomic,
}

/// Rewrites oversized identifiers in a SQLite store.
#[derive(Debug, Clone)]
pub struct Migrator {
    store: PathBuf,
    backup: PathBuf,
    mode: CommitMode,
    plan: Plan,
}

impl Migrator {
    pub fn new(store: impl Into<PathBuf>, backup: impl Into<PathBuf>) -> Self {
        Self {
            store: store.into(),
            backup: backup.into(),
            mode: CommitMode::default(),
            plan: Plan::default(),
        }
    }

    pub fn with_mode(mut self, mode: CommitMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_plan(mut self, plan: Plan) -> Self {
        self.plan = plan;
        self
    }

    pub fn store(&self) -> &Path {
        &self.store
    }

    pub fn backup(&self) -> &Path {
        &self.backup
    }

    pub fn mode(&self) -> CommitMode {
        self.mode
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Backs up the store, then converts every planned column.
    ///
    /// # Errors
    ///
    /// Fails without touching the store if the backup cannot be written, the
    /// store cannot be opened, or a planned column is missing. A failure
    /// during a pass rolls that pass back; in [`CommitMode::Phased`] earlier
    /// passes stay committed.
    pub fn run(&self) -> Result<MigrationReport> {
        let backup_bytes = backup_store(&self.store, &self.backup)?;
        let mut conn = open(&self.store, OpenFlags::SQLITE_OPEN_READ_WRITE)?;
        verify_columns(&conn, &self.plan)?;

        let mut passes = Vec::with_capacity(self.plan.passes().len());
        match self.mode {
            CommitMode::Phased => {
                for pass in self.plan.passes() {
                    let tx = conn.transaction()?;
                    passes.push(apply_pass(&tx, pass, true)?);
                    tx.commit()?;
                }
            }
            CommitMode::Atomic => {
                let tx = conn.transaction()?;
                for pass in self.plan.passes() {
                    passes.push(apply_pass(&tx, pass, true)?);
                }
                tx.commit()?;
            }
        }

        Ok(MigrationReport {
            passes,
            backup_bytes: Some(backup_bytes),
            dry_run: false,
        })
    }

    /// Reports the conversions [`run`](Self::run) would apply without
    /// writing a backup or modifying the store.
    pub fn preview(&self) -> Result<MigrationReport> {
        if !self.store.is_file() {
            return Err(Error::StoreNotFound {
                path: self.store.clone(),
            });
        }
        let conn = open(&self.store, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        verify_columns(&conn, &self.plan)?;

        let passes = self
            .plan
            .passes()
            .iter()
            .map(|pass| apply_pass(&conn, pass, false))
            .collect::<Result<Vec<_>>>()?;

        Ok(MigrationReport {
            passes,
            backup_bytes: None,
            dry_run: true,
        })
    }
}

fn open(path: &Path, flags: OpenFlags) -> Result<Connection> {
    Connection::open_with_flags(path, flags | OpenFlags::SQLITE_OPEN_NO_MUTEX).map_err(|source| {
        Error::Open {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Checks that every planned column exists before anything is written.
fn verify_columns(conn: &Connection, plan: &Plan) -> Result<()> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    for target in plan.targets() {
        let columns = stmt
            .query_map([target.collection], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        if columns.is_empty() {
            return Err(Error::MissingCollection {
                collection: target.collection,
            });
        }
        if !columns.iter().any(|c| c == target.column.name) {
            return Err(Error::MissingColumn {
                collection: target.collection,
                column: target.column.name,
            });
        }
    }
    Ok(())
}

#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(conn, pass), fields(pass = %pass.name))
)]
fn apply_pass(conn: &Connection, pass: &Pass, write: bool) -> Result<PassReport> {
    let mut conversions = Vec::new();
    for target in &pass.targets {
        conversions.extend(convert_target(conn, target, write)?);
    }

    #[cfg(feature = "tracing")]
    tracing::info!(
        values = conversions.len(),
        rows = conversions.iter().map(|c| c.rows).sum::<usize>(),
        "pass complete"
    );

    Ok(PassReport {
        name: pass.name.clone(),
        conversions,
    })
}

/// Converts every oversized value in one column.
///
/// Values are collected before any update so the scan never observes its own
/// writes. Rows are matched by value, which is safe because a converted value
/// is always at or below the threshold and can never be selected again.
fn convert_target(conn: &Connection, target: &Target, write: bool) -> Result<Vec<Conversion>> {
    let table = quote_ident(target.collection);
    let column = quote_ident(target.column.name);

    let found = {
        let mut stmt = conn.prepare(&format!(
            "SELECT {column}, COUNT(*) FROM {table} \
             WHERE typeof({column}) = 'integer' AND {column} > ?1 \
             GROUP BY {column} ORDER BY {column}"
        ))?;
        stmt.query_map(params![MAX_SAFE_INTEGER], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?
    };

    let mut update = if write {
        Some(conn.prepare(&format!(
            "UPDATE {table} SET {column} = ?1 WHERE {column} = ?2"
        ))?)
    } else {
        None
    };

    let mut conversions = Vec::with_capacity(found.len());
    for (before, count) in found {
        let after = downshift(before);
        let rows = match update.as_mut() {
            Some(stmt) => stmt.execute(params![after, before])?,
            None => count.max(0) as usize,
        };

        #[cfg(feature = "tracing")]
        tracing::info!(column = %target, before, after, rows, "converting identifier");

        conversions.push(Conversion {
            target: *target,
            before,
            after,
            rows,
        });
    }
    Ok(conversions)
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
