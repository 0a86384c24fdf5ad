//! Declarative table of the identifier columns rewritten by a migration.
//!
//! Every collection lists the columns that hold identifiers and whether each
//! one is the collection's own key or a reference to another collection. The
//! [`Plan`] derived from the table decides the order columns are converted
//! in and where commits fall.

use core::fmt;

/// How an identifier column relates to the collection that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// The collection's own entity identifier.
    Primary,
    /// An identifier owned by another collection.
    Foreign {
        /// Name of the collection whose primary identifier is referenced.
        references: &'static str,
    },
}

/// A single identifier-bearing column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdColumn {
    pub name: &'static str,
    pub role: ColumnRole,
}

impl IdColumn {
    pub const fn primary(name: &'static str) -> Self {
        Self {
            name,
            role: ColumnRole::Primary,
        }
    }

    pub const fn foreign(name: &'static str, references: &'static str) -> Self {
        Self {
            name,
            role: ColumnRole::Foreign { references },
        }
    }

    pub const fn is_primary(&self) -> bool {
        matches!(self.role, ColumnRole::Primary)
    }
}

/// A record collection (a SQLite table) and its identifier columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collection {
    pub name: &'static str,
    pub columns: &'static [IdColumn],
}

/// The collections of the chat store, in conversion order.
///
/// `sync_data` carries references only; `sync_servers` carries both its own
/// key and a reference to `users`.
pub const COLLECTIONS: &[Collection] = &[
    Collection {
        name: "messages",
        columns: &[
            IdColumn::primary("uuid"),
            IdColumn::foreign("author_uuid", "users"),
            IdColumn::foreign("channel_uuid", "channels"),
        ],
    },
    Collection {
        name: "channels",
        columns: &[IdColumn::primary("uuid")],
    },
    Collection {
        name: "users",
        columns: &[IdColumn::primary("uuid")],
    },
    Collection {
        name: "emojis",
        columns: &[IdColumn::primary("uuid")],
    },
    Collection {
        name: "sync_data",
        columns: &[IdColumn::foreign("user_uuid", "users")],
    },
    Collection {
        name: "sync_servers",
        columns: &[
            IdColumn::primary("uuid"),
            IdColumn::foreign("user_uuid", "users"),
        ],
    },
];

/// A `(collection, column)` pair scheduled for conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub collection: &'static str,
    pub column: IdColumn,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.collection, self.column.name)
    }
}

/// A group of targets whose writes are committed together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pass {
    pub name: String,
    pub targets: Vec<Target>,
}

/// Ordered passes derived from a collection table.
///
/// The first pass converts every primary identifier. Each following pass
/// converts the foreign identifiers of one collection, so referenced keys are
/// always rewritten (and committed) before the columns pointing at them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    passes: Vec<Pass>,
}

impl Plan {
    pub fn new(collections: &'static [Collection]) -> Self {
        let primary = collections
            .iter()
            .flat_map(|c| {
                c.columns
                    .iter()
                    .filter(|col| col.is_primary())
                    .map(move |col| Target {
                        collection: c.name,
                        column: *col,
                    })
            })
            .collect::<Vec<_>>();

        let mut passes = Vec::with_capacity(collections.len() + 1);
        if !primary.is_empty() {
            passes.push(Pass {
                name: "primary".to_string(),
                targets: primary,
            });
        }

        let foreign = collections
            .iter()
            .filter_map(|c| {
                let targets = c
                    .columns
                    .iter()
                    .filter(|col| !col.is_primary())
                    .map(|col| Target {
                        collection: c.name,
                        column: *col,
                    })
                    .collect::<Vec<_>>();
                (!targets.is_empty()).then(|| Pass {
                    name: format!("{}-refs", c.name),
                    targets,
                })
            })
            .collect::<Vec<_>>();
        passes.extend(foreign);

        Self { passes }
    }

    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    /// Every target in pass order.
    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.passes.iter().flat_map(|p| p.targets.iter())
    }
}

impl Default for Plan {
    fn default() -> Self {
        Self::new(COLLECTIONS)
    }
}
