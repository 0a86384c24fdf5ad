use crate::Target;

/// One identifier value rewritten in one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    pub target: Target,
    pub before: i64,
    pub after: i64,
    /// Rows holding `before` in the target column.
    pub rows: usize,
}

/// Conversions applied (or, for a dry run, found) by one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    pub name: String,
    pub conversions: Vec<Conversion>,
}

impl PassReport {
    pub fn rows(&self) -> usize {
        self.conversions.iter().map(|c| c.rows).sum()
    }
}

/// Outcome of a migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub passes: Vec<PassReport>,
    /// Size of the backup copy, or `None` for a dry run.
    pub backup_bytes: Option<u64>,
    pub dry_run: bool,
}

impl MigrationReport {
    pub fn conversions(&self) -> impl Iterator<Item = &Conversion> {
        self.passes.iter().flat_map(|p| p.conversions.iter())
    }

    /// Number of distinct `(column, value)` pairs converted.
    pub fn values(&self) -> usize {
        self.passes.iter().map(|p| p.conversions.len()).sum()
    }

    /// Number of cells rewritten across all columns.
    pub fn rows(&self) -> usize {
        self.passes.iter().map(PassReport::rows).sum()
    }

    /// `true` when no stored identifier was outside the safe range.
    pub fn is_noop(&self) -> bool {
        self.values() == 0
    }
}
