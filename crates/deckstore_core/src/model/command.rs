//! Mutation command data model.
//!
//! # Responsibility
//! - Define the command shape shared by forward mutations and captured
//!   inverses.
//! - Enforce that captured inverses are always scoped to a single physical
//!   row.
//!
//! # Invariants
//! - An inverse command's predicate is always `Predicate::Row`; broad
//!   predicates are only legal on forward, caller-issued commands.
//! - Commands are created inside the mutating call that produces them and
//!   never mutated afterward.

use crate::model::value::SqlValue;
use serde::{Deserialize, Serialize};

/// Stable physical row identifier assigned by SQLite.
///
/// Distinct from any business key; used to scope inverse predicates and to
/// correlate the rows of one bulk mutation with their inverse commands.
pub type RowId = i64;

/// Column name SQLite resolves to the physical row identifier.
pub const ROW_ID_COLUMN: &str = "rowid";

/// Ordered column name → literal value mapping.
pub type ColumnValues = Vec<(String, SqlValue)>;

/// Logical mutation verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Insert,
    Update,
    Delete,
}

/// Row filter for update/delete statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// No filter; the statement touches every row of the table.
    All,
    /// Caller-issued SQL filter expression.
    Expr(String),
    /// Identifier equality against one physical row.
    Row(RowId),
}

/// One replayable mutation against one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoCommand {
    pub kind: CommandKind,
    pub table: String,
    pub values: ColumnValues,
    pub predicate: Predicate,
}

impl UndoCommand {
    /// Inverse of an insert: delete the created row by identifier.
    ///
    /// No column values are needed; reversing an insert is a
    /// delete-by-identifier.
    pub fn revert_insert(table: &str, row: RowId) -> Self {
        Self {
            kind: CommandKind::Delete,
            table: table.to_owned(),
            values: ColumnValues::new(),
            predicate: Predicate::Row(row),
        }
    }

    /// Inverse of an update: write the captured old values back to `row`.
    ///
    /// The identifier column is appended last so the command carries the
    /// full touched-columns-plus-identifier pre-image.
    pub fn revert_update(table: &str, row: RowId, mut old_values: ColumnValues) -> Self {
        old_values.push((ROW_ID_COLUMN.to_owned(), SqlValue::Integer(row)));
        Self {
            kind: CommandKind::Update,
            table: table.to_owned(),
            values: old_values,
            predicate: Predicate::Row(row),
        }
    }

    /// Inverse of a delete: reinsert the captured full row.
    ///
    /// `full_row` holds every declared column; the physical identifier is
    /// kept in the predicate for correlation.
    pub fn revert_delete(table: &str, row: RowId, full_row: ColumnValues) -> Self {
        Self {
            kind: CommandKind::Insert,
            table: table.to_owned(),
            values: full_row,
            predicate: Predicate::Row(row),
        }
    }

    /// Returns whether this command is scoped to exactly one physical row.
    pub fn is_row_scoped(&self) -> bool {
        matches!(self.predicate, Predicate::Row(_))
    }
}
