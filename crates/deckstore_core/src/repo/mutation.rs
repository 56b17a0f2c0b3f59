//! Undo-aware mutation dispatch over a deck store.
//!
//! # Responsibility
//! - Turn logical insert/update/delete requests into parameterized SQL and
//!   execute them.
//! - Capture row pre-images and push inverse commands onto the session
//!   before a recorded mutation executes.
//!
//! # Invariants
//! - Inverse commands for update/delete are pushed before the forward
//!   statement runs, so an applied change always has a recorded inverse.
//! - One inverse command per affected row, pushed in row-iteration order.
//! - A capture or introspection failure aborts the mutation; no change is
//!   applied unrecorded while recording is enabled.

use crate::db::store::Store;
use crate::db::DbError;
use crate::model::command::{
    ColumnValues, CommandKind, Predicate, RowId, UndoCommand, ROW_ID_COLUMN,
};
use crate::model::value::SqlValue;
use crate::session::Session;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::params_from_iter;
use std::error::Error;
use std::fmt::{Display, Formatter};

static IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

pub type MutationResult<T> = Result<T, MutationError>;

/// Error for mutation dispatch and pre-image capture.
#[derive(Debug)]
pub enum MutationError {
    /// Insert/update was requested with an empty column set.
    EmptyValues { table: String },
    /// A table or column name is not a plain SQL identifier.
    InvalidIdentifier(String),
    /// Pre-image capture or schema introspection failed; the forward
    /// statement was not executed.
    Capture { table: String, source: DbError },
    /// The forward statement itself failed to execute.
    Db(DbError),
}

impl Display for MutationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyValues { table } => {
                write!(f, "mutation on `{table}` requires at least one column value")
            }
            Self::InvalidIdentifier(name) => {
                write!(f, "`{name}` is not a plain SQL identifier")
            }
            Self::Capture { table, source } => {
                write!(f, "pre-image capture on `{table}` failed: {source}")
            }
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MutationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyValues { .. } | Self::InvalidIdentifier(_) => None,
            Self::Capture { source, .. } => Some(source),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for MutationError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for MutationError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Dispatcher interface for undo-aware mutations.
pub trait MutationRepository {
    /// Inserts one row and returns its generated row identifier.
    ///
    /// When the session is recording, pushes a delete-by-identifier
    /// inverse targeting the newly created row.
    fn insert(
        &self,
        session: &mut Session,
        table: &str,
        values: &ColumnValues,
    ) -> MutationResult<RowId>;

    /// Updates every row matching `predicate`; returns the affected count.
    ///
    /// When the session is recording, the old values of the touched
    /// columns (plus the row identifier) are captured with the same
    /// predicate and pushed as one inverse per affected row before the
    /// forward UPDATE executes.
    fn update(
        &self,
        session: &mut Session,
        table: &str,
        values: &ColumnValues,
        predicate: &Predicate,
    ) -> MutationResult<usize>;

    /// Deletes every row matching `predicate`; returns the affected count.
    ///
    /// When the session is recording, a full-row image of every matching
    /// row is captured and pushed as one insert inverse per row before
    /// the forward DELETE executes. Identity restoration on replay relies
    /// on the table declaring a rowid alias (`INTEGER PRIMARY KEY`), as
    /// the deck schema does; other tables are restored value-identically
    /// under a fresh physical rowid.
    fn delete(
        &self,
        session: &mut Session,
        table: &str,
        predicate: &Predicate,
    ) -> MutationResult<usize>;

    /// Applies a command by kind; the replay entry point.
    fn apply(&self, session: &mut Session, command: &UndoCommand) -> MutationResult<usize>;
}

/// SQLite-backed mutation dispatcher.
pub struct SqliteMutationRepo<'s> {
    store: &'s Store,
}

impl<'s> SqliteMutationRepo<'s> {
    pub fn new(store: &'s Store) -> Self {
        Self { store }
    }

    /// Pre-image capturer: reads the current values of every row matching
    /// `predicate`.
    ///
    /// Projects `columns` plus the row identifier (always last) and
    /// iterates the cursor to completion. Zero matching rows is a legal
    /// empty capture.
    fn capture(
        &self,
        table: &str,
        columns: &[String],
        predicate: &Predicate,
    ) -> MutationResult<Vec<(RowId, ColumnValues)>> {
        let sql = select_sql(table, columns, predicate)?;
        debug!("event=preimage_capture module=repo table={table} sql={sql}");

        self.store
            .rows(&sql, params_from_iter(predicate_params(predicate)), |row| {
                let mut values = ColumnValues::with_capacity(columns.len());
                for (index, column) in columns.iter().enumerate() {
                    values.push((column.clone(), row.get::<_, SqlValue>(index)?));
                }
                let row_id: RowId = row.get(columns.len())?;
                Ok((row_id, values))
            })
            .map_err(|source| MutationError::Capture {
                table: table.to_owned(),
                source,
            })
    }
}

impl MutationRepository for SqliteMutationRepo<'_> {
    fn insert(
        &self,
        session: &mut Session,
        table: &str,
        values: &ColumnValues,
    ) -> MutationResult<RowId> {
        let sql = insert_sql(table, values)?;
        debug!("event=mutation module=repo kind=insert table={table} sql={sql}");

        self.store
            .execute(&sql, params_from_iter(values.iter().map(|(_, value)| value)))?;
        let row = self.store.last_insert_rowid();

        if session.is_recording_enabled() {
            session.push_undo_command(UndoCommand::revert_insert(table, row));
        }
        Ok(row)
    }

    fn update(
        &self,
        session: &mut Session,
        table: &str,
        values: &ColumnValues,
        predicate: &Predicate,
    ) -> MutationResult<usize> {
        let sql = update_sql(table, values, predicate)?;

        if session.is_recording_enabled() {
            let touched: Vec<String> = values.iter().map(|(column, _)| column.clone()).collect();
            for (row, old_values) in self.capture(table, &touched, predicate)? {
                session.push_undo_command(UndoCommand::revert_update(table, row, old_values));
            }
        }

        debug!("event=mutation module=repo kind=update table={table} sql={sql}");
        let changed = self
            .store
            .execute(&sql, params_from_iter(statement_params(values, predicate)))?;
        Ok(changed)
    }

    fn delete(
        &self,
        session: &mut Session,
        table: &str,
        predicate: &Predicate,
    ) -> MutationResult<usize> {
        let sql = delete_sql(table, predicate)?;

        if session.is_recording_enabled() {
            let columns = self
                .store
                .table_columns(table)
                .map_err(|source| MutationError::Capture {
                    table: table.to_owned(),
                    source,
                })?;
            for (row, full_row) in self.capture(table, &columns, predicate)? {
                session.push_undo_command(UndoCommand::revert_delete(table, row, full_row));
            }
        }

        debug!("event=mutation module=repo kind=delete table={table} sql={sql}");
        let changed = self
            .store
            .execute(&sql, params_from_iter(predicate_params(predicate)))?;
        Ok(changed)
    }

    fn apply(&self, session: &mut Session, command: &UndoCommand) -> MutationResult<usize> {
        match command.kind {
            CommandKind::Insert => self
                .insert(session, &command.table, &command.values)
                .map(|_| 1),
            CommandKind::Update => {
                self.update(session, &command.table, &command.values, &command.predicate)
            }
            CommandKind::Delete => self.delete(session, &command.table, &command.predicate),
        }
    }
}

/// Validates and double-quotes a SQL identifier.
fn quote_ident(name: &str) -> MutationResult<String> {
    if IDENT_RE.is_match(name) {
        Ok(format!("\"{name}\""))
    } else {
        Err(MutationError::InvalidIdentifier(name.to_owned()))
    }
}

/// Renders the WHERE fragment; `next_param` numbers the rowid placeholder.
fn where_clause(predicate: &Predicate, next_param: usize) -> String {
    match predicate {
        Predicate::All => String::new(),
        Predicate::Expr(expr) => format!(" WHERE {expr}"),
        Predicate::Row(_) => format!(" WHERE {ROW_ID_COLUMN} = ?{next_param}"),
    }
}

/// Parameters contributed by the predicate (the rowid, when row-scoped).
fn predicate_params(predicate: &Predicate) -> Vec<SqlValue> {
    match predicate {
        Predicate::Row(row) => vec![SqlValue::Integer(*row)],
        Predicate::All | Predicate::Expr(_) => Vec::new(),
    }
}

/// Full parameter list for an update/delete statement: column values in
/// declaration order, then the predicate's rowid if any.
fn statement_params(values: &ColumnValues, predicate: &Predicate) -> Vec<SqlValue> {
    let mut params: Vec<SqlValue> = values.iter().map(|(_, value)| value.clone()).collect();
    params.extend(predicate_params(predicate));
    params
}

pub(crate) fn insert_sql(table: &str, values: &ColumnValues) -> MutationResult<String> {
    if values.is_empty() {
        return Err(MutationError::EmptyValues {
            table: table.to_owned(),
        });
    }
    let table = quote_ident(table)?;
    let columns = values
        .iter()
        .map(|(column, _)| quote_ident(column))
        .collect::<MutationResult<Vec<_>>>()?
        .join(", ");
    let placeholders = (1..=values.len())
        .map(|n| format!("?{n}"))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!(
        "INSERT INTO {table} ({columns}) VALUES ({placeholders});"
    ))
}

fn update_sql(
    table: &str,
    values: &ColumnValues,
    predicate: &Predicate,
) -> MutationResult<String> {
    if values.is_empty() {
        return Err(MutationError::EmptyValues {
            table: table.to_owned(),
        });
    }
    let quoted_table = quote_ident(table)?;
    let assignments = values
        .iter()
        .enumerate()
        .map(|(index, (column, _))| Ok(format!("{} = ?{}", quote_ident(column)?, index + 1)))
        .collect::<MutationResult<Vec<_>>>()?
        .join(", ");
    Ok(format!(
        "UPDATE {quoted_table} SET {assignments}{};",
        where_clause(predicate, values.len() + 1)
    ))
}

fn delete_sql(table: &str, predicate: &Predicate) -> MutationResult<String> {
    let quoted_table = quote_ident(table)?;
    Ok(format!(
        "DELETE FROM {quoted_table}{};",
        where_clause(predicate, 1)
    ))
}

/// Pre-image SELECT: requested columns plus the row identifier, always
/// projected last.
fn select_sql(table: &str, columns: &[String], predicate: &Predicate) -> MutationResult<String> {
    let quoted_table = quote_ident(table)?;
    let mut projection = columns
        .iter()
        .map(|column| quote_ident(column))
        .collect::<MutationResult<Vec<_>>>()?;
    projection.push(ROW_ID_COLUMN.to_owned());
    Ok(format!(
        "SELECT {} FROM {quoted_table}{};",
        projection.join(", "),
        where_clause(predicate, 1)
    ))
}
