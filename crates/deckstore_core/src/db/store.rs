//! Row store handle owning a single SQLite connection.
//!
//! # Responsibility
//! - Own the connection lifecycle for one deck database, with explicit
//!   open rather than lazy reopen checks at call sites.
//! - Keep statement and cursor lifetimes scoped inside each call so every
//!   acquisition is released on all exit paths (success, empty result,
//!   failure).
//!
//! # Invariants
//! - Every statement prepared by a method here is finalized before the
//!   method returns.
//! - Staged transactions commit on drop; discarding staged work requires
//!   an explicit `rollback`.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::model::command::RowId;
use rusqlite::types::FromSql;
use rusqlite::{Connection, DropBehavior, Params, Row, Transaction};
use std::path::Path;

/// Owned handle over one migrated deck database.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens a read-write deck database file, migrated and ready.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens an in-memory deck database, migrated and ready.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Runs a query expected to produce a single integer cell.
    pub fn scalar(&self, sql: &str, params: impl Params) -> DbResult<i64> {
        Ok(self.conn.query_row(sql, params, |row| row.get(0))?)
    }

    /// Collects the first projected column across all result rows.
    pub fn column<T: FromSql>(&self, sql: &str, params: impl Params) -> DbResult<Vec<T>> {
        self.rows(sql, params, |row| row.get(0))
    }

    /// Runs a row query, mapping every cursor row through `map_row`.
    ///
    /// The prepared statement and its cursor never escape this call; the
    /// cursor is iterated to completion or dropped on the first error.
    pub fn rows<T>(
        &self,
        sql: &str,
        params: impl Params,
        mut map_row: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
    ) -> DbResult<Vec<T>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(map_row(row)?);
        }
        Ok(out)
    }

    /// Executes one INSERT/UPDATE/DELETE and returns the affected row count.
    pub fn execute(&self, sql: &str, params: impl Params) -> DbResult<usize> {
        Ok(self.conn.execute(sql, params)?)
    }

    /// Begins a staged multi-statement unit whose commit decision belongs
    /// to the caller.
    ///
    /// Dropping the returned transaction COMMITS it. There is no implicit
    /// rollback path: callers that need to discard staged work must call
    /// `rollback()` before the transaction goes out of scope.
    pub fn staged(&mut self) -> DbResult<Transaction<'_>> {
        let mut tx = self.conn.transaction()?;
        tx.set_drop_behavior(DropBehavior::Commit);
        Ok(tx)
    }

    /// Lists the declared columns of `table` in schema order.
    ///
    /// An unknown table yields an empty list, not an error.
    pub fn table_columns(&self, table: &str) -> DbResult<Vec<String>> {
        self.column("SELECT name FROM pragma_table_info(?1);", [table])
    }

    /// Identifier of the most recently inserted row on this connection.
    pub fn last_insert_rowid(&self) -> RowId {
        self.conn.last_insert_rowid()
    }

    /// Raw connection access for callers with needs outside this surface.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
