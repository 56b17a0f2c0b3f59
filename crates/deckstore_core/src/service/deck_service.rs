//! Deck unit-of-work service.
//!
//! # Responsibility
//! - Own one deck store together with its undo session.
//! - Offer mutation entry points, LIFO undo replay, and staged bulk import.
//!
//! # Invariants
//! - Replaying an undo command never records a new undo command.
//! - Commands are replayed most-recent-first.

use crate::db::store::Store;
use crate::db::DbResult;
use crate::model::command::{ColumnValues, Predicate, RowId};
use crate::repo::mutation::{
    insert_sql, MutationRepository, MutationResult, SqliteMutationRepo,
};
use crate::session::Session;
use log::debug;
use rusqlite::params_from_iter;
use std::path::Path;

/// One open deck plus its pending undo history.
pub struct DeckService {
    store: Store,
    session: Session,
}

impl DeckService {
    /// Opens the deck database at `path` with a fresh recording session.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self {
            store: Store::open(path)?,
            session: Session::new(),
        })
    }

    /// In-memory deck with a fresh recording session.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            store: Store::open_in_memory()?,
            session: Session::new(),
        })
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Read access to the session's undo state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Switches undo recording for subsequent mutations.
    pub fn set_undo_recording(&mut self, enabled: bool) {
        self.session.set_recording(enabled);
    }

    pub fn undo_depth(&self) -> usize {
        self.session.undo_depth()
    }

    pub fn clear_undo_history(&mut self) {
        self.session.clear_undo_history();
    }

    /// Inserts one row; records a delete-by-identifier inverse when
    /// recording is enabled.
    pub fn insert(&mut self, table: &str, values: &ColumnValues) -> MutationResult<RowId> {
        SqliteMutationRepo::new(&self.store).insert(&mut self.session, table, values)
    }

    /// Updates matching rows; records one inverse per affected row.
    pub fn update(
        &mut self,
        table: &str,
        values: &ColumnValues,
        predicate: &Predicate,
    ) -> MutationResult<usize> {
        SqliteMutationRepo::new(&self.store).update(&mut self.session, table, values, predicate)
    }

    /// Deletes matching rows; records one full-row insert inverse per row.
    pub fn delete(&mut self, table: &str, predicate: &Predicate) -> MutationResult<usize> {
        SqliteMutationRepo::new(&self.store).delete(&mut self.session, table, predicate)
    }

    /// Pops and replays the most recent undo command.
    ///
    /// Returns `Ok(None)` when the history is empty. Recording is
    /// suspended for the replay and the prior mode restored on every
    /// path. A failed replay surfaces its error; the popped command is
    /// not re-pushed, as a half-applied inverse must not run twice.
    pub fn undo(&mut self) -> MutationResult<Option<usize>> {
        let Some(command) = self.session.pop_undo_command() else {
            return Ok(None);
        };
        debug!(
            "event=undo_replay module=service table={} depth={}",
            command.table,
            self.session.undo_depth()
        );

        let was_recording = self.session.is_recording_enabled();
        self.session.set_recording(false);
        let result = SqliteMutationRepo::new(&self.store).apply(&mut self.session, &command);
        self.session.set_recording(was_recording);
        result.map(Some)
    }

    /// Bulk-loads card rows inside one staged transaction.
    ///
    /// Imports bypass undo recording entirely; a bulk load is not
    /// undoable. On any failure the staged work is rolled back explicitly
    /// (staged transactions otherwise commit on drop) and nothing is
    /// imported.
    pub fn import_cards(&mut self, rows: &[ColumnValues]) -> MutationResult<usize> {
        let tx = self.store.staged()?;
        let mut imported = 0;

        for row in rows {
            let sql = match insert_sql("cards", row) {
                Ok(sql) => sql,
                Err(err) => {
                    let _ = tx.rollback();
                    return Err(err);
                }
            };
            if let Err(err) =
                tx.execute(&sql, params_from_iter(row.iter().map(|(_, value)| value)))
            {
                let _ = tx.rollback();
                return Err(err.into());
            }
            imported += 1;
        }

        tx.commit()?;
        debug!("event=card_import module=service status=ok rows={imported}");
        Ok(imported)
    }
}
