//! Auxiliary per-deck settings and status store.
//!
//! Small key/value tables keyed by deck path, held in their own database
//! with an explicitly owned handle. Plain get/set/reset semantics; nothing
//! here participates in any deck's undo history.

use crate::db::DbResult;
use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const META_BOOTSTRAP_SQL: &str = "
CREATE TABLE IF NOT EXISTS deck_languages (
    path TEXT PRIMARY KEY,
    lang TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS deck_pins (
    path TEXT PRIMARY KEY,
    pinned INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE IF NOT EXISTS deck_settings (
    path TEXT PRIMARY KEY,
    review_limit INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE IF NOT EXISTS deck_status (
    path TEXT PRIMARY KEY,
    new_count INTEGER NOT NULL DEFAULT 0,
    review_count INTEGER NOT NULL DEFAULT 0,
    modified INTEGER NOT NULL DEFAULT 0
);
";

/// Per-deck numeric counters shown outside any undo scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeckStatus {
    pub new_count: i64,
    pub review_count: i64,
    pub modified: i64,
}

/// Handle over the auxiliary settings database.
pub struct MetaStore {
    conn: Connection,
}

impl MetaStore {
    /// Opens (and bootstraps, if needed) the settings database at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        Self::bootstrap(conn)
    }

    /// In-memory settings store, mainly for tests.
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::bootstrap(conn)
    }

    fn bootstrap(conn: Connection) -> DbResult<Self> {
        conn.execute_batch(META_BOOTSTRAP_SQL)?;
        info!("event=meta_open module=repo status=ok");
        Ok(Self { conn })
    }

    /// Language tag recorded for the deck at `deck_path`, if any.
    pub fn language(&self, deck_path: &str) -> DbResult<Option<String>> {
        let lang = self
            .conn
            .query_row(
                "SELECT lang FROM deck_languages WHERE path = ?1;",
                [deck_path],
                |row| row.get(0),
            )
            .optional()?;
        Ok(lang)
    }

    pub fn set_language(&self, deck_path: &str, lang: &str) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO deck_languages (path, lang) VALUES (?1, ?2)
             ON CONFLICT (path) DO UPDATE SET lang = excluded.lang;",
            params![deck_path, lang],
        )?;
        Ok(())
    }

    /// Whether the deck at `deck_path` is pinned in the picker.
    pub fn is_pinned(&self, deck_path: &str) -> DbResult<bool> {
        let pinned: Option<i64> = self
            .conn
            .query_row(
                "SELECT pinned FROM deck_pins WHERE path = ?1;",
                [deck_path],
                |row| row.get(0),
            )
            .optional()?;
        Ok(pinned.unwrap_or(0) != 0)
    }

    pub fn set_pinned(&self, deck_path: &str, pinned: bool) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO deck_pins (path, pinned) VALUES (?1, ?2)
             ON CONFLICT (path) DO UPDATE SET pinned = excluded.pinned;",
            params![deck_path, i64::from(pinned)],
        )?;
        Ok(())
    }

    /// Per-deck daily review limit; 0 means unlimited.
    pub fn review_limit(&self, deck_path: &str) -> DbResult<i64> {
        let limit: Option<i64> = self
            .conn
            .query_row(
                "SELECT review_limit FROM deck_settings WHERE path = ?1;",
                [deck_path],
                |row| row.get(0),
            )
            .optional()?;
        Ok(limit.unwrap_or(0))
    }

    pub fn set_review_limit(&self, deck_path: &str, limit: i64) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO deck_settings (path, review_limit) VALUES (?1, ?2)
             ON CONFLICT (path) DO UPDATE SET review_limit = excluded.review_limit;",
            params![deck_path, limit],
        )?;
        Ok(())
    }

    /// Counters for the deck at `deck_path`; zeroed when never recorded.
    pub fn status(&self, deck_path: &str) -> DbResult<DeckStatus> {
        let status = self
            .conn
            .query_row(
                "SELECT new_count, review_count, modified
                 FROM deck_status WHERE path = ?1;",
                [deck_path],
                |row| {
                    Ok(DeckStatus {
                        new_count: row.get(0)?,
                        review_count: row.get(1)?,
                        modified: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(status.unwrap_or_default())
    }

    pub fn update_status(&self, deck_path: &str, status: DeckStatus) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO deck_status (path, new_count, review_count, modified)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (path) DO UPDATE SET
                new_count = excluded.new_count,
                review_count = excluded.review_count,
                modified = excluded.modified;",
            params![
                deck_path,
                status.new_count,
                status.review_count,
                status.modified
            ],
        )?;
        Ok(())
    }

    /// Drops all counters recorded for the deck at `deck_path`.
    pub fn reset_status(&self, deck_path: &str) -> DbResult<()> {
        self.conn
            .execute("DELETE FROM deck_status WHERE path = ?1;", [deck_path])?;
        Ok(())
    }
}
