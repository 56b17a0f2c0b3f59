//! Undo-aware deck storage core.
//! Every mutation issued through this crate can record, at mutation time,
//! the inverse command needed to take it back.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod session;

pub use db::{open_db, open_db_in_memory, DbError, DbResult, Store};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::command::{
    ColumnValues, CommandKind, Predicate, RowId, UndoCommand, ROW_ID_COLUMN,
};
pub use model::value::SqlValue;
pub use repo::meta::{DeckStatus, MetaStore};
pub use repo::mutation::{
    MutationError, MutationRepository, MutationResult, SqliteMutationRepo,
};
pub use service::deck_service::DeckService;
pub use session::Session;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
