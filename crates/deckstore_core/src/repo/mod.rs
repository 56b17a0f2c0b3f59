//! Persistence layer: undo-aware mutation dispatch and auxiliary stores.
//!
//! # Responsibility
//! - Keep SQL construction and execution inside the persistence boundary.
//! - Guarantee that recorded mutations push their inverse commands before
//!   the forward statement runs.
//!
//! # Invariants
//! - All column values are bound as parameters, never concatenated into
//!   SQL text.
//! - Repository APIs return semantic errors (`EmptyValues`, `Capture`) in
//!   addition to DB transport errors.

pub mod meta;
pub mod mutation;
