//! Core use-case services.
//!
//! # Responsibility
//! - Tie one deck store to its undo session and expose unit-of-work APIs.
//! - Keep callers decoupled from SQL construction details.

pub mod deck_service;
