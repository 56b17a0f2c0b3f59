//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `deckstore_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("deckstore_core version={}", deckstore_core::core_version());
    match deckstore_core::Store::open_in_memory() {
        Ok(_) => println!("deckstore_core store=ok"),
        Err(err) => println!("deckstore_core store=error {err}"),
    }
}
