use deckstore_core::{DeckStatus, MetaStore};

const DECK_A: &str = "/decks/japanese.deck";
const DECK_B: &str = "/decks/chemistry.deck";

#[test]
fn unknown_paths_report_defaults() {
    let meta = MetaStore::open_in_memory().unwrap();

    assert_eq!(meta.language(DECK_A).unwrap(), None);
    assert!(!meta.is_pinned(DECK_A).unwrap());
    assert_eq!(meta.review_limit(DECK_A).unwrap(), 0);
    assert_eq!(meta.status(DECK_A).unwrap(), DeckStatus::default());
}

#[test]
fn settings_roundtrip_and_overwrite() {
    let meta = MetaStore::open_in_memory().unwrap();

    meta.set_language(DECK_A, "ja").unwrap();
    meta.set_language(DECK_A, "en").unwrap();
    assert_eq!(meta.language(DECK_A).unwrap().as_deref(), Some("en"));

    meta.set_pinned(DECK_A, true).unwrap();
    assert!(meta.is_pinned(DECK_A).unwrap());
    meta.set_pinned(DECK_A, false).unwrap();
    assert!(!meta.is_pinned(DECK_A).unwrap());

    meta.set_review_limit(DECK_A, 200).unwrap();
    assert_eq!(meta.review_limit(DECK_A).unwrap(), 200);
}

#[test]
fn paths_are_independent() {
    let meta = MetaStore::open_in_memory().unwrap();

    meta.set_language(DECK_A, "ja").unwrap();
    meta.set_pinned(DECK_B, true).unwrap();

    assert_eq!(meta.language(DECK_B).unwrap(), None);
    assert!(!meta.is_pinned(DECK_A).unwrap());
}

#[test]
fn status_counters_update_and_reset() {
    let meta = MetaStore::open_in_memory().unwrap();

    let status = DeckStatus {
        new_count: 12,
        review_count: 30,
        modified: 1_700_000_000,
    };
    meta.update_status(DECK_A, status).unwrap();
    assert_eq!(meta.status(DECK_A).unwrap(), status);

    meta.reset_status(DECK_A).unwrap();
    assert_eq!(meta.status(DECK_A).unwrap(), DeckStatus::default());
}

#[test]
fn settings_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meta.db");

    {
        let meta = MetaStore::open(&path).unwrap();
        meta.set_language(DECK_A, "ja").unwrap();
        meta.set_review_limit(DECK_A, 50).unwrap();
    }

    let meta = MetaStore::open(&path).unwrap();
    assert_eq!(meta.language(DECK_A).unwrap().as_deref(), Some("ja"));
    assert_eq!(meta.review_limit(DECK_A).unwrap(), 50);
}
