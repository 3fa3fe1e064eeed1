//! KeyStore persistence tests.
//!
//! Rings live in per-test temporary home directories; the tests cover
//! the empty state, the append-only growth property, idempotent loads
//! and malformed ring files.

use tempfile::tempdir;

use antipaste::{Error, KeyStore};

#[test]
fn test_missing_files_load_as_empty_rings() {
    let home = tempdir().unwrap();
    let store = KeyStore::load(home.path()).unwrap();
    assert!(store.pub_ring.is_empty());
    assert!(store.sec_ring.is_empty());
}

#[test]
fn test_empty_ring_file_is_a_valid_empty_ring() {
    let home = tempdir().unwrap();
    std::fs::write(home.path().join("pubring.gpg"), b"").unwrap();
    let store = KeyStore::load(home.path()).unwrap();
    assert!(store.pub_ring.is_empty());
}

#[test]
fn test_generate_save_load_round_trip() {
    let home = tempdir().unwrap();

    let mut store = KeyStore::load(home.path()).unwrap();
    let fingerprint = store
        .generate("Alice", "alice@example.com", "laptop")
        .unwrap();
    store.save().unwrap();

    let reloaded = KeyStore::load(home.path()).unwrap();
    assert_eq!(reloaded.pub_ring.len(), 1);
    assert_eq!(reloaded.sec_ring.len(), 1);
    assert!(reloaded.contains(fingerprint));
}

#[test]
fn test_rings_are_append_only() {
    let home = tempdir().unwrap();

    let mut store = KeyStore::load(home.path()).unwrap();
    store.generate("Alice", "alice@example.com", "").unwrap();
    store.save().unwrap();
    let before = KeyStore::load(home.path()).unwrap().pub_ring.len();

    let mut store = KeyStore::load(home.path()).unwrap();
    store.generate("Bob", "bob@example.com", "").unwrap();
    store.save().unwrap();
    let after = KeyStore::load(home.path()).unwrap();

    assert!(after.pub_ring.len() > before);
    assert_eq!(after.pub_ring.len(), 2);
    assert_eq!(after.sec_ring.len(), 2);
}

#[test]
fn test_load_is_idempotent() {
    let home = tempdir().unwrap();

    let mut store = KeyStore::load(home.path()).unwrap();
    let fingerprint = store.generate("Alice", "alice@example.com", "").unwrap();
    store.save().unwrap();

    let first = KeyStore::load(home.path()).unwrap();
    let second = KeyStore::load(home.path()).unwrap();
    assert_eq!(first.pub_ring.len(), second.pub_ring.len());
    assert_eq!(first.sec_ring.len(), second.sec_ring.len());
    assert!(first.contains(fingerprint) && second.contains(fingerprint));
}

#[test]
fn test_every_secret_entry_has_a_public_projection() {
    let home = tempdir().unwrap();

    let mut store = KeyStore::load(home.path()).unwrap();
    let fingerprint = store.generate("Alice", "alice@example.com", "").unwrap();
    store.save().unwrap();

    let reloaded = KeyStore::load(home.path()).unwrap();
    assert_eq!(reloaded.sec_ring.len(), 1);
    assert!(reloaded.contains(fingerprint));
}

#[test]
fn test_import_is_deduplicated_by_fingerprint() {
    let mut origin = KeyStore::new("unused");
    origin.generate("Carol", "carol@example.com", "").unwrap();
    let key = origin.pub_ring[0].clone();

    let mut store = KeyStore::new("unused");
    let first = store.import(key.clone()).unwrap();
    let second = store.import(key).unwrap();

    assert_eq!(first, second);
    assert_eq!(store.pub_ring.len(), 1);
}

#[test]
fn test_corrupt_ring_file_fails_with_format_error() {
    let home = tempdir().unwrap();
    std::fs::write(home.path().join("pubring.gpg"), b"this is not a keyring").unwrap();

    let result = KeyStore::load(home.path());
    assert!(matches!(result, Err(Error::KeyRingFormat(_))));
}
