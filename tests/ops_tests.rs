//! End-to-end put/get flows through paste-handler test doubles.
//!
//! The memory handler stands in for a paste host; the file handler
//! exercises the bare-path locator classification.

use std::cell::RefCell;
use std::io::Read;
use std::rc::Rc;

use tempfile::tempdir;

use antipaste::{encrypt_bytes, ops, Error, HandlerRegistry, KeyStore, PasteHandler, Result};

/// In-memory paste host: uploads append, locators index into the list.
struct MemoryHandler {
    pastes: Rc<RefCell<Vec<Vec<u8>>>>,
}

impl PasteHandler for MemoryHandler {
    fn prefix(&self) -> &str {
        "mem"
    }

    fn read_paste(&self, locator: &str) -> Result<Box<dyn Read>> {
        let index: usize = locator
            .parse()
            .map_err(|_| Error::UnrecognizedLocator(locator.to_string()))?;
        let paste = self
            .pastes
            .borrow()
            .get(index)
            .cloned()
            .ok_or_else(|| Error::UnrecognizedLocator(locator.to_string()))?;
        Ok(Box::new(std::io::Cursor::new(paste)))
    }

    fn write_paste(&self, content: &mut dyn Read) -> Result<String> {
        let mut data = Vec::new();
        content.read_to_end(&mut data)?;
        let mut pastes = self.pastes.borrow_mut();
        pastes.push(data);
        Ok(format!("mem:{}", pastes.len() - 1))
    }
}

/// Local-file backend for bare-path locators.
struct FileHandler;

impl PasteHandler for FileHandler {
    fn prefix(&self) -> &str {
        "file"
    }

    fn read_paste(&self, locator: &str) -> Result<Box<dyn Read>> {
        Ok(Box::new(std::fs::File::open(locator)?))
    }

    fn write_paste(&self, _content: &mut dyn Read) -> Result<String> {
        unimplemented!("tests only download through the file handler")
    }
}

fn setup() -> (KeyStore, HandlerRegistry, Rc<RefCell<Vec<Vec<u8>>>>) {
    let mut store = KeyStore::new("unused");
    store.generate("Alice", "alice@example.com", "").unwrap();

    let pastes = Rc::new(RefCell::new(Vec::new()));
    let mut registry = HandlerRegistry::new();
    registry.register(Box::new(MemoryHandler {
        pastes: Rc::clone(&pastes),
    }));
    registry.register(Box::new(FileHandler));

    (store, registry, pastes)
}

#[test]
fn test_put_then_get_round_trip() {
    let (store, registry, pastes) = setup();
    let suffix = "";
    // A single-key ring resolves the empty suffix unambiguously
    let plaintext = b"meet me at the usual place".to_vec();

    let locator = ops::put(
        &store,
        &registry,
        "mem",
        std::io::Cursor::new(plaintext.clone()),
        &[suffix],
    )
    .unwrap();
    assert_eq!(locator, "mem:0");

    // What went over the wire is armored ciphertext, not the plaintext
    let uploaded = pastes.borrow()[0].clone();
    assert!(uploaded.starts_with(b"-----BEGIN PGP"));

    let mut out = Vec::new();
    ops::get(&store, &registry, &locator, &mut out).unwrap();
    assert_eq!(out, plaintext);
}

#[test]
fn test_put_with_unknown_protocol_fails() {
    let (store, registry, _) = setup();
    let result = ops::put(
        &store,
        &registry,
        "pastebin",
        std::io::Cursor::new(b"data".to_vec()),
        &[""],
    );
    assert!(matches!(result, Err(Error::UnrecognizedLocator(p)) if p == "pastebin"));
}

#[test]
fn test_put_with_unresolvable_recipient_fails() {
    let (store, registry, pastes) = setup();
    let result = ops::put(
        &store,
        &registry,
        "mem",
        std::io::Cursor::new(b"data".to_vec()),
        &["zz"],
    );
    assert!(matches!(result, Err(Error::RecipientNotFound(_))));
    // Nothing was uploaded
    assert!(pastes.borrow().is_empty());
}

#[test]
fn test_get_from_bare_file_path() {
    let (store, registry, _) = setup();

    let recipients: Vec<_> = store.pub_ring.iter().collect();
    let plaintext = b"paste saved to disk";
    let ciphertext = encrypt_bytes(&recipients, plaintext).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("paste.asc");
    std::fs::write(&path, ciphertext).unwrap();

    let mut out = Vec::new();
    ops::get(&store, &registry, path.to_str().unwrap(), &mut out).unwrap();
    assert_eq!(out, plaintext);
}

#[test]
fn test_get_with_unrecognized_locator_fails() {
    let (store, registry, _) = setup();
    let mut out = Vec::new();
    let result = ops::get(&store, &registry, "gopher:under/ground", &mut out);
    assert!(matches!(result, Err(Error::UnrecognizedLocator(_))));
    assert!(out.is_empty());
}
