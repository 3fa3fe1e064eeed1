//! # antipaste
//!
//! Share confidential text through public paste-hosting sites: content is
//! encrypted under one or more recipients' OpenPGP public keys (using
//! [rpgp](https://docs.rs/pgp)) before upload, and decrypted locally
//! after retrieval.
//!
//! The library covers:
//!
//! - **Key rings**: two on-disk rings (`pubring.gpg`, `secring.gpg`) in a
//!   home directory, in standard OpenPGP packet encoding
//! - **Recipient resolution**: by fingerprint suffix, with enforced
//!   uniqueness
//! - **Crypto pipeline**: streaming multi-recipient encrypt + armor
//!   through a bounded producer/consumer pipe, and the matching decrypt
//! - **Keyserver client**: HKP index search and key import
//! - **Locator dispatch**: `prefix:id` locators routed to pluggable
//!   paste handlers through an explicit registry
//!
//! ## Quick start
//!
//! ```no_run
//! use antipaste::{ops, Hkp, HandlerRegistry, KeyStore};
//!
//! let mut store = KeyStore::load("/home/alice/.antipaste").unwrap();
//! let registry = HandlerRegistry::new(); // paste handlers register here
//!
//! // Generate a key and persist the rings
//! let fp = ops::generate(&mut store, "Alice", "alice@example.com", "").unwrap();
//!
//! // Encrypt and upload for the recipient matching a fingerprint suffix
//! let locator = ops::put(
//!     &store,
//!     &registry,
//!     "gist",
//!     std::io::stdin(),
//!     &[&fp.to_hex()[32..]],
//! ).unwrap();
//! println!("{}", locator);
//! ```
//!
//! Paste backends (gist, dpaste, pastebin, ...) are thin HTTP shims
//! outside this crate; they plug in through [`PasteHandler`].

mod error;
mod internal;
mod types;

mod decrypt;
mod encrypt;
mod hkp;
mod key;
mod keystore;
mod locator;
mod pipe;
mod recipient;

pub mod ops;

// Re-export error types
pub use error::{Error, Result};

// Re-export public types
pub use types::{Fingerprint, LookupResult, UserIdRecord, NO_EXPIRATION};

// Re-export key ring storage
pub use keystore::KeyStore;

// Re-export key generation
pub use key::generate_key;

// Re-export recipient resolution
pub use recipient::{resolve, resolve_all};

// Re-export the crypto pipeline
pub use decrypt::decrypt_bytes;
pub use encrypt::{encrypt_bytes, encrypt_stream};
pub use pipe::{bounded_pipe, PipeReader, PipeWriter};

// Re-export the keyserver client
pub use hkp::{parse_index, Hkp, DEFAULT_KEYSERVER};

// Re-export locator dispatch
pub use locator::{HandlerRegistry, PasteHandler};
