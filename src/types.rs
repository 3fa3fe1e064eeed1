//! Public type definitions for the antipaste library.
//!
//! This module contains the data structures shared across the key store,
//! the recipient resolver, and the keyserver client.

use crate::error::{Error, Result};

/// Sentinel expiration timestamp meaning "never expires".
///
/// HKP machine-readable listings encode a missing expiration date as an
/// empty field; it parses to this maximal value.
pub const NO_EXPIRATION: u64 = u64::MAX;

/// A 20-byte OpenPGP v4 key fingerprint.
///
/// The canonical rendering is lowercase hex, matching what common
/// PGP tooling prints and what users paste back in as recipient ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 20]);

impl Fingerprint {
    /// Wrap raw fingerprint bytes. Fails unless exactly 20 bytes are given.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let array: [u8; 20] = bytes
            .try_into()
            .map_err(|_| Error::InvalidInput(format!("invalid fingerprint length: {}", bytes.len())))?;
        Ok(Fingerprint(array))
    }

    /// The raw fingerprint bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Case-insensitive test whether the hex rendering ends with `suffix`.
    pub fn matches_suffix(&self, suffix: &str) -> bool {
        self.to_hex().ends_with(&suffix.to_lowercase())
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for Fingerprint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)
            .map_err(|e| Error::InvalidInput(format!("invalid fingerprint hex: {}", e)))?;
        Fingerprint::from_bytes(&bytes)
    }
}

/// One `pub` record from an HKP machine-readable index response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResult {
    /// Key id (16 hex characters, not the full fingerprint)
    pub key_id: String,
    /// OpenPGP public key algorithm id
    pub algo: u32,
    /// Key length in bits
    pub key_len: u32,
    /// Creation timestamp (epoch seconds, 0 when the server omits it)
    pub creation: u64,
    /// Expiration timestamp ([`NO_EXPIRATION`] when the key never expires)
    pub expiration: u64,
    /// Raw flags field (e.g. "r" for revoked)
    pub flags: String,
    /// Associated user ids, in server order
    pub uids: Vec<UserIdRecord>,
}

/// One `uid` record attached to a [`LookupResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdRecord {
    /// The identity string, e.g. `Alice <alice@example.com>`
    pub uid: String,
    /// Creation timestamp (epoch seconds, 0 when omitted)
    pub creation: u64,
    /// Expiration timestamp ([`NO_EXPIRATION`] when omitted)
    pub expiration: u64,
    /// Raw flags field
    pub flags: String,
}
