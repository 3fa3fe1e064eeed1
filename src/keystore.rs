//! On-disk key ring storage.
//!
//! A [`KeyStore`] is the exclusive owner of the two key ring files inside
//! one home directory: `pubring.gpg` (public entities) and `secring.gpg`
//! (secret entities), both in the standard OpenPGP packet encoding so
//! common PGP tooling can read them. A missing file is a valid empty
//! ring. There is no concurrency control; a home directory is assumed to
//! belong to a single process at a time.
//!
//! Rings are append-only: keys enter through generation or keyserver
//! import and are never deleted. [`KeyStore::save`] rewrites both files
//! completely on every call, so a failed partial write is detectable by
//! truncation but is not cleaned up automatically.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use pgp::composed::{Deserializable, SignedPublicKey, SignedSecretKey};
use pgp::ser::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::internal::fingerprint_of;
use crate::key::generate_key;
use crate::types::Fingerprint;

const PUB_RING_FILE: &str = "pubring.gpg";
const SEC_RING_FILE: &str = "secring.gpg";

/// The two key rings of one home directory.
pub struct KeyStore {
    home: PathBuf,
    /// Public ring: every known public key, own keys included.
    pub pub_ring: Vec<SignedPublicKey>,
    /// Secret ring: keys this user can decrypt with.
    pub sec_ring: Vec<SignedSecretKey>,
}

impl KeyStore {
    /// Create a store with empty rings, without touching the disk.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        KeyStore {
            home: home.into(),
            pub_ring: Vec::new(),
            sec_ring: Vec::new(),
        }
    }

    /// Load both rings from `home`, treating missing files as empty rings.
    ///
    /// A file that exists but cannot be parsed fails with
    /// [`Error::KeyRingFormat`].
    pub fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let mut store = KeyStore::new(home);
        store.pub_ring = read_ring::<SignedPublicKey>(&store.pub_ring_path())?;
        store.sec_ring = read_ring::<SignedSecretKey>(&store.sec_ring_path())?;
        debug!(
            public = store.pub_ring.len(),
            secret = store.sec_ring.len(),
            home = %store.home.display(),
            "loaded key rings"
        );
        Ok(store)
    }

    /// Serialize both rings back to their files, overwriting prior contents.
    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(&self.home)?;
        write_ring(&self.pub_ring_path(), &self.pub_ring)?;
        write_ring(&self.sec_ring_path(), &self.sec_ring)?;
        debug!(
            public = self.pub_ring.len(),
            secret = self.sec_ring.len(),
            "saved key rings"
        );
        Ok(())
    }

    /// Generate a new key pair and append it to both rings.
    ///
    /// The secret key lands in the secret ring and its public projection
    /// (no private material) in the public ring. Returns the fingerprint
    /// of the new key. The caller decides when to [`save`](Self::save).
    pub fn generate(&mut self, name: &str, email: &str, comment: &str) -> Result<Fingerprint> {
        let (secret_key, public_key) = generate_key(name, email, comment)?;
        let fingerprint = fingerprint_of(&public_key.primary_key)?;
        self.sec_ring.push(secret_key);
        self.pub_ring.push(public_key);
        Ok(fingerprint)
    }

    /// Append an imported public key to the public ring.
    ///
    /// Importing a fingerprint that is already present is a no-op, keeping
    /// fingerprints unique within the ring.
    pub fn import(&mut self, key: SignedPublicKey) -> Result<Fingerprint> {
        let fingerprint = fingerprint_of(&key.primary_key)?;
        let already_known = self
            .pub_ring
            .iter()
            .any(|known| fingerprint_of(&known.primary_key).ok() == Some(fingerprint));
        if !already_known {
            self.pub_ring.push(key);
        }
        Ok(fingerprint)
    }

    /// Whether the public ring holds an entity with this fingerprint.
    pub fn contains(&self, fingerprint: Fingerprint) -> bool {
        self.pub_ring
            .iter()
            .any(|key| fingerprint_of(&key.primary_key).ok() == Some(fingerprint))
    }

    /// The home directory this store owns.
    pub fn home(&self) -> &Path {
        &self.home
    }

    fn pub_ring_path(&self) -> PathBuf {
        self.home.join(PUB_RING_FILE)
    }

    fn sec_ring_path(&self) -> PathBuf {
        self.home.join(SEC_RING_FILE)
    }
}

/// Read every entity from one ring file.
fn read_ring<T: Deserializable>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = std::fs::read(path)?;
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let (entities, _headers) = T::from_reader_many(Cursor::new(data))
        .map_err(|e| Error::KeyRingFormat(format!("{}: {}", path.display(), e)))?;

    let mut ring = Vec::new();
    for entity in entities {
        let entity =
            entity.map_err(|e| Error::KeyRingFormat(format!("{}: {}", path.display(), e)))?;
        ring.push(entity);
    }
    Ok(ring)
}

/// Serialize every entity of one ring into its file.
fn write_ring<T: Serialize>(path: &Path, ring: &[T]) -> Result<()> {
    let mut data = Vec::new();
    for entity in ring {
        let bytes = entity.to_bytes().map_err(|e| Error::Crypto(e.to_string()))?;
        data.extend_from_slice(&bytes);
    }
    std::fs::write(path, data)?;
    Ok(())
}
