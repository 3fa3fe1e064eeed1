//! The top-level operations: put, get, find, import, generate.
//!
//! These glue the key store, the crypto pipeline, the handler registry
//! and the keyserver client together. Each invocation runs exactly one
//! operation; the first error aborts it and propagates unchanged.

use std::io::{Read, Write};

use crate::decrypt::decrypt_bytes;
use crate::encrypt::encrypt_stream;
use crate::error::Result;
use crate::hkp::Hkp;
use crate::keystore::KeyStore;
use crate::locator::HandlerRegistry;
use crate::recipient::resolve_all;
use crate::types::{Fingerprint, LookupResult};

/// Encrypt `source` to the resolved recipients and upload it through the
/// handler registered for `protocol`. Returns the locator of the new
/// paste.
///
/// Encryption runs in a producer thread feeding the upload through a
/// bounded pipe, so arbitrarily large sources use bounded memory.
pub fn put<R>(
    store: &KeyStore,
    registry: &HandlerRegistry,
    protocol: &str,
    source: R,
    recipient_ids: &[&str],
) -> Result<String>
where
    R: Read + Send + 'static,
{
    let recipients = resolve_all(&store.pub_ring, recipient_ids)?;
    let handler = registry.handler(protocol)?;
    let mut ciphertext = encrypt_stream(&recipients, source)?;
    handler.write_paste(&mut ciphertext)
}

/// Download the paste named by `locator`, decrypt it against the secret
/// ring and write the plaintext to `sink`.
pub fn get(
    store: &KeyStore,
    registry: &HandlerRegistry,
    locator: &str,
    sink: &mut dyn Write,
) -> Result<()> {
    let (protocol, remainder) = registry.classify(locator)?;
    let handler = registry.handler(&protocol)?;

    let mut ciphertext = Vec::new();
    handler.read_paste(&remainder)?.read_to_end(&mut ciphertext)?;

    let plaintext = decrypt_bytes(&store.sec_ring, &ciphertext)?;
    sink.write_all(&plaintext)?;
    Ok(())
}

/// Search a keyserver index for `term`.
pub fn find(hkp: &Hkp, term: &str) -> Result<Vec<LookupResult>> {
    hkp.lookup(term)
}

/// Fetch `key_id` from a keyserver, merge it into the public ring and
/// persist the rings.
pub fn import(store: &mut KeyStore, hkp: &Hkp, key_id: &str) -> Result<Fingerprint> {
    let key = hkp.get(key_id)?;
    let fingerprint = store.import(key)?;
    store.save()?;
    Ok(fingerprint)
}

/// Generate a new key pair in the store and persist the rings.
pub fn generate(store: &mut KeyStore, name: &str, email: &str, comment: &str) -> Result<Fingerprint> {
    let fingerprint = store.generate(name, email, comment)?;
    store.save()?;
    Ok(fingerprint)
}
