//! Recipient resolution.
//!
//! A recipient identifier is typically the trailing part of a key
//! fingerprint, pasted from `gpg --fingerprint` output or a keyserver
//! listing. Resolution scans the public ring for fingerprints ending in
//! the identifier, case-insensitively.
//!
//! Unlike a first-match scan, an identifier matching more than one entity
//! is rejected: a silently non-deterministic pick of encryption targets
//! is not acceptable, so the caller gets [`Error::AmbiguousRecipient`]
//! and must supply a longer suffix.

use pgp::composed::SignedPublicKey;

use crate::error::{Error, Result};
use crate::internal::fingerprint_of;
use crate::types::Fingerprint;

/// Resolve a single identifier to the unique matching public key.
pub fn resolve<'a>(pub_ring: &'a [SignedPublicKey], id: &str) -> Result<&'a SignedPublicKey> {
    let mut matches = Vec::new();
    for entity in pub_ring {
        let fingerprint = fingerprint_of(&entity.primary_key)?;
        if fingerprint.matches_suffix(id) {
            matches.push(entity);
        }
    }

    match matches.len() {
        0 => Err(Error::RecipientNotFound(id.to_string())),
        1 => Ok(matches[0]),
        _ => Err(Error::AmbiguousRecipient(id.to_string())),
    }
}

/// Resolve a list of identifiers into a recipient set.
///
/// Identifiers that resolve to the same entity (repeated or overlapping
/// suffixes) collapse to one recipient; first-seen order is preserved.
pub fn resolve_all<'a>(
    pub_ring: &'a [SignedPublicKey],
    ids: &[&str],
) -> Result<Vec<&'a SignedPublicKey>> {
    let mut seen: Vec<Fingerprint> = Vec::new();
    let mut recipients = Vec::new();

    for id in ids {
        let entity = resolve(pub_ring, id)?;
        let fingerprint = fingerprint_of(&entity.primary_key)?;
        if !seen.contains(&fingerprint) {
            seen.push(fingerprint);
            recipients.push(entity);
        }
    }

    Ok(recipients)
}
