//! Internal helper and key-policy functions.
//!
//! rpgp has no policy system like sequoia, so subkey validity (revocation,
//! expiration) is checked manually here.

use std::time::SystemTime;

use pgp::composed::SignedPublicSubKey;
use pgp::packet::SignatureType;
use pgp::types::KeyDetails;

use crate::error::Result;
use crate::types::Fingerprint;

/// Get the 20-byte fingerprint of a key component.
pub(crate) fn fingerprint_of(key: &impl KeyDetails) -> Result<Fingerprint> {
    Fingerprint::from_bytes(key.fingerprint().as_bytes())
}

/// Get the key id as a lowercase hex string (16 characters).
pub(crate) fn keyid_hex(key: &impl KeyDetails) -> String {
    hex::encode(key.legacy_key_id().as_ref())
}

/// Check if a subkey is revoked.
pub(crate) fn is_subkey_revoked(subkey: &SignedPublicSubKey) -> bool {
    subkey
        .signatures
        .iter()
        .any(|sig| sig.typ() == Some(SignatureType::SubkeyRevocation))
}

/// Check if a subkey is valid for use (not revoked, not expired).
pub(crate) fn is_subkey_valid(subkey: &SignedPublicSubKey) -> bool {
    if is_subkey_revoked(subkey) {
        return false;
    }

    // Expiration comes from the most recent binding signature
    if let Some(sig) = subkey.signatures.last() {
        if let Some(validity) = sig.key_expiration_time() {
            let creation: SystemTime = subkey.key.created_at().into();
            let expiration = creation + std::time::Duration::from_secs(validity.as_secs() as u64);
            if expiration < SystemTime::now() {
                return false;
            }
        }
    }

    true
}
