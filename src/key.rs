//! Key pair generation.
//!
//! The core pipeline models no passphrase-protected keys, so generated
//! secret keys are stored unlocked in the secret ring.

use pgp::composed::{
    EncryptionCaps, KeyType, SecretKeyParamsBuilder, SignedPublicKey, SignedSecretKey,
    SubkeyParamsBuilder,
};
use pgp::crypto::ecc_curve::ECCCurve;
use rand::thread_rng;

use crate::error::{Error, Result};

/// Generate a new key pair for `name`, `email` and an optional `comment`.
///
/// Produces a Curve25519 certification/signing primary key with one ECDH
/// encryption subkey, the shape every put/get operation in this system
/// needs. Returns the secret key and its public projection; the caller
/// (normally [`crate::keystore::KeyStore::generate`]) is responsible for
/// appending both to their rings.
pub fn generate_key(
    name: &str,
    email: &str,
    comment: &str,
) -> Result<(SignedSecretKey, SignedPublicKey)> {
    if name.is_empty() || email.is_empty() {
        return Err(Error::InvalidInput(
            "key generation requires a name and an email".to_string(),
        ));
    }

    let mut rng = thread_rng();

    let mut enc_builder = SubkeyParamsBuilder::default();
    enc_builder
        .key_type(KeyType::ECDH(ECCCurve::Curve25519Legacy))
        .can_encrypt(EncryptionCaps::All)
        .can_sign(false)
        .can_authenticate(false);
    let enc_subkey = enc_builder
        .build()
        .map_err(|e| Error::Crypto(e.to_string()))?;

    let mut key_params = SecretKeyParamsBuilder::default();
    key_params
        .key_type(KeyType::Ed25519Legacy)
        .can_certify(true)
        .can_sign(true)
        .can_encrypt(EncryptionCaps::None)
        .primary_user_id(user_id(name, email, comment))
        .subkeys(vec![enc_subkey]);

    let secret_key_params = key_params
        .build()
        .map_err(|e| Error::Crypto(e.to_string()))?;
    let secret_key = secret_key_params
        .generate(&mut rng)
        .map_err(|e| Error::Crypto(e.to_string()))?;

    let public_key = secret_key.to_public_key();

    Ok((secret_key, public_key))
}

/// Format a user id the way GnuPG renders one: `Name (comment) <email>`,
/// with the comment part omitted when empty.
fn user_id(name: &str, email: &str, comment: &str) -> String {
    if comment.is_empty() {
        format!("{} <{}>", name, email)
    } else {
        format!("{} ({}) <{}>", name, comment, email)
    }
}
