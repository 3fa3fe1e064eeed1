//! Decryption half of the crypto pipeline.
//!
//! A downloaded paste is un-armored, the key ids in its encrypted
//! session-key packets are matched against the secret ring, and the first
//! holding key that decrypts wins.

use std::io::{BufReader, Cursor, Read};

use pgp::armor::Dearmor;
use pgp::composed::{Message, SignedSecretKey};
use pgp::packet::{Packet, PacketParser, PublicKeyEncryptedSessionKey};
use pgp::types::{KeyDetails, Password};

use crate::error::{Error, Result};
use crate::internal::keyid_hex;

/// An anonymous-recipient session key names no key id; any key may try.
const WILDCARD_KEY_ID: &str = "0000000000000000";

/// Decrypt an armored message with whichever secret ring entry matches
/// its session keys.
///
/// # Errors
/// * [`Error::MalformedArmor`] - the input is not validly armored
/// * [`Error::NoMatchingKey`] - no secret entry matches any session key
/// * [`Error::Decryption`] - the message structure is corrupt
pub fn decrypt_bytes(sec_ring: &[SignedSecretKey], ciphertext: &[u8]) -> Result<Vec<u8>> {
    let session_ids = session_key_ids(ciphertext)?;

    let mut last_error = None;
    let mut matched = false;

    for secret_key in sec_ring {
        if !key_matches(secret_key, &session_ids) {
            continue;
        }
        matched = true;
        match decrypt_with(secret_key, ciphertext) {
            Ok(plaintext) => return Ok(plaintext),
            Err(e) => last_error = Some(e),
        }
    }

    if !matched {
        return Err(Error::NoMatchingKey);
    }
    Err(last_error.unwrap_or(Error::NoMatchingKey))
}

/// Decrypt with one specific secret key.
fn decrypt_with(secret_key: &SignedSecretKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
    let (message, _headers) = Message::from_armor(Cursor::new(ciphertext))
        .map_err(|e| Error::MalformedArmor(e.to_string()))?;

    // Core keys carry no passphrase
    let password = Password::from("");
    let decrypted = message
        .decrypt(&password, secret_key)
        .map_err(|e| Error::Decryption(e.to_string()))?;

    let mut decompressed = if decrypted.is_compressed() {
        decrypted
            .decompress()
            .map_err(|e| Error::Decryption(e.to_string()))?
    } else {
        decrypted
    };

    decompressed
        .as_data_vec()
        .map_err(|e| Error::Decryption(e.to_string()))
}

/// Whether any of the message's session keys belongs to this secret key.
fn key_matches(secret_key: &SignedSecretKey, session_ids: &[String]) -> bool {
    if session_ids.iter().any(|id| id == WILDCARD_KEY_ID) {
        return true;
    }

    // V3 session keys carry a key id, V6 a fingerprint; accept either form.
    let mut own_ids = vec![
        keyid_hex(&secret_key.primary_key),
        hex::encode(secret_key.primary_key.fingerprint().as_bytes()),
    ];
    for subkey in &secret_key.secret_subkeys {
        own_ids.push(keyid_hex(&subkey.key));
        own_ids.push(hex::encode(subkey.key.fingerprint().as_bytes()));
    }

    session_ids.iter().any(|id| own_ids.contains(id))
}

/// Extract the key ids of every encrypted session-key packet.
///
/// The input must be armored; the packet scan stops at the first
/// unparsable packet (the encrypted payload itself).
fn session_key_ids(ciphertext: &[u8]) -> Result<Vec<String>> {
    if !ciphertext.starts_with(b"-----BEGIN PGP") {
        return Err(Error::MalformedArmor("missing armor header".to_string()));
    }

    let dearmor = Dearmor::new(Cursor::new(ciphertext));
    let mut data = Vec::new();
    BufReader::new(dearmor)
        .read_to_end(&mut data)
        .map_err(|e| Error::MalformedArmor(e.to_string()))?;

    let mut key_ids = Vec::new();
    for packet_result in PacketParser::new(Cursor::new(&data)) {
        match packet_result {
            Ok(Packet::PublicKeyEncryptedSessionKey(pkesk)) => match pkesk {
                PublicKeyEncryptedSessionKey::V3 { id, .. } => {
                    key_ids.push(format!("{}", id));
                }
                PublicKeyEncryptedSessionKey::V6 { fingerprint, .. } => {
                    if let Some(fp) = fingerprint {
                        key_ids.push(hex::encode(fp.as_bytes()));
                    }
                }
                PublicKeyEncryptedSessionKey::Other { .. } => {}
            },
            Ok(_) => {}
            // Hit the encrypted data; session keys always precede it
            Err(_) => break,
        }
    }

    Ok(key_ids)
}
