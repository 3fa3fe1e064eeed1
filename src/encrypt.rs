//! Encryption half of the crypto pipeline.
//!
//! Messages are encrypted once with a symmetric session key and the
//! session key is wrapped for every recipient, so any one recipient's
//! secret key independently decrypts the result. Output is always
//! ASCII-armored: pastes travel through text-only channels.

use std::io::Read;
use std::thread;

use pgp::composed::{MessageBuilder, SignedPublicKey, SignedPublicSubKey};
use pgp::crypto::sym::SymmetricKeyAlgorithm;
use pgp::types::KeyDetails;
use rand::thread_rng;
use tracing::warn;

use crate::error::{Error, Result};
use crate::internal::{fingerprint_of, is_subkey_valid};
use crate::pipe::{bounded_pipe, PipeReader};

/// Pending chunks the pipe between producer and consumer may hold.
const PIPE_CAPACITY: usize = 32;

/// Encrypt a byte buffer to a set of recipients, returning armored
/// ciphertext.
///
/// The recipient set must be non-empty and every recipient must carry a
/// usable encryption subkey.
pub fn encrypt_bytes(recipients: &[&SignedPublicKey], plaintext: &[u8]) -> Result<Vec<u8>> {
    let encryption_keys = collect_encryption_keys(recipients)?;

    let mut rng = thread_rng();
    let mut builder = MessageBuilder::from_bytes("", plaintext.to_vec())
        .seipd_v1(&mut rng, SymmetricKeyAlgorithm::AES256);

    for key in &encryption_keys {
        builder
            .encrypt_to_key(&mut rng, key)
            .map_err(|e| Error::Crypto(e.to_string()))?;
    }

    let armored = builder
        .to_armored_string(&mut rng, None.into())
        .map_err(|e| Error::Crypto(e.to_string()))?;
    Ok(armored.into_bytes())
}

/// Encrypt a plaintext stream to a set of recipients, returning a lazy
/// armored ciphertext stream.
///
/// A producer thread drives the pipeline plaintext -> session-key
/// encryption -> armor -> bounded pipe; the returned reader is the
/// consumer half and sees bytes in production order. The pipe holds at
/// most [`PIPE_CAPACITY`] chunks, so the producer blocks until the
/// consumer drains (bounded memory for any payload size).
///
/// Close ordering: the encryption layer flushes and finalizes its framing
/// before the armor layer writes the trailing boundary, and only then is
/// the pipe writer dropped to signal end-of-stream. A producer failure
/// reaches the consumer as a broken stream instead of a clean EOF.
///
/// Recipient validation runs before the thread is spawned, so an empty or
/// unusable recipient set fails synchronously.
pub fn encrypt_stream<R>(recipients: &[&SignedPublicKey], source: R) -> Result<PipeReader>
where
    R: Read + Send + 'static,
{
    let encryption_keys = collect_encryption_keys(recipients)?;
    let (mut writer, reader) = bounded_pipe(PIPE_CAPACITY);

    thread::Builder::new()
        .name("antipaste-encrypt".to_string())
        .spawn(move || {
            let mut rng = thread_rng();
            let mut builder = MessageBuilder::from_reader("", source)
                .seipd_v1(&mut rng, SymmetricKeyAlgorithm::AES256);

            for key in &encryption_keys {
                if let Err(e) = builder.encrypt_to_key(&mut rng, key) {
                    warn!(error = %e, "encrypt producer failed");
                    writer.fail(e.to_string());
                    return;
                }
            }

            match builder.to_armored_writer(&mut rng, None.into(), &mut writer) {
                // Dropping the writer here closes the transport, strictly
                // after the armor trailer was written.
                Ok(()) => {}
                Err(e) => {
                    warn!(error = %e, "encrypt producer failed");
                    writer.fail(e.to_string());
                }
            }
        })?;

    Ok(reader)
}

/// Gather one usable encryption subkey set covering every recipient.
///
/// Fails when the recipient set is empty or when any recipient has no
/// valid (non-revoked, non-expired, encryption-capable) subkey, naming
/// the offending fingerprint.
fn collect_encryption_keys(recipients: &[&SignedPublicKey]) -> Result<Vec<SignedPublicSubKey>> {
    if recipients.is_empty() {
        return Err(Error::InvalidInput("no recipients specified".to_string()));
    }

    let mut encryption_keys = Vec::new();
    for recipient in recipients {
        let subkeys = find_valid_encryption_subkeys(recipient)?;
        encryption_keys.extend(subkeys);
    }
    Ok(encryption_keys)
}

/// Find the valid encryption subkeys of one public key.
fn find_valid_encryption_subkeys(key: &SignedPublicKey) -> Result<Vec<SignedPublicSubKey>> {
    let mut valid_keys = Vec::new();

    for subkey in &key.public_subkeys {
        if !subkey.key.algorithm().can_encrypt() {
            continue;
        }

        // The binding signature must grant an encryption flag
        let has_encryption_flag = subkey.signatures.iter().any(|sig| {
            let flags = sig.key_flags();
            flags.encrypt_comms() || flags.encrypt_storage()
        });
        if !has_encryption_flag {
            continue;
        }

        if !is_subkey_valid(subkey) {
            continue;
        }

        valid_keys.push(subkey.clone());
    }

    if valid_keys.is_empty() {
        return Err(Error::Crypto(format!(
            "no usable encryption subkey on {}",
            fingerprint_of(&key.primary_key)?
        )));
    }

    Ok(valid_keys)
}
