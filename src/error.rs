//! Error types for the antipaste library.
//!
//! One closed enum covers every failure mode in the core pipeline so that
//! callers and tests can match on the kind instead of scraping prose.

use thiserror::Error;

/// The main error type for antipaste operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A key ring file exists but could not be parsed
    #[error("Key ring file is malformed: {0}")]
    KeyRingFormat(String),

    /// No public key matched the given recipient identifier
    #[error("Recipient not found: {0}")]
    RecipientNotFound(String),

    /// More than one public key matched the given recipient identifier
    #[error("Recipient identifier is ambiguous: {0}")]
    AmbiguousRecipient(String),

    /// No private key in the ring matches any encrypted session key
    #[error("No matching private key for this message")]
    NoMatchingKey,

    /// Armored input is malformed
    #[error("Malformed armored data: {0}")]
    MalformedArmor(String),

    /// Message structure is corrupt or decryption failed
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// The keyserver response violated the machine-readable index format
    #[error("Invalid keyserver response: {0}")]
    KeyserverProtocol(String),

    /// The keyserver returned no parsable key for the requested id
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// The locator string matched no registered protocol or local file
    #[error("Unrecognized locator: {0}")]
    UnrecognizedLocator(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Cryptographic operation failed
    #[error("Cryptographic operation failed: {0}")]
    Crypto(String),

    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// A specialized Result type for antipaste operations.
pub type Result<T> = std::result::Result<T, Error>;
