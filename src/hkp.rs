//! HKP keyserver client.
//!
//! Implements the two operations this system needs from an HKP server:
//! a machine-readable index search (`op=index&options=mr`) and an armored
//! key export fetch (`op=get`). The index format is line oriented and
//! colon delimited; parsing is separated from the network round trip so
//! it can be tested offline.
//!
//! Both operations are single blocking round trips with no retry and no
//! timeout.

use std::io::Cursor;

use pgp::composed::{Deserializable, SignedPublicKey};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{LookupResult, UserIdRecord, NO_EXPIRATION};

/// The IANA-assigned HKP port.
const DEFAULT_PORT: u16 = 11371;

/// The keyserver used when the caller names none.
pub const DEFAULT_KEYSERVER: &str = "pgp.mit.edu";

/// One HKP keyserver endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hkp {
    hostname: String,
    port: u16,
}

impl Default for Hkp {
    fn default() -> Self {
        Hkp::new(DEFAULT_KEYSERVER, DEFAULT_PORT)
    }
}

impl Hkp {
    /// Create a client for `hostname`; a port of 0 selects the default.
    pub fn new(hostname: &str, port: u16) -> Self {
        Hkp {
            hostname: hostname.to_string(),
            port: if port == 0 { DEFAULT_PORT } else { port },
        }
    }

    /// Parse a `host[:port]` keyserver designation.
    pub fn parse_uri(uri: &str) -> Result<Self> {
        let mut fields = uri.splitn(2, ':');
        let hostname = match fields.next() {
            Some(host) if !host.is_empty() => host,
            _ => return Err(Error::InvalidInput(format!("invalid keyserver: {}", uri))),
        };
        let port = match fields.next() {
            Some(port) => port
                .parse::<u16>()
                .map_err(|_| Error::InvalidInput(format!("invalid keyserver port: {}", uri)))?,
            None => DEFAULT_PORT,
        };
        Ok(Hkp::new(hostname, port))
    }

    fn base_url(&self) -> String {
        format!("http://{}:{}", self.hostname, self.port)
    }

    /// Search the server index for `term`, returning results in server
    /// order.
    ///
    /// The result list is materialized in full; index responses are
    /// bounded and small.
    pub fn lookup(&self, term: &str) -> Result<Vec<LookupResult>> {
        let url = format!(
            "{}/pks/lookup?op=index&search={}&options=mr",
            self.base_url(),
            term
        );
        debug!(%url, "hkp index lookup");

        let response = reqwest::blocking::get(&url).map_err(|e| Error::Network(e.to_string()))?;
        let body = response.text().map_err(|e| Error::Network(e.to_string()))?;
        parse_index(&body)
    }

    /// Fetch the armored key export for `key_id` and parse the first
    /// entity in it.
    pub fn get(&self, key_id: &str) -> Result<SignedPublicKey> {
        let url = format!("{}/pks/lookup?op=get&search=0x{}", self.base_url(), key_id);
        debug!(%url, "hkp key fetch");

        let response = reqwest::blocking::get(&url).map_err(|e| Error::Network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Error::KeyNotFound(key_id.to_string()));
        }
        let body = response.bytes().map_err(|e| Error::Network(e.to_string()))?;

        let (mut entities, _headers) = SignedPublicKey::from_armor_many(Cursor::new(body.as_ref()))
            .map_err(|_| Error::KeyNotFound(key_id.to_string()))?;
        entities
            .find_map(|entity| entity.ok())
            .ok_or_else(|| Error::KeyNotFound(key_id.to_string()))
    }
}

/// Parse a machine-readable index response.
///
/// Record types: `info` is ignored, `pub` opens a new result, `uid`
/// appends an identity to the current result. Unknown record types are
/// skipped. A `uid` before any `pub`, a short record, or a malformed
/// numeric field is a protocol violation.
pub fn parse_index(body: &str) -> Result<Vec<LookupResult>> {
    let mut results: Vec<LookupResult> = Vec::new();

    for line in body.lines() {
        let fields: Vec<&str> = line.split(':').collect();
        match fields[0] {
            "info" => {}
            "pub" => {
                if fields.len() < 7 {
                    return Err(Error::KeyserverProtocol(format!(
                        "short 'pub' record: {}",
                        line
                    )));
                }
                results.push(LookupResult {
                    key_id: fields[1].to_string(),
                    algo: parse_numeric(fields[2])? as u32,
                    key_len: parse_numeric(fields[3])? as u32,
                    creation: parse_creation(fields[4])?,
                    expiration: parse_expiration(fields[5])?,
                    flags: fields[6].to_string(),
                    uids: Vec::new(),
                });
            }
            "uid" => {
                if fields.len() < 5 {
                    return Err(Error::KeyserverProtocol(format!(
                        "short 'uid' record: {}",
                        line
                    )));
                }
                let uid = UserIdRecord {
                    uid: fields[1].to_string(),
                    creation: parse_creation(fields[2])?,
                    expiration: parse_expiration(fields[3])?,
                    flags: fields[4].to_string(),
                };
                match results.last_mut() {
                    Some(current) => current.uids.push(uid),
                    None => {
                        return Err(Error::KeyserverProtocol(
                            "'uid' record before 'pub'".to_string(),
                        ))
                    }
                }
            }
            _ => {}
        }
    }

    Ok(results)
}

fn parse_numeric(field: &str) -> Result<u64> {
    field
        .parse::<u64>()
        .map_err(|_| Error::KeyserverProtocol(format!("malformed numeric field: {:?}", field)))
}

/// Empty creation fields mean "unknown", represented as 0.
fn parse_creation(field: &str) -> Result<u64> {
    if field.is_empty() {
        Ok(0)
    } else {
        parse_numeric(field)
    }
}

/// Empty expiration fields mean "never expires".
fn parse_expiration(field: &str) -> Result<u64> {
    if field.is_empty() {
        Ok(NO_EXPIRATION)
    } else {
        parse_numeric(field)
    }
}
