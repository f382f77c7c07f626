//! Session token wire format
//!
//! ```text
//! hex(timestamp) ":" base64url(nonce ":" appid ":" userid) ":" base64url(hmac_sha1)
//! ```
//!
//! The signature covers `timestamp ":" payload` and nothing else. Everything
//! here is pure; keys and clocks belong to the manager.

use crate::models::VerifiedIdentity;
use crate::utils::crypto::{b64url_decode, b64url_encode, hmac_sha1};

/// Random bytes prefixed to every payload
pub const NONCE_LEN: usize = 4;

const SEPARATOR: char = ':';

/// The three top-level segments of a token, borrowed from the token string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenParts<'a> {
    pub timestamp: &'a str,
    pub payload: &'a str,
    pub signature: &'a str,
}

impl<'a> TokenParts<'a> {
    /// Split a token from the right into exactly three segments
    ///
    /// Returns `None` when the token has fewer than three segments. Extra
    /// separators end up in the timestamp, which then fails to parse.
    #[must_use]
    pub fn split(token: &'a str) -> Option<Self> {
        let mut parts = token.rsplitn(3, SEPARATOR);
        let signature = parts.next()?;
        let payload = parts.next()?;
        let timestamp = parts.next()?;
        Some(Self {
            timestamp,
            payload,
            signature,
        })
    }

    /// The region covered by the signature
    #[must_use]
    pub fn signable(&self) -> String {
        signable(self.timestamp, self.payload)
    }
}

/// Lowercase hex with no prefix or padding
#[must_use]
pub fn encode_timestamp(seconds: u64) -> String {
    format!("{seconds:x}")
}

#[must_use]
pub fn parse_timestamp(timestamp: &str) -> Option<u64> {
    u64::from_str_radix(timestamp, 16).ok()
}

/// Encode the inner triple as one unit so separators inside fields stay opaque
#[must_use]
pub fn encode_payload(nonce: &[u8; NONCE_LEN], appid: &str, userid: &str) -> String {
    let mut raw = Vec::with_capacity(NONCE_LEN + appid.len() + userid.len() + 2);
    raw.extend_from_slice(nonce);
    raw.push(b':');
    raw.extend_from_slice(appid.as_bytes());
    raw.push(b':');
    raw.extend_from_slice(userid.as_bytes());
    b64url_encode(&raw)
}

/// Decode a payload back into the identity it carries
///
/// The nonce is read by length, so a `:` byte inside it is not a separator.
/// The appid and userid are split at the last `:`; `appid` must be ASCII and
/// `userid` valid UTF-8.
#[must_use]
pub fn decode_payload(payload: &str) -> Option<VerifiedIdentity> {
    let raw = b64url_decode(payload).ok()?;
    if raw.len() <= NONCE_LEN || raw[NONCE_LEN] != b':' {
        return None;
    }
    let rest = &raw[NONCE_LEN + 1..];
    let split_at = rest.iter().rposition(|&b| b == b':')?;

    let appid = std::str::from_utf8(&rest[..split_at]).ok()?;
    if !appid.is_ascii() {
        return None;
    }
    let userid = std::str::from_utf8(&rest[split_at + 1..]).ok()?;
    Some(VerifiedIdentity::new(appid, userid))
}

#[must_use]
pub fn signable(timestamp: &str, payload: &str) -> String {
    format!("{timestamp}{SEPARATOR}{payload}")
}

/// base64url(HMAC-SHA1(key, signable))
///
/// # Errors
///
/// Returns an error if the HMAC implementation rejects the key.
pub fn sign(key: &[u8], signable: &str) -> Result<String, hmac::digest::InvalidLength> {
    Ok(b64url_encode(&hmac_sha1(key, &[signable.as_bytes()])?))
}

#[must_use]
pub fn assemble(signable: &str, signature: &str) -> String {
    format!("{signable}{SEPARATOR}{signature}")
}
