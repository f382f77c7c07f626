//! HKDF key derivation (RFC 5869) over HMAC-SHA1
//!
//! A single master secret may be shared with other subsystems. Every
//! cryptographic use gets its own key expanded under a fixed label, so a MAC
//! produced for one purpose never verifies for another.

use crate::utils::crypto::{hmac_sha1, DIGEST_SIZE};

/// Largest number of output blocks HKDF-Expand may produce
pub const MAX_BLOCKS: usize = 255;

/// Largest output HKDF-Expand can derive with SHA-1
pub const MAX_OUTPUT_LEN: usize = MAX_BLOCKS * DIGEST_SIZE;

/// Errors raised while deriving keys
///
/// These only surface while a manager is being constructed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeyDerivationError {
    #[error("requested {requested} bytes of key material, at most {max} can be derived", max = MAX_OUTPUT_LEN)]
    OutputTooLong { requested: usize },
    #[error("HMAC rejected the key: {0}")]
    InvalidKey(String),
}

/// HKDF-Extract: `PRK = HMAC-SHA1(key = salt, message = ikm)`
///
/// # Errors
///
/// Returns `InvalidKey` if the HMAC implementation rejects `salt`.
pub fn extract(salt: &[u8], ikm: &[u8]) -> Result<[u8; DIGEST_SIZE], KeyDerivationError> {
    hmac_sha1(salt, &[ikm]).map_err(|e| KeyDerivationError::InvalidKey(e.to_string()))
}

/// HKDF-Expand: derive `length` bytes from `prk` bound to `info`
///
/// # Errors
///
/// Returns `OutputTooLong` if `length` needs more than 255 blocks, and
/// `InvalidKey` if the HMAC implementation rejects `prk`.
pub fn expand(prk: &[u8], info: &[u8], length: usize) -> Result<Vec<u8>, KeyDerivationError> {
    let blocks = length.div_ceil(DIGEST_SIZE);
    if blocks > MAX_BLOCKS {
        return Err(KeyDerivationError::OutputTooLong { requested: length });
    }

    let mut okm = Vec::with_capacity(blocks * DIGEST_SIZE);
    let mut previous: Vec<u8> = Vec::new();
    // blocks <= 255, so the counter always fits in a byte
    for counter in 1..=u8::try_from(blocks).unwrap_or(u8::MAX) {
        let block = hmac_sha1(prk, &[previous.as_slice(), info, &[counter]])
            .map_err(|e| KeyDerivationError::InvalidKey(e.to_string()))?;
        okm.extend_from_slice(&block);
        previous = block.to_vec();
    }
    okm.truncate(length);
    Ok(okm)
}
