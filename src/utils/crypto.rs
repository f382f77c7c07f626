// Cryptographic primitives shared by key derivation and token signing

use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha1::Sha1;
use subtle::ConstantTimeEq;

type HmacSha1 = Hmac<Sha1>;

/// Output size of HMAC-SHA1 in bytes
pub const DIGEST_SIZE: usize = 20;

/// Compute HMAC-SHA1 over the concatenation of `parts`
///
/// # Errors
///
/// Returns an error if the HMAC implementation rejects the key length.
/// HMAC accepts keys of any size, so in practice this does not fail.
pub fn hmac_sha1(key: &[u8], parts: &[&[u8]]) -> Result<[u8; DIGEST_SIZE], hmac::digest::InvalidLength> {
    let mut mac = <HmacSha1 as Mac>::new_from_slice(key)?;
    for part in parts {
        mac.update(part);
    }
    let mut out = [0u8; DIGEST_SIZE];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/// Compare two byte strings without leaking the position of the first mismatch
///
/// Differing lengths return early; only the length is revealed in that case.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Fill a fixed-size array from the thread-local CSPRNG
#[must_use]
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::rng().fill_bytes(&mut bytes);
    bytes
}

/// Padded URL-safe base64, the alphabet used on the token wire
#[must_use]
pub fn b64url_encode(data: &[u8]) -> String {
    general_purpose::URL_SAFE.encode(data)
}

/// Decode padded URL-safe base64
///
/// # Errors
///
/// Returns an error if `data` is not valid padded URL-safe base64.
pub fn b64url_decode(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::URL_SAFE.decode(data)
}
