//! Signed Session Manager - Stateless Session Tokens
//!
//! `SignedSessionManager` turns a verified `(appid, userid)` pair into a
//! self-describing token and later recovers the pair from it. Nothing is
//! stored server side: the token carries its own issue time and a MAC under a
//! key derived from the manager's secret.
//!
//! Every rejection (malformed, expired, tampered) collapses to `None`. The
//! cause is logged at debug level and never returned.

use crate::models::VerifiedIdentity;
use crate::session::clock::{Clock, SystemClock};
use crate::session::hkdf::{self, KeyDerivationError};
use crate::session::token::{self, TokenParts, NONCE_LEN};
use crate::utils::crypto::{constant_time_eq, random_bytes};
use log::debug;
use std::fmt;
use std::sync::Arc;

/// Length of the randomly generated default secret
pub const DEFAULT_SECRET_LEN: usize = 16;

/// Default token lifetime in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 5 * 60;

const EXTRACT_SALT: &[u8] = b"ISessionManager";
const SIGNING_INFO: &[u8] = b"SIGNING";
const SIGNING_KEY_LEN: usize = 16;

/// Errors raised while constructing a manager
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("key derivation failed: {0}")]
    KeyDerivation(#[from] KeyDerivationError),
    #[error("session timeout must be at least one second")]
    ZeroTimeout,
}

/// Errors raised while issuing a token
///
/// Validation never returns an error; these only reject identities that
/// could not be recovered from a token intact.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("appid must be ASCII")]
    NonAsciiAppId,
    #[error("userid must not contain ':'")]
    SeparatorInUserId,
    #[error("failed to sign session token")]
    Signing,
}

/// Stateless session manager backed by HMAC-signed tokens
///
/// The secret and derived key are fixed for the lifetime of the manager.
/// Replacing the secret invalidates every token issued under the old one.
#[derive(Clone)]
pub struct SignedSessionManager {
    signing_key: Vec<u8>,
    timeout: u64,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for SignedSessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedSessionManager")
            .field("signing_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl SignedSessionManager {
    /// Create a manager from a secret and a timeout in seconds
    ///
    /// # Errors
    ///
    /// Returns an error if `timeout` is zero or key derivation fails.
    pub fn new(secret: &[u8], timeout: u64) -> Result<Self, ConfigError> {
        Self::with_clock(secret, timeout, Arc::new(SystemClock))
    }

    /// Create a manager with a random 16 byte secret
    ///
    /// Two managers built this way never accept each other's tokens, so this
    /// is unsuitable when several processes must share sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if `timeout` is zero or key derivation fails.
    pub fn with_random_secret(timeout: u64) -> Result<Self, ConfigError> {
        let secret: [u8; DEFAULT_SECRET_LEN] = random_bytes();
        Self::new(&secret, timeout)
    }

    /// Create a manager that reads time from `clock`
    ///
    /// # Errors
    ///
    /// Returns an error if `timeout` is zero or key derivation fails.
    pub fn with_clock(
        secret: &[u8],
        timeout: u64,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        if timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        // The secret may be shared with other components; sign with a key of our own.
        let master_key = hkdf::extract(EXTRACT_SALT, secret)?;
        let signing_key = hkdf::expand(&master_key, SIGNING_INFO, SIGNING_KEY_LEN)?;

        Ok(Self {
            signing_key,
            timeout,
            clock,
        })
    }

    #[must_use]
    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    /// Issue a token binding `appid` and `userid` to the current time
    ///
    /// # Errors
    ///
    /// Returns an error if `appid` is not ASCII or `userid` contains `:`.
    pub fn issue(&self, appid: &str, userid: &str) -> Result<String, SessionError> {
        if !appid.is_ascii() {
            return Err(SessionError::NonAsciiAppId);
        }
        if userid.contains(':') {
            return Err(SessionError::SeparatorInUserId);
        }

        let timestamp = token::encode_timestamp(self.clock.now());
        let nonce: [u8; NONCE_LEN] = random_bytes();
        let payload = token::encode_payload(&nonce, appid, userid);
        let signable = token::signable(&timestamp, &payload);
        let signature =
            token::sign(&self.signing_key, &signable).map_err(|_| SessionError::Signing)?;

        Ok(token::assemble(&signable, &signature))
    }

    /// Recover the identity from a token, or `None` if it is not valid now
    #[must_use]
    pub fn validate(&self, token: &str) -> Option<VerifiedIdentity> {
        let Some(parts) = TokenParts::split(token) else {
            debug!("Rejecting session token: wrong number of segments");
            return None;
        };

        let Some(issued_at) = token::parse_timestamp(parts.timestamp) else {
            debug!("Rejecting session token: unparseable timestamp");
            return None;
        };

        let expires_at = issued_at.checked_add(self.timeout)?;
        if expires_at <= self.clock.now() {
            debug!("Rejecting session token: expired at {expires_at}");
            return None;
        }

        let expected = token::sign(&self.signing_key, &parts.signable()).ok()?;
        if !constant_time_eq(parts.signature.as_bytes(), expected.as_bytes()) {
            debug!("Rejecting session token: signature mismatch");
            return None;
        }

        let identity = token::decode_payload(parts.payload);
        if identity.is_none() {
            debug!("Rejecting session token: malformed payload");
        }
        identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::{TEST_EPOCH as START, TEST_SECRET};
    use crate::testing::mock::ManualClock;
    use crate::utils::crypto::b64url_encode;

    fn manager_at(clock: &Arc<ManualClock>) -> SignedSessionManager {
        SignedSessionManager::with_clock(&TEST_SECRET, 300, clock.clone()).unwrap()
    }

    #[test]
    fn test_issue_then_validate_until_timeout() {
        let clock = ManualClock::at(START);
        let manager = manager_at(&clock);

        let token = manager.issue("app1", "user@example.com").unwrap();
        assert_eq!(
            manager.validate(&token),
            Some(VerifiedIdentity::new("app1", "user@example.com"))
        );

        clock.advance(299);
        assert!(manager.validate(&token).is_some());

        // expiry is inclusive: issued_at + timeout == now is rejected
        clock.advance(1);
        assert!(manager.validate(&token).is_none());

        clock.advance(1);
        assert!(manager.validate(&token).is_none());
    }

    #[test]
    fn test_token_layout() {
        let clock = ManualClock::at(START);
        let token = manager_at(&clock).issue("app1", "user@example.com").unwrap();

        let parts = TokenParts::split(&token).unwrap();
        assert_eq!(parts.timestamp, format!("{START:x}"));
        assert_eq!(token.matches(':').count(), 2);
    }

    #[test]
    fn test_tokens_for_same_identity_differ() {
        let clock = ManualClock::at(START);
        let manager = manager_at(&clock);
        let a = manager.issue("app1", "user@example.com").unwrap();
        let b = manager.issue("app1", "user@example.com").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_any_flipped_byte_is_rejected() {
        let clock = ManualClock::at(START);
        let manager = manager_at(&clock);
        let token = manager.issue("app1", "user@example.com").unwrap();

        for i in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            assert!(
                manager.validate(&tampered).is_none(),
                "tampered byte {i} accepted: {tampered}"
            );
        }
    }

    #[test]
    fn test_extending_timestamp_breaks_signature() {
        let clock = ManualClock::at(START);
        let manager = manager_at(&clock);
        let token = manager.issue("app1", "user@example.com").unwrap();
        let parts = TokenParts::split(&token).unwrap();

        let forged = format!(
            "{}:{}:{}",
            token::encode_timestamp(START + 10_000),
            parts.payload,
            parts.signature
        );
        assert!(manager.validate(&forged).is_none());
    }

    #[test]
    fn test_other_secret_rejects_token() {
        let clock = ManualClock::at(START);
        let token = manager_at(&clock).issue("app1", "user@example.com").unwrap();

        let other = SignedSessionManager::with_clock(&[0x4c; 16], 300, clock).unwrap();
        assert!(other.validate(&token).is_none());
    }

    #[test]
    fn test_random_secret_managers_do_not_share_tokens() {
        let a = SignedSessionManager::with_random_secret(DEFAULT_TIMEOUT_SECS).unwrap();
        let b = SignedSessionManager::with_random_secret(DEFAULT_TIMEOUT_SECS).unwrap();
        let token = a.issue("app1", "user@example.com").unwrap();

        assert_eq!(a.timeout(), DEFAULT_TIMEOUT_SECS);
        assert!(a.validate(&token).is_some());
        assert!(b.validate(&token).is_none());
    }

    #[test]
    fn test_signing_key_is_derived_not_raw_secret() {
        let clock = ManualClock::at(START);
        let secret = TEST_SECRET;
        let manager = manager_at(&clock);
        assert_ne!(manager.signing_key.as_slice(), secret.as_slice());
        assert_eq!(manager.signing_key.len(), SIGNING_KEY_LEN);

        // A MAC under the raw secret is not accepted
        let payload = token::encode_payload(&[0; NONCE_LEN], "app1", "user@example.com");
        let signable = token::signable(&token::encode_timestamp(START), &payload);
        let forged = token::assemble(&signable, &token::sign(&secret, &signable).unwrap());
        assert!(manager.validate(&forged).is_none());
    }

    #[test]
    fn test_validly_signed_garbage_payload_is_rejected() {
        let clock = ManualClock::at(START);
        let manager = manager_at(&clock);

        let payload = b64url_encode(b"no-separators-here");
        let signable = token::signable(&token::encode_timestamp(START), &payload);
        let signature = token::sign(&manager.signing_key, &signable).unwrap();
        assert!(manager.validate(&token::assemble(&signable, &signature)).is_none());
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let clock = ManualClock::at(START);
        let manager = manager_at(&clock);
        for input in ["", ":", "::", "abc", "a:b", "zz:payload:sig", "ffffffffffffffff:p:s", "1:2:3:4"] {
            assert!(manager.validate(input).is_none(), "accepted {input:?}");
        }
    }

    #[test]
    fn test_issue_rejects_unrepresentable_identities() {
        let clock = ManualClock::at(START);
        let manager = manager_at(&clock);
        assert_eq!(manager.issue("äpp", "user"), Err(SessionError::NonAsciiAppId));
        assert_eq!(
            manager.issue("app", "user:name"),
            Err(SessionError::SeparatorInUserId)
        );
    }

    #[test]
    fn test_appid_may_contain_separator() {
        let clock = ManualClock::at(START);
        let manager = manager_at(&clock);
        let token = manager.issue("http://localhost:5000", "üser@example.com").unwrap();
        assert_eq!(
            manager.validate(&token),
            Some(VerifiedIdentity::new("http://localhost:5000", "üser@example.com"))
        );
    }

    #[test]
    fn test_zero_timeout_is_a_config_error() {
        assert_eq!(
            SignedSessionManager::new(b"secret", 0).unwrap_err(),
            ConfigError::ZeroTimeout
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let manager = SignedSessionManager::new(b"secret", 60).unwrap();
        assert!(format!("{manager:?}").contains("<redacted>"));
    }
}
