//! Pluggable authentication capabilities
//!
//! A hosting application picks one implementation of each trait and injects
//! it explicitly. Both traits report failure as `None` so callers cannot tell
//! which check rejected a request.

use crate::models::{Credentials, VerifiedIdentity};
use crate::session::{SessionError, SignedSessionManager};
use async_trait::async_trait;

/// Turns a credentials record into a verified identity
///
/// Implementations may block on network I/O while verifying.
#[async_trait]
pub trait CredentialsChecker: Send + Sync {
    /// Check the given credentials
    ///
    /// # Returns
    /// * `Some(VerifiedIdentity)` - The `(appid, userid)` the credentials prove
    /// * `None` - The credentials are incomplete or could not be verified
    async fn check(&self, credentials: &Credentials) -> Option<VerifiedIdentity>;

    /// Get the service name for logging and identification
    fn service_name(&self) -> &'static str;
}

/// Issues session identifiers and maps them back to identities
pub trait SessionService: Send + Sync {
    /// Create a new session for `appid` and `userid`
    ///
    /// # Errors
    ///
    /// Returns an error if the identity cannot be represented in a session.
    fn issue(&self, appid: &str, userid: &str) -> Result<String, SessionError>;

    /// Load the identity for a session, or `None` if it is unknown, expired or forged
    fn validate(&self, session: &str) -> Option<VerifiedIdentity>;

    /// Get the service name for logging and identification
    fn service_name(&self) -> &'static str;
}

impl SessionService for SignedSessionManager {
    fn issue(&self, appid: &str, userid: &str) -> Result<String, SessionError> {
        SignedSessionManager::issue(self, appid, userid)
    }

    fn validate(&self, session: &str) -> Option<VerifiedIdentity> {
        SignedSessionManager::validate(self, session)
    }

    fn service_name(&self) -> &'static str {
        "signed"
    }
}
