//! Credential checking
//!
//! [`BrowserIdCredentials`] delegates the proof check to an injected
//! [`AssertionVerifier`] and reduces every failure to a single negative result.

pub mod browserid;
pub mod verifier;

pub use browserid::BrowserIdCredentials;
pub use verifier::{AssertionClaims, AssertionVerifier, RemoteVerifier, VerificationError};
