#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

//! Exchange a verified identity assertion for a stateless signed session token.
//!
//! Credentials are checked once by a [`CredentialsChecker`]; the resulting
//! `(appid, userid)` pair is sealed into a token by a [`SignedSessionManager`]
//! that later requests present instead of repeating verification.

/// Version of the tokengate application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod authentication;
pub mod credentials;
pub mod handlers;
pub mod models;
pub mod session;
pub mod settings;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use authentication::{
    AuthenticationServiceFactory, AuthenticationServices, CredentialsChecker, SessionService,
};
pub use credentials::{AssertionVerifier, BrowserIdCredentials, RemoteVerifier};
pub use models::{Credentials, VerifiedIdentity};
pub use session::SignedSessionManager;
pub use settings::TokengateSettings;
