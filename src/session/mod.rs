//! Session Management Module
//!
//! Stateless signed session tokens.
//!
//! # Modules
//!
//! - [`manager`] - `SignedSessionManager`, issuing and validating tokens
//! - [`token`] - Pure encode/decode logic for the token wire format
//! - [`hkdf`] - Purpose-scoped key derivation from the manager secret
//! - [`clock`] - Wall-clock abstraction used for expiry

pub mod clock;
pub mod hkdf;
pub mod manager;
pub mod token;

pub use clock::{Clock, SystemClock};
pub use manager::{ConfigError, SessionError, SignedSessionManager};
