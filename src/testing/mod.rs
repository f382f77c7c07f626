//! Testing utilities for Tokengate
//!
//! - [`fixtures`] - Pre-built managers and settings
//! - [`mock`] - Mock verifier and a manually driven clock
//!
//! ```rust
//! use tokengate::testing::fixtures::TestFixtures;
//!
//! let (manager, clock) = TestFixtures::session_manager();
//! let token = manager.issue("app1", "user@example.com").unwrap();
//! clock.advance(301);
//! assert!(manager.validate(&token).is_none());
//! ```

pub mod fixtures;
pub mod mock;
