//! Pre-built test data

use crate::session::SignedSessionManager;
use crate::settings::TokengateSettings;
use crate::testing::mock::ManualClock;
use std::sync::Arc;

/// Fixed start time used by clock-driven tests (2023-11-14T22:13:20Z)
pub const TEST_EPOCH: u64 = 1_700_000_000;

/// Secret used by the reference scenario: 16 bytes of `0x4B`
pub const TEST_SECRET: [u8; 16] = [0x4b; 16];

pub struct TestFixtures;

impl TestFixtures {
    /// A manager with [`TEST_SECRET`], a 300 second timeout and a manual clock
    ///
    /// # Panics
    ///
    /// Panics if the manager cannot be constructed.
    #[must_use]
    pub fn session_manager() -> (SignedSessionManager, Arc<ManualClock>) {
        let clock = ManualClock::at(TEST_EPOCH);
        let manager = SignedSessionManager::with_clock(&TEST_SECRET, 300, clock.clone())
            .expect("test manager should build");
        (manager, clock)
    }

    /// Settings with a fixed secret and an unroutable verifier
    #[must_use]
    pub fn settings() -> TokengateSettings {
        let mut settings = TokengateSettings::default();
        settings.session.secret = "S0tLS0tLS0tLS0tLS0tLSw==".to_string();
        settings.session.timeout_seconds = 300;
        settings.verifier.url = "http://127.0.0.1:9/verify".to_string();
        settings.verifier.timeout_seconds = 1;
        settings
    }
}
