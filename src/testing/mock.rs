//! Mock objects and fake implementations for testing
//!
//! This module provides stand-ins for the external verification service and
//! the wall clock so that verification and expiry can be tested in isolation.

use crate::credentials::verifier::{AssertionClaims, AssertionVerifier, VerificationError};
use crate::session::clock::Clock;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

enum Outcome {
    Accept(String),
    Reject(VerificationError),
}

/// Verifier returning a canned outcome and recording every call
pub struct MockVerifier {
    outcome: Outcome,
    calls: AtomicUsize,
    last_request: Mutex<Option<(String, String)>>,
}

impl MockVerifier {
    /// A verifier that accepts any assertion as `email`
    #[must_use]
    pub fn accepting(email: &str) -> Self {
        Self::with_outcome(Outcome::Accept(email.to_string()))
    }

    /// A verifier that rejects every assertion with `error`
    #[must_use]
    pub fn rejecting(error: VerificationError) -> Self {
        Self::with_outcome(Outcome::Reject(error))
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Number of times `verify` was invoked
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The `(assertion, audience)` pair of the most recent call
    ///
    /// # Panics
    ///
    /// Panics if the request log mutex was poisoned.
    #[must_use]
    pub fn last_request(&self) -> Option<(String, String)> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssertionVerifier for MockVerifier {
    async fn verify(
        &self,
        assertion: &str,
        audience: &str,
    ) -> Result<AssertionClaims, VerificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some((assertion.to_string(), audience.to_string()));
        }
        match &self.outcome {
            Outcome::Accept(email) => Ok(AssertionClaims {
                email: email.clone(),
                audience: Some(audience.to_string()),
                ..AssertionClaims::default()
            }),
            Outcome::Reject(error) => Err(error.clone()),
        }
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock(AtomicU64);

impl ManualClock {
    #[must_use]
    pub fn at(seconds: u64) -> Arc<Self> {
        Arc::new(Self(AtomicU64::new(seconds)))
    }

    pub fn advance(&self, seconds: u64) {
        self.0.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}
