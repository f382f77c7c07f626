// Credential checking backed by BrowserID-style identity assertions

use crate::authentication::traits::CredentialsChecker;
use crate::credentials::verifier::AssertionVerifier;
use crate::models::{Credentials, VerifiedIdentity};
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

/// Checks credentials by verifying an identity assertion
///
/// The appid is the assertion audience and the userid is the asserted email.
/// Every failure, whatever its cause, is reported as `None`.
#[derive(Clone)]
pub struct BrowserIdCredentials {
    verifier: Arc<dyn AssertionVerifier>,
}

impl BrowserIdCredentials {
    #[must_use]
    pub fn new(verifier: Arc<dyn AssertionVerifier>) -> Self {
        Self { verifier }
    }
}

#[async_trait]
impl CredentialsChecker for BrowserIdCredentials {
    async fn check(&self, credentials: &Credentials) -> Option<VerifiedIdentity> {
        let (Some(assertion), Some(audience)) = (&credentials.assertion, &credentials.audience)
        else {
            debug!("Rejecting credentials: assertion or audience missing");
            return None;
        };

        match self.verifier.verify(assertion, audience).await {
            Ok(claims) => Some(VerifiedIdentity::new(audience.as_str(), claims.email)),
            Err(e) => {
                debug!("Rejecting credentials for audience {audience}: {e}");
                None
            }
        }
    }

    fn service_name(&self) -> &'static str {
        "browserid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::verifier::VerificationError;
    use crate::testing::mock::MockVerifier;

    #[tokio::test]
    async fn test_verified_assertion_yields_audience_and_email() {
        let verifier = Arc::new(MockVerifier::accepting("user@example.com"));
        let checker = BrowserIdCredentials::new(verifier.clone());

        let identity = checker
            .check(&Credentials::new("assertion", "https://app.example"))
            .await;
        assert_eq!(
            identity,
            Some(VerifiedIdentity::new("https://app.example", "user@example.com"))
        );
        assert_eq!(verifier.calls(), 1);
        assert_eq!(
            verifier.last_request(),
            Some(("assertion".to_string(), "https://app.example".to_string()))
        );
    }

    #[tokio::test]
    async fn test_missing_fields_skip_the_verifier() {
        let verifier = Arc::new(MockVerifier::accepting("user@example.com"));
        let checker = BrowserIdCredentials::new(verifier.clone());

        let missing_audience = Credentials {
            assertion: Some("assertion".to_string()),
            audience: None,
        };
        let missing_assertion = Credentials {
            assertion: None,
            audience: Some("https://app.example".to_string()),
        };

        assert!(checker.check(&missing_audience).await.is_none());
        assert!(checker.check(&missing_assertion).await.is_none());
        assert!(checker.check(&Credentials::default()).await.is_none());
        assert_eq!(verifier.calls(), 0);
    }

    #[tokio::test]
    async fn test_every_verifier_failure_collapses_to_none() {
        let failures = [
            VerificationError::InvalidInput("garbled".to_string()),
            VerificationError::Untrusted("expired".to_string()),
            VerificationError::Connection("timed out".to_string()),
        ];
        for failure in failures {
            let verifier = Arc::new(MockVerifier::rejecting(failure));
            let checker = BrowserIdCredentials::new(verifier.clone());
            let identity = checker
                .check(&Credentials::new("assertion", "https://app.example"))
                .await;
            assert!(identity.is_none());
            assert_eq!(verifier.calls(), 1);
        }
    }

    #[test]
    fn test_service_name() {
        let checker =
            BrowserIdCredentials::new(Arc::new(MockVerifier::accepting("user@example.com")));
        assert_eq!(checker.service_name(), "browserid");
    }
}
