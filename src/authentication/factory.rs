//! Service factory for wiring authentication services at startup
//!
//! The hosting process builds every collaborator here, explicitly, from
//! settings. Nothing is looked up by name at request time.

use crate::authentication::traits::{CredentialsChecker, SessionService};
use crate::credentials::{AssertionVerifier, BrowserIdCredentials, RemoteVerifier};
use crate::session::{ConfigError, SignedSessionManager};
use crate::settings::TokengateSettings;
use std::sync::Arc;
use std::time::Duration;

/// Errors raised while building services from settings
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    #[error("session secret is not valid base64: {0}")]
    InvalidSecret(#[from] base64::DecodeError),
    #[error("invalid session configuration: {0}")]
    Session(#[from] ConfigError),
    #[error("failed to build verifier: {0}")]
    Verifier(#[from] crate::credentials::VerificationError),
}

/// The injected pair of services a request handler needs
#[derive(Clone)]
pub struct AuthenticationServices {
    pub credentials: Arc<dyn CredentialsChecker>,
    pub sessions: Arc<dyn SessionService>,
}

impl AuthenticationServices {
    #[must_use]
    pub fn new(
        credentials: Arc<dyn CredentialsChecker>,
        sessions: Arc<dyn SessionService>,
    ) -> Self {
        Self {
            credentials,
            sessions,
        }
    }
}

/// Factory for creating authentication services with dependency injection
pub struct AuthenticationServiceFactory;

impl AuthenticationServiceFactory {
    /// Build BrowserID credential checking over the configured remote verifier
    /// and a signed session manager
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is malformed, the timeout is zero, or
    /// the HTTP client for the verifier cannot be built.
    pub fn create_services(settings: &TokengateSettings) -> Result<AuthenticationServices, FactoryError> {
        let verifier = RemoteVerifier::new(
            settings.verifier.url.clone(),
            Duration::from_secs(settings.verifier.timeout_seconds),
        )?;
        log::info!("✅ Remote assertion verifier configured: {}", verifier.url());

        Self::create_services_with_verifier(settings, Arc::new(verifier))
    }

    /// Same as [`Self::create_services`] but with a caller-supplied verifier
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is malformed or the timeout is zero.
    pub fn create_services_with_verifier(
        settings: &TokengateSettings,
        verifier: Arc<dyn AssertionVerifier>,
    ) -> Result<AuthenticationServices, FactoryError> {
        let credentials = Arc::new(BrowserIdCredentials::new(verifier));
        let sessions = Arc::new(Self::create_session_manager(settings)?);

        log::info!(
            "🏭 Authentication services ready: credentials={}, sessions={}",
            credentials.service_name(),
            sessions.service_name()
        );
        Ok(AuthenticationServices::new(credentials, sessions))
    }

    /// Build the session manager from the session settings
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is malformed or the timeout is zero.
    pub fn create_session_manager(
        settings: &TokengateSettings,
    ) -> Result<SignedSessionManager, FactoryError> {
        let timeout = settings.session.timeout_seconds;
        let manager = if let Some(secret) = settings.session.secret_bytes()? {
            SignedSessionManager::new(&secret, timeout)?
        } else {
            Self::warn_about_generated_secret();
            SignedSessionManager::with_random_secret(timeout)?
        };
        log::info!("✅ Signed session manager configured (timeout {timeout}s)");
        Ok(manager)
    }

    fn warn_about_generated_secret() {
        log::warn!("⚠️  Using an auto-generated session secret");
        log::warn!("   Tokens will not survive a restart or validate on other instances");
        log::warn!("   Set SESSION_SECRET or session.secret in Settings.toml to share sessions");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Credentials, VerifiedIdentity};
    use crate::testing::fixtures::TestFixtures;
    use crate::testing::mock::MockVerifier;

    #[tokio::test]
    async fn test_services_issue_tokens_for_verified_credentials() {
        let services = AuthenticationServiceFactory::create_services_with_verifier(
            &TestFixtures::settings(),
            Arc::new(MockVerifier::accepting("user@example.com")),
        )
        .unwrap();

        let identity = services
            .credentials
            .check(&Credentials::new("assertion", "app1"))
            .await
            .unwrap();
        let token = services
            .sessions
            .issue(&identity.appid, &identity.userid)
            .unwrap();
        assert_eq!(
            services.sessions.validate(&token),
            Some(VerifiedIdentity::new("app1", "user@example.com"))
        );
    }

    #[test]
    fn test_configured_secret_is_shared_between_managers() {
        let settings = TestFixtures::settings();
        let a = AuthenticationServiceFactory::create_session_manager(&settings).unwrap();
        let b = AuthenticationServiceFactory::create_session_manager(&settings).unwrap();

        let token = a.issue("app1", "user@example.com").unwrap();
        assert!(b.validate(&token).is_some());
    }

    #[test]
    fn test_empty_secret_generates_a_random_one() {
        let mut settings = TestFixtures::settings();
        settings.session.secret = String::new();
        let a = AuthenticationServiceFactory::create_session_manager(&settings).unwrap();
        let b = AuthenticationServiceFactory::create_session_manager(&settings).unwrap();

        let token = a.issue("app1", "user@example.com").unwrap();
        assert!(a.validate(&token).is_some());
        assert!(b.validate(&token).is_none());
    }

    #[test]
    fn test_bad_configuration_is_reported() {
        let mut settings = TestFixtures::settings();
        settings.session.secret = "%%%".to_string();
        assert!(matches!(
            AuthenticationServiceFactory::create_session_manager(&settings),
            Err(FactoryError::InvalidSecret(_))
        ));

        let mut settings = TestFixtures::settings();
        settings.session.timeout_seconds = 0;
        assert!(matches!(
            AuthenticationServiceFactory::create_session_manager(&settings),
            Err(FactoryError::Session(ConfigError::ZeroTimeout))
        ));
    }

    #[test]
    fn test_create_services_with_remote_verifier() {
        let services = AuthenticationServiceFactory::create_services(&TestFixtures::settings()).unwrap();
        assert_eq!(services.credentials.service_name(), "browserid");
        assert_eq!(services.sessions.service_name(), "signed");
    }
}
