// Identity assertion verification against a remote BrowserID-style verifier

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use std::time::Duration;

/// Default remote verifier endpoint
pub const DEFAULT_VERIFIER_URL: &str = "https://verifier.login.persona.org/verify";

/// Default time allowed for a remote verification round trip
pub const DEFAULT_VERIFIER_TIMEOUT_SECS: u64 = 10;

/// Claims returned for a successfully verified assertion
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct AssertionClaims {
    pub email: String,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub expires: Option<u64>,
}

/// Why an assertion could not be verified
#[derive(Debug, Clone, thiserror::Error)]
pub enum VerificationError {
    /// The assertion or audience is malformed
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The assertion is well formed but not trusted (bad signature, expired, wrong audience)
    #[error("assertion not trusted: {0}")]
    Untrusted(String),
    /// The verifier could not be reached or answered unexpectedly
    #[error("verifier unavailable: {0}")]
    Connection(String),
}

/// External capability that proves an assertion was issued for `audience`
///
/// Implementations own their timeout, retry and cancellation policy.
#[async_trait]
pub trait AssertionVerifier: Send + Sync {
    /// Verify `assertion` for `audience` and return its claims
    ///
    /// # Errors
    ///
    /// Returns a `VerificationError` describing why the assertion was rejected.
    async fn verify(
        &self,
        assertion: &str,
        audience: &str,
    ) -> Result<AssertionClaims, VerificationError>;
}

#[derive(Debug, Deserialize)]
struct VerifierResponse {
    status: String,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    audience: Option<String>,
    #[serde(default)]
    issuer: Option<String>,
    #[serde(default)]
    expires: Option<u64>,
}

/// Verifier that delegates to a remote verification service over HTTPS
#[derive(Debug, Clone)]
pub struct RemoteVerifier {
    client: reqwest::Client,
    url: String,
}

impl RemoteVerifier {
    /// Create a verifier posting to `url` with a per-request `timeout`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, VerificationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VerificationError::Connection(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AssertionVerifier for RemoteVerifier {
    async fn verify(
        &self,
        assertion: &str,
        audience: &str,
    ) -> Result<AssertionClaims, VerificationError> {
        if assertion.is_empty() || audience.is_empty() {
            return Err(VerificationError::InvalidInput(
                "assertion and audience must be non-empty".to_string(),
            ));
        }

        debug!("Verifying assertion for audience {audience} via {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .form(&[("assertion", assertion), ("audience", audience)])
            .send()
            .await
            .map_err(|e| VerificationError::Connection(format!("Verifier request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(VerificationError::Connection(format!(
                "Verifier responded with status: {}",
                response.status()
            )));
        }

        let body: VerifierResponse = response.json().await.map_err(|e| {
            VerificationError::Connection(format!("Failed to parse verifier response: {e}"))
        })?;

        interpret_response(body)
    }
}

fn interpret_response(body: VerifierResponse) -> Result<AssertionClaims, VerificationError> {
    if body.status != "okay" {
        return Err(VerificationError::Untrusted(
            body.reason.unwrap_or_else(|| format!("status {}", body.status)),
        ));
    }
    let email = body.email.ok_or_else(|| {
        VerificationError::InvalidInput("verifier response is missing the email claim".to_string())
    })?;
    Ok(AssertionClaims {
        email,
        audience: body.audience,
        issuer: body.issuer,
        expires: body.expires,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> VerifierResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_okay_response_yields_claims() {
        let claims = interpret_response(parse(
            r#"{"status":"okay","email":"user@example.com","audience":"https://app.example","issuer":"login.example","expires":1700000000000}"#,
        ))
        .unwrap();
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.audience.as_deref(), Some("https://app.example"));
        assert_eq!(claims.issuer.as_deref(), Some("login.example"));
    }

    #[test]
    fn test_failure_status_is_untrusted() {
        let err = interpret_response(parse(r#"{"status":"failure","reason":"assertion has expired"}"#))
            .unwrap_err();
        assert!(matches!(err, VerificationError::Untrusted(ref r) if r == "assertion has expired"));
    }

    #[test]
    fn test_okay_without_email_is_invalid() {
        let err = interpret_response(parse(r#"{"status":"okay"}"#)).unwrap_err();
        assert!(matches!(err, VerificationError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected_without_network() {
        let verifier =
            RemoteVerifier::new("http://127.0.0.1:9/verify", Duration::from_secs(1)).unwrap();
        let err = verifier.verify("", "https://app.example").await.unwrap_err();
        assert!(matches!(err, VerificationError::InvalidInput(_)));
        assert_eq!(verifier.url(), "http://127.0.0.1:9/verify");
    }

    #[tokio::test]
    async fn test_unreachable_verifier_is_a_connection_error() {
        let verifier =
            RemoteVerifier::new("http://127.0.0.1:9/verify", Duration::from_secs(1)).unwrap();
        let err = verifier
            .verify("assertion", "https://app.example")
            .await
            .unwrap_err();
        assert!(matches!(err, VerificationError::Connection(_)));
    }
}
