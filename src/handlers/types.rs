// Request and response bodies for the session endpoints
use serde::{Deserialize, Serialize};

/// Header carrying a session token on authenticated requests
pub const SESSION_HEADER: &str = "X-Session-Token";

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionStartResponse {
    pub session: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_description: String,
}

impl ErrorResponse {
    /// The only rejection body the session endpoints ever send
    #[must_use]
    pub fn unauthorized() -> Self {
        Self {
            error: "unauthorized".to_string(),
            error_description: "The credentials or session are invalid or have expired".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}
