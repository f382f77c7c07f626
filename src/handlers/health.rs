use crate::handlers::types::HealthResponse;
use actix_web::{HttpResponse, Result};

/// Health check endpoint
///
/// # Errors
/// Never fails
pub async fn health() -> Result<HttpResponse> {
    let response = HealthResponse {
        status: "ok".to_string(),
        message: "Tokengate is running".to_string(),
    };
    Ok(HttpResponse::Ok().json(response))
}
