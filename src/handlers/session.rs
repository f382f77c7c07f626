// Session handlers: exchange credentials for a token, resolve a token to an identity
use crate::authentication::AuthenticationServices;
use crate::handlers::types::{ErrorResponse, SessionStartResponse, SESSION_HEADER};
use crate::models::Credentials;
use actix_web::{web, HttpRequest, HttpResponse, Result};
use log::{debug, info};

/// Verify credentials and issue a session token
///
/// Responds `401` for any failure without saying which check failed.
///
/// # Errors
/// Never fails; rejections are reported as `401` responses
pub async fn start_session(
    credentials: web::Json<Credentials>,
    services: web::Data<AuthenticationServices>,
) -> Result<HttpResponse> {
    let Some(identity) = services.credentials.check(&credentials).await else {
        return Ok(unauthorized());
    };

    match services.sessions.issue(&identity.appid, &identity.userid) {
        Ok(session) => {
            info!("Started session for {} on {}", identity.userid, identity.appid);
            Ok(HttpResponse::Ok().json(SessionStartResponse { session }))
        }
        Err(e) => {
            debug!("Could not issue session for {}: {e}", identity.appid);
            Ok(unauthorized())
        }
    }
}

/// Resolve the session token in the request header to its identity
///
/// # Errors
/// Never fails; missing or invalid tokens are reported as `401` responses
pub async fn whoami(
    req: HttpRequest,
    services: web::Data<AuthenticationServices>,
) -> Result<HttpResponse> {
    let identity = req
        .headers()
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|token| services.sessions.validate(token));

    Ok(identity.map_or_else(unauthorized, |identity| HttpResponse::Ok().json(identity)))
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ErrorResponse::unauthorized())
}
