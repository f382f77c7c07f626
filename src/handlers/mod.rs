// HTTP request handlers for the session endpoints
use actix_web::web;

pub mod health;
pub mod session;
pub mod types;


pub use health::health;
pub use session::{start_session, whoami};

/// Register all routes on an actix service config
pub fn configure_services(cfg: &mut web::ServiceConfig) {
    cfg.route("/session/start", web::post().to(start_session))
        .route("/session/whoami", web::get().to(whoami))
        .route("/ping", web::get().to(health));
}
