#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::{anyhow, Context};
use tokengate::{
    handlers::configure_services, AuthenticationServiceFactory, TokengateSettings, VERSION,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from Settings.toml and environment variables
    // This also loads .env file and initializes the logger
    let settings =
        TokengateSettings::load().map_err(|e| anyhow!("Failed to load settings: {e}"))?;

    let services = AuthenticationServiceFactory::create_services(&settings)
        .context("Failed to initialize authentication services")?;

    let bind_address = settings.get_bind_address();
    print_startup_info(&bind_address, &settings);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(services.clone()))
            .wrap(Logger::default())
            .configure(configure_services)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {bind_address}"))?
    .run()
    .await
    .context("Server terminated with an error")
}

fn print_startup_info(bind_address: &str, settings: &TokengateSettings) {
    println!("Starting Tokengate {VERSION} on http://{bind_address}");
    println!("Session timeout: {}s", settings.session.timeout_seconds);
    println!("Assertion verifier: {}", settings.verifier.url);
    println!();
    println!("Endpoints:");
    println!("  POST /session/start   - Exchange an identity assertion for a session token");
    println!("  GET  /session/whoami  - Resolve the X-Session-Token header to an identity");
    println!("  GET  /ping            - Health check");
}
