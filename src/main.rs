//! # Financial X-Ray WhatsApp Receiver
//!
//! Main entry point for the WhatsApp webhook auto-reply service.
//! Loads configuration, sets up logging, and starts the web server exposing
//! the webhook verification and receiver endpoints.

pub mod config;
pub mod consts;
pub mod errors;
pub mod logger;
pub mod webhook;

use anyhow::Context;
use envconfig::Envconfig;
use log::info;
use ntex::web;
use webhook::whatsapp::{self, client::WhatsAppClient};

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    logger::setup_simple_logger()?;

    // Read once at startup; handlers only ever see immutable copies.
    let app_config = config::AppConfig::init_from_env()
        .context("failed to load application configuration")?;

    let whatsapp_client = WhatsAppClient::new(&app_config)?;

    info!(
        "starting webhook receiver (env={}, port={})",
        app_config.env, app_config.web_server_port
    );

    configure_and_run_server(app_config, whatsapp_client).await
}

/// Creates application state from the provided services
fn create_app_state(
    app_config: &config::AppConfig,
    whatsapp_client: &WhatsAppClient,
) -> whatsapp::AppState {
    whatsapp::AppState {
        config: app_config.clone(),
        sender: Box::new(whatsapp_client.clone()),
    }
}

/// Configures and starts the web server.
///
/// TLS is terminated by the reverse proxy in front of this service, so the
/// server binds plain HTTP on all interfaces.
async fn configure_and_run_server(
    app_config: config::AppConfig,
    whatsapp_client: WhatsAppClient,
) -> anyhow::Result<()> {
    let server_addr = ("0.0.0.0", app_config.web_server_port);

    web::server(move || {
        web::App::new()
            .wrap(web::middleware::Logger::default())
            .wrap(web::middleware::Compress::default())
            .state(create_app_state(&app_config, &whatsapp_client))
            .configure(webhook::routes::whatsapp)
    })
    .bind(server_addr)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
