//! # WhatsApp API Client
//!
//! This module provides a client for sending messages to WhatsApp Business
//! API. It handles authentication, the per-number send endpoint, and the
//! bounded request timeout.

use super::{MessageSender, outgoing_schemas::OutgoingTextMessage};
use crate::{config::AppConfig, consts};
use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;

/// WhatsApp API client for sending messages
#[derive(Clone)]
pub struct WhatsAppClient {
    /// HTTP client for making API requests
    client: reqwest::Client,
    /// Application configuration (endpoint construction, auth token)
    app_config: AppConfig,
}

impl WhatsAppClient {
    /// Creates a new WhatsApp client from the application configuration.
    ///
    /// The underlying HTTP client carries a fixed timeout; a send that takes
    /// longer is reported as a failure and never retried.
    pub fn new(app_config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(consts::SEND_MESSAGE_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            app_config: app_config.clone(),
        })
    }

    /// Sends a text message
    ///
    /// # Arguments
    /// * `phone_number_id` - Business phone number ID to send from
    /// * `to` - Recipient's WhatsApp ID (phone number with country code)
    /// * `body` - Message text
    pub async fn send_text_message(
        &self,
        phone_number_id: &str,
        to: String,
        body: String,
    ) -> Result<()> {
        let endpoint = self.app_config.send_message_endpoint(phone_number_id);
        let message = OutgoingTextMessage::new(to, body);

        let response = self
            .client
            .post(&endpoint)
            .header(
                "Authorization",
                format!("Bearer {}", self.app_config.whatsapp_token),
            )
            .header("Content-Type", "application/json")
            .json(&message)
            .send()
            .await
            .context("Failed to send request to WhatsApp API")?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response body".to_string());

        if !status.is_success() {
            anyhow::bail!(
                "WhatsApp API returned error status {}: {}",
                status,
                response_body
            );
        }

        debug!("send status: {status} {response_body}");

        Ok(())
    }
}

#[async_trait]
impl MessageSender for WhatsAppClient {
    async fn send_text(&self, phone_number_id: &str, to: &str, body: &str) -> Result<()> {
        self.send_text_message(phone_number_id, to.to_string(), body.to_string())
            .await
    }
}
