//! WhatsApp webhook integration module
//!
//! This module provides webhook handling for WhatsApp Business API
//! integration: the subscription handshake, the webhook receiver, and the
//! canned auto-reply sent back through the Graph API.
//!
//! ## Submodules
//!
//! - [`handler`] - Business logic deciding and issuing the auto-reply
//! - [`routes`] - HTTP endpoint handlers for the webhook surface
//! - [`schemas`] - Data structures for incoming webhook payloads
//! - [`outgoing_schemas`] - Data structures for outbound messages
//! - [`client`] - WhatsApp API client for sending messages
//! - [`security`] - X-Hub-Signature-256 payload verification

pub mod client;
pub mod handler;
pub mod outgoing_schemas;
pub mod routes;
pub mod schemas;
pub mod security;

use crate::config::AppConfig;
use async_trait::async_trait;

// Re-export commonly used items for convenience
pub use routes::{receive, verify};

/// Outbound side of the auto-reply: anything that can deliver a text message
/// to a WhatsApp user through a business phone number.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSender {
    /// Sends a text message to `to` from the business number identified by
    /// `phone_number_id`.
    async fn send_text(&self, phone_number_id: &str, to: &str, body: &str) -> anyhow::Result<()>;
}

pub type ImplMessageSender = Box<dyn MessageSender>;

/// Per-worker application state: read-only configuration plus the outbound
/// message sender, both constructed at startup.
pub struct AppState {
    pub config: AppConfig,
    pub sender: ImplMessageSender,
}
