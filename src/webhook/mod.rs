//! Webhook handlers for external integrations
//!
//! This module contains webhook endpoint handlers for external services that
//! integrate with the application.
//!
//! ## Modules
//!
//! - [`whatsapp`] - WhatsApp Business API webhook handlers

pub mod routes;
pub mod whatsapp;
