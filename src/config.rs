//! Application configuration management with security considerations.
//!
//! This module handles all configuration values required for the application.
//! Configuration is read from the environment exactly once at startup and
//! injected into the request handlers through the application state; nothing
//! here is mutated after process initialization.
//!
//! # Security Notes
//! - Sensitive fields are clearly marked and should never be logged
//! - Production environments should use secure secret management systems

use crate::consts;
use envconfig::Envconfig;

/// Application configuration with security-aware field management.
///
/// This struct contains all environment variables used to configure the
/// application. Sensitive fields are clearly marked and include security
/// guidance.
#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name to deploy the app (NON-SENSITIVE)
    /// Values: "local", "dev", "staging", "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// Port for web server binding (NON-SENSITIVE)
    #[envconfig(default = "8080")]
    pub web_server_port: u16,

    /// 🔒 SENSITIVE: Shared secret checked during the webhook subscription
    /// handshake. Must match the token configured in the Meta dashboard.
    #[envconfig(default = "")]
    pub verify_token: String,

    /// 🔒 SENSITIVE: WhatsApp Business authentication token
    /// Security: Store in secure secret management system
    #[envconfig(default = "")]
    pub whatsapp_token: String,

    /// WhatsApp Business phone number ID (SEMI-SENSITIVE)
    ///
    /// Doubles as a safety filter: when set, inbound events reporting a
    /// different phone number id are ignored. Empty means unset.
    #[envconfig(default = "")]
    pub phone_number_id: String,

    /// Graph API version segment used in outbound send URLs (NON-SENSITIVE)
    #[envconfig(default = "v20.0")]
    pub graph_api_version: String,

    /// 🔒 SENSITIVE: Meta app secret used to verify the X-Hub-Signature-256
    /// header on inbound deliveries. Empty disables the signature check.
    #[envconfig(default = "")]
    pub whatsapp_app_secret: String,
}

impl AppConfig {
    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    /// Whether the recipient phone number id filter is active.
    pub fn has_phone_number_filter(&self) -> bool {
        !self.phone_number_id.is_empty()
    }

    /// Whether inbound payload signatures should be verified.
    pub fn has_app_secret(&self) -> bool {
        !self.whatsapp_app_secret.is_empty()
    }

    /// Constructs the WhatsApp Business API endpoint for sending messages
    /// through the given phone number id.
    pub fn send_message_endpoint(&self, phone_number_id: &str) -> String {
        format!(
            "{base}/{version}/{id}/messages",
            base = consts::GRAPH_API_BASE_URL,
            version = self.graph_api_version,
            id = phone_number_id,
        )
    }
}

/// Builds an [`AppConfig`] from defaults plus the given overrides, without
/// touching process environment variables.
#[cfg(test)]
pub(crate) fn test_config(overrides: &[(&str, &str)]) -> AppConfig {
    let mut env: std::collections::HashMap<String, String> = std::collections::HashMap::new();
    for (key, value) in overrides {
        env.insert(key.to_string(), value.to_string());
    }
    AppConfig::init_from_hashmap(&env).expect("test config should initialize")
}
