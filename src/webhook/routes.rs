use ntex::web;

/// Configures webhook routes for external integrations.
///
/// These routes are public endpoints that don't require authentication:
/// the platform itself proves legitimacy through the verification handshake
/// and, when configured, the payload signature header.
///
/// # Routes
/// - `GET /webhook` - WhatsApp webhook verification
/// - `POST /webhook` - WhatsApp webhook receiver
pub fn whatsapp(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/webhook").service((super::whatsapp::verify, super::whatsapp::receive)),
    );
}
