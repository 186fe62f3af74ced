//! WhatsApp webhook endpoint handlers
//!
//! This module handles incoming webhook requests from WhatsApp Business API.
//! It implements both the verification endpoint (GET) and the webhook
//! receiver (POST).
//!
//! # Contract
//!
//! The POST endpoint always acknowledges with `200 {"status": "ok"}`,
//! whatever happens inside: WhatsApp retries failed deliveries, and a
//! non-success status here would only cause redundant retries without fixing
//! the underlying condition (typically an unexpected payload shape).

use super::{AppState, handler, schemas, security};
use crate::{consts, errors};
use log::{debug, error, info, warn};
use ntex::{util::Bytes, web};
use serde::Deserialize;

/// Query parameters for webhook verification
///
/// All three are optional: a request missing any of them simply fails
/// verification instead of failing to deserialize.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    /// The mode parameter, should be "subscribe"
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    /// The verification token from WhatsApp
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    /// The challenge string to echo back
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Applies the handshake predicate: subscribe mode, matching token, and a
/// non-empty challenge. Returns the challenge to echo back on success.
fn handshake_challenge<'q>(query: &'q VerifyQuery, expected_token: &str) -> Option<&'q str> {
    if query.mode.as_deref() != Some("subscribe") {
        return None;
    }
    if query.verify_token.as_deref() != Some(expected_token) {
        return None;
    }

    query.challenge.as_deref().filter(|c| !c.is_empty())
}

/// Webhook verification endpoint (GET)
///
/// WhatsApp sends a GET request to verify the webhook URL.
/// This endpoint validates the verify token and returns the challenge.
///
/// # Query Parameters
/// - `hub.mode` - Should be "subscribe"
/// - `hub.verify_token` - Token configured in the Meta dashboard
/// - `hub.challenge` - Challenge string to echo back
///
/// # Returns
/// - 200 with challenge string if verification succeeds
/// - 403 with "Verification Failed" otherwise
#[web::get("")]
pub async fn verify(
    query: web::types::Query<VerifyQuery>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let Some(challenge) = handshake_challenge(&query, &app_state.config.verify_token) else {
        warn!(
            "webhook verification failed: mode={:?}",
            query.mode.as_deref()
        );
        return Err(errors::UserError::VerificationFailed.into());
    };

    info!("webhook verification succeeded");

    Ok(web::HttpResponse::Ok()
        .content_type("text/plain")
        .body(challenge.to_string()))
}

/// Webhook receiver endpoint (POST)
///
/// Receives webhook events from WhatsApp Business API and answers the first
/// inbound message with a canned reply.
///
/// # Security
///
/// When an app secret is configured, the X-Hub-Signature-256 header is
/// verified against the raw body; payloads failing the check are dropped
/// (but still acknowledged, see the module docs).
#[web::post("")]
pub async fn receive(
    req: web::HttpRequest,
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let ack = web::HttpResponse::Ok().json(&serde_json::json!({"status": "ok"}));

    if app_state.config.has_app_secret()
        && !signature_is_valid(&req, &body, &app_state.config.whatsapp_app_secret)
    {
        return Ok(ack);
    }

    let payload: schemas::WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            error!("failed to parse webhook payload: {e}");
            return Ok(ack);
        }
    };

    debug!(
        "incoming webhook: object={:?}, entries={}",
        payload.object.as_deref(),
        payload.entry.len()
    );

    match handler::try_auto_reply(&payload, &app_state.config, &app_state.sender).await {
        Ok(handler::ReplyOutcome::Replied { to }) => info!("auto-reply sent to {to}"),
        Ok(handler::ReplyOutcome::Ignored(reason)) => debug!("webhook ignored: {reason}"),
        Err(e) => error!("auto-reply failed: {e:#}"),
    }

    Ok(ack)
}

/// Checks the X-Hub-Signature-256 header against the raw body.
fn signature_is_valid(req: &web::HttpRequest, body: &[u8], app_secret: &str) -> bool {
    let header = req
        .headers()
        .get(consts::SIGNATURE_HEADER_NAME)
        .and_then(|value| value.to_str().ok());

    match header {
        Some(signature) => security::verify_signature(signature, body, app_secret),
        None => {
            warn!("missing {} header", consts::SIGNATURE_HEADER_NAME);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::test_config,
        webhook::{
            self,
            whatsapp::{ImplMessageSender, MockMessageSender},
        },
    };
    use ntex::{http::StatusCode, web::test};

    const VERIFY_TOKEN: &str = "secret-token";

    fn app_state(config_overrides: &[(&str, &str)], sender: MockMessageSender) -> AppState {
        let mut overrides = vec![("VERIFY_TOKEN", VERIFY_TOKEN)];
        overrides.extend_from_slice(config_overrides);

        AppState {
            config: test_config(&overrides),
            sender: Box::new(sender) as ImplMessageSender,
        }
    }

    fn sender_expecting_nothing() -> MockMessageSender {
        let mut mock = MockMessageSender::new();
        mock.expect_send_text().times(0);
        mock
    }

    fn text_message_body(phone_number_id: &str, from: &str, msg_type: &str) -> Vec<u8> {
        serde_json::json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "entry-1",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "messaging_product": "whatsapp",
                        "metadata": {"phone_number_id": phone_number_id},
                        "messages": [{
                            "from": from,
                            "id": "wamid.test",
                            "type": msg_type,
                            "text": {"body": "hola"}
                        }]
                    }
                }]
            }]
        })
        .to_string()
        .into_bytes()
    }

    async fn call(
        state: AppState,
        req: test::TestRequest,
    ) -> (StatusCode, Bytes) {
        let app = test::init_service(
            web::App::new()
                .state(state)
                .configure(webhook::routes::whatsapp),
        )
        .await;

        let response = test::call_service(&app, req.to_request()).await;
        let status = response.status();
        let body = test::read_body(response).await;

        (status, body)
    }

    #[ntex::test]
    async fn test_verify_echoes_challenge_on_success() {
        let uri = format!(
            "/webhook?hub.mode=subscribe&hub.challenge=challenge123&hub.verify_token={VERIFY_TOKEN}"
        );

        let (status, body) = call(
            app_state(&[], sender_expecting_nothing()),
            test::TestRequest::get().uri(&uri),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Bytes::from_static(b"challenge123"));
    }

    #[ntex::test]
    async fn test_verify_rejects_bad_combinations() {
        let bad_uris = [
            // wrong mode
            format!("/webhook?hub.mode=unsubscribe&hub.challenge=c&hub.verify_token={VERIFY_TOKEN}"),
            // wrong token
            "/webhook?hub.mode=subscribe&hub.challenge=c&hub.verify_token=nope".to_string(),
            // missing token
            "/webhook?hub.mode=subscribe&hub.challenge=c".to_string(),
            // missing challenge
            format!("/webhook?hub.mode=subscribe&hub.verify_token={VERIFY_TOKEN}"),
            // empty challenge
            format!("/webhook?hub.mode=subscribe&hub.challenge=&hub.verify_token={VERIFY_TOKEN}"),
            // nothing at all
            "/webhook".to_string(),
        ];

        for uri in bad_uris {
            let (status, body) = call(
                app_state(&[], sender_expecting_nothing()),
                test::TestRequest::get().uri(&uri),
            )
            .await;

            assert_eq!(status, StatusCode::FORBIDDEN, "uri: {uri}");
            assert_eq!(body, Bytes::from_static(b"Verification Failed"), "uri: {uri}");
        }
    }

    #[ntex::test]
    async fn test_receive_acks_empty_entry_without_sending() {
        let (status, body) = call(
            app_state(&[], sender_expecting_nothing()),
            test::TestRequest::post()
                .uri("/webhook")
                .set_payload(Bytes::from_static(b"{\"entry\": []}")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Bytes::from_static(b"{\"status\":\"ok\"}"));
    }

    #[ntex::test]
    async fn test_receive_replies_to_text_message() {
        let mut mock = MockMessageSender::new();
        mock.expect_send_text()
            .withf(|id, to, text| {
                id == "111222333"
                    && to == "5511999999999"
                    && text == crate::consts::TEXT_PROMPT_REPLY
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let (status, body) = call(
            app_state(&[("PHONE_NUMBER_ID", "111222333")], mock),
            test::TestRequest::post()
                .uri("/webhook")
                .set_payload(Bytes::from(text_message_body(
                    "111222333",
                    "5511999999999",
                    "text",
                ))),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Bytes::from_static(b"{\"status\":\"ok\"}"));
    }

    #[ntex::test]
    async fn test_receive_acks_attachment_with_attachment_reply() {
        let mut mock = MockMessageSender::new();
        mock.expect_send_text()
            .withf(|_, _, text| text == crate::consts::ATTACHMENT_ACK_REPLY)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let (status, _) = call(
            app_state(&[("PHONE_NUMBER_ID", "111222333")], mock),
            test::TestRequest::post()
                .uri("/webhook")
                .set_payload(Bytes::from(text_message_body(
                    "111222333",
                    "5511999999999",
                    "image",
                ))),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
    }

    #[ntex::test]
    async fn test_receive_ignores_other_phone_number_id() {
        let (status, body) = call(
            app_state(&[("PHONE_NUMBER_ID", "999000999")], sender_expecting_nothing()),
            test::TestRequest::post()
                .uri("/webhook")
                .set_payload(Bytes::from(text_message_body(
                    "111222333",
                    "5511999999999",
                    "text",
                ))),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Bytes::from_static(b"{\"status\":\"ok\"}"));
    }

    #[ntex::test]
    async fn test_receive_acks_even_when_send_fails() {
        let mut mock = MockMessageSender::new();
        mock.expect_send_text()
            .times(1)
            .returning(|_, _, _| Err(anyhow::anyhow!("WhatsApp API returned error status 500")));

        let (status, body) = call(
            app_state(&[], mock),
            test::TestRequest::post()
                .uri("/webhook")
                .set_payload(Bytes::from(text_message_body(
                    "111222333",
                    "5511999999999",
                    "text",
                ))),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Bytes::from_static(b"{\"status\":\"ok\"}"));
    }

    #[ntex::test]
    async fn test_receive_acks_malformed_json() {
        let (status, body) = call(
            app_state(&[], sender_expecting_nothing()),
            test::TestRequest::post()
                .uri("/webhook")
                .set_payload(Bytes::from_static(b"not json at all")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Bytes::from_static(b"{\"status\":\"ok\"}"));
    }

    #[ntex::test]
    async fn test_receive_drops_payload_with_bad_signature() {
        let (status, body) = call(
            app_state(
                &[("WHATSAPP_APP_SECRET", "app-secret")],
                sender_expecting_nothing(),
            ),
            test::TestRequest::post()
                .uri("/webhook")
                .header(crate::consts::SIGNATURE_HEADER_NAME, "sha256=deadbeef")
                .set_payload(Bytes::from(text_message_body(
                    "111222333",
                    "5511999999999",
                    "text",
                ))),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Bytes::from_static(b"{\"status\":\"ok\"}"));
    }

    #[ntex::test]
    async fn test_receive_processes_payload_with_valid_signature() {
        use hmac::{Hmac, Mac};

        let secret = "app-secret";
        let payload = text_message_body("111222333", "5511999999999", "text");

        let mut mac = Hmac::<sha2::Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(&payload);
        let signature = format!("sha256={}", hex::encode(mac.finalize().into_bytes()));

        let mut mock = MockMessageSender::new();
        mock.expect_send_text()
            .times(1)
            .returning(|_, _, _| Ok(()));

        let (status, _) = call(
            app_state(&[("WHATSAPP_APP_SECRET", secret)], mock),
            test::TestRequest::post()
                .uri("/webhook")
                .header(crate::consts::SIGNATURE_HEADER_NAME, signature)
                .set_payload(Bytes::from(payload)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
    }

    #[test]
    fn test_verify_query_deserialization() {
        let json = r#"{"hub.mode":"subscribe","hub.verify_token":"test123","hub.challenge":"challenge123"}"#;
        let query: VerifyQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.mode.as_deref(), Some("subscribe"));
        assert_eq!(query.verify_token.as_deref(), Some("test123"));
        assert_eq!(query.challenge.as_deref(), Some("challenge123"));
    }

    #[test]
    fn test_handshake_challenge_predicate() {
        let query = VerifyQuery {
            mode: Some("subscribe".into()),
            verify_token: Some("tok".into()),
            challenge: Some("c".into()),
        };
        assert_eq!(handshake_challenge(&query, "tok"), Some("c"));
        assert_eq!(handshake_challenge(&query, "other"), None);
    }
}
