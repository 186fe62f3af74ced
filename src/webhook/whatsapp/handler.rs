//! # WhatsApp Webhook Handler
//!
//! This module holds the auto-reply logic for incoming webhook events: walk
//! the `entry → changes → value → messages` envelope, apply the guard chain,
//! pick one of the two canned replies, and issue a single outbound send.
//!
//! Every guard short-circuits with [`ReplyOutcome::Ignored`] instead of
//! failing; the only error path out of here is the outbound send itself.

use super::{ImplMessageSender, schemas};
use crate::{config::AppConfig, consts};
use anyhow::Result;

/// What happened to an inbound webhook payload.
///
/// The route logs this (or the send error) and acknowledges the delivery
/// either way, so a reply failure never turns into a webhook retry storm.
#[derive(Debug, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// One auto-reply was sent to the given WhatsApp ID.
    Replied { to: String },
    /// The payload carried nothing to answer; the reason says which guard
    /// stopped processing.
    Ignored(&'static str),
}

/// Extracts the first message of the first change of the first entry,
/// together with the `value` envelope it arrived in.
///
/// WhatsApp batches events, but this receiver answers at most one message
/// per delivery; anything missing along the chain yields `None`.
fn first_inbound_message(
    payload: &schemas::WebhookPayload,
) -> Option<(&schemas::Value, &schemas::Message)> {
    let change = payload.entry.first()?.changes.first()?;
    let value = change.value.as_ref()?;
    let message = value.messages.as_ref()?.first()?;

    Some((value, message))
}

/// Counts delivery-status callbacks in the payload, used only for logging.
fn status_update_count(payload: &schemas::WebhookPayload) -> usize {
    payload
        .entry
        .iter()
        .flat_map(|entry| &entry.changes)
        .filter_map(|change| change.value.as_ref())
        .filter_map(|value| value.statuses.as_ref())
        .map(|statuses| statuses.len())
        .sum()
}

/// Picks the canned reply for a message: the text prompt for plain text
/// messages, the attachment acknowledgment for everything else (including
/// messages with no type at all).
pub fn reply_text_for(message: &schemas::Message) -> &'static str {
    match message.msg_type.as_deref() {
        Some("text") => consts::TEXT_PROMPT_REPLY,
        _ => consts::ATTACHMENT_ACK_REPLY,
    }
}

/// Answers the first message of a webhook payload with a canned reply.
///
/// Guard chain, in order:
/// 1. no message in the envelope (empty/absent `entry`, `changes`,
///    `messages`; covers status-only deliveries) → ignored;
/// 2. a configured phone number id that differs from the event-reported one
///    → ignored (multi-number safety filter);
/// 3. a message without a sender id → ignored;
/// 4. no phone number id from either the event or the configuration →
///    ignored (nothing to send through).
///
/// The reply goes to the sender, through the event-reported phone number id
/// when present, else the configured default.
pub async fn try_auto_reply(
    payload: &schemas::WebhookPayload,
    app_config: &AppConfig,
    sender: &ImplMessageSender,
) -> Result<ReplyOutcome> {
    let Some((value, message)) = first_inbound_message(payload) else {
        let statuses = status_update_count(payload);
        if statuses > 0 {
            log::debug!("webhook carried {statuses} delivery status update(s)");
            return Ok(ReplyOutcome::Ignored("delivery status update"));
        }
        return Ok(ReplyOutcome::Ignored("no inbound message in payload"));
    };

    let event_phone_number_id = value
        .metadata
        .as_ref()
        .and_then(|metadata| metadata.phone_number_id.as_deref());

    if app_config.has_phone_number_filter()
        && event_phone_number_id != Some(app_config.phone_number_id.as_str())
    {
        return Ok(ReplyOutcome::Ignored(
            "event reports a different phone number id",
        ));
    }

    let Some(from) = message.from.as_deref() else {
        return Ok(ReplyOutcome::Ignored("message has no sender id"));
    };

    let Some(phone_number_id) = event_phone_number_id.or_else(|| {
        app_config
            .has_phone_number_filter()
            .then_some(app_config.phone_number_id.as_str())
    }) else {
        return Ok(ReplyOutcome::Ignored("no phone number id to send through"));
    };

    sender
        .send_text(phone_number_id, from, reply_text_for(message))
        .await?;

    Ok(ReplyOutcome::Replied {
        to: from.to_string(),
    })
}
