//! Inbound delivery classification
//!
//! Samsara verifies a new subscription with a test ping before delivering
//! real events. Pings are answered with a canned acknowledgment and never
//! forwarded; everything else passes through verbatim. There is no
//! deduplication, ordering guarantee, or replay protection.

use crate::types::JsonValue;
use chrono::{SecondsFormat, Utc};
use serde_json::json;

/// Classified inbound POST body
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// A subscription verification ping
    VerificationPing,
    /// A real event, forwarded verbatim
    Event(JsonValue),
}

/// Classify an inbound body.
///
/// Verification pings are marked by `eventType == "WebhookTest"` or
/// `type == "test"`.
pub fn classify(body: &JsonValue) -> Delivery {
    let is_ping = body.get("eventType").and_then(JsonValue::as_str) == Some("WebhookTest")
        || body.get("type").and_then(JsonValue::as_str) == Some("test");

    if is_ping {
        Delivery::VerificationPing
    } else {
        Delivery::Event(body.clone())
    }
}

/// The canned acknowledgment returned for a verification ping.
pub fn ping_acknowledgment() -> JsonValue {
    json!({
        "eventType": "WebhookTest",
        "message": "Webhook verification successful",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
