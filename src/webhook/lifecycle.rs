//! Subscription lifecycle state machine
//!
//! Two states, keyed by the persisted record: unregistered (no webhook ID)
//! and registered. `check_exists` reconciles against the remote side —
//! re-adopting a matching registration left over from a previous run, or
//! clearing a stored ID the server no longer knows. `create` registers,
//! `delete` deregisters best-effort.

use super::store::SubscriptionStore;
use crate::error::{Error, Result};
use crate::options::WebhookEventType;
use crate::resources::insert_id_list;
use crate::transport::{ApiClient, Payload};
use crate::types::{JsonObject, JsonValue, Method, StringMap};
use serde::Deserialize;
use tracing::{debug, warn};

/// Trigger subscription settings
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerSettings {
    /// Subscription name shown in the Samsara dashboard
    pub name: String,
    /// Public callback URL this trigger listens on
    pub callback_url: String,
    /// Events to subscribe to
    pub events: Vec<WebhookEventType>,
    /// Comma-separated tag IDs to filter events
    #[serde(default)]
    pub tag_ids: Option<String>,
    /// Comma-separated vehicle IDs to filter events
    #[serde(default)]
    pub vehicle_ids: Option<String>,
    /// Comma-separated driver IDs to filter events
    #[serde(default)]
    pub driver_ids: Option<String>,
}

/// The lifecycle manager: one per trigger instance
pub struct WebhookLifecycle {
    client: ApiClient,
    store: SubscriptionStore,
}

impl WebhookLifecycle {
    pub fn new(client: ApiClient, store: SubscriptionStore) -> Self {
        Self { client, store }
    }

    pub fn store(&self) -> &SubscriptionStore {
        &self.store
    }

    /// Does a subscription for this trigger exist remotely?
    ///
    /// With a stored ID, probes it directly; a request failure is taken as
    /// silent external deletion — the record is cleared and `false`
    /// returned. Without one, scans the remote listing for a webhook whose
    /// URL matches the callback URL and adopts it. Listing failures are
    /// swallowed (registration will simply be recreated).
    pub async fn check_exists(&self, settings: &TriggerSettings) -> Result<bool> {
        crate::log_startup_notice();

        if let Some(webhook_id) = self.store.webhook_id().await {
            match self
                .client
                .get(&format!("/webhooks/{webhook_id}"), &StringMap::new())
                .await
            {
                Ok(_) => return Ok(true),
                Err(error) => {
                    debug!(%webhook_id, %error, "stored webhook no longer exists remotely");
                    self.store.clear_webhook_id().await?;
                    return Ok(false);
                }
            }
        }

        match self.client.get("/webhooks", &StringMap::new()).await {
            Ok(envelope) => {
                for webhook in envelope.payload.into_records() {
                    if webhook.get("url").and_then(JsonValue::as_str)
                        == Some(settings.callback_url.as_str())
                    {
                        if let Some(id) = entity_id(&webhook) {
                            self.store.set_webhook_id(id).await?;
                            return Ok(true);
                        }
                    }
                }
            }
            Err(error) => {
                // Fall through to creation on the next activation step.
                debug!(%error, "webhook listing failed during reconciliation");
            }
        }

        Ok(false)
    }

    /// Register the subscription and persist its ID.
    ///
    /// A creation response without an entity ID signals a misconfiguration
    /// or an API contract change and is fatal, unlike deletion where remote
    /// absence is tolerated.
    pub async fn create(&self, settings: &TriggerSettings) -> Result<String> {
        crate::log_startup_notice();

        let mut body = JsonObject::new();
        body.insert("name".into(), JsonValue::String(settings.name.clone()));
        body.insert(
            "url".into(),
            JsonValue::String(settings.callback_url.clone()),
        );
        body.insert(
            "eventTypes".into(),
            JsonValue::Array(
                settings
                    .events
                    .iter()
                    .map(|event| JsonValue::String(event.as_ref().to_string()))
                    .collect(),
            ),
        );

        insert_id_list(&mut body, "tagIds", &settings.tag_ids);
        insert_id_list(&mut body, "vehicleIds", &settings.vehicle_ids);
        insert_id_list(&mut body, "driverIds", &settings.driver_ids);

        let body = JsonValue::Object(body);
        let envelope = self
            .client
            .request(Method::POST, "/webhooks", Some(&body), &StringMap::new())
            .await?;

        let webhook_id = payload_id(&envelope.payload).ok_or_else(|| {
            Error::webhook_registration("webhook creation did not return an ID")
        })?;

        self.store.set_webhook_id(&webhook_id).await?;
        Ok(webhook_id)
    }

    /// Deregister best-effort: the remote side may already be gone, so a
    /// failed DELETE is logged and swallowed. The local record is cleared
    /// unconditionally, making deletion locally idempotent.
    pub async fn delete(&self) -> Result<()> {
        if let Some(webhook_id) = self.store.webhook_id().await {
            if let Err(error) = self
                .client
                .request(
                    Method::DELETE,
                    &format!("/webhooks/{webhook_id}"),
                    None,
                    &StringMap::new(),
                )
                .await
            {
                warn!(%webhook_id, %error, "failed to delete webhook");
            }

            self.store.clear_webhook_id().await?;
        }

        Ok(())
    }
}

fn entity_id(value: &JsonValue) -> Option<String> {
    match value.get("id") {
        Some(JsonValue::String(id)) => Some(id.clone()),
        Some(JsonValue::Number(id)) => Some(id.to_string()),
        _ => None,
    }
}

fn payload_id(payload: &Payload) -> Option<String> {
    payload.as_single().and_then(entity_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ApiClientConfig;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(url: &str) -> TriggerSettings {
        TriggerSettings {
            name: "Fleet events".into(),
            callback_url: url.into(),
            events: vec![WebhookEventType::GeofenceEntry],
            tag_ids: None,
            vehicle_ids: None,
            driver_ids: None,
        }
    }

    fn lifecycle(server: &MockServer) -> WebhookLifecycle {
        let client = ApiClient::new(ApiClientConfig::new("t").with_base_url(server.uri()));
        WebhookLifecycle::new(client, SubscriptionStore::in_memory())
    }

    #[tokio::test]
    async fn test_check_exists_clears_stored_id_on_404() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/webhooks/w-stale"))
            .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
            .mount(&server)
            .await;

        let lifecycle = lifecycle(&server);
        lifecycle.store().set_webhook_id("w-stale").await.unwrap();

        let exists = lifecycle
            .check_exists(&settings("https://example.com/hook"))
            .await
            .unwrap();

        assert!(!exists);
        assert_eq!(lifecycle.store().webhook_id().await, None);
    }

    #[tokio::test]
    async fn test_check_exists_confirms_stored_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/webhooks/w1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "w1"}})),
            )
            .mount(&server)
            .await;

        let lifecycle = lifecycle(&server);
        lifecycle.store().set_webhook_id("w1").await.unwrap();

        assert!(lifecycle
            .check_exists(&settings("https://example.com/hook"))
            .await
            .unwrap());
        assert_eq!(lifecycle.store().webhook_id().await, Some("w1".into()));
    }

    #[tokio::test]
    async fn test_check_exists_adopts_matching_url() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/webhooks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"id": "w-other", "url": "https://elsewhere.example/hook"},
                    {"id": "w-mine", "url": "https://example.com/hook"},
                ],
            })))
            .mount(&server)
            .await;

        let lifecycle = lifecycle(&server);
        let exists = lifecycle
            .check_exists(&settings("https://example.com/hook"))
            .await
            .unwrap();

        assert!(exists);
        assert_eq!(lifecycle.store().webhook_id().await, Some("w-mine".into()));
    }

    #[tokio::test]
    async fn test_check_exists_swallows_listing_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/webhooks"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let lifecycle = lifecycle(&server);
        let exists = lifecycle
            .check_exists(&settings("https://example.com/hook"))
            .await
            .unwrap();

        assert!(!exists);
    }

    #[tokio::test]
    async fn test_create_minimal_body_and_id_persistence() {
        let server = MockServer::start().await;

        // No filters configured, so no optional keys may appear.
        Mock::given(method("POST"))
            .and(path("/webhooks"))
            .and(body_json(json!({
                "name": "Fleet events",
                "url": "https://example.com/hook",
                "eventTypes": ["GeofenceEntry"],
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "w-new"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let lifecycle = lifecycle(&server);
        let id = lifecycle
            .create(&settings("https://example.com/hook"))
            .await
            .unwrap();

        assert_eq!(id, "w-new");
        assert_eq!(lifecycle.store().webhook_id().await, Some("w-new".into()));
    }

    #[tokio::test]
    async fn test_create_with_filters_splits_ids() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/webhooks"))
            .and(body_json(json!({
                "name": "Fleet events",
                "url": "https://example.com/hook",
                "eventTypes": ["GeofenceEntry"],
                "tagIds": ["1", "2"],
                "driverIds": ["d1"],
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "w-new"}})),
            )
            .mount(&server)
            .await;

        let lifecycle = lifecycle(&server);
        let mut configured = settings("https://example.com/hook");
        configured.tag_ids = Some("1, 2".into());
        configured.driver_ids = Some("d1".into());

        lifecycle.create(&configured).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_without_id_is_fatal() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/webhooks"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"name": "x"}})),
            )
            .mount(&server)
            .await;

        let lifecycle = lifecycle(&server);
        let err = lifecycle
            .create(&settings("https://example.com/hook"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::WebhookRegistration { .. }));
        assert_eq!(lifecycle.store().webhook_id().await, None);
    }

    #[tokio::test]
    async fn test_delete_swallows_remote_failure_and_clears() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/webhooks/w1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("cannot"))
            .mount(&server)
            .await;

        let lifecycle = lifecycle(&server);
        lifecycle.store().set_webhook_id("w1").await.unwrap();

        lifecycle.delete().await.unwrap();
        assert_eq!(lifecycle.store().webhook_id().await, None);
    }

    #[tokio::test]
    async fn test_delete_without_registration_is_noop() {
        let server = MockServer::start().await;
        let lifecycle = lifecycle(&server);
        // No remote call is mounted; an unregistered delete must not fail.
        lifecycle.delete().await.unwrap();
    }
}
