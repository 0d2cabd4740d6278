//! Webhook resource operations
//!
//! CRUD on webhook subscriptions themselves. The trigger-side lifecycle
//! (adoption, verification pings, best-effort teardown) lives in
//! [`crate::webhook`]; these operations are the plain management surface.

use super::{insert_id_list, insert_string, Paging};
use crate::error::Result;
use crate::options::WebhookEventType;
use crate::pagination::fetch_all;
use crate::transport::{ApiClient, Payload};
use crate::types::{JsonObject, JsonValue, Method, StringMap};
use serde::Deserialize;

/// Webhook management operations
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum WebhookOperation {
    /// Create a webhook subscription
    #[serde(rename_all = "camelCase")]
    Create {
        name: String,
        url: String,
        event_types: Vec<WebhookEventType>,
        #[serde(default)]
        additional_fields: WebhookFields,
    },
    /// Get a webhook by ID
    #[serde(rename_all = "camelCase")]
    Get { webhook_id: String },
    /// List webhooks
    GetAll {
        #[serde(flatten)]
        paging: Paging,
    },
    /// Update a webhook
    #[serde(rename_all = "camelCase")]
    Update {
        webhook_id: String,
        #[serde(default)]
        update_fields: WebhookUpdateFields,
    },
    /// Delete a webhook
    #[serde(rename_all = "camelCase")]
    Delete { webhook_id: String },
}

/// One custom header attached to webhook deliveries
#[derive(Debug, Clone, Deserialize)]
pub struct HeaderPair {
    pub key: String,
    pub value: String,
}

/// Optional creation fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookFields {
    pub secret_token: Option<String>,
    pub tag_ids: Option<String>,
    pub vehicle_ids: Option<String>,
    pub driver_ids: Option<String>,
    pub custom_headers: Vec<HeaderPair>,
}

/// Optional update fields; `enabled` is copied on presence, so `false`
/// round-trips.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookUpdateFields {
    pub name: Option<String>,
    pub url: Option<String>,
    pub event_types: Vec<WebhookEventType>,
    pub enabled: Option<bool>,
    pub secret_token: Option<String>,
    pub tag_ids: Option<String>,
    pub vehicle_ids: Option<String>,
    pub driver_ids: Option<String>,
    pub custom_headers: Vec<HeaderPair>,
}

fn headers_object(headers: &[HeaderPair]) -> JsonValue {
    let mut object = JsonObject::new();
    for header in headers {
        object.insert(header.key.clone(), JsonValue::String(header.value.clone()));
    }
    JsonValue::Object(object)
}

fn event_types_array(event_types: &[WebhookEventType]) -> JsonValue {
    JsonValue::Array(
        event_types
            .iter()
            .map(|event| JsonValue::String(event.as_ref().to_string()))
            .collect(),
    )
}

/// Execute a webhook management operation.
pub async fn execute(client: &ApiClient, op: WebhookOperation) -> Result<Payload> {
    match op {
        WebhookOperation::Create {
            name,
            url,
            event_types,
            additional_fields,
        } => {
            let mut body = JsonObject::new();
            body.insert("name".into(), JsonValue::String(name));
            body.insert("url".into(), JsonValue::String(url));
            body.insert("eventTypes".into(), event_types_array(&event_types));

            insert_string(&mut body, "secretToken", &additional_fields.secret_token);
            insert_id_list(&mut body, "tagIds", &additional_fields.tag_ids);
            insert_id_list(&mut body, "vehicleIds", &additional_fields.vehicle_ids);
            insert_id_list(&mut body, "driverIds", &additional_fields.driver_ids);
            if !additional_fields.custom_headers.is_empty() {
                body.insert(
                    "customHeaders".into(),
                    headers_object(&additional_fields.custom_headers),
                );
            }

            let body = JsonValue::Object(body);
            Ok(client
                .request(Method::POST, "/webhooks", Some(&body), &StringMap::new())
                .await?
                .payload)
        }

        WebhookOperation::Get { webhook_id } => Ok(client
            .get(&format!("/webhooks/{webhook_id}"), &StringMap::new())
            .await?
            .payload),

        WebhookOperation::GetAll { paging } => {
            if paging.return_all {
                let records = fetch_all(
                    client,
                    Method::GET,
                    "/webhooks",
                    None,
                    &StringMap::new(),
                    None,
                )
                .await?;
                return Ok(Payload::Many(records));
            }

            let mut query = StringMap::new();
            query.insert(
                "limit".into(),
                paging.limit.unwrap_or(super::DEFAULT_LIST_LIMIT).to_string(),
            );
            Ok(client.get("/webhooks", &query).await?.payload)
        }

        WebhookOperation::Update {
            webhook_id,
            update_fields,
        } => {
            let mut body = JsonObject::new();
            insert_string(&mut body, "name", &update_fields.name);
            insert_string(&mut body, "url", &update_fields.url);
            if !update_fields.event_types.is_empty() {
                body.insert(
                    "eventTypes".into(),
                    event_types_array(&update_fields.event_types),
                );
            }
            if let Some(enabled) = update_fields.enabled {
                body.insert("enabled".into(), JsonValue::Bool(enabled));
            }
            insert_string(&mut body, "secretToken", &update_fields.secret_token);
            insert_id_list(&mut body, "tagIds", &update_fields.tag_ids);
            insert_id_list(&mut body, "vehicleIds", &update_fields.vehicle_ids);
            insert_id_list(&mut body, "driverIds", &update_fields.driver_ids);
            if !update_fields.custom_headers.is_empty() {
                body.insert(
                    "customHeaders".into(),
                    headers_object(&update_fields.custom_headers),
                );
            }

            let body = JsonValue::Object(body);
            Ok(client
                .request(
                    Method::PATCH,
                    &format!("/webhooks/{webhook_id}"),
                    Some(&body),
                    &StringMap::new(),
                )
                .await?
                .payload)
        }

        WebhookOperation::Delete { webhook_id } => {
            client
                .request(
                    Method::DELETE,
                    &format!("/webhooks/{webhook_id}"),
                    None,
                    &StringMap::new(),
                )
                .await?;
            Ok(Payload::Single(
                serde_json::json!({"success": true, "webhookId": webhook_id}),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::transport::ApiClientConfig;

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(ApiClientConfig::new("t").with_base_url(server.uri()))
    }

    #[tokio::test]
    async fn test_create_without_filters_sends_minimal_body() {
        let server = MockServer::start().await;

        // No optional keys may appear when no optional fields were given.
        Mock::given(method("POST"))
            .and(path("/webhooks"))
            .and(body_json(json!({
                "name": "Geofence hook",
                "url": "https://example.com/hook",
                "eventTypes": ["GeofenceEntry"],
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "w1"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let op: WebhookOperation = serde_json::from_value(json!({
            "operation": "create",
            "name": "Geofence hook",
            "url": "https://example.com/hook",
            "eventTypes": ["GeofenceEntry"],
        }))
        .unwrap();

        let payload = execute(&client_for(&server), op).await.unwrap();
        assert_eq!(payload.as_single().unwrap()["id"], "w1");
    }

    #[tokio::test]
    async fn test_update_copies_enabled_false() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/webhooks/w1"))
            .and(body_json(json!({"enabled": false})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "w1"}})),
            )
            .mount(&server)
            .await;

        let op: WebhookOperation = serde_json::from_value(json!({
            "operation": "update",
            "webhookId": "w1",
            "updateFields": {"enabled": false},
        }))
        .unwrap();

        execute(&client_for(&server), op).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_all_limited_is_single_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/webhooks"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "w1"}],
                "pagination": {"endCursor": "c", "hasNextPage": true},
            })))
            .expect(1)
            .mount(&server)
            .await;

        let op: WebhookOperation = serde_json::from_value(json!({
            "operation": "getAll",
            "returnAll": false,
            "limit": 5,
        }))
        .unwrap();

        let payload = execute(&client_for(&server), op).await.unwrap();
        assert_eq!(payload.into_records().len(), 1);
    }

    #[test]
    fn test_custom_headers_collapse_to_object() {
        let headers = vec![
            HeaderPair {
                key: "X-Env".into(),
                value: "prod".into(),
            },
            HeaderPair {
                key: "X-Team".into(),
                value: "fleet".into(),
            },
        ];
        assert_eq!(
            headers_object(&headers),
            json!({"X-Env": "prod", "X-Team": "fleet"})
        );
    }
}
