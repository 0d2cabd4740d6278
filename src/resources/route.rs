//! Route operations
//!
//! Dispatch routes: creation with formatted stops, progress tracking, and
//! stop completion.

use super::{insert_string, insert_value, list, parse_external_ids, Paging};
use crate::error::Result;
use crate::format::{format_stop, RouteStop};
use crate::query::{build_query_string, format_time_range, format_timestamp};
use crate::transport::{ApiClient, Payload};
use crate::types::{JsonObject, JsonValue, Method, StringMap};
use serde::Deserialize;

/// Route operations
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum RouteOperation {
    /// Create a route with its stop list
    #[serde(rename_all = "camelCase")]
    Create {
        name: String,
        #[serde(default)]
        additional_fields: RouteFields,
        #[serde(default)]
        stops: Vec<RouteStop>,
    },
    /// Get a route by ID
    #[serde(rename_all = "camelCase")]
    Get { route_id: String },
    /// List routes
    GetAll {
        #[serde(flatten)]
        paging: Paging,
        #[serde(default)]
        filters: RouteFilters,
    },
    /// Update a route
    #[serde(rename_all = "camelCase")]
    Update {
        route_id: String,
        #[serde(default)]
        update_fields: RouteFields,
    },
    /// Delete a route
    #[serde(rename_all = "camelCase")]
    Delete { route_id: String },
    /// Live progress for a route
    #[serde(rename_all = "camelCase")]
    GetProgress { route_id: String },
    /// The stop list of a route
    #[serde(rename_all = "camelCase")]
    GetStops { route_id: String },
    /// Mark one stop completed
    #[serde(rename_all = "camelCase")]
    CompleteStop { route_id: String, stop_id: String },
}

/// Listing filters; times are normalized to ISO-8601
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteFilters {
    pub driver_ids: Option<String>,
    pub vehicle_ids: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// Optional fields shared by create and update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteFields {
    pub name: Option<String>,
    pub driver_id: Option<String>,
    pub vehicle_id: Option<String>,
    pub scheduled_start_time: Option<String>,
    pub scheduled_end_time: Option<String>,
    pub notes: Option<String>,
    pub external_ids: Option<JsonValue>,
}

impl RouteFields {
    fn apply(&self, body: &mut JsonObject) -> Result<()> {
        insert_string(body, "name", &self.name);
        insert_string(body, "driverId", &self.driver_id);
        insert_string(body, "vehicleId", &self.vehicle_id);
        if let Some(start) = &self.scheduled_start_time {
            body.insert(
                "scheduledStartTime".into(),
                JsonValue::String(format_timestamp(start)?),
            );
        }
        if let Some(end) = &self.scheduled_end_time {
            body.insert(
                "scheduledEndTime".into(),
                JsonValue::String(format_timestamp(end)?),
            );
        }
        insert_string(body, "notes", &self.notes);
        if let Some(external_ids) = &self.external_ids {
            insert_value(body, "externalIds", Some(parse_external_ids(external_ids)?));
        }
        Ok(())
    }
}

/// Execute a route operation.
pub async fn execute(client: &ApiClient, op: RouteOperation) -> Result<Payload> {
    match op {
        RouteOperation::Create {
            name,
            additional_fields,
            stops,
        } => {
            let mut body = JsonObject::new();
            body.insert("name".into(), JsonValue::String(name));
            additional_fields.apply(&mut body)?;

            if !stops.is_empty() {
                let formatted: Result<Vec<JsonValue>> = stops.iter().map(format_stop).collect();
                body.insert("stops".into(), JsonValue::Array(formatted?));
            }

            let body = JsonValue::Object(body);
            Ok(client
                .request(Method::POST, "/fleet/routes", Some(&body), &StringMap::new())
                .await?
                .payload)
        }

        RouteOperation::Get { route_id } => Ok(client
            .get(&format!("/fleet/routes/{route_id}"), &StringMap::new())
            .await?
            .payload),

        RouteOperation::GetAll { paging, filters } => {
            let range = format_time_range(
                filters.start_time.as_deref(),
                filters.end_time.as_deref(),
            )?;
            let mut params = JsonObject::new();
            if let Some(driver_ids) = &filters.driver_ids {
                params.insert("driverIds".into(), JsonValue::String(driver_ids.clone()));
            }
            if let Some(vehicle_ids) = &filters.vehicle_ids {
                params.insert("vehicleIds".into(), JsonValue::String(vehicle_ids.clone()));
            }
            range.extend(&mut params);

            list(client, "/fleet/routes", &build_query_string(&params), &paging).await
        }

        RouteOperation::Update {
            route_id,
            update_fields,
        } => {
            let mut body = JsonObject::new();
            update_fields.apply(&mut body)?;

            let body = JsonValue::Object(body);
            Ok(client
                .request(
                    Method::PATCH,
                    &format!("/fleet/routes/{route_id}"),
                    Some(&body),
                    &StringMap::new(),
                )
                .await?
                .payload)
        }

        RouteOperation::Delete { route_id } => {
            client
                .request(
                    Method::DELETE,
                    &format!("/fleet/routes/{route_id}"),
                    None,
                    &StringMap::new(),
                )
                .await?;
            Ok(Payload::Single(
                serde_json::json!({"success": true, "routeId": route_id}),
            ))
        }

        RouteOperation::GetProgress { route_id } => Ok(client
            .get(
                &format!("/fleet/routes/{route_id}/progress"),
                &StringMap::new(),
            )
            .await?
            .payload),

        RouteOperation::GetStops { route_id } => {
            let envelope = client
                .get(&format!("/fleet/routes/{route_id}"), &StringMap::new())
                .await?;

            let stops = envelope
                .payload
                .as_single()
                .and_then(|route| route.get("stops"))
                .and_then(JsonValue::as_array)
                .cloned()
                .unwrap_or_default();
            Ok(Payload::Many(stops))
        }

        RouteOperation::CompleteStop { route_id, stop_id } => {
            let body = serde_json::json!({"state": "completed"});
            Ok(client
                .request(
                    Method::PATCH,
                    &format!("/fleet/routes/{route_id}/stops/{stop_id}"),
                    Some(&body),
                    &StringMap::new(),
                )
                .await?
                .payload)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::transport::ApiClientConfig;

    #[test]
    fn test_fields_normalize_scheduled_times() {
        let fields: RouteFields = serde_json::from_value(json!({
            "driverId": "d1",
            "scheduledStartTime": "2024-03-01 06:00:00",
        }))
        .unwrap();

        let mut body = JsonObject::new();
        fields.apply(&mut body).unwrap();

        assert_eq!(
            JsonValue::Object(body),
            json!({
                "driverId": "d1",
                "scheduledStartTime": "2024-03-01T06:00:00.000Z",
            })
        );
    }

    #[tokio::test]
    async fn test_create_formats_stops() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/fleet/routes"))
            .and(body_json(json!({
                "name": "Morning run",
                "stops": [
                    {"name": "Depot", "addressId": "a1"},
                    {"name": "Dock", "latitude": 37.0, "longitude": -122.0},
                ],
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "r1"}})),
            )
            .mount(&server)
            .await;

        let client = crate::transport::ApiClient::new(
            ApiClientConfig::new("t").with_base_url(server.uri()),
        );
        let op: RouteOperation = serde_json::from_value(json!({
            "operation": "create",
            "name": "Morning run",
            "stops": [
                {"name": "Depot", "addressId": "a1"},
                {"name": "Dock", "latitude": 37.0, "longitude": -122.0},
            ],
        }))
        .unwrap();

        let payload = execute(&client, op).await.unwrap();
        assert_eq!(payload.as_single().unwrap()["id"], "r1");
    }

    #[tokio::test]
    async fn test_get_stops_extracts_list() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/fleet/routes/r1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"id": "r1", "stops": [{"id": "s1"}, {"id": "s2"}]},
            })))
            .mount(&server)
            .await;

        let client = crate::transport::ApiClient::new(
            ApiClientConfig::new("t").with_base_url(server.uri()),
        );
        let op: RouteOperation =
            serde_json::from_value(json!({"operation": "getStops", "routeId": "r1"})).unwrap();

        let payload = execute(&client, op).await.unwrap();
        assert_eq!(payload.into_records().len(), 2);
    }
}
