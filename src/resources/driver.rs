//! Driver operations
//!
//! Roster management plus the HOS, safety-score, and efficiency views
//! keyed by driver.

use super::{
    insert_id_list, insert_string, insert_value, list, params_of, parse_external_ids, query_of,
    Paging,
};
use crate::error::Result;
use crate::query::{build_query_string, format_time_range};
use crate::transport::{ApiClient, Payload};
use crate::types::{JsonObject, JsonValue, Method, StringMap};
use serde::{Deserialize, Serialize};

/// Driver operations
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum DriverOperation {
    /// Create a driver
    #[serde(rename_all = "camelCase")]
    Create {
        name: String,
        #[serde(default)]
        additional_fields: DriverFields,
    },
    /// Get a driver by ID
    #[serde(rename_all = "camelCase")]
    Get { driver_id: String },
    /// List drivers
    GetAll {
        #[serde(flatten)]
        paging: Paging,
        #[serde(default)]
        filters: DriverFilters,
    },
    /// Update a driver
    #[serde(rename_all = "camelCase")]
    Update {
        driver_id: String,
        #[serde(default)]
        update_fields: DriverFields,
    },
    /// Deactivate a driver
    #[serde(rename_all = "camelCase")]
    Deactivate { driver_id: String },
    /// Hours-of-service logs for a set of drivers
    #[serde(rename_all = "camelCase")]
    GetHosLogs {
        driver_ids: String,
        start_time: String,
        end_time: String,
    },
    /// Safety score for one driver over a time range
    #[serde(rename_all = "camelCase")]
    GetSafetyScore {
        driver_id: String,
        start_time: String,
        end_time: String,
    },
    /// Efficiency/performance report for one driver
    #[serde(rename_all = "camelCase")]
    GetPerformance {
        driver_id: String,
        start_time: String,
        end_time: String,
    },
}

/// Listing filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriverFilters {
    pub tag_ids: Option<String>,
    /// `active` or `deactivated`
    pub driver_activation_status: Option<String>,
}

/// Optional fields shared by create and update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriverFields {
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub driver_license_number: Option<String>,
    pub driver_license_state: Option<String>,
    pub eld_exempt: Option<bool>,
    pub eld_exempt_reason: Option<String>,
    pub tag_ids: Option<String>,
    pub external_ids: Option<JsonValue>,
}

impl DriverFields {
    /// Copy present fields into a request body.
    fn apply(&self, body: &mut JsonObject) -> Result<()> {
        insert_string(body, "name", &self.name);
        insert_string(body, "username", &self.username);
        insert_string(body, "password", &self.password);
        insert_string(body, "phone", &self.phone);
        insert_string(body, "driverLicenseNumber", &self.driver_license_number);
        insert_string(body, "driverLicenseState", &self.driver_license_state);
        insert_value(body, "eldExempt", self.eld_exempt.map(JsonValue::Bool));
        insert_string(body, "eldExemptReason", &self.eld_exempt_reason);
        insert_id_list(body, "tagIds", &self.tag_ids);
        if let Some(external_ids) = &self.external_ids {
            body.insert("externalIds".into(), parse_external_ids(external_ids)?);
        }
        Ok(())
    }
}

/// Execute a driver operation.
pub async fn execute(client: &ApiClient, op: DriverOperation) -> Result<Payload> {
    match op {
        DriverOperation::Create {
            name,
            additional_fields,
        } => {
            let mut body = JsonObject::new();
            body.insert("name".into(), JsonValue::String(name));
            additional_fields.apply(&mut body)?;

            let body = JsonValue::Object(body);
            Ok(client
                .request(Method::POST, "/fleet/drivers", Some(&body), &StringMap::new())
                .await?
                .payload)
        }

        DriverOperation::Get { driver_id } => Ok(client
            .get(&format!("/fleet/drivers/{driver_id}"), &StringMap::new())
            .await?
            .payload),

        DriverOperation::GetAll { paging, filters } => {
            list(client, "/fleet/drivers", &query_of(&filters), &paging).await
        }

        DriverOperation::Update {
            driver_id,
            update_fields,
        } => {
            let mut body = JsonObject::new();
            update_fields.apply(&mut body)?;

            let body = JsonValue::Object(body);
            Ok(client
                .request(
                    Method::PATCH,
                    &format!("/fleet/drivers/{driver_id}"),
                    Some(&body),
                    &StringMap::new(),
                )
                .await?
                .payload)
        }

        DriverOperation::Deactivate { driver_id } => {
            let body = serde_json::json!({"driverActivationStatus": "deactivated"});
            Ok(client
                .request(
                    Method::PATCH,
                    &format!("/fleet/drivers/{driver_id}"),
                    Some(&body),
                    &StringMap::new(),
                )
                .await?
                .payload)
        }

        DriverOperation::GetHosLogs {
            driver_ids,
            start_time,
            end_time,
        } => driver_report(client, "/fleet/hos/logs", &driver_ids, &start_time, &end_time).await,

        DriverOperation::GetSafetyScore {
            driver_id,
            start_time,
            end_time,
        } => {
            driver_report(
                client,
                "/fleet/drivers/safety-scores",
                &driver_id,
                &start_time,
                &end_time,
            )
            .await
        }

        DriverOperation::GetPerformance {
            driver_id,
            start_time,
            end_time,
        } => {
            driver_report(
                client,
                "/fleet/drivers/efficiency",
                &driver_id,
                &start_time,
                &end_time,
            )
            .await
        }
    }
}

async fn driver_report(
    client: &ApiClient,
    path: &str,
    driver_ids: &str,
    start_time: &str,
    end_time: &str,
) -> Result<Payload> {
    let range = format_time_range(Some(start_time), Some(end_time))?;
    let mut params = params_of(&serde_json::json!({"driverIds": driver_ids}));
    range.extend(&mut params);

    Ok(client.get(path, &build_query_string(&params)).await?.payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_create_body_copies_only_present_fields() {
        let fields: DriverFields = serde_json::from_value(json!({
            "username": "adriver",
            "phone": "",
            "eldExempt": false,
            "tagIds": "1, 2",
            "externalIds": "{\"payroll\":\"P-9\"}",
        }))
        .unwrap();

        let mut body = JsonObject::new();
        body.insert("name".into(), JsonValue::String("Alex".into()));
        fields.apply(&mut body).unwrap();

        assert_eq!(
            JsonValue::Object(body),
            json!({
                "name": "Alex",
                "username": "adriver",
                "eldExempt": false,
                "tagIds": ["1", "2"],
                "externalIds": {"payroll": "P-9"},
            })
        );
    }

    #[test]
    fn test_malformed_external_ids_is_fatal() {
        let fields: DriverFields =
            serde_json::from_value(json!({"externalIds": "{oops"})).unwrap();
        let mut body = JsonObject::new();
        assert!(fields.apply(&mut body).is_err());
    }

    #[test]
    fn test_operation_parsing_defaults() {
        let op: DriverOperation =
            serde_json::from_value(json!({"operation": "getAll"})).unwrap();
        match op {
            DriverOperation::GetAll { paging, filters } => {
                assert!(!paging.return_all);
                assert!(filters.tag_ids.is_none());
            }
            other => panic!("unexpected operation: {other:?}"),
        }
    }
}
