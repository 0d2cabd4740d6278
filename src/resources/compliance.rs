//! Compliance operations
//!
//! HOS logs and violations, DVIR inspections, and unassigned HOS segments.
//! Listings here keep the source system's asymmetry: "return all" drives
//! the cursor aggregator, while a limited listing issues exactly one
//! request carrying `limit` (default 100).

use super::{insert_id_list, insert_string, Paging};
use crate::error::Result;
use crate::pagination::fetch_all;
use crate::query::{build_query_string, format_time_range};
use crate::transport::{ApiClient, Payload};
use crate::types::{JsonObject, JsonValue, Method, StringMap};
use serde::Deserialize;

/// Default single-request limit for compliance listings.
const DEFAULT_COMPLIANCE_LIMIT: usize = 100;

/// Compliance operations
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum ComplianceOperation {
    /// Hours-of-service logs
    #[serde(rename_all = "camelCase")]
    GetHosLogs {
        start_time: String,
        end_time: String,
        #[serde(flatten)]
        paging: Paging,
        #[serde(default)]
        filters: HosLogFilters,
    },
    /// Hours-of-service violations
    #[serde(rename_all = "camelCase")]
    GetHosViolations {
        start_time: String,
        end_time: String,
        #[serde(flatten)]
        paging: Paging,
        #[serde(default)]
        filters: HosViolationFilters,
    },
    /// DVIR inspection logs
    #[serde(rename_all = "camelCase")]
    GetDvirLogs {
        start_time: String,
        end_time: String,
        #[serde(flatten)]
        paging: Paging,
        #[serde(default)]
        filters: DvirFilters,
    },
    /// Create a DVIR inspection
    #[serde(rename_all = "camelCase")]
    CreateDvir {
        vehicle_id: String,
        inspection_type: String,
        safe_to_operate: bool,
        #[serde(default)]
        additional_fields: DvirFields,
    },
    /// Unassigned HOS segments
    #[serde(rename_all = "camelCase")]
    GetUnassignedHos {
        start_time: String,
        end_time: String,
        #[serde(flatten)]
        paging: Paging,
        #[serde(default)]
        filters: UnassignedHosFilters,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HosLogFilters {
    pub driver_ids: Option<String>,
    pub tag_ids: Option<String>,
    pub log_types: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HosViolationFilters {
    pub driver_ids: Option<String>,
    pub tag_ids: Option<String>,
    pub violation_types: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DvirFilters {
    pub driver_ids: Option<String>,
    pub vehicle_ids: Option<String>,
    pub tag_ids: Option<String>,
    /// `all` is a UI sentinel, not a wire value
    pub inspection_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnassignedHosFilters {
    pub vehicle_ids: Option<String>,
    pub tag_ids: Option<String>,
}

/// Optional DVIR creation fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DvirFields {
    pub driver_id: Option<String>,
    pub location: Option<String>,
    pub odometer_miles: Option<f64>,
    pub remarks: Option<String>,
    pub trailer_ids: Option<String>,
    pub defects: Vec<DvirDefect>,
}

/// One reported defect on a DVIR
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DvirDefect {
    pub defect_type: String,
    pub comment: Option<String>,
    #[serde(default)]
    pub is_major: bool,
}

/// Execute a compliance operation.
pub async fn execute(client: &ApiClient, op: ComplianceOperation) -> Result<Payload> {
    match op {
        ComplianceOperation::GetHosLogs {
            start_time,
            end_time,
            paging,
            filters,
        } => {
            let mut params = time_params(&start_time, &end_time)?;
            insert_csv(&mut params, "driverIds", &filters.driver_ids);
            insert_csv(&mut params, "tagIds", &filters.tag_ids);
            insert_list(&mut params, "logTypes", &filters.log_types);

            compliance_list(client, "/fleet/hos/logs", params, &paging).await
        }

        ComplianceOperation::GetHosViolations {
            start_time,
            end_time,
            paging,
            filters,
        } => {
            let mut params = time_params(&start_time, &end_time)?;
            insert_csv(&mut params, "driverIds", &filters.driver_ids);
            insert_csv(&mut params, "tagIds", &filters.tag_ids);
            insert_list(&mut params, "violationTypes", &filters.violation_types);

            compliance_list(client, "/fleet/hos/violations", params, &paging).await
        }

        ComplianceOperation::GetDvirLogs {
            start_time,
            end_time,
            paging,
            filters,
        } => {
            let mut params = time_params(&start_time, &end_time)?;
            insert_csv(&mut params, "driverIds", &filters.driver_ids);
            insert_csv(&mut params, "vehicleIds", &filters.vehicle_ids);
            insert_csv(&mut params, "tagIds", &filters.tag_ids);
            if let Some(inspection_type) = &filters.inspection_type {
                if inspection_type != "all" {
                    params.insert(
                        "inspectionType".into(),
                        JsonValue::String(inspection_type.clone()),
                    );
                }
            }

            compliance_list(client, "/fleet/dvirs", params, &paging).await
        }

        ComplianceOperation::CreateDvir {
            vehicle_id,
            inspection_type,
            safe_to_operate,
            additional_fields,
        } => {
            let mut body = JsonObject::new();
            body.insert("vehicleId".into(), JsonValue::String(vehicle_id));
            body.insert("inspectionType".into(), JsonValue::String(inspection_type));
            body.insert("safeToOperate".into(), JsonValue::Bool(safe_to_operate));

            insert_string(&mut body, "driverId", &additional_fields.driver_id);
            insert_string(&mut body, "location", &additional_fields.location);
            if let Some(odometer) = additional_fields.odometer_miles {
                body.insert("odometerMiles".into(), serde_json::json!(odometer));
            }
            insert_string(&mut body, "remarks", &additional_fields.remarks);
            insert_id_list(&mut body, "trailerIds", &additional_fields.trailer_ids);

            if !additional_fields.defects.is_empty() {
                let defects: Vec<JsonValue> = additional_fields
                    .defects
                    .iter()
                    .map(|defect| {
                        let mut entry = JsonObject::new();
                        entry.insert(
                            "defectType".into(),
                            JsonValue::String(defect.defect_type.clone()),
                        );
                        insert_string(&mut entry, "comment", &defect.comment);
                        entry.insert("isMajor".into(), JsonValue::Bool(defect.is_major));
                        JsonValue::Object(entry)
                    })
                    .collect();
                body.insert("defects".into(), JsonValue::Array(defects));
            }

            let body = JsonValue::Object(body);
            Ok(client
                .request(Method::POST, "/fleet/dvirs", Some(&body), &StringMap::new())
                .await?
                .payload)
        }

        ComplianceOperation::GetUnassignedHos {
            start_time,
            end_time,
            paging,
            filters,
        } => {
            let mut params = time_params(&start_time, &end_time)?;
            insert_csv(&mut params, "vehicleIds", &filters.vehicle_ids);
            insert_csv(&mut params, "tagIds", &filters.tag_ids);

            compliance_list(client, "/fleet/hos/unassigned", params, &paging).await
        }
    }
}

fn time_params(start_time: &str, end_time: &str) -> Result<JsonObject> {
    Ok(format_time_range(Some(start_time), Some(end_time))?.into_object())
}

fn insert_csv(params: &mut JsonObject, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        if !value.is_empty() {
            params.insert(key.to_string(), JsonValue::String(value.clone()));
        }
    }
}

fn insert_list(params: &mut JsonObject, key: &str, values: &[String]) {
    if !values.is_empty() {
        let list = values.iter().cloned().map(JsonValue::String).collect();
        params.insert(key.to_string(), JsonValue::Array(list));
    }
}

/// Return-all drives the aggregator; otherwise one request with `limit`.
async fn compliance_list(
    client: &ApiClient,
    path: &str,
    mut params: JsonObject,
    paging: &Paging,
) -> Result<Payload> {
    if paging.return_all {
        let query = build_query_string(&params);
        let records = fetch_all(client, Method::GET, path, None, &query, None).await?;
        return Ok(Payload::Many(records));
    }

    let limit = paging.limit.unwrap_or(DEFAULT_COMPLIANCE_LIMIT);
    params.insert("limit".into(), serde_json::json!(limit));
    Ok(client.get(path, &build_query_string(&params)).await?.payload)
}
