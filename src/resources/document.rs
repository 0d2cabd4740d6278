//! Document operations
//!
//! Driver documents built from templates, with typed field values.

use super::{insert_string, list, Paging};
use crate::error::Result;
use crate::query::{build_query_string, format_time_range, format_timestamp};
use crate::transport::{ApiClient, Payload};
use crate::types::{JsonObject, JsonValue, Method, StringMap};
use serde::Deserialize;

/// Document operations
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum DocumentOperation {
    /// Create a document from a template
    #[serde(rename_all = "camelCase")]
    Create {
        document_template_id: String,
        #[serde(default)]
        additional_fields: DocumentFields,
        #[serde(default)]
        fields: Vec<DocumentFieldValue>,
    },
    /// Get a document by ID
    #[serde(rename_all = "camelCase")]
    Get { document_id: String },
    /// List documents
    GetAll {
        #[serde(flatten)]
        paging: Paging,
        #[serde(default)]
        filters: DocumentFilters,
    },
    /// List document templates
    GetTemplates {
        #[serde(flatten)]
        paging: Paging,
    },
    /// Submit a document
    #[serde(rename_all = "camelCase")]
    Submit { document_id: String },
}

/// Optional create fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentFields {
    pub driver_id: Option<String>,
    pub vehicle_id: Option<String>,
    pub dispatch_job_id: Option<String>,
    pub notes: Option<String>,
}

/// Listing filters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentFilters {
    pub driver_ids: Option<String>,
    pub vehicle_ids: Option<String>,
    pub state: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// One typed field value of a document
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "valueType", rename_all = "camelCase")]
pub enum DocumentFieldValue {
    #[serde(rename_all = "camelCase")]
    String { label: String, string_value: String },
    #[serde(rename_all = "camelCase")]
    Number { label: String, number_value: f64 },
    #[serde(rename_all = "camelCase")]
    Datetime {
        label: String,
        date_time_value: String,
    },
    #[serde(rename_all = "camelCase")]
    Boolean { label: String, boolean_value: bool },
}

impl DocumentFieldValue {
    /// Render as the API's field object; datetimes are ISO-normalized.
    fn to_body(&self) -> Result<JsonValue> {
        Ok(match self {
            Self::String {
                label,
                string_value,
            } => serde_json::json!({"label": label, "stringValue": string_value}),
            Self::Number {
                label,
                number_value,
            } => serde_json::json!({"label": label, "numberValue": number_value}),
            Self::Datetime {
                label,
                date_time_value,
            } => serde_json::json!({
                "label": label,
                "dateTimeValue": format_timestamp(date_time_value)?,
            }),
            Self::Boolean {
                label,
                boolean_value,
            } => serde_json::json!({"label": label, "booleanValue": boolean_value}),
        })
    }
}

/// Execute a document operation.
pub async fn execute(client: &ApiClient, op: DocumentOperation) -> Result<Payload> {
    match op {
        DocumentOperation::Create {
            document_template_id,
            additional_fields,
            fields,
        } => {
            let mut body = JsonObject::new();
            body.insert(
                "documentTemplateId".into(),
                JsonValue::String(document_template_id),
            );
            insert_string(&mut body, "driverId", &additional_fields.driver_id);
            insert_string(&mut body, "vehicleId", &additional_fields.vehicle_id);
            insert_string(&mut body, "dispatchJobId", &additional_fields.dispatch_job_id);
            insert_string(&mut body, "notes", &additional_fields.notes);

            if !fields.is_empty() {
                let rendered: Result<Vec<JsonValue>> =
                    fields.iter().map(DocumentFieldValue::to_body).collect();
                body.insert("fields".into(), JsonValue::Array(rendered?));
            }

            let body = JsonValue::Object(body);
            Ok(client
                .request(
                    Method::POST,
                    "/fleet/documents",
                    Some(&body),
                    &StringMap::new(),
                )
                .await?
                .payload)
        }

        DocumentOperation::Get { document_id } => Ok(client
            .get(&format!("/fleet/documents/{document_id}"), &StringMap::new())
            .await?
            .payload),

        DocumentOperation::GetAll { paging, filters } => {
            let mut params = JsonObject::new();
            if let Some(driver_ids) = &filters.driver_ids {
                params.insert("driverIds".into(), JsonValue::String(driver_ids.clone()));
            }
            if let Some(vehicle_ids) = &filters.vehicle_ids {
                params.insert("vehicleIds".into(), JsonValue::String(vehicle_ids.clone()));
            }
            if let Some(state) = &filters.state {
                params.insert("state".into(), JsonValue::String(state.clone()));
            }

            if filters.start_time.is_some() || filters.end_time.is_some() {
                let range = format_time_range(
                    filters.start_time.as_deref(),
                    filters.end_time.as_deref(),
                )?;
                range.extend(&mut params);
            }

            list(
                client,
                "/fleet/documents",
                &build_query_string(&params),
                &paging,
            )
            .await
        }

        DocumentOperation::GetTemplates { paging } => {
            list(
                client,
                "/fleet/documents/templates",
                &StringMap::new(),
                &paging,
            )
            .await
        }

        DocumentOperation::Submit { document_id } => {
            let body = serde_json::json!({"state": "submitted"});
            Ok(client
                .request(
                    Method::PATCH,
                    &format!("/fleet/documents/{document_id}"),
                    Some(&body),
                    &StringMap::new(),
                )
                .await?
                .payload)
        }
    }
}
