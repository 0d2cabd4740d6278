//! Asset operations
//!
//! Equipment tracking: roster, locations, and stats over a time range.

use super::{
    insert_id_list, insert_string, insert_value, list, params_of, parse_external_ids, query_of,
    Paging,
};
use crate::error::Result;
use crate::query::{build_query_string, format_time_range};
use crate::transport::{ApiClient, Payload};
use crate::types::{JsonObject, JsonValue, Method, StringMap};
use serde::{Deserialize, Serialize};

/// Asset operations
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum AssetOperation {
    /// Create an asset
    #[serde(rename_all = "camelCase")]
    Create {
        name: String,
        #[serde(default)]
        additional_fields: AssetFields,
    },
    /// Get an asset by ID
    #[serde(rename_all = "camelCase")]
    Get { asset_id: String },
    /// List assets
    GetAll {
        #[serde(flatten)]
        paging: Paging,
        #[serde(default)]
        filters: AssetFilters,
    },
    /// Update an asset
    #[serde(rename_all = "camelCase")]
    Update {
        asset_id: String,
        #[serde(default)]
        update_fields: AssetFields,
    },
    /// Current asset locations
    GetLocations {
        #[serde(flatten)]
        paging: Paging,
        #[serde(default)]
        filters: AssetFilters,
    },
    /// Asset stats over a time range
    #[serde(rename_all = "camelCase")]
    GetStats {
        start_time: String,
        end_time: String,
        #[serde(default)]
        filters: AssetFilters,
    },
}

/// Listing filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetFilters {
    pub tag_ids: Option<String>,
    pub asset_ids: Option<String>,
}

/// Optional fields shared by create and update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetFields {
    pub name: Option<String>,
    pub asset_serial_number: Option<String>,
    pub tag_ids: Option<String>,
    pub external_ids: Option<JsonValue>,
    pub notes: Option<String>,
}

impl AssetFields {
    fn apply(&self, body: &mut JsonObject) -> Result<()> {
        insert_string(body, "name", &self.name);
        insert_string(body, "assetSerialNumber", &self.asset_serial_number);
        insert_id_list(body, "tagIds", &self.tag_ids);
        if let Some(external_ids) = &self.external_ids {
            insert_value(body, "externalIds", Some(parse_external_ids(external_ids)?));
        }
        insert_string(body, "notes", &self.notes);
        Ok(())
    }
}

/// Execute an asset operation.
pub async fn execute(client: &ApiClient, op: AssetOperation) -> Result<Payload> {
    match op {
        AssetOperation::Create {
            name,
            additional_fields,
        } => {
            let mut body = JsonObject::new();
            body.insert("name".into(), JsonValue::String(name));
            additional_fields.apply(&mut body)?;

            let body = JsonValue::Object(body);
            Ok(client
                .request(Method::POST, "/fleet/assets", Some(&body), &StringMap::new())
                .await?
                .payload)
        }

        AssetOperation::Get { asset_id } => Ok(client
            .get(&format!("/fleet/assets/{asset_id}"), &StringMap::new())
            .await?
            .payload),

        AssetOperation::GetAll { paging, filters } => {
            list(client, "/fleet/assets", &query_of(&filters), &paging).await
        }

        AssetOperation::Update {
            asset_id,
            update_fields,
        } => {
            let mut body = JsonObject::new();
            update_fields.apply(&mut body)?;

            let body = JsonValue::Object(body);
            Ok(client
                .request(
                    Method::PATCH,
                    &format!("/fleet/assets/{asset_id}"),
                    Some(&body),
                    &StringMap::new(),
                )
                .await?
                .payload)
        }

        AssetOperation::GetLocations { paging, filters } => {
            list(
                client,
                "/fleet/assets/locations",
                &query_of(&filters),
                &paging,
            )
            .await
        }

        AssetOperation::GetStats {
            start_time,
            end_time,
            filters,
        } => {
            let range = format_time_range(Some(&start_time), Some(&end_time))?;
            let mut params = params_of(&filters);
            range.extend(&mut params);

            Ok(client
                .get("/fleet/assets/stats", &build_query_string(&params))
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

    #[test]
    fn test_create_body_shape() {
        let fields: AssetFields = serde_json::from_value(json!({
            "assetSerialNumber": "SN-1",
            "tagIds": "4,5",
            "notes": "",
        }))
        .unwrap();

        let mut body = JsonObject::new();
        body.insert("name".into(), JsonValue::String("Trailer 9".into()));
        fields.apply(&mut body).unwrap();

        assert_eq!(
            JsonValue::Object(body),
            json!({
                "name": "Trailer 9",
                "assetSerialNumber": "SN-1",
                "tagIds": ["4", "5"],
            })
        );
    }
}
