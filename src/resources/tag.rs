//! Tag operations
//!
//! Organizational tags and their entity assignments. `unassign` is the one
//! read-modify-write in the connector: it fetches the tag's current entity
//! list, removes the requested IDs, and resubmits the remainder. There is
//! no locking against concurrent modification between the read and the
//! write.

use super::{insert_id_list, insert_string, Paging};
use crate::error::Result;
use crate::options::EntityKind;
use crate::pagination::fetch_all;
use crate::query::parse_id_list;
use crate::transport::{ApiClient, Payload};
use crate::types::{JsonObject, JsonValue, Method, StringMap};
use serde::Deserialize;

/// Tag operations
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum TagOperation {
    /// Create a tag
    #[serde(rename_all = "camelCase")]
    Create {
        name: String,
        #[serde(default)]
        additional_fields: TagFields,
    },
    /// Get a tag by ID
    #[serde(rename_all = "camelCase")]
    Get { tag_id: String },
    /// List tags
    GetAll {
        #[serde(flatten)]
        paging: Paging,
    },
    /// Update a tag's name or parent
    #[serde(rename_all = "camelCase")]
    Update {
        tag_id: String,
        #[serde(default)]
        update_fields: TagUpdateFields,
    },
    /// Delete a tag
    #[serde(rename_all = "camelCase")]
    Delete { tag_id: String },
    /// Assign entities to a tag
    #[serde(rename_all = "camelCase")]
    Assign {
        tag_id: String,
        entity_type: EntityKind,
        /// Comma-separated entity IDs
        entity_ids: String,
    },
    /// Remove entities from a tag
    #[serde(rename_all = "camelCase")]
    Unassign {
        tag_id: String,
        entity_type: EntityKind,
        /// Comma-separated entity IDs
        entity_ids: String,
    },
}

/// Optional create fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TagFields {
    pub parent_tag_id: Option<String>,
    pub address_ids: Option<String>,
    pub asset_ids: Option<String>,
    pub driver_ids: Option<String>,
    pub vehicle_ids: Option<String>,
}

/// Optional update fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TagUpdateFields {
    pub name: Option<String>,
    pub parent_tag_id: Option<String>,
}

/// Execute a tag operation.
pub async fn execute(client: &ApiClient, op: TagOperation) -> Result<Payload> {
    match op {
        TagOperation::Create {
            name,
            additional_fields,
        } => {
            let mut body = JsonObject::new();
            body.insert("name".into(), JsonValue::String(name));
            insert_string(&mut body, "parentTagId", &additional_fields.parent_tag_id);
            insert_id_list(&mut body, "addressIds", &additional_fields.address_ids);
            insert_id_list(&mut body, "assetIds", &additional_fields.asset_ids);
            insert_id_list(&mut body, "driverIds", &additional_fields.driver_ids);
            insert_id_list(&mut body, "vehicleIds", &additional_fields.vehicle_ids);

            let body = JsonValue::Object(body);
            Ok(client
                .request(Method::POST, "/tags", Some(&body), &StringMap::new())
                .await?
                .payload)
        }

        TagOperation::Get { tag_id } => Ok(client
            .get(&format!("/tags/{tag_id}"), &StringMap::new())
            .await?
            .payload),

        TagOperation::GetAll { paging } => {
            let records = fetch_all(
                client,
                Method::GET,
                "/tags",
                None,
                &StringMap::new(),
                paging.cap(),
            )
            .await?;
            Ok(Payload::Many(records))
        }

        TagOperation::Update {
            tag_id,
            update_fields,
        } => {
            let mut body = JsonObject::new();
            insert_string(&mut body, "name", &update_fields.name);
            insert_string(&mut body, "parentTagId", &update_fields.parent_tag_id);

            let body = JsonValue::Object(body);
            patch_tag(client, &tag_id, &body).await
        }

        TagOperation::Delete { tag_id } => {
            client
                .request(
                    Method::DELETE,
                    &format!("/tags/{tag_id}"),
                    None,
                    &StringMap::new(),
                )
                .await?;
            Ok(Payload::Single(
                serde_json::json!({"success": true, "tagId": tag_id}),
            ))
        }

        TagOperation::Assign {
            tag_id,
            entity_type,
            entity_ids,
        } => {
            let entities: Vec<JsonValue> = parse_id_list(&entity_ids)
                .into_iter()
                .map(|id| serde_json::json!({"id": id}))
                .collect();

            let mut body = JsonObject::new();
            body.insert(entity_type.as_ref().to_string(), JsonValue::Array(entities));
            patch_tag(client, &tag_id, &JsonValue::Object(body)).await
        }

        TagOperation::Unassign {
            tag_id,
            entity_type,
            entity_ids,
        } => {
            // Read-modify-write: at-least-once, not atomic. A concurrent
            // assignment between the read and the write is neither detected
            // nor prevented.
            let current = client
                .get(&format!("/tags/{tag_id}"), &StringMap::new())
                .await?;

            let stored: Vec<JsonValue> = current
                .payload
                .as_single()
                .and_then(|tag| tag.get(entity_type.as_ref()))
                .and_then(JsonValue::as_array)
                .cloned()
                .unwrap_or_default();

            let remove: Vec<String> = parse_id_list(&entity_ids);
            let remaining: Vec<JsonValue> = stored
                .iter()
                .filter_map(|entity| entity.get("id").and_then(JsonValue::as_str))
                .filter(|id| !remove.iter().any(|r| r == id))
                .map(|id| serde_json::json!({"id": id}))
                .collect();

            let mut body = JsonObject::new();
            body.insert(entity_type.as_ref().to_string(), JsonValue::Array(remaining));
            patch_tag(client, &tag_id, &JsonValue::Object(body)).await
        }
    }
}

async fn patch_tag(client: &ApiClient, tag_id: &str, body: &JsonValue) -> Result<Payload> {
    Ok(client
        .request(
            Method::PATCH,
            &format!("/tags/{tag_id}"),
            Some(body),
            &StringMap::new(),
        )
        .await?
        .payload)
}
