//! Per-resource operation handlers
//!
//! One module per API resource. Each module defines a typed operation enum
//! (deserialized once from the dispatch parameters, `operation` field as the
//! tag) and an `execute` function translating the operation into transport
//! calls. Request bodies are assembled by selectively copying present,
//! non-empty fields — absent fields are omitted, never null-filled.

pub mod address;
pub mod asset;
pub mod compliance;
pub mod document;
pub mod driver;
pub mod route;
pub mod safety;
pub mod sensor;
pub mod tag;
pub mod vehicle;
pub mod webhook;

use crate::error::{Error, Result};
use crate::pagination::fetch_all;
use crate::query::{build_query_string, parse_id_list};
use crate::transport::{ApiClient, Payload};
use crate::types::{JsonObject, JsonValue, Method, StringMap};
use serde::{Deserialize, Serialize};

/// Default result cap for listings that are not "return all".
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Paging controls shared by listing operations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    /// Return every result, following the cursor to the end
    #[serde(default)]
    pub return_all: bool,
    /// Result cap when `return_all` is false
    pub limit: Option<usize>,
}

impl Paging {
    /// The overall result cap: none when returning all, the caller's limit
    /// (or the default of 50) otherwise.
    pub fn cap(&self) -> Option<usize> {
        if self.return_all {
            None
        } else {
            Some(self.limit.unwrap_or(DEFAULT_LIST_LIMIT))
        }
    }
}

/// Serialize a filter struct into a parameter object.
pub(crate) fn params_of<T: Serialize>(value: &T) -> JsonObject {
    match serde_json::to_value(value) {
        Ok(JsonValue::Object(map)) => map,
        _ => JsonObject::new(),
    }
}

/// Serialize a filter struct straight into normalized query parameters.
pub(crate) fn query_of<T: Serialize>(value: &T) -> StringMap {
    build_query_string(&params_of(value))
}

/// Run a paginated listing and return the aggregated records.
pub(crate) async fn list(
    client: &ApiClient,
    path: &str,
    query: &StringMap,
    paging: &Paging,
) -> Result<Payload> {
    let records = fetch_all(client, Method::GET, path, None, query, paging.cap()).await?;
    Ok(Payload::Many(records))
}

/// Copy a string field into a body when present and non-empty.
pub(crate) fn insert_string(body: &mut JsonObject, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        if !value.is_empty() {
            body.insert(key.to_string(), JsonValue::String(value.clone()));
        }
    }
}

/// Copy any JSON value into a body when present.
pub(crate) fn insert_value(body: &mut JsonObject, key: &str, value: Option<JsonValue>) {
    if let Some(value) = value {
        body.insert(key.to_string(), value);
    }
}

/// Split a comma-separated ID list into a JSON array field when present.
pub(crate) fn insert_id_list(body: &mut JsonObject, key: &str, ids: &Option<String>) {
    if let Some(ids) = ids {
        if !ids.is_empty() {
            let list = parse_id_list(ids)
                .into_iter()
                .map(JsonValue::String)
                .collect();
            body.insert(key.to_string(), JsonValue::Array(list));
        }
    }
}

/// External IDs arrive either as an inline object or as a JSON string;
/// malformed JSON is a fatal error for the item.
pub(crate) fn parse_external_ids(value: &JsonValue) -> Result<JsonValue> {
    match value {
        JsonValue::String(raw) => serde_json::from_str(raw).map_err(Error::JsonParse),
        other => Ok(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paging_cap() {
        let all = Paging {
            return_all: true,
            limit: Some(10),
        };
        assert_eq!(all.cap(), None);

        let limited = Paging {
            return_all: false,
            limit: Some(10),
        };
        assert_eq!(limited.cap(), Some(10));

        let defaulted = Paging::default();
        assert_eq!(defaulted.cap(), Some(DEFAULT_LIST_LIMIT));
    }

    #[test]
    fn test_insert_helpers_omit_absent_fields() {
        let mut body = JsonObject::new();
        insert_string(&mut body, "name", &Some("x".into()));
        insert_string(&mut body, "empty", &Some(String::new()));
        insert_string(&mut body, "missing", &None);
        insert_id_list(&mut body, "tagIds", &Some("1, 2".into()));
        insert_id_list(&mut body, "driverIds", &None);

        assert_eq!(
            JsonValue::Object(body),
            json!({"name": "x", "tagIds": ["1", "2"]})
        );
    }

    #[test]
    fn test_parse_external_ids() {
        let inline = json!({"erp": "A-1"});
        assert_eq!(parse_external_ids(&inline).unwrap(), inline);

        let encoded = JsonValue::String("{\"erp\":\"A-1\"}".into());
        assert_eq!(parse_external_ids(&encoded).unwrap(), inline);

        assert!(parse_external_ids(&JsonValue::String("{not json".into())).is_err());
    }
}
