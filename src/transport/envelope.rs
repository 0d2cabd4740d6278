//! Response envelope types
//!
//! The API wraps responses as `{ data, pagination }` where `data` may be
//! absent, a single object, or an array. The wire shape is resolved into a
//! [`Payload`] variant exactly once, here.

use crate::types::JsonValue;
use serde::Deserialize;

/// Pagination block of the response envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: Option<bool>,
}

/// The `data` field of an envelope, resolved into its three wire shapes
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    /// No `data` field (deletes, empty bodies)
    #[default]
    Absent,
    /// A single entity
    Single(JsonValue),
    /// A list of entities
    Many(Vec<JsonValue>),
}

impl Payload {
    /// Flatten into a record list: absent → empty, single → singleton.
    pub fn into_records(self) -> Vec<JsonValue> {
        match self {
            Self::Absent => Vec::new(),
            Self::Single(value) => vec![value],
            Self::Many(values) => values,
        }
    }

    /// The single entity, if this payload holds exactly one object.
    pub fn as_single(&self) -> Option<&JsonValue> {
        match self {
            Self::Single(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Number of records this payload flattens to.
    pub fn len(&self) -> usize {
        match self {
            Self::Absent => 0,
            Self::Single(_) => 1,
            Self::Many(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Option<JsonValue>> for Payload {
    fn from(data: Option<JsonValue>) -> Self {
        match data {
            None | Some(JsonValue::Null) => Self::Absent,
            Some(JsonValue::Array(values)) => Self::Many(values),
            Some(value) => Self::Single(value),
        }
    }
}

/// A parsed API response
#[derive(Debug, Clone, Default)]
pub struct ApiEnvelope {
    pub payload: Payload,
    pub pagination: Option<PageInfo>,
}

/// Raw wire shape; unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct WireEnvelope {
    #[serde(default)]
    data: Option<JsonValue>,
    #[serde(default)]
    pagination: Option<PageInfo>,
}

impl From<WireEnvelope> for ApiEnvelope {
    fn from(wire: WireEnvelope) -> Self {
        Self {
            payload: wire.data.into(),
            pagination: wire.pagination,
        }
    }
}

impl ApiEnvelope {
    /// The cursor for the next page, if the server issued one.
    pub fn end_cursor(&self) -> Option<&str> {
        self.pagination
            .as_ref()
            .and_then(|p| p.end_cursor.as_deref())
    }

    /// Whether the server reported more pages.
    pub fn has_next_page(&self) -> bool {
        self.pagination
            .as_ref()
            .and_then(|p| p.has_next_page)
            .unwrap_or(false)
    }

    /// Reassemble the envelope as JSON, for operations that surface the raw
    /// response (the stats feed keeps its own cursor in `pagination`).
    pub fn into_value(self) -> JsonValue {
        let mut object = serde_json::Map::new();

        match self.payload {
            Payload::Absent => {}
            Payload::Single(value) => {
                object.insert("data".into(), value);
            }
            Payload::Many(values) => {
                object.insert("data".into(), JsonValue::Array(values));
            }
        }

        if let Some(page) = self.pagination {
            let mut pagination = serde_json::Map::new();
            if let Some(cursor) = page.end_cursor {
                pagination.insert("endCursor".into(), JsonValue::String(cursor));
            }
            if let Some(has_next) = page.has_next_page {
                pagination.insert("hasNextPage".into(), JsonValue::Bool(has_next));
            }
            object.insert("pagination".into(), JsonValue::Object(pagination));
        }

        JsonValue::Object(object)
    }
}
