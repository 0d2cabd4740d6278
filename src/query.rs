//! Query-string and time-range normalization
//!
//! The Samsara API takes flat query strings: list filters are comma-joined,
//! one level of option nesting becomes `outer[inner]` keys, and timestamps
//! are ISO-8601 UTC. Callers hand this module the loosely-shaped filter
//! objects collected from operation parameters and get back a flat
//! string-to-string mapping ready for the transport.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue, StringMap};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Flatten a JSON object into query parameters.
///
/// Purely mechanical — parameter names are not validated:
/// - null and empty-string values are dropped
/// - arrays are comma-joined in order; empty arrays are dropped
/// - nested objects are flattened one level to `key[nestedKey]` entries,
///   each independently filtered
/// - remaining scalars pass through stringified
pub fn build_query_string(params: &JsonObject) -> StringMap {
    let mut query = StringMap::new();

    for (key, value) in params {
        match value {
            JsonValue::Array(items) => {
                if let Some(joined) = join_scalars(items) {
                    query.insert(key.clone(), joined);
                }
            }
            JsonValue::Object(nested) => {
                for (nested_key, nested_value) in nested {
                    if let Some(rendered) = render_value(nested_value) {
                        query.insert(format!("{key}[{nested_key}]"), rendered);
                    }
                }
            }
            other => {
                if let Some(rendered) = render_scalar(other) {
                    query.insert(key.clone(), rendered);
                }
            }
        }
    }

    query
}

/// Render a scalar value, dropping null and empty strings.
fn render_scalar(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Render a scalar or an array (comma-joined); used inside nested objects.
fn render_value(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Array(items) => join_scalars(items),
        other => render_scalar(other),
    }
}

/// Comma-join the renderable scalars of a list; `None` when nothing remains.
fn join_scalars(items: &[JsonValue]) -> Option<String> {
    let parts: Vec<String> = items.iter().filter_map(render_scalar).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(","))
    }
}

// ============================================================================
// Time ranges
// ============================================================================

/// A normalized (startTime, endTime) pair, each optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl TimeRange {
    /// Insert the present bounds into a parameter object under the API's
    /// `startTime`/`endTime` keys. Absent bounds stay absent.
    pub fn extend(&self, params: &mut JsonObject) {
        if let Some(start) = &self.start_time {
            params.insert("startTime".into(), JsonValue::String(start.clone()));
        }
        if let Some(end) = &self.end_time {
            params.insert("endTime".into(), JsonValue::String(end.clone()));
        }
    }

    /// The range as a standalone parameter object.
    pub fn into_object(self) -> JsonObject {
        let mut params = JsonObject::new();
        self.extend(&mut params);
        params
    }
}

/// Normalize an optional time range into ISO-8601 UTC strings.
///
/// Absent inputs yield absent output fields — there is no zero-value
/// defaulting. Unparseable inputs are a fatal error for the item.
pub fn format_time_range(start: Option<&str>, end: Option<&str>) -> Result<TimeRange> {
    Ok(TimeRange {
        start_time: start.map(format_timestamp).transpose()?,
        end_time: end.map(format_timestamp).transpose()?,
    })
}

/// Parse any supported date representation and render it as ISO-8601 UTC
/// with millisecond precision (`2024-01-15T06:30:00.000Z`).
pub fn format_timestamp(value: &str) -> Result<String> {
    Ok(parse_datetime(value)?.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Accepted inputs: RFC 3339, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS`,
/// and bare `YYYY-MM-DD` (UTC midnight).
fn parse_datetime(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(Error::invalid_timestamp(value))
}

// ============================================================================
// ID lists
// ============================================================================

/// Split a comma-separated ID list, trimming whitespace and dropping empty
/// segments.
pub fn parse_id_list(ids: &str) -> Vec<String> {
    ids.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    fn object(value: JsonValue) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_build_query_string_passes_scalars() {
        let query = build_query_string(&object(json!({
            "tagIds": "1,2,3",
            "limit": 50,
            "includeExternal": true,
        })));

        assert_eq!(query.get("tagIds"), Some(&"1,2,3".to_string()));
        assert_eq!(query.get("limit"), Some(&"50".to_string()));
        assert_eq!(query.get("includeExternal"), Some(&"true".to_string()));
    }

    #[test_case(json!({"a": null}); "null value")]
    #[test_case(json!({"a": ""}); "empty string")]
    #[test_case(json!({"a": []}); "empty array")]
    fn test_build_query_string_drops(params: JsonValue) {
        assert!(build_query_string(&object(params)).is_empty());
    }

    #[test]
    fn test_build_query_string_joins_arrays_in_order() {
        let query = build_query_string(&object(json!({
            "types": ["gps", "engineStates", "fuelPercent"],
        })));

        assert_eq!(
            query.get("types"),
            Some(&"gps,engineStates,fuelPercent".to_string())
        );
    }

    #[test]
    fn test_build_query_string_flattens_nested_objects() {
        let query = build_query_string(&object(json!({
            "address": {"city": "Oakland", "state": "CA", "zip": null, "note": ""},
        })));

        assert_eq!(query.get("address[city]"), Some(&"Oakland".to_string()));
        assert_eq!(query.get("address[state]"), Some(&"CA".to_string()));
        assert!(!query.contains_key("address[zip]"));
        assert!(!query.contains_key("address[note]"));
    }

    #[test]
    fn test_build_query_string_nested_array() {
        let query = build_query_string(&object(json!({
            "filter": {"ids": ["a", "b"]},
        })));

        assert_eq!(query.get("filter[ids]"), Some(&"a,b".to_string()));
    }

    #[test]
    fn test_format_time_range_both_absent() {
        let range = format_time_range(None, None).unwrap();
        assert_eq!(range, TimeRange::default());
        assert!(range.into_object().is_empty());
    }

    #[test]
    fn test_format_time_range_start_only() {
        let range = format_time_range(Some("2024-01-15T00:00:00Z"), None).unwrap();
        assert_eq!(
            range.start_time,
            Some("2024-01-15T00:00:00.000Z".to_string())
        );
        assert_eq!(range.end_time, None);

        let params = range.into_object();
        assert!(params.contains_key("startTime"));
        assert!(!params.contains_key("endTime"));
    }

    #[test_case("2024-01-15T06:30:00Z", "2024-01-15T06:30:00.000Z"; "rfc3339 utc")]
    #[test_case("2024-01-15T06:30:00+02:00", "2024-01-15T04:30:00.000Z"; "rfc3339 offset")]
    #[test_case("2024-01-15 06:30:00", "2024-01-15T06:30:00.000Z"; "space separated")]
    #[test_case("2024-01-15", "2024-01-15T00:00:00.000Z"; "bare date")]
    fn test_format_timestamp(input: &str, expected: &str) {
        assert_eq!(format_timestamp(input).unwrap(), expected);
    }

    #[test]
    fn test_format_timestamp_rejects_garbage() {
        let err = format_timestamp("not a date").unwrap_err();
        assert!(matches!(err, Error::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("1, 2 ,3"), vec!["1", "2", "3"]);
        assert_eq!(parse_id_list("solo"), vec!["solo"]);
        assert!(parse_id_list("").is_empty());
        assert_eq!(parse_id_list("a,,b"), vec!["a", "b"]);
    }
}
