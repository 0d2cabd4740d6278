//! Cursor-following pagination
//!
//! The API paginates with `?limit=&after=` and reports continuation through
//! `pagination.endCursor` / `pagination.hasNextPage` in the response
//! envelope. [`fetch_all`] drives the single-request transport until the
//! server stops reporting more pages or a caller-supplied result cap is
//! reached.

use crate::error::Result;
use crate::transport::ApiClient;
use crate::types::{JsonValue, Method, StringMap};

/// Page size requested when the caller did not set `limit` themselves.
pub const DEFAULT_PAGE_SIZE: usize = 512;

/// Fetch every page of a listing endpoint and concatenate the results.
///
/// `query.limit` is the *page* size (defaulted to [`DEFAULT_PAGE_SIZE`] when
/// unset); `cap` is an optional overall result cap, applied after each page
/// as a hard early exit — the result is truncated to exactly `cap` entries
/// and no further requests are issued, regardless of whether more pages
/// exist. A `cap` of zero means "no cap", matching the source system's
/// falsy-default semantics.
///
/// Continuation requires both `hasNextPage == true` and a non-empty cursor:
/// a server that claims another page but omits the cursor terminates the
/// loop rather than spinning on the same page forever.
pub async fn fetch_all(
    client: &ApiClient,
    method: Method,
    path: &str,
    body: Option<&JsonValue>,
    query: &StringMap,
    cap: Option<usize>,
) -> Result<Vec<JsonValue>> {
    let mut query = query.clone();
    query
        .entry("limit".to_string())
        .or_insert_with(|| DEFAULT_PAGE_SIZE.to_string());

    let cap = cap.filter(|&n| n > 0);
    let mut records: Vec<JsonValue> = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        if let Some(cursor) = &cursor {
            query.insert("after".to_string(), cursor.clone());
        }

        let envelope = client.request(method, path, body, &query).await?;

        let has_next = envelope.has_next_page();
        cursor = envelope.end_cursor().map(ToString::to_string);
        records.extend(envelope.payload.into_records());

        if let Some(cap) = cap {
            if records.len() >= cap {
                records.truncate(cap);
                return Ok(records);
            }
        }

        match &cursor {
            Some(next) if has_next && !next.is_empty() => {}
            _ => break,
        }
    }

    Ok(records)
}
