//! Safety operations
//!
//! Fleet-wide safety views: events, driver scores, harsh driving, and
//! collisions. Every operation is bounded by a required time range.

use super::{list, params_of, Paging};
use crate::error::Result;
use crate::options::SafetyEventType;
use crate::query::{build_query_string, format_time_range};
use crate::transport::{ApiClient, Payload};
use crate::types::JsonObject;
use serde::{Deserialize, Serialize};

/// Safety operations
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum SafetyOperation {
    /// Safety events
    #[serde(rename_all = "camelCase")]
    GetEvents {
        start_time: String,
        end_time: String,
        #[serde(flatten)]
        paging: Paging,
        #[serde(default)]
        options: EventFilters,
    },
    /// Driver safety scores
    #[serde(rename_all = "camelCase")]
    GetScores {
        start_time: String,
        end_time: String,
        #[serde(flatten)]
        paging: Paging,
        #[serde(default)]
        options: ScoreFilters,
    },
    /// Harsh driving events
    #[serde(rename_all = "camelCase")]
    GetHarshDriving {
        start_time: String,
        end_time: String,
        #[serde(flatten)]
        paging: Paging,
        #[serde(default)]
        options: EventFilters,
    },
    /// Collisions
    #[serde(rename_all = "camelCase")]
    GetCollisions {
        start_time: String,
        end_time: String,
        #[serde(flatten)]
        paging: Paging,
        #[serde(default)]
        options: CollisionFilters,
    },
}

/// Filters for event listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventFilters {
    pub vehicle_ids: Option<String>,
    pub tag_ids: Option<String>,
    pub event_types: Vec<SafetyEventType>,
}

/// Filters for score listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreFilters {
    pub driver_ids: Option<String>,
    pub tag_ids: Option<String>,
}

/// Filters for collision listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollisionFilters {
    pub vehicle_ids: Option<String>,
    pub tag_ids: Option<String>,
}

/// Execute a safety operation.
pub async fn execute(client: &ApiClient, op: SafetyOperation) -> Result<Payload> {
    match op {
        SafetyOperation::GetEvents {
            start_time,
            end_time,
            paging,
            options,
        } => {
            let params = bounded_params(&start_time, &end_time, params_of(&options))?;
            list(client, "/fleet/safety/events", &build_query_string(&params), &paging).await
        }

        SafetyOperation::GetScores {
            start_time,
            end_time,
            paging,
            options,
        } => {
            let params = bounded_params(&start_time, &end_time, params_of(&options))?;
            list(
                client,
                "/fleet/drivers/safety-scores",
                &build_query_string(&params),
                &paging,
            )
            .await
        }

        SafetyOperation::GetHarshDriving {
            start_time,
            end_time,
            paging,
            options,
        } => {
            let params = bounded_params(&start_time, &end_time, params_of(&options))?;
            list(
                client,
                "/fleet/vehicles/harsh-events",
                &build_query_string(&params),
                &paging,
            )
            .await
        }

        SafetyOperation::GetCollisions {
            start_time,
            end_time,
            paging,
            options,
        } => {
            let params = bounded_params(&start_time, &end_time, params_of(&options))?;
            list(
                client,
                "/fleet/safety/collisions",
                &build_query_string(&params),
                &paging,
            )
            .await
        }
    }
}

fn bounded_params(
    start_time: &str,
    end_time: &str,
    mut params: JsonObject,
) -> Result<JsonObject> {
    let range = format_time_range(Some(start_time), Some(end_time))?;
    range.extend(&mut params);
    Ok(params)
}
