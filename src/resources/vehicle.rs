//! Vehicle operations
//!
//! Telematics listings, current and historical stats, locations, and the
//! safety event views scoped to vehicles.

use super::{list, params_of, query_of, Paging};
use crate::error::Result;
use crate::options::{join_csv, Decoration, SafetyEventType, StatType};
use crate::query::{build_query_string, format_time_range};
use crate::transport::{ApiClient, Payload};
use crate::types::{JsonValue, StringMap};
use serde::{Deserialize, Serialize};

/// Vehicle operations
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum VehicleOperation {
    /// Get a vehicle by ID
    #[serde(rename_all = "camelCase")]
    Get { vehicle_id: String },
    /// List vehicles
    GetAll {
        #[serde(flatten)]
        paging: Paging,
        #[serde(default)]
        filters: VehicleFilters,
    },
    /// Current stats snapshot
    GetStats {
        types: Vec<StatType>,
        #[serde(default)]
        options: StatsOptions,
    },
    /// Continuous stats feed; surfaces the raw envelope so the caller can
    /// hold on to the feed cursor
    GetStatsFeed {
        types: Vec<StatType>,
        #[serde(default)]
        options: StatsOptions,
    },
    /// Historical stats over a time range
    #[serde(rename_all = "camelCase")]
    GetStatsHistory {
        types: Vec<StatType>,
        start_time: String,
        end_time: String,
        #[serde(default)]
        options: VehicleFilters,
    },
    /// Current vehicle locations
    GetLocations {
        #[serde(flatten)]
        paging: Paging,
        #[serde(default)]
        filters: VehicleFilters,
    },
    /// Harsh driving events over a time range
    #[serde(rename_all = "camelCase")]
    GetHarshEvents {
        start_time: String,
        end_time: String,
        #[serde(default)]
        options: SafetyEventFilters,
    },
    /// Safety events over a time range
    #[serde(rename_all = "camelCase")]
    GetSafetyEvents {
        start_time: String,
        end_time: String,
        #[serde(default)]
        options: SafetyEventFilters,
    },
}

/// Tag/vehicle ID filters (comma-separated lists)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleFilters {
    pub tag_ids: Option<String>,
    pub vehicle_ids: Option<String>,
}

/// Options for the stats snapshot and feed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsOptions {
    pub vehicle_ids: Option<String>,
    pub tag_ids: Option<String>,
    /// Pagination cursor from a previous feed response
    pub after: Option<String>,
    pub decorations: Vec<Decoration>,
}

/// Filters for the safety event views
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SafetyEventFilters {
    pub vehicle_ids: Option<String>,
    pub tag_ids: Option<String>,
    pub event_types: Vec<SafetyEventType>,
}

fn stats_query(types: &[StatType], options: &StatsOptions) -> StringMap {
    let mut params = params_of(options);
    params.insert("types".into(), JsonValue::String(join_csv(types)));
    build_query_string(&params)
}

/// Execute a vehicle operation.
pub async fn execute(client: &ApiClient, op: VehicleOperation) -> Result<Payload> {
    match op {
        VehicleOperation::Get { vehicle_id } => Ok(client
            .get(&format!("/fleet/vehicles/{vehicle_id}"), &StringMap::new())
            .await?
            .payload),

        VehicleOperation::GetAll { paging, filters } => {
            list(client, "/fleet/vehicles", &query_of(&filters), &paging).await
        }

        VehicleOperation::GetStats { types, options } => Ok(client
            .get("/fleet/vehicles/stats", &stats_query(&types, &options))
            .await?
            .payload),

        VehicleOperation::GetStatsFeed { types, options } => {
            let envelope = client
                .get("/fleet/vehicles/stats/feed", &stats_query(&types, &options))
                .await?;
            Ok(Payload::Single(envelope.into_value()))
        }

        VehicleOperation::GetStatsHistory {
            types,
            start_time,
            end_time,
            options,
        } => {
            let range = format_time_range(Some(&start_time), Some(&end_time))?;
            let mut params = params_of(&options);
            params.insert("types".into(), JsonValue::String(join_csv(&types)));
            range.extend(&mut params);

            Ok(client
                .get("/fleet/vehicles/stats/history", &build_query_string(&params))
                .await?
                .payload)
        }

        VehicleOperation::GetLocations { paging, filters } => {
            list(
                client,
                "/fleet/vehicles/locations",
                &query_of(&filters),
                &paging,
            )
            .await
        }

        VehicleOperation::GetHarshEvents {
            start_time,
            end_time,
            options,
        } => {
            time_bounded(client, "/fleet/vehicles/harsh-events", &start_time, &end_time, &options)
                .await
        }

        VehicleOperation::GetSafetyEvents {
            start_time,
            end_time,
            options,
        } => time_bounded(client, "/fleet/safety/events", &start_time, &end_time, &options).await,
    }
}

async fn time_bounded(
    client: &ApiClient,
    path: &str,
    start_time: &str,
    end_time: &str,
    options: &SafetyEventFilters,
) -> Result<Payload> {
    let range = format_time_range(Some(start_time), Some(end_time))?;
    let mut params = params_of(options);
    range.extend(&mut params);

    Ok(client.get(path, &build_query_string(&params)).await?.payload)
}
