//! Sensor operations
//!
//! Environmental sensors and gateways from the industrial API.

use super::{list, params_of, query_of, Paging};
use crate::error::Result;
use crate::options::{join_csv, SensorSeries};
use crate::query::{build_query_string, format_time_range};
use crate::transport::{ApiClient, Payload};
use crate::types::StringMap;
use serde::{Deserialize, Serialize};

/// Sensor operations
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum SensorOperation {
    /// List sensors
    GetAll {
        #[serde(flatten)]
        paging: Paging,
        #[serde(default)]
        filters: SensorFilters,
    },
    /// Latest data points for a set of sensors
    #[serde(rename_all = "camelCase")]
    GetData {
        /// Comma-separated sensor IDs
        sensor_ids: String,
        series: Vec<SensorSeries>,
    },
    /// Historical series over a time range
    #[serde(rename_all = "camelCase")]
    GetHistory {
        sensor_ids: String,
        series: Vec<SensorSeries>,
        start_time: String,
        end_time: String,
    },
    /// List gateways
    GetGateways {
        #[serde(flatten)]
        paging: Paging,
    },
}

/// Listing filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SensorFilters {
    pub tag_ids: Option<String>,
}

/// Execute a sensor operation.
pub async fn execute(client: &ApiClient, op: SensorOperation) -> Result<Payload> {
    match op {
        SensorOperation::GetAll { paging, filters } => {
            list(client, "/industrial/sensors", &query_of(&filters), &paging).await
        }

        SensorOperation::GetData { sensor_ids, series } => {
            let query = build_query_string(&params_of(&serde_json::json!({
                "sensorIds": sensor_ids,
                "series": join_csv(&series),
            })));
            Ok(client.get("/industrial/sensors/data", &query).await?.payload)
        }

        SensorOperation::GetHistory {
            sensor_ids,
            series,
            start_time,
            end_time,
        } => {
            let range = format_time_range(Some(&start_time), Some(&end_time))?;
            let mut params = params_of(&serde_json::json!({
                "sensorIds": sensor_ids,
                "series": join_csv(&series),
            }));
            range.extend(&mut params);

            Ok(client
                .get("/industrial/sensors/history", &build_query_string(&params))
                .await?
                .payload)
        }

        SensorOperation::GetGateways { paging } => {
            list(client, "/industrial/gateways", &StringMap::new(), &paging).await
        }
    }
}
