//! Payload shaping helpers
//!
//! Builders for the nested request-body fragments the API expects:
//! address geofences and route stops.

use crate::error::Result;
use crate::query::format_timestamp;
use crate::types::{JsonObject, JsonValue};
use serde::Deserialize;
use serde_json::json;

// ============================================================================
// Geofences
// ============================================================================

/// Geofence shape selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeofenceShape {
    #[default]
    Circle,
    Polygon,
}

/// Geofence parameters as supplied by the caller
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeofenceConfig {
    #[serde(rename = "type", default)]
    pub shape: GeofenceShape,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_meters: Option<u32>,
    #[serde(default)]
    pub vertices: Vec<JsonValue>,
}

/// Default radius for circular geofences when the caller omits one.
const DEFAULT_RADIUS_METERS: u32 = 100;

/// Build the API's geofence body fragment.
///
/// Circles default to a 100 meter radius; polygons keep the caller's vertex
/// list in order.
pub fn format_geofence(config: &GeofenceConfig) -> JsonValue {
    match config.shape {
        GeofenceShape::Circle => json!({
            "type": "circle",
            "circle": {
                "latitude": config.latitude,
                "longitude": config.longitude,
                "radiusMeters": config.radius_meters.unwrap_or(DEFAULT_RADIUS_METERS),
            },
        }),
        GeofenceShape::Polygon => json!({
            "type": "polygon",
            "polygon": {
                "vertices": config.vertices,
            },
        }),
    }
}

// ============================================================================
// Route stops
// ============================================================================

/// One stop on a route, as supplied by the caller
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStop {
    pub name: String,
    pub address_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub scheduled_arrival_time: Option<String>,
    pub scheduled_departure_time: Option<String>,
    pub notes: Option<String>,
}

/// Build the API's route-stop body fragment.
///
/// An address ID wins over raw coordinates; scheduled times are normalized
/// to ISO-8601 UTC.
pub fn format_stop(stop: &RouteStop) -> Result<JsonValue> {
    let mut formatted = JsonObject::new();
    formatted.insert("name".into(), JsonValue::String(stop.name.clone()));

    if let Some(address_id) = &stop.address_id {
        formatted.insert("addressId".into(), JsonValue::String(address_id.clone()));
    } else if let (Some(latitude), Some(longitude)) = (stop.latitude, stop.longitude) {
        formatted.insert("latitude".into(), json!(latitude));
        formatted.insert("longitude".into(), json!(longitude));
    }

    if let Some(arrival) = &stop.scheduled_arrival_time {
        formatted.insert(
            "scheduledArrivalTime".into(),
            JsonValue::String(format_timestamp(arrival)?),
        );
    }

    if let Some(departure) = &stop.scheduled_departure_time {
        formatted.insert(
            "scheduledDepartureTime".into(),
            JsonValue::String(format_timestamp(departure)?),
        );
    }

    if let Some(notes) = &stop.notes {
        formatted.insert("notes".into(), JsonValue::String(notes.clone()));
    }

    Ok(JsonValue::Object(formatted))
}
