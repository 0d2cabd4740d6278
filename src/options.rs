//! Typed option catalogs
//!
//! The enumerated values the API accepts for stat types, safety event
//! types, sensor data series, webhook event types, and stats decorations.
//! Serde representations match the wire values exactly.

use serde::{Deserialize, Serialize};

/// Join a slice of catalog values into the API's comma-separated form.
pub fn join_csv<T: AsRef<str>>(values: &[T]) -> String {
    values
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",")
}

// ============================================================================
// Vehicle stat types
// ============================================================================

/// Vehicle telematics stat types (`types` parameter of the stats endpoints)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatType {
    Gps,
    EngineStates,
    FuelPercent,
    ObdOdometerMeters,
    ObdEngineSeconds,
    GpsOdometerMeters,
    GpsDistanceMeters,
    BatteryMilliVolts,
    BarometricPressurePa,
    AmbientAirTemperatureMilliC,
    EngineCoolantTemperatureMilliC,
    EngineOilPressureKPa,
    EngineRpm,
    EngineLoadPercent,
    IntakeManifoldTemperatureMilliC,
    DefLevelMilliPercent,
    EvStateOfChargeMilliPercent,
    EvChargingStatus,
}

impl AsRef<str> for StatType {
    fn as_ref(&self) -> &str {
        match self {
            Self::Gps => "gps",
            Self::EngineStates => "engineStates",
            Self::FuelPercent => "fuelPercent",
            Self::ObdOdometerMeters => "obdOdometerMeters",
            Self::ObdEngineSeconds => "obdEngineSeconds",
            Self::GpsOdometerMeters => "gpsOdometerMeters",
            Self::GpsDistanceMeters => "gpsDistanceMeters",
            Self::BatteryMilliVolts => "batteryMilliVolts",
            Self::BarometricPressurePa => "barometricPressurePa",
            Self::AmbientAirTemperatureMilliC => "ambientAirTemperatureMilliC",
            Self::EngineCoolantTemperatureMilliC => "engineCoolantTemperatureMilliC",
            Self::EngineOilPressureKPa => "engineOilPressureKPa",
            Self::EngineRpm => "engineRpm",
            Self::EngineLoadPercent => "engineLoadPercent",
            Self::IntakeManifoldTemperatureMilliC => "intakeManifoldTemperatureMilliC",
            Self::DefLevelMilliPercent => "defLevelMilliPercent",
            Self::EvStateOfChargeMilliPercent => "evStateOfChargeMilliPercent",
            Self::EvChargingStatus => "evChargingStatus",
        }
    }
}

// ============================================================================
// Safety event types
// ============================================================================

/// Safety event type filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SafetyEventType {
    HarshAcceleration,
    HarshBrake,
    HarshTurn,
    Speeding,
    Crash,
    LaneDeparture,
    FollowingDistance,
    ForwardCollision,
    Drowsiness,
    Distraction,
    PhoneUsage,
    Seatbelt,
    CameraObstruction,
    Smoking,
}

impl AsRef<str> for SafetyEventType {
    fn as_ref(&self) -> &str {
        match self {
            Self::HarshAcceleration => "harshAcceleration",
            Self::HarshBrake => "harshBrake",
            Self::HarshTurn => "harshTurn",
            Self::Speeding => "speeding",
            Self::Crash => "crash",
            Self::LaneDeparture => "laneDeparture",
            Self::FollowingDistance => "followingDistance",
            Self::ForwardCollision => "forwardCollision",
            Self::Drowsiness => "drowsiness",
            Self::Distraction => "distraction",
            Self::PhoneUsage => "phoneUsage",
            Self::Seatbelt => "seatbelt",
            Self::CameraObstruction => "cameraObstruction",
            Self::Smoking => "smoking",
        }
    }
}

// ============================================================================
// Sensor data series
// ============================================================================

/// Environmental sensor data series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SensorSeries {
    Temperature,
    Humidity,
    DoorOpen,
    CargoEmpty,
    LightLevel,
    Pm25,
    Pm10,
    Noise,
}

impl AsRef<str> for SensorSeries {
    fn as_ref(&self) -> &str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::DoorOpen => "doorOpen",
            Self::CargoEmpty => "cargoEmpty",
            Self::LightLevel => "lightLevel",
            Self::Pm25 => "pm25",
            Self::Pm10 => "pm10",
            Self::Noise => "noise",
        }
    }
}

// ============================================================================
// Webhook event types
// ============================================================================

/// Webhook subscription event types (wire values are PascalCase)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebhookEventType {
    AddressCreated,
    AddressDeleted,
    AddressUpdated,
    AlertTriggered,
    DocumentSubmitted,
    DriverCreated,
    DriverUpdated,
    DvirSubmitted,
    GeofenceEntry,
    GeofenceExit,
    HosViolation,
    RouteCompleted,
    RouteStarted,
    RouteStopArrival,
    RouteStopDeparture,
    SafetyEvent,
    VehicleCreated,
    VehicleLocationUpdated,
    VehicleUpdated,
}

impl AsRef<str> for WebhookEventType {
    fn as_ref(&self) -> &str {
        match self {
            Self::AddressCreated => "AddressCreated",
            Self::AddressDeleted => "AddressDeleted",
            Self::AddressUpdated => "AddressUpdated",
            Self::AlertTriggered => "AlertTriggered",
            Self::DocumentSubmitted => "DocumentSubmitted",
            Self::DriverCreated => "DriverCreated",
            Self::DriverUpdated => "DriverUpdated",
            Self::DvirSubmitted => "DvirSubmitted",
            Self::GeofenceEntry => "GeofenceEntry",
            Self::GeofenceExit => "GeofenceExit",
            Self::HosViolation => "HosViolation",
            Self::RouteCompleted => "RouteCompleted",
            Self::RouteStarted => "RouteStarted",
            Self::RouteStopArrival => "RouteStopArrival",
            Self::RouteStopDeparture => "RouteStopDeparture",
            Self::SafetyEvent => "SafetyEvent",
            Self::VehicleCreated => "VehicleCreated",
            Self::VehicleLocationUpdated => "VehicleLocationUpdated",
            Self::VehicleUpdated => "VehicleUpdated",
        }
    }
}

// ============================================================================
// Stats decorations
// ============================================================================

/// Additional context attachable to vehicle stats responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Decoration {
    Driver,
    Tags,
    VehicleInfo,
}

impl AsRef<str> for Decoration {
    fn as_ref(&self) -> &str {
        match self {
            Self::Driver => "driver",
            Self::Tags => "tags",
            Self::VehicleInfo => "vehicleInfo",
        }
    }
}

// ============================================================================
// Tag entity kinds
// ============================================================================

/// Entity collections a tag can be assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Addresses,
    Assets,
    Drivers,
    Vehicles,
}

impl AsRef<str> for EntityKind {
    fn as_ref(&self) -> &str {
        match self {
            Self::Addresses => "addresses",
            Self::Assets => "assets",
            Self::Drivers => "drivers",
            Self::Vehicles => "vehicles",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_matches_as_ref() {
        // The serde rename and the joined wire value must agree.
        for stat in [
            StatType::Gps,
            StatType::ObdOdometerMeters,
            StatType::EngineOilPressureKPa,
            StatType::EvChargingStatus,
        ] {
            let encoded = serde_json::to_value(stat).unwrap();
            assert_eq!(encoded.as_str().unwrap(), stat.as_ref());
        }

        let series: SensorSeries = serde_json::from_str("\"pm25\"").unwrap();
        assert_eq!(series, SensorSeries::Pm25);

        let event: WebhookEventType = serde_json::from_str("\"GeofenceEntry\"").unwrap();
        assert_eq!(event.as_ref(), "GeofenceEntry");
    }

    #[test]
    fn test_join_csv() {
        assert_eq!(
            join_csv(&[StatType::Gps, StatType::FuelPercent]),
            "gps,fuelPercent"
        );
        assert_eq!(join_csv::<StatType>(&[]), "");
    }
}
