use super::device::DeviceState;
use super::sensor::Sensor;
use serde::{Deserialize, Serialize};

/// A greenhouse unit as returned by the backend.
///
/// The list endpoint and the detail endpoint return different subsets of
/// these fields, so everything the backend may omit is optional. A `Unit` is
/// always stored and compared whole; see [`crate::store::SnapshotStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub plant_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant_name: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub devices: DeviceState,
    #[serde(default)]
    pub sensors: Vec<Sensor>,

    // Summary fields reported by the list endpoint.
    #[serde(default)]
    pub irrigation_mode: Option<String>,
    #[serde(default)]
    pub irrigation_active: Option<bool>,
    #[serde(default)]
    pub ventilation_active: Option<bool>,
    #[serde(default)]
    pub weather_condition: Option<String>,
    #[serde(default)]
    pub soil_moisture: Option<f64>,
    #[serde(default)]
    pub air_humidity: Option<f64>,
    #[serde(default)]
    pub air_temperature: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub city: Option<String>,
    /// Latitude in [-90, 90].
    #[serde(default, alias = "latitude")]
    pub lat: Option<f64>,
    /// Longitude in [-180, 180].
    #[serde(default, alias = "longitude")]
    pub lon: Option<f64>,
}
