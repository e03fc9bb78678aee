use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::EnumString;

/// A sensor slot attached to exactly one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    /// Assigned by the backend.
    #[serde(default)]
    pub id: Option<String>,
    /// Logical slot, e.g. `INT_TEMP`.
    pub code: String,
    #[serde(rename = "type", default)]
    pub sensor_type: Option<SensorType>,
    #[serde(default)]
    pub unit: Option<SensorUnit>,
    #[serde(default)]
    pub last_value: Option<f64>,
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SensorType {
    Temperature,
    WindSpeed,
    PrecipitationMm,
    HumidityPct,
    SoilMoisturePct,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
    Percent,
    MeterPerSecond,
    KilometerPerHour,
    Millimeter,
    #[serde(other)]
    Unknown,
}

impl SensorUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            SensorUnit::Celsius => "°C",
            SensorUnit::Fahrenheit => "°F",
            SensorUnit::Kelvin => "K",
            SensorUnit::Percent => "%",
            SensorUnit::MeterPerSecond => "m/s",
            SensorUnit::KilometerPerHour => "km/h",
            SensorUnit::Millimeter => "mm",
            SensorUnit::Unknown => "",
        }
    }
}
