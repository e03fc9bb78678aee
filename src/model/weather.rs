use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// External weather reading for a unit's location.
///
/// Attached transiently to a rendered detail view and never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weather {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub precipitation_mm: Option<f64>,
    #[serde(default)]
    pub soil_moisture_ext_pct: Option<f64>,
}
