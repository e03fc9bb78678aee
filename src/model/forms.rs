//! Operator input and the payloads built from it.
//!
//! Validation runs here, before any request is made.

use super::device::DeviceState;
use super::sensor::{Sensor, SensorType, SensorUnit};
use super::unit::Location;
use crate::error::{ConsoleError, Result};
use serde::Serialize;

/// Raw values of the create-greenhouse form.
#[derive(Debug, Clone, Default)]
pub struct UnitForm {
    pub code: String,
    pub name: String,
    pub plant_type: String,
    pub city: String,
    pub lat: String,
    pub lon: String,
}

/// Body of `POST /greenhouses`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUnit {
    pub name: String,
    pub code: String,
    pub plant_type: String,
    pub active: bool,
    pub location: Location,
    pub sensors: Vec<Sensor>,
    pub devices: DeviceState,
}

impl UnitForm {
    /// Validate the form and build the creation payload.
    ///
    /// New units start inactive, with every device off and no sensors.
    pub fn into_payload(self, default_city: &str) -> Result<NewUnit> {
        let code = self.code.trim().to_string();
        if code.is_empty() {
            return Err(ConsoleError::Validation("code is required".into()));
        }

        let plant_type = self.plant_type.trim().to_string();
        if plant_type.is_empty() {
            return Err(ConsoleError::Validation("plant type is required".into()));
        }

        let lat = parse_coordinate("latitude", &self.lat, 90.0)?;
        let lon = parse_coordinate("longitude", &self.lon, 180.0)?;

        let name = match self.name.trim() {
            "" => format!("Greenhouse {}", code),
            name => name.to_string(),
        };
        let city = match self.city.trim() {
            "" => default_city.to_string(),
            city => city.to_string(),
        };

        Ok(NewUnit {
            name,
            code,
            plant_type,
            active: false,
            location: Location {
                city: Some(city),
                lat,
                lon,
            },
            sensors: Vec::new(),
            devices: DeviceState::default(),
        })
    }
}

fn parse_coordinate(field: &str, raw: &str, bound: f64) -> Result<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let value: f64 = raw
        .parse()
        .map_err(|_| ConsoleError::Validation(format!("{} must be a number", field)))?;

    if !value.is_finite() || value < -bound || value > bound {
        return Err(ConsoleError::Validation(format!(
            "{} must be between -{} and {}",
            field, bound, bound
        )));
    }

    Ok(Some(value))
}

/// Raw values of the sensor editor.
#[derive(Debug, Clone)]
pub struct SensorForm {
    pub id: Option<String>,
    pub code: String,
    pub sensor_type: SensorType,
    pub unit: SensorUnit,
    pub value: String,
}

/// Body of `POST /greenhouses/{code}/sensors`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub code: String,
    #[serde(rename = "type")]
    pub sensor_type: SensorType,
    pub unit: SensorUnit,
    pub last_value: Option<f64>,
}

impl SensorForm {
    pub fn into_payload(self) -> Result<SensorPayload> {
        let code = self.code.trim().to_string();
        if code.is_empty() {
            return Err(ConsoleError::Validation("sensor code is required".into()));
        }

        let value = self.value.trim();
        let last_value = if value.is_empty() {
            None
        } else {
            let v: f64 = value
                .parse()
                .map_err(|_| ConsoleError::Validation("sensor value must be a number".into()))?;
            if !v.is_finite() || v <= 0.0 {
                return Err(ConsoleError::Validation(
                    "sensor value must be positive".into(),
                ));
            }
            Some(v)
        };

        Ok(SensorPayload {
            id: self.id.filter(|id| !id.trim().is_empty()),
            code,
            sensor_type: self.sensor_type,
            unit: self.unit,
            last_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> UnitForm {
        UnitForm {
            code: " GH-7 ".into(),
            plant_type: "TOMATO".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_applied() {
        let payload = form().into_payload("Budapest").unwrap();
        assert_eq!(payload.code, "GH-7");
        assert_eq!(payload.name, "Greenhouse GH-7");
        assert_eq!(payload.location.city.as_deref(), Some("Budapest"));
        assert_eq!(payload.location.lat, None);
        assert!(!payload.active);
        assert_eq!(payload.devices, DeviceState::default());
        assert!(payload.sensors.is_empty());
    }

    #[test]
    fn test_missing_code_rejected() {
        let mut f = form();
        f.code = "   ".into();
        assert!(matches!(
            f.into_payload("Budapest"),
            Err(ConsoleError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_plant_type_rejected() {
        let mut f = form();
        f.plant_type.clear();
        assert!(matches!(
            f.into_payload("Budapest"),
            Err(ConsoleError::Validation(_))
        ));
    }

    #[test]
    fn test_coordinate_ranges() {
        let mut f = form();
        f.lat = "90".into();
        f.lon = "-180".into();
        let payload = f.into_payload("Budapest").unwrap();
        assert_eq!(payload.location.lat, Some(90.0));
        assert_eq!(payload.location.lon, Some(-180.0));

        let mut f = form();
        f.lat = "90.5".into();
        assert!(f.into_payload("Budapest").is_err());

        let mut f = form();
        f.lon = "181".into();
        assert!(f.into_payload("Budapest").is_err());

        let mut f = form();
        f.lon = "east".into();
        assert!(f.into_payload("Budapest").is_err());
    }

    #[test]
    fn test_payload_json_shape() {
        let json = serde_json::to_value(form().into_payload("Pécs").unwrap()).unwrap();
        assert_eq!(json["plantType"], "TOMATO");
        assert_eq!(json["location"]["city"], "Pécs");
        assert_eq!(json["devices"]["ventOpen"], false);
        assert_eq!(json["active"], false);
    }

    #[test]
    fn test_sensor_form_validation() {
        let sensor = SensorForm {
            id: Some(String::new()),
            code: "INT_TEMP".into(),
            sensor_type: SensorType::Temperature,
            unit: SensorUnit::Celsius,
            value: "21.5".into(),
        };
        let payload = sensor.clone().into_payload().unwrap();
        assert_eq!(payload.id, None);
        assert_eq!(payload.last_value, Some(21.5));

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "temperature");
        assert_eq!(json["unit"], "CELSIUS");
        assert_eq!(json["lastValue"], 21.5);

        let mut negative = sensor.clone();
        negative.value = "-3".into();
        assert!(negative.into_payload().is_err());

        let mut blank = sensor;
        blank.code = " ".into();
        assert!(blank.into_payload().is_err());
    }
}
