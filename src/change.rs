//! Change detection between two snapshots of the same unit.
//!
//! Only the fields in [`WatchedField`] are compared. Everything else (sensor
//! readings, shade/light/humidifier toggles, names) may change freely without
//! producing a notification.

use crate::model::Unit;
use std::fmt;
use strum::{Display, EnumIter, IntoEnumIterator};

/// The watch-list, in summary order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum WatchedField {
    IrrigationMode,
    IrrigationActive,
    VentilationActive,
    WeatherCondition,
    SoilMoisture,
    AirHumidity,
    AirTemperature,
}

/// Scalar value of a watched field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Absent,
    Flag(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Absent => f.write_str("-"),
            FieldValue::Flag(v) => write!(f, "{}", v),
            FieldValue::Number(v) => write!(f, "{}", v),
            FieldValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<Option<bool>> for FieldValue {
    fn from(value: Option<bool>) -> Self {
        value.map_or(FieldValue::Absent, FieldValue::Flag)
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(FieldValue::Absent, FieldValue::Number)
    }
}

impl From<Option<&String>> for FieldValue {
    fn from(value: Option<&String>) -> Self {
        value.map_or(FieldValue::Absent, |v| FieldValue::Text(v.clone()))
    }
}

impl WatchedField {
    pub fn read(self, unit: &Unit) -> FieldValue {
        match self {
            WatchedField::IrrigationMode => unit.irrigation_mode.as_ref().into(),
            WatchedField::IrrigationActive => unit.irrigation_active.into(),
            WatchedField::VentilationActive => unit.ventilation_active.into(),
            WatchedField::WeatherCondition => unit.weather_condition.as_ref().into(),
            WatchedField::SoilMoisture => unit.soil_moisture.into(),
            WatchedField::AirHumidity => unit.air_humidity.into(),
            WatchedField::AirTemperature => unit.air_temperature.into(),
        }
    }
}

/// One differing watched field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub field: WatchedField,
    pub old: FieldValue,
    pub new: FieldValue,
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} → {}", self.field, self.old, self.new)
    }
}

/// Outcome of comparing two snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeReport {
    changes: Vec<FieldChange>,
}

impl ChangeReport {
    pub fn is_meaningful(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn changes(&self) -> &[FieldChange] {
        &self.changes
    }

    /// `field: old → new` for every differing field, joined by `, `.
    /// `None` when nothing meaningful changed.
    pub fn summary(&self) -> Option<String> {
        if !self.is_meaningful() {
            return None;
        }
        Some(
            self.changes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

/// Compare `new` against the previously stored snapshot.
///
/// A unit seen for the first time (`old` is `None`) never counts as changed.
pub fn compare(old: Option<&Unit>, new: &Unit) -> ChangeReport {
    let Some(old) = old else {
        return ChangeReport::default();
    };

    let changes = WatchedField::iter()
        .filter_map(|field| {
            let before = field.read(old);
            let after = field.read(new);
            (before != after).then_some(FieldChange {
                field,
                old: before,
                new: after,
            })
        })
        .collect();

    ChangeReport { changes }
}
