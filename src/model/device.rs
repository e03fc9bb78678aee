//! Actuators on a greenhouse unit and the backend action identifiers that
//! switch them.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// One of the five switchable actuators of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum DeviceKind {
    Irrigation,
    Ventilation,
    Shade,
    Light,
    Humidifier,
}

impl DeviceKind {
    /// Backend action that drives this device to `on`.
    pub fn action(self, on: bool) -> DeviceAction {
        match (self, on) {
            (DeviceKind::Irrigation, true) => DeviceAction::IrrigationOn,
            (DeviceKind::Irrigation, false) => DeviceAction::IrrigationOff,
            (DeviceKind::Ventilation, true) => DeviceAction::VentOpen,
            (DeviceKind::Ventilation, false) => DeviceAction::VentClose,
            (DeviceKind::Shade, true) => DeviceAction::ShadeOn,
            (DeviceKind::Shade, false) => DeviceAction::ShadeOff,
            (DeviceKind::Light, true) => DeviceAction::LightOn,
            (DeviceKind::Light, false) => DeviceAction::LightOff,
            (DeviceKind::Humidifier, true) => DeviceAction::HumidifierOn,
            (DeviceKind::Humidifier, false) => DeviceAction::HumidifierOff,
        }
    }
}

/// Action identifier accepted by `POST /greenhouses/{code}/devices/{ACTION}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceAction {
    IrrigationOn,
    IrrigationOff,
    VentOpen,
    VentClose,
    ShadeOn,
    ShadeOff,
    LightOn,
    LightOff,
    HumidifierOn,
    HumidifierOff,
}

impl DeviceAction {
    pub fn kind(self) -> DeviceKind {
        match self {
            DeviceAction::IrrigationOn | DeviceAction::IrrigationOff => DeviceKind::Irrigation,
            DeviceAction::VentOpen | DeviceAction::VentClose => DeviceKind::Ventilation,
            DeviceAction::ShadeOn | DeviceAction::ShadeOff => DeviceKind::Shade,
            DeviceAction::LightOn | DeviceAction::LightOff => DeviceKind::Light,
            DeviceAction::HumidifierOn | DeviceAction::HumidifierOff => DeviceKind::Humidifier,
        }
    }

    pub fn turns_on(self) -> bool {
        matches!(
            self,
            DeviceAction::IrrigationOn
                | DeviceAction::VentOpen
                | DeviceAction::ShadeOn
                | DeviceAction::LightOn
                | DeviceAction::HumidifierOn
        )
    }
}

/// Persisted actuator state of a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceState {
    pub irrigation_on: bool,
    pub vent_open: bool,
    pub shade_on: bool,
    pub light_on: bool,
    pub humidifier_on: bool,
}

impl DeviceState {
    pub fn get(&self, kind: DeviceKind) -> bool {
        match kind {
            DeviceKind::Irrigation => self.irrigation_on,
            DeviceKind::Ventilation => self.vent_open,
            DeviceKind::Shade => self.shade_on,
            DeviceKind::Light => self.light_on,
            DeviceKind::Humidifier => self.humidifier_on,
        }
    }

    pub fn set(&mut self, kind: DeviceKind, on: bool) {
        match kind {
            DeviceKind::Irrigation => self.irrigation_on = on,
            DeviceKind::Ventilation => self.vent_open = on,
            DeviceKind::Shade => self.shade_on = on,
            DeviceKind::Light => self.light_on = on,
            DeviceKind::Humidifier => self.humidifier_on = on,
        }
    }
}
