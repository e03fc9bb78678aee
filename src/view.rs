//! Rendering collaborator.
//!
//! The console core never draws anything itself. It hands finished values to a
//! [`View`]: the unit list, the detail panel, notifications and toggle
//! positions, and asks it for operator confirmation. [`LogView`] is the
//! headless renderer used by the command-line binary.

use crate::model::{DeviceKind, DeviceState, Unit, Weather};
use log::{error, info, warn};
use strum::IntoEnumIterator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// Transient operator message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub body: Option<String>,
}

impl Notification {
    pub fn info(title: impl Into<String>, body: Option<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            title: title.into(),
            body,
        }
    }

    pub fn warning(title: impl Into<String>, body: Option<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            title: title.into(),
            body,
        }
    }

    pub fn error(title: impl Into<String>, body: Option<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            body,
        }
    }
}

/// Everything the detail panel shows for the selected unit.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub unit: Unit,
    /// Toggle positions: backend state with pending commands overlaid.
    pub toggles: DeviceState,
    /// Fetched for this render only; absent when the weather call failed.
    pub weather: Option<Weather>,
}

pub trait View: Send + Sync {
    /// Replace the unit list. `selected` marks the highlighted row.
    fn render_list(&self, units: &[Unit], selected: Option<&str>);

    /// Replace the detail panel. `None` renders the empty state.
    fn render_detail(&self, detail: Option<&DetailView>);

    fn notify(&self, notification: Notification);

    /// Move a device toggle to `on` without firing a command.
    fn set_toggle(&self, code: &str, kind: DeviceKind, on: bool);

    /// Ask the operator to confirm a destructive action.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Renders to the log. Confirmation is answered by a fixed policy.
pub struct LogView {
    assume_yes: bool,
}

impl LogView {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl View for LogView {
    fn render_list(&self, units: &[Unit], selected: Option<&str>) {
        if units.is_empty() {
            info!("[View] No greenhouses in the database yet");
            return;
        }

        info!("[View] {} greenhouse(s):", units.len());
        for unit in units {
            let marker = if unit.key().is_some() && unit.key() == selected {
                "*"
            } else {
                " "
            };
            info!(
                "[View] {} {:<12} {:<24} {}",
                marker,
                unit.key().unwrap_or("-"),
                unit.display_name(),
                unit.plant_label()
            );
        }
    }

    fn render_detail(&self, detail: Option<&DetailView>) {
        let Some(detail) = detail else {
            info!("[View] Select a greenhouse from the list");
            return;
        };

        let unit = &detail.unit;
        info!("[View] == {} ==", unit.display_name());
        info!("[View]   Code: {}", unit.key().unwrap_or("-"));
        info!("[View]   Plant: {}", unit.plant_label());
        info!(
            "[View]   Status: {}",
            if unit.is_active() { "active" } else { "inactive" }
        );
        if let Some(location) = &unit.location {
            info!(
                "[View]   Location: {} ({}, {})",
                location.city.as_deref().unwrap_or("-"),
                display_opt(location.lat),
                display_opt(location.lon)
            );
        }
        let devices = DeviceKind::iter()
            .map(|kind| {
                format!(
                    "{}={}",
                    kind,
                    if detail.toggles.get(kind) { "on" } else { "off" }
                )
            })
            .collect::<Vec<_>>()
            .join(" ");
        info!("[View]   Devices: {}", devices);
        for sensor in &unit.sensors {
            info!(
                "[View]   Sensor {}: {}{}",
                sensor.code,
                display_opt(sensor.last_value),
                sensor.unit.map(|u| u.symbol()).unwrap_or("")
            );
        }
        if let Some(weather) = &detail.weather {
            info!(
                "[View]   Weather: {} °C, {} %, wind {} m/s, soil (ext) {} %",
                display_opt(weather.temperature),
                display_opt(weather.humidity),
                display_opt(weather.wind_speed),
                display_opt(weather.soil_moisture_ext_pct)
            );
        }
        info!(
            "[View]   Last update: {}",
            unit.last_updated.as_deref().unwrap_or("-")
        );
    }

    fn notify(&self, notification: Notification) {
        let body = notification.body.unwrap_or_default();
        match notification.level {
            NotificationLevel::Info => info!("[Notify] {} {}", notification.title, body),
            NotificationLevel::Warning => warn!("[Notify] {} {}", notification.title, body),
            NotificationLevel::Error => error!("[Notify] {} {}", notification.title, body),
        }
    }

    fn set_toggle(&self, code: &str, kind: DeviceKind, on: bool) {
        info!(
            "[View] {} {} toggle -> {}",
            code,
            kind,
            if on { "on" } else { "off" }
        );
    }

    fn confirm(&self, prompt: &str) -> bool {
        if !self.assume_yes {
            warn!("[View] {} (declined, pass --yes to confirm)", prompt);
        }
        self.assume_yes
    }
}

fn display_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
