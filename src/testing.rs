//! Scripted backend and recording view for unit tests.

use crate::api::{Backend, LogQuery};
use crate::config::ConsoleConfig;
use crate::context::ConsoleContext;
use crate::error::{ConsoleError, Result};
use crate::model::{
    DeviceAction, DeviceKind, LogPage, NewUnit, Sensor, SensorPayload, Unit, Weather,
};
use crate::view::{DetailView, Notification, View};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

pub(crate) fn unit(code: &str, active: bool) -> Unit {
    Unit {
        code: Some(code.to_string()),
        name: Some(format!("House {}", code)),
        plant_type: Some("TOMATO".to_string()),
        active: Some(active),
        ..Default::default()
    }
}

pub(crate) fn console_config() -> ConsoleConfig {
    ConsoleConfig {
        log_page_size: 20,
        default_city: "Budapest".to_string(),
    }
}

pub(crate) fn context(
    backend: &Arc<FakeBackend>,
    view: &Arc<RecordingView>,
) -> Arc<ConsoleContext> {
    Arc::new(ConsoleContext::new(
        backend.clone(),
        view.clone(),
        console_config(),
    ))
}

/// In-memory backend. Records every call as `"<method> <args>"`, and can be
/// told to fail a method or to hold it until released.
#[derive(Default)]
pub(crate) struct FakeBackend {
    units: Mutex<Vec<Unit>>,
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashSet<String>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    log_page: Mutex<Option<LogPage>>,
}

impl FakeBackend {
    pub(crate) fn with_units(units: Vec<Unit>) -> Self {
        let backend = Self::default();
        backend.set_units(units);
        backend
    }

    pub(crate) fn set_units(&self, units: Vec<Unit>) {
        *self.units.lock() = units;
    }

    pub(crate) fn units(&self) -> Vec<Unit> {
        self.units.lock().clone()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub(crate) fn fail(&self, method: &str) {
        self.failures.lock().insert(method.to_string());
    }

    /// Make every call to `method` wait for a permit on the returned gate.
    pub(crate) fn hold(&self, method: &str) -> Arc<Notify> {
        self.gates
            .lock()
            .entry(method.to_string())
            .or_insert_with(|| Arc::new(Notify::new()))
            .clone()
    }

    pub(crate) fn set_log_page(&self, page: LogPage) {
        *self.log_page.lock() = Some(page);
    }

    async fn enter(&self, method: &str, call: String) -> Result<()> {
        self.calls.lock().push(call);

        let gate = self.gates.lock().get(method).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.failures.lock().contains(method) {
            return Err(ConsoleError::Http {
                status: 500,
                detail: format!("{} failed", method),
            });
        }
        Ok(())
    }

    fn find(&self, code: &str) -> Result<Unit> {
        self.units
            .lock()
            .iter()
            .find(|u| u.key() == Some(code))
            .cloned()
            .ok_or_else(|| ConsoleError::Http {
                status: 404,
                detail: format!("Greenhouse {} not found", code),
            })
    }

    fn modify(&self, code: &str, f: impl FnOnce(&mut Unit)) -> Result<Unit> {
        let mut units = self.units.lock();
        let unit = units
            .iter_mut()
            .find(|u| u.key() == Some(code))
            .ok_or_else(|| ConsoleError::Http {
                status: 404,
                detail: format!("Greenhouse {} not found", code),
            })?;
        f(unit);
        Ok(unit.clone())
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn list_units(&self) -> Result<Vec<Unit>> {
        self.enter("list_units", "list_units".to_string()).await?;
        Ok(self.units())
    }

    async fn get_unit(&self, code: &str) -> Result<Unit> {
        self.enter("get_unit", format!("get_unit {}", code)).await?;
        self.find(code)
    }

    async fn current_weather(&self, code: &str) -> Result<Weather> {
        self.enter("current_weather", format!("current_weather {}", code))
            .await?;
        Ok(Weather {
            temperature: Some(18.5),
            humidity: Some(55.0),
            ..Default::default()
        })
    }

    async fn create_unit(&self, unit: &NewUnit) -> Result<Unit> {
        self.enter("create_unit", format!("create_unit {}", unit.code))
            .await?;
        let created = Unit {
            code: Some(unit.code.clone()),
            name: Some(unit.name.clone()),
            plant_type: Some(unit.plant_type.clone()),
            active: Some(unit.active),
            location: Some(unit.location.clone()),
            devices: unit.devices,
            ..Default::default()
        };
        self.units.lock().push(created.clone());
        Ok(created)
    }

    async fn device_action(&self, code: &str, action: DeviceAction) -> Result<()> {
        self.enter("device_action", format!("device_action {} {}", code, action))
            .await?;
        self.modify(code, |u| u.devices.set(action.kind(), action.turns_on()))?;
        Ok(())
    }

    async fn simulate(&self, code: &str) -> Result<()> {
        self.enter("simulate", format!("simulate {}", code)).await?;
        self.find(code).map(|_| ())
    }

    async fn set_active(&self, code: &str, active: bool) -> Result<Unit> {
        self.enter("set_active", format!("set_active {} {}", code, active))
            .await?;
        self.modify(code, |u| u.active = Some(active))
    }

    async fn add_sensor(&self, code: &str, sensor: &SensorPayload) -> Result<Unit> {
        self.enter("add_sensor", format!("add_sensor {} {}", code, sensor.code))
            .await?;
        let sensor = Sensor {
            id: Some(sensor.id.clone().unwrap_or_else(|| format!("id-{}", sensor.code))),
            code: sensor.code.clone(),
            sensor_type: Some(sensor.sensor_type),
            unit: Some(sensor.unit),
            last_value: sensor.last_value,
            last_seen: None,
        };
        self.modify(code, |u| {
            u.sensors.retain(|s| s.code != sensor.code);
            u.sensors.push(sensor);
        })
    }

    async fn delete_unit(&self, code: &str) -> Result<()> {
        self.enter("delete_unit", format!("delete_unit {}", code))
            .await?;
        self.units.lock().retain(|u| u.key() != Some(code));
        Ok(())
    }

    async fn delete_sensor(&self, code: &str, sensor_id: &str) -> Result<Unit> {
        self.enter("delete_sensor", format!("delete_sensor {} {}", code, sensor_id))
            .await?;
        self.modify(code, |u| {
            u.sensors.retain(|s| s.id.as_deref() != Some(sensor_id))
        })
    }

    async fn action_logs(&self, code: &str, query: LogQuery) -> Result<LogPage> {
        let call = match query {
            LogQuery::Page { page, size } => format!("action_logs {} page={} size={}", code, page, size),
            LogQuery::Limit(limit) => format!("action_logs {} limit={}", code, limit),
        };
        self.enter("action_logs", call).await?;
        Ok(self
            .log_page
            .lock()
            .clone()
            .unwrap_or(LogPage::Entries(Vec::new())))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ViewEvent {
    List {
        codes: Vec<String>,
        selected: Option<String>,
    },
    Detail(Option<DetailView>),
    Notify(Notification),
    Toggle {
        code: String,
        kind: DeviceKind,
        on: bool,
    },
    Confirm(String),
}

/// Records everything the core asks it to show.
#[derive(Default)]
pub(crate) struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
    decline: AtomicBool,
}

impl RecordingView {
    pub(crate) fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().clone()
    }

    pub(crate) fn decline_confirmations(&self) {
        self.decline.store(true, Ordering::SeqCst);
    }

    pub(crate) fn notifications(&self) -> Vec<Notification> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Notify(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn toggles(&self) -> Vec<(String, DeviceKind, bool)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Toggle { code, kind, on } => Some((code, kind, on)),
                _ => None,
            })
            .collect()
    }

    /// Code shown by the latest detail render: `None` if the panel was never
    /// rendered, `Some(None)` for the empty state.
    pub(crate) fn last_detail_code(&self) -> Option<Option<String>> {
        self.last_detail()
            .map(|d| d.and_then(|d| d.unit.key().map(str::to_string)))
    }

    pub(crate) fn last_detail(&self) -> Option<Option<DetailView>> {
        self.events().into_iter().rev().find_map(|e| match e {
            ViewEvent::Detail(d) => Some(d),
            _ => None,
        })
    }

    pub(crate) fn last_list(&self) -> Option<(Vec<String>, Option<String>)> {
        self.events().into_iter().rev().find_map(|e| match e {
            ViewEvent::List { codes, selected } => Some((codes, selected)),
            _ => None,
        })
    }
}

impl View for RecordingView {
    fn render_list(&self, units: &[Unit], selected: Option<&str>) {
        self.events.lock().push(ViewEvent::List {
            codes: units
                .iter()
                .filter_map(|u| u.key().map(str::to_string))
                .collect(),
            selected: selected.map(str::to_string),
        });
    }

    fn render_detail(&self, detail: Option<&DetailView>) {
        self.events.lock().push(ViewEvent::Detail(detail.cloned()));
    }

    fn notify(&self, notification: Notification) {
        self.events.lock().push(ViewEvent::Notify(notification));
    }

    fn set_toggle(&self, code: &str, kind: DeviceKind, on: bool) {
        self.events.lock().push(ViewEvent::Toggle {
            code: code.to_string(),
            kind,
            on,
        });
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.events
            .lock()
            .push(ViewEvent::Confirm(prompt.to_string()));
        !self.decline.load(Ordering::SeqCst)
    }
}
