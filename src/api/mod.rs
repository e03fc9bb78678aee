//! Greenhouse REST backend.
//!
//! The console core talks to the backend only through the [`Backend`] trait,
//! so the synchronization logic can run against the real HTTP client or a
//! scripted stand-in.

mod http;

pub use http::HttpBackend;

use crate::error::Result;
use crate::model::{DeviceAction, LogPage, NewUnit, SensorPayload, Unit, Weather};
use async_trait::async_trait;

/// Query form of the action-log endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogQuery {
    /// `?page={page}&size={size}`, zero-based page index.
    Page { page: u32, size: u32 },
    /// `?limit={n}`, the most recent `n` entries.
    Limit(u32),
}

/// Every backend call the console makes. Each method is one request.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /greenhouses`
    async fn list_units(&self) -> Result<Vec<Unit>>;

    /// `GET /greenhouses/{code}`
    async fn get_unit(&self, code: &str) -> Result<Unit>;

    /// `GET /greenhouses/{code}/weather/current`
    async fn current_weather(&self, code: &str) -> Result<Weather>;

    /// `POST /greenhouses`
    async fn create_unit(&self, unit: &NewUnit) -> Result<Unit>;

    /// `POST /greenhouses/{code}/devices/{ACTION}`
    async fn device_action(&self, code: &str, action: DeviceAction) -> Result<()>;

    /// `POST /greenhouses/{code}/simulate`
    async fn simulate(&self, code: &str) -> Result<()>;

    /// `POST /greenhouses/{code}/active?active={bool}`
    async fn set_active(&self, code: &str, active: bool) -> Result<Unit>;

    /// `POST /greenhouses/{code}/sensors`
    async fn add_sensor(&self, code: &str, sensor: &SensorPayload) -> Result<Unit>;

    /// `DELETE /greenhouses/{code}`
    async fn delete_unit(&self, code: &str) -> Result<()>;

    /// `DELETE /greenhouses/{code}/{sensorId}`
    async fn delete_sensor(&self, code: &str, sensor_id: &str) -> Result<Unit>;

    /// `GET /greenhouses/{code}/actions`
    async fn action_logs(&self, code: &str, query: LogQuery) -> Result<LogPage>;
}
