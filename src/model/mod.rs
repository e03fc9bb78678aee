//! Wire types exchanged with the greenhouse backend.
//!
//! Everything here is plain data: it is decoded once at the API boundary and
//! then passed around whole. Field names follow the backend's camelCase JSON.

pub mod action_log;
pub mod device;
pub mod forms;
pub mod resolve;
pub mod sensor;
pub mod unit;
pub mod weather;

pub use action_log::{ActionLogEntry, LogPage};
pub use device::{DeviceAction, DeviceKind, DeviceState};
pub use forms::{NewUnit, SensorForm, SensorPayload, UnitForm};
pub use sensor::{Sensor, SensorType, SensorUnit};
pub use unit::{Location, Unit};
pub use weather::Weather;
