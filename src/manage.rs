//! Unit administration: creation, the active flag, sensor slots and manual
//! refresh.
//!
//! Form input is validated before any request; a validation failure is shown
//! to the operator and nothing is sent. Units returned by the backend are
//! stored whole through the scheduler, like any other fetch.

use crate::context::ConsoleContext;
use crate::error::{ConsoleError, Result};
use crate::model::{SensorForm, Unit, UnitForm};
use crate::poll::{CycleOutcome, PollingScheduler};
use crate::view::Notification;
use log::{error, info, warn};
use std::sync::Arc;

pub struct UnitManager {
    ctx: Arc<ConsoleContext>,
    scheduler: Arc<PollingScheduler>,
}

impl UnitManager {
    pub fn new(ctx: Arc<ConsoleContext>, scheduler: Arc<PollingScheduler>) -> Self {
        Self { ctx, scheduler }
    }

    /// Validate the form, create the unit and refresh the list.
    pub async fn create_unit(&self, form: UnitForm) -> Result<Unit> {
        let payload = form
            .into_payload(&self.ctx.config().default_city)
            .map_err(|e| self.rejected("Invalid greenhouse", e))?;

        info!("[Command] Creating greenhouse {}", payload.code);
        match self.ctx.backend().create_unit(&payload).await {
            Ok(created) => {
                self.ctx.view().notify(Notification::info(
                    "New greenhouse created",
                    Some(format!("{} ({})", payload.name, payload.code)),
                ));
                self.scheduler.refresh_now().await;
                Ok(created)
            }
            Err(e) => Err(self.failed("Failed to create greenhouse", e)),
        }
    }

    /// Switch the active flag and store the unit the backend returns.
    pub async fn set_active(&self, code: &str, active: bool) -> Result<Unit> {
        info!("[Command] Setting {} active={}", code, active);
        let unit = self
            .ctx
            .backend()
            .set_active(code, active)
            .await
            .map_err(|e| self.failed("Failed to update greenhouse status", e))?;

        let title = if active {
            "Greenhouse activated"
        } else {
            "Greenhouse deactivated"
        };
        self.ctx
            .view()
            .notify(Notification::info(title, Some(code.to_string())));
        self.scheduler.absorb_unit(unit.clone()).await;
        Ok(unit)
    }

    /// Add or update a sensor slot on the selected, active unit.
    pub async fn save_sensor(&self, code: &str, form: SensorForm) -> Result<Unit> {
        self.ctx
            .require_active_selection(code)
            .map_err(|e| self.rejected("Sensor management unavailable", e))?;
        let payload = form
            .into_payload()
            .map_err(|e| self.rejected("Invalid sensor", e))?;

        info!("[Command] Saving sensor {} on {}", payload.code, code);
        let unit = self
            .ctx
            .backend()
            .add_sensor(code, &payload)
            .await
            .map_err(|e| self.failed("Failed to save sensor", e))?;

        self.ctx
            .view()
            .notify(Notification::info("Sensor saved", Some(payload.code)));
        self.scheduler.absorb_unit(unit.clone()).await;
        Ok(unit)
    }

    /// Remove a sensor slot from the selected, active unit.
    pub async fn delete_sensor(&self, code: &str, sensor_id: &str) -> Result<Unit> {
        self.ctx
            .require_active_selection(code)
            .map_err(|e| self.rejected("Sensor management unavailable", e))?;

        info!("[Command] Deleting sensor {} on {}", sensor_id, code);
        let unit = self
            .ctx
            .backend()
            .delete_sensor(code, sensor_id)
            .await
            .map_err(|e| self.failed("Failed to delete sensor", e))?;

        self.ctx
            .view()
            .notify(Notification::info("Sensor deleted", Some(sensor_id.to_string())));
        self.scheduler.absorb_unit(unit.clone()).await;
        Ok(unit)
    }

    /// Operator-requested list refresh. Requires a selection; emits no
    /// change notifications.
    pub async fn refresh(&self) -> Result<CycleOutcome> {
        if self.ctx.selection().is_none() {
            return Err(self.rejected("Select a greenhouse first", ConsoleError::NoSelection));
        }
        self.ctx
            .view()
            .notify(Notification::info("Refreshing data…", None));
        Ok(self.scheduler.refresh_now().await)
    }

    fn rejected(&self, title: &str, err: ConsoleError) -> ConsoleError {
        warn!("[Command] {}: {}", title, err);
        self.ctx
            .view()
            .notify(Notification::warning(title, Some(err.to_string())));
        err
    }

    fn failed(&self, title: &str, err: ConsoleError) -> ConsoleError {
        error!("[Command] {}: {}", title, err);
        self.ctx
            .view()
            .notify(Notification::error(title, Some(err.to_string())));
        err
    }
}
