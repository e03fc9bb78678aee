//! Device commands and unit deletion.
//!
//! A toggle command arrives after the operator already flipped the switch, so
//! the visible position is the desired one. The dispatcher checks the
//! preconditions, sends the device action followed by a simulate call, then
//! either commits and re-fetches the unit or rolls the switch back.

use crate::context::ConsoleContext;
use crate::error::{ConsoleError, Result};
use crate::model::{DeviceAction, DeviceKind};
use crate::poll::PollingScheduler;
use crate::toggle::Ticket;
use crate::view::Notification;
use log::{debug, error, info, warn};
use std::sync::Arc;

pub struct DeviceCommandDispatcher {
    ctx: Arc<ConsoleContext>,
    scheduler: Arc<PollingScheduler>,
}

impl DeviceCommandDispatcher {
    pub fn new(ctx: Arc<ConsoleContext>, scheduler: Arc<PollingScheduler>) -> Self {
        Self { ctx, scheduler }
    }

    /// Drive `kind` on unit `code` to `desired`.
    ///
    /// Fails without any network call when `code` is not the selected unit or
    /// the unit is inactive. On any failure the toggle returns to the value it
    /// had before the gesture.
    pub async fn toggle(&self, code: &str, kind: DeviceKind, desired: bool) -> Result<()> {
        let (ticket, tracked) = {
            let mut session = self.ctx.session();
            let tracked = session.toggles.tracks(code);
            (session.toggles.begin(code, kind, desired), tracked)
        };

        if let Err(e) = self.ctx.require_active_selection(code) {
            warn!("[Command] Rejected {} {} on {}: {}", kind, on_off(desired), code, e);
            self.revert(code, kind, ticket);
            if !tracked {
                self.ctx.session().toggles.forget(code);
            }
            self.ctx.view().notify(Notification::warning(
                "Device control unavailable",
                Some(precondition_hint(&e)),
            ));
            return Err(e);
        }

        let action = kind.action(desired);
        info!("[Command] {} -> {}", code, action);

        let backend = self.ctx.backend();
        let sent = match backend.device_action(code, action).await {
            Ok(()) => backend.simulate(code).await,
            Err(e) => Err(e),
        };

        if let Err(e) = sent {
            error!("[Command] {} on {} failed: {}", action, code, e);
            self.revert(code, kind, ticket);
            self.ctx.view().notify(Notification::error(
                format!("Failed to switch {}", kind),
                Some(e.to_string()),
            ));
            return Err(e);
        }

        if !self.ctx.session().toggles.commit(code, kind, ticket) {
            debug!("[Command] {} on {} superseded by a newer gesture", action, code);
        }
        self.ctx
            .view()
            .notify(Notification::info(describe(action), None));

        self.reconcile(code).await;
        Ok(())
    }

    /// Delete the selected unit after operator confirmation.
    ///
    /// The selection is cleared before the delete request is sent, so any
    /// render while the request and the following list refresh are in flight
    /// shows the empty detail state.
    pub async fn delete_selected(&self) -> Result<()> {
        let Some(code) = self.ctx.selection() else {
            self.ctx.view().notify(Notification::warning(
                "Select a greenhouse first",
                None,
            ));
            return Err(ConsoleError::NoSelection);
        };

        if !self
            .ctx
            .view()
            .confirm(&format!("Delete greenhouse {}?", code))
        {
            info!("[Command] Deletion of {} cancelled", code);
            return Err(ConsoleError::Cancelled);
        }

        {
            let mut session = self.ctx.session();
            session.selection = None;
            session.toggles.forget(&code);
        }
        self.ctx.view().render_detail(None);

        info!("[Command] Deleting {}", code);
        let result = self.ctx.backend().delete_unit(&code).await;
        match &result {
            Ok(()) => self
                .ctx
                .view()
                .notify(Notification::info("Greenhouse deleted", Some(code.clone()))),
            Err(e) => {
                error!("[Command] Deleting {} failed: {}", code, e);
                self.ctx.view().notify(Notification::error(
                    "Failed to delete greenhouse",
                    Some(e.to_string()),
                ));
            }
        }

        self.scheduler.refresh_now().await;
        result
    }

    fn revert(&self, code: &str, kind: DeviceKind, ticket: Ticket) {
        let (restored, shown) = {
            let mut session = self.ctx.session();
            let restored = session.toggles.roll_back(code, kind, ticket);
            (restored, session.toggles.visible(code, kind))
        };
        match restored {
            Some(on) => self.ctx.view().set_toggle(code, kind, on),
            None => debug!(
                "[Command] {} {} owned by a newer gesture, keeping {:?}",
                code, kind, shown
            ),
        }
    }

    /// Fetch the unit outside the poll timer and store it whole.
    async fn reconcile(&self, code: &str) {
        match self.ctx.backend().get_unit(code).await {
            Ok(unit) => self.scheduler.absorb_unit(unit).await,
            Err(e) => warn!("[Command] Refreshing {} after command failed: {}", code, e),
        }
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

fn describe(action: DeviceAction) -> String {
    let on = action.turns_on();
    match (action.kind(), on) {
        (DeviceKind::Ventilation, true) => "Ventilation opened".to_string(),
        (DeviceKind::Ventilation, false) => "Ventilation closed".to_string(),
        (DeviceKind::Irrigation, _) => format!("Irrigation switched {}", on_off(on)),
        (DeviceKind::Shade, _) => format!("Shading switched {}", on_off(on)),
        (DeviceKind::Light, _) => format!("Lighting switched {}", on_off(on)),
        (DeviceKind::Humidifier, _) => format!("Humidifier switched {}", on_off(on)),
    }
}

fn precondition_hint(err: &ConsoleError) -> String {
    match err {
        ConsoleError::UnitInactive(_) => {
            "The greenhouse is inactive. Activate it to control devices.".to_string()
        }
        ConsoleError::NoSelection => "Select a greenhouse first.".to_string(),
        other => other.to_string(),
    }
}
