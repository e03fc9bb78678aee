//! Session context shared by the console components.
//!
//! One `ConsoleContext` lives from session start to shutdown and is handed to
//! every component constructor. It owns the only mutable shared state: the
//! snapshot store, the last fetched unit list, the selection and the toggle
//! board. State is guarded by a `parking_lot` mutex that is never held across
//! an `.await`; callers copy out what they need and release it before any
//! network call or render.

use crate::api::Backend;
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, Result};
use crate::model::Unit;
use crate::store::SnapshotStore;
use crate::toggle::ToggleBoard;
use crate::view::View;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// Mutable session state.
#[derive(Debug, Default)]
pub struct Session {
    pub store: SnapshotStore,
    /// Rows of the last full list fetch, in backend order.
    pub units: Vec<Unit>,
    pub selection: Option<String>,
    pub toggles: ToggleBoard,
}

impl Session {
    /// Store a freshly fetched unit whole and re-sync its settled toggles.
    pub fn absorb(&mut self, code: &str, unit: Unit) -> Option<Unit> {
        self.toggles.sync(code, &unit.devices);
        self.store.set(code, unit)
    }

    /// Latest known state of `code`: the stored snapshot, else the list row.
    pub fn latest(&self, code: &str) -> Option<Unit> {
        self.store
            .get(code)
            .or_else(|| self.units.iter().find(|u| u.key() == Some(code)))
            .cloned()
    }
}

pub struct ConsoleContext {
    backend: Arc<dyn Backend>,
    view: Arc<dyn View>,
    config: ConsoleConfig,
    session: Mutex<Session>,
}

impl ConsoleContext {
    pub fn new(backend: Arc<dyn Backend>, view: Arc<dyn View>, config: ConsoleConfig) -> Self {
        Self {
            backend,
            view,
            config,
            session: Mutex::new(Session::default()),
        }
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub fn backend_handle(&self) -> Arc<dyn Backend> {
        self.backend.clone()
    }

    pub fn view(&self) -> &dyn View {
        self.view.as_ref()
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Lock the session state. Never hold the guard across an `.await`.
    pub fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock()
    }

    pub fn selection(&self) -> Option<String> {
        self.session().selection.clone()
    }

    pub fn snapshot(&self, code: &str) -> Option<Unit> {
        self.session().store.get(code).cloned()
    }

    pub fn units(&self) -> Vec<Unit> {
        self.session().units.clone()
    }

    /// Check that `code` is the selected unit and that it is active.
    ///
    /// Returns the latest known state of the unit.
    pub fn require_active_selection(&self, code: &str) -> Result<Unit> {
        let session = self.session();
        match session.selection.as_deref() {
            Some(selected) if selected == code => {}
            _ => return Err(ConsoleError::NoSelection),
        }

        let unit = session
            .latest(code)
            .ok_or_else(|| ConsoleError::UnknownUnit(code.to_string()))?;
        if !unit.is_active() {
            return Err(ConsoleError::UnitInactive(code.to_string()));
        }
        Ok(unit)
    }

    /// Re-render the unit list from session state.
    pub fn render_list(&self) {
        let (units, selected) = {
            let session = self.session();
            (session.units.clone(), session.selection.clone())
        };
        self.view.render_list(&units, selected.as_deref());
    }
}
