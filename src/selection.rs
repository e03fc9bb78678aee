//! The single selected unit and its detail panel.

use crate::context::ConsoleContext;
use crate::model::{Unit, Weather};
use crate::view::DetailView;
use log::{debug, info, warn};
use std::sync::Arc;

/// Tracks which unit is selected and keeps the detail panel in step with the
/// latest snapshot of that unit.
#[derive(Clone)]
pub struct SelectionController {
    ctx: Arc<ConsoleContext>,
}

impl SelectionController {
    pub fn new(ctx: Arc<ConsoleContext>) -> Self {
        Self { ctx }
    }

    pub fn selected(&self) -> Option<String> {
        self.ctx.selection()
    }

    /// Select `code`, fetch its detail and weather, and render.
    ///
    /// If the detail call fails the panel falls back to the list-level
    /// snapshot. When nothing at all is known about `code` the selection is
    /// dropped again. Returns what was rendered, or `None` when nothing could
    /// be shown or another unit was selected while the fetch was in flight.
    pub async fn select(&self, code: &str) -> Option<DetailView> {
        info!("[Select] Selecting {}", code);
        self.ctx.session().selection = Some(code.to_string());
        self.ctx.render_list();

        let unit = match self.ctx.backend().get_unit(code).await {
            Ok(unit) => Some(unit),
            Err(e) => {
                warn!("[Select] Detail fetch for {} failed: {}", code, e);
                self.ctx.session().latest(code)
            }
        };

        if !self.is_selected(code) {
            debug!("[Select] Selection moved away from {}, dropping detail", code);
            return None;
        }

        match unit {
            Some(unit) => self.render(code, unit).await,
            None => {
                {
                    let mut session = self.ctx.session();
                    if session.selection.as_deref() == Some(code) {
                        session.selection = None;
                    }
                    if session.store.is_empty() {
                        debug!("[Select] No greenhouse snapshots stored yet");
                    }
                }
                warn!("[Select] No state available for {}, clearing selection", code);
                self.ctx.view().render_detail(None);
                self.ctx.render_list();
                None
            }
        }
    }

    /// Unset the selection and render the empty detail state.
    pub fn clear(&self) {
        let previous = self.ctx.session().selection.take();
        if let Some(code) = previous {
            debug!("[Select] Cleared selection of {}", code);
        }
        self.ctx.view().render_detail(None);
        self.ctx.render_list();
    }

    /// Re-render the detail panel from an already fetched snapshot.
    ///
    /// Does nothing unless `snapshot` belongs to the selected unit.
    pub async fn refresh(&self, snapshot: Unit) -> Option<DetailView> {
        let code = snapshot.key()?.to_string();
        if !self.is_selected(&code) {
            return None;
        }
        self.render(&code, snapshot).await
    }

    fn is_selected(&self, code: &str) -> bool {
        self.ctx.selection().as_deref() == Some(code)
    }

    async fn render(&self, code: &str, unit: Unit) -> Option<DetailView> {
        let weather = self.fetch_weather(code).await;

        // Re-check after the weather call; the operator may have moved on.
        let detail = {
            let session = self.ctx.session();
            if session.selection.as_deref() != Some(code) {
                return None;
            }
            DetailView {
                toggles: session.toggles.overlay(code, &unit.devices),
                unit,
                weather,
            }
        };

        self.ctx.view().render_detail(Some(&detail));
        Some(detail)
    }

    async fn fetch_weather(&self, code: &str) -> Option<Weather> {
        match self.ctx.backend().current_weather(code).await {
            Ok(weather) => Some(weather),
            Err(e) => {
                debug!("[Select] Weather for {} unavailable: {}", code, e);
                None
            }
        }
    }
}
