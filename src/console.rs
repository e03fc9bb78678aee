//! Session wiring.
//!
//! [`Console`] builds the shared [`ConsoleContext`] once and hands it to every
//! component, so all of them observe the same snapshots, list and selection.

use crate::api::Backend;
use crate::config::ConsoleConfig;
use crate::context::ConsoleContext;
use crate::dispatch::DeviceCommandDispatcher;
use crate::manage::UnitManager;
use crate::pager::ActionLogPager;
use crate::poll::PollingScheduler;
use crate::selection::SelectionController;
use crate::view::View;
use std::sync::Arc;

pub struct Console {
    ctx: Arc<ConsoleContext>,
    selection: SelectionController,
    scheduler: Arc<PollingScheduler>,
    dispatcher: DeviceCommandDispatcher,
    manager: UnitManager,
}

impl Console {
    pub fn new(backend: Arc<dyn Backend>, view: Arc<dyn View>, config: ConsoleConfig) -> Self {
        let ctx = Arc::new(ConsoleContext::new(backend, view, config));
        let selection = SelectionController::new(ctx.clone());
        let scheduler = Arc::new(PollingScheduler::new(ctx.clone(), selection.clone()));
        let dispatcher = DeviceCommandDispatcher::new(ctx.clone(), scheduler.clone());
        let manager = UnitManager::new(ctx.clone(), scheduler.clone());

        Self {
            ctx,
            selection,
            scheduler,
            dispatcher,
            manager,
        }
    }

    pub fn context(&self) -> &Arc<ConsoleContext> {
        &self.ctx
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn scheduler(&self) -> &Arc<PollingScheduler> {
        &self.scheduler
    }

    pub fn dispatcher(&self) -> &DeviceCommandDispatcher {
        &self.dispatcher
    }

    pub fn manager(&self) -> &UnitManager {
        &self.manager
    }

    /// Pager over the action history of `code`, sized from configuration.
    pub fn pager(&self, code: &str) -> ActionLogPager {
        ActionLogPager::new(
            self.ctx.backend_handle(),
            code,
            self.ctx.config().log_page_size,
        )
    }
}
