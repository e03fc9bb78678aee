//! Recurring fetch-all-units cycle.
//!
//! Each cycle replaces the unit list, diffs every returned unit against its
//! stored snapshot, stores the new snapshot whole and refreshes the selected
//! unit's detail panel. A tick that fires while the previous fetch is still
//! in flight does nothing.

use crate::change;
use crate::context::ConsoleContext;
use crate::model::Unit;
use crate::selection::SelectionController;
use crate::view::Notification;
use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Fetching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A fetch was already in flight; no request was made.
    Skipped,
    Refreshed { units: usize, notified: usize },
    Failed,
}

/// Clears the in-flight flag however the cycle ends.
struct FetchGuard<'a>(&'a AtomicBool);

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct PollingScheduler {
    ctx: Arc<ConsoleContext>,
    selection: SelectionController,
    fetching: AtomicBool,
    /// Set after the first successful cycle. The initial load never notifies.
    notifications_armed: AtomicBool,
}

impl PollingScheduler {
    pub fn new(ctx: Arc<ConsoleContext>, selection: SelectionController) -> Self {
        Self {
            ctx,
            selection,
            fetching: AtomicBool::new(false),
            notifications_armed: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> PollState {
        if self.fetching.load(Ordering::Acquire) {
            PollState::Fetching
        } else {
            PollState::Idle
        }
    }

    /// One scheduled cycle. Skips when a fetch is already in flight.
    pub async fn tick(&self) -> CycleOutcome {
        if self
            .fetching
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("[Poll] Previous fetch still in flight, skipping tick");
            return CycleOutcome::Skipped;
        }
        let _guard = FetchGuard(&self.fetching);

        let notify = self.notifications_armed.load(Ordering::Acquire);
        let outcome = self.cycle(notify).await;
        if matches!(outcome, CycleOutcome::Refreshed { .. }) {
            self.notifications_armed.store(true, Ordering::Release);
        }
        outcome
    }

    /// Out-of-band list refresh, independent of the timer and its in-flight
    /// guard. Used after deletes, creates and manual refreshes. Never emits
    /// change notifications; the operator caused the change.
    pub async fn refresh_now(&self) -> CycleOutcome {
        self.cycle(false).await
    }

    async fn cycle(&self, notify: bool) -> CycleOutcome {
        let units = match self.ctx.backend().list_units().await {
            Ok(units) => units,
            Err(e) => {
                warn!("[Poll] Fetching greenhouses failed: {}", e);
                return CycleOutcome::Failed;
            }
        };

        let (outcome, selected) = self.apply(units, notify);
        if let Some(snapshot) = selected {
            self.selection.refresh(snapshot).await;
        }
        outcome
    }

    /// Fold a fetched list into the session and emit change notifications.
    ///
    /// Returns the stored snapshot of the selected unit, if it was fetched.
    fn apply(&self, units: Vec<Unit>, notify: bool) -> (CycleOutcome, Option<Unit>) {
        let count = units.len();
        let mut notifications = Vec::new();

        let (selected, dropped, stored) = {
            let mut session = self.ctx.session();
            for unit in &units {
                let Some(code) = unit.key() else {
                    debug!("[Poll] Ignoring greenhouse without code or id");
                    continue;
                };

                let report = change::compare(session.store.get(code), unit);
                if notify && let Some(summary) = report.summary() {
                    debug!("[Poll] {} changed: {}", code, summary);
                    notifications.push(Notification::info(
                        format!("Greenhouse updated: {}", unit.display_name()),
                        Some(summary),
                    ));
                }
                session.absorb(code, unit.clone());
            }
            session.units = units;

            let (selected, dropped) = match session.selection.clone() {
                Some(code) if session.units.iter().any(|u| u.key() == Some(code.as_str())) => {
                    (session.store.get(&code).cloned(), None)
                }
                Some(code) => {
                    session.selection = None;
                    (None, Some(code))
                }
                None => (None, None),
            };
            (selected, dropped, session.store.len())
        };

        let notified = notifications.len();
        for notification in notifications {
            self.ctx.view().notify(notification);
        }
        if let Some(code) = dropped {
            info!("[Poll] Selected greenhouse {} is gone, clearing selection", code);
            self.ctx.view().render_detail(None);
        }
        self.ctx.render_list();

        debug!(
            "[Poll] Refreshed {} greenhouse(s), {} stored, {} notification(s)",
            count, stored, notified
        );
        (
            CycleOutcome::Refreshed {
                units: count,
                notified,
            },
            selected,
        )
    }

    /// Store a single freshly fetched unit whole, replace its list row and
    /// refresh the detail panel if it is selected. Emits no notifications.
    pub async fn absorb_unit(&self, unit: Unit) {
        let Some(code) = unit.key().map(str::to_string) else {
            debug!("[Poll] Ignoring greenhouse without code or id");
            return;
        };

        {
            let mut session = self.ctx.session();
            if let Some(row) = session
                .units
                .iter_mut()
                .find(|u| u.key() == Some(code.as_str()))
            {
                *row = unit.clone();
            }
            session.absorb(&code, unit.clone());
        }

        self.ctx.render_list();
        self.selection.refresh(unit).await;
    }

    /// Tick every `period` until `shutdown` fires. The first tick is
    /// immediate. Each tick runs as its own task so a slow fetch never delays
    /// the timer; the in-flight guard turns overlapping ticks into no-ops.
    pub async fn run(self: Arc<Self>, period: Duration, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("[Poll] Polling every {}s", period.as_secs());

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("[Poll] Shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let scheduler = self.clone();
                    tokio::spawn(async move {
                        scheduler.tick().await;
                    });
                }
            }
        }
    }
}
