//! Optimistic device toggles.
//!
//! Every (unit, device) pair has its own small state machine, so commands on
//! different devices of the same unit never share a rollback target:
//!
//! ```text
//!   Idle/Committed/RolledBack --begin--> Pending --commit--> Committed
//!                                          |
//!                                          +----roll_back--> RolledBack
//! ```
//!
//! A gesture on a toggle that is already pending supersedes the earlier
//! command: the newer [`Ticket`] owns the toggle and the older one can no
//! longer commit or roll it back.

use crate::model::{DeviceKind, DeviceState};
use std::collections::HashMap;
use strum::IntoEnumIterator;

/// Identifies one command's claim on a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    id: u64,
    desired: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    Idle,
    Pending {
        /// Value restored on rollback.
        previous: bool,
        desired: bool,
        ticket: Ticket,
    },
    Committed(bool),
    RolledBack(bool),
}

#[derive(Debug, Clone, Copy)]
struct Toggle {
    visible: bool,
    state: ToggleState,
}

/// Visible position and command state of every device toggle.
#[derive(Debug, Default)]
pub struct ToggleBoard {
    toggles: HashMap<(String, DeviceKind), Toggle>,
    next_ticket: u64,
}

impl ToggleBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, code: &str, kind: DeviceKind) -> ToggleState {
        self.toggles
            .get(&(code.to_string(), kind))
            .map_or(ToggleState::Idle, |t| t.state)
    }

    /// Current visible position, if the toggle has been shown or touched.
    pub fn visible(&self, code: &str, kind: DeviceKind) -> Option<bool> {
        self.toggles.get(&(code.to_string(), kind)).map(|t| t.visible)
    }

    /// Record an operator gesture that moved the toggle to `desired`.
    pub fn begin(&mut self, code: &str, kind: DeviceKind, desired: bool) -> Ticket {
        self.next_ticket += 1;
        let ticket = Ticket {
            id: self.next_ticket,
            desired,
        };

        let toggle = self
            .toggles
            .entry((code.to_string(), kind))
            .or_insert(Toggle {
                visible: !desired,
                state: ToggleState::Idle,
            });

        let previous = match toggle.state {
            ToggleState::Pending { previous, .. } => previous,
            _ => toggle.visible,
        };
        toggle.visible = desired;
        toggle.state = ToggleState::Pending {
            previous,
            desired,
            ticket,
        };

        ticket
    }

    /// Mark the command behind `ticket` as applied by the backend.
    ///
    /// Returns false when a newer gesture owns the toggle. In that case the
    /// committed value becomes the newer command's rollback target.
    pub fn commit(&mut self, code: &str, kind: DeviceKind, ticket: Ticket) -> bool {
        let Some(toggle) = self.toggles.get_mut(&(code.to_string(), kind)) else {
            return false;
        };

        match toggle.state {
            ToggleState::Pending {
                desired,
                ticket: current,
                ..
            } if current == ticket => {
                toggle.state = ToggleState::Committed(desired);
                true
            }
            ToggleState::Pending {
                desired: newer_desired,
                ticket: newer,
                ..
            } if newer.id > ticket.id => {
                // The superseded command still reached the backend.
                toggle.state = ToggleState::Pending {
                    previous: ticket.desired,
                    desired: newer_desired,
                    ticket: newer,
                };
                false
            }
            _ => false,
        }
    }

    /// Undo the command behind `ticket`, returning the value to show again.
    ///
    /// Returns `None` when a newer gesture owns the toggle.
    pub fn roll_back(&mut self, code: &str, kind: DeviceKind, ticket: Ticket) -> Option<bool> {
        let toggle = self.toggles.get_mut(&(code.to_string(), kind))?;

        match toggle.state {
            ToggleState::Pending {
                previous,
                ticket: current,
                ..
            } if current == ticket => {
                toggle.visible = previous;
                toggle.state = ToggleState::RolledBack(previous);
                Some(previous)
            }
            _ => None,
        }
    }

    /// Align every settled toggle of `code` with backend truth. Pending
    /// toggles keep their optimistic position.
    pub fn sync(&mut self, code: &str, devices: &DeviceState) {
        for kind in DeviceKind::iter() {
            let toggle = self
                .toggles
                .entry((code.to_string(), kind))
                .or_insert(Toggle {
                    visible: devices.get(kind),
                    state: ToggleState::Idle,
                });
            if !matches!(toggle.state, ToggleState::Pending { .. }) {
                toggle.visible = devices.get(kind);
            }
        }
    }

    /// Device positions to display for `code`: pending toggles show their
    /// optimistic value, everything else shows `devices`.
    pub fn overlay(&self, code: &str, devices: &DeviceState) -> DeviceState {
        let mut shown = *devices;
        for kind in DeviceKind::iter() {
            if let Some(Toggle {
                state: ToggleState::Pending { desired, .. },
                ..
            }) = self.toggles.get(&(code.to_string(), kind))
            {
                shown.set(kind, *desired);
            }
        }
        shown
    }

    /// Whether any toggle of `code` has been shown or touched.
    pub fn tracks(&self, code: &str) -> bool {
        self.toggles.keys().any(|(c, _)| c == code)
    }

    /// Drop all toggles of a deleted unit.
    pub fn forget(&mut self, code: &str) {
        self.toggles.retain(|(c, _), _| c != code);
    }
}
