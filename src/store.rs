//! Last observed state per unit code.

use crate::model::Unit;
use std::collections::HashMap;

/// Holds exactly one snapshot per unit code.
///
/// There is no partial update: callers fetch the full unit and
/// `set` it whole, so a comparison always sees two complete states.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    snapshots: HashMap<String, Unit>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, code: &str) -> Option<&Unit> {
        self.snapshots.get(code)
    }

    /// Replace the snapshot for `code`, returning the previous one.
    pub fn set(&mut self, code: impl Into<String>, snapshot: Unit) -> Option<Unit> {
        self.snapshots.insert(code.into(), snapshot)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
