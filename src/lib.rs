//! Greenhouse fleet console.
//!
//! Client-side synchronization and command core for supervising greenhouse
//! units through their REST backend: a poll loop with change notifications,
//! a single selected detail view kept in step with the latest snapshot, and
//! optimistic device toggles that roll back on failure.

pub mod api;
pub mod change;
pub mod config;
pub mod console;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod manage;
pub mod model;
pub mod pager;
pub mod poll;
pub mod selection;
pub mod store;
pub mod toggle;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use console::Console;
pub use error::{ConsoleError, Result};
