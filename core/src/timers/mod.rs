//! Timer bookkeeping
//!
//! This module provides:
//! - **Records**: fixed-shape [`Timer`] state with monotonic readings
//! - **Registry**: insertion-ordered key map enforcing mode semantics
//! - **Snapshots**: read-only report views for rendering adapters
//!
//! # Modes
//!
//! A key's first `start` fixes its [`TimerMode`] for the life of the
//! registry:
//! - `Default` measures one interval per key
//! - `Sum` folds repeated start/stop cycles into one total
//! - `Stack` appends an independent entry per start; stopping the key
//!   closes every open entry under it

mod error;
mod registry;
mod snapshot;
mod timer;

#[cfg(test)]
mod registry_tests;

pub use error::TimerError;
pub use registry::{TimerEntry, TimerRegistry};
pub use snapshot::{SnapshotEntry, TimerSnapshot, TimerView};
pub use timer::{Origin, Timer, TimerMode};
