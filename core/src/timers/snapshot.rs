//! Read-only report views
//!
//! Owned, serializable copies of registry state handed to rendering
//! adapters and host debug UIs. Entry order matches registry insertion
//! order.

use serde::Serialize;

use super::timer::{Origin, Timer, TimerMode};

/// One timer as it appears in a report.
#[derive(Debug, Clone, Serialize)]
pub struct TimerView {
    pub key: String,
    pub title: Option<String>,
    /// Measured seconds; excludes the open interval of a still-running timer
    pub seconds: f64,
    pub occurrences: u32,
    pub running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
}

impl From<&Timer> for TimerView {
    fn from(timer: &Timer) -> Self {
        Self {
            key: timer.key.clone(),
            title: timer.title.clone(),
            seconds: timer.accumulated_secs(),
            occurrences: timer.occurrences,
            running: timer.is_running(),
            origin: timer.origin,
        }
    }
}

/// One registry key with its mode and timers.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotEntry {
    pub key: String,
    pub mode: TimerMode,
    /// Exactly one element for `Default`/`Sum` keys, one per start for `Stack`
    pub timers: Vec<TimerView>,
}

impl SnapshotEntry {
    /// Combined seconds across the key's timers
    pub fn seconds(&self) -> f64 {
        self.timers.iter().map(|t| t.seconds).sum()
    }
}

/// Insertion-ordered view of a whole registry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimerSnapshot {
    pub entries: Vec<SnapshotEntry>,
}

impl TimerSnapshot {
    /// Sum of all measured time, the tab-label total
    pub fn total_seconds(&self) -> f64 {
        self.entries.iter().map(SnapshotEntry::seconds).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
