//! Timer records (runtime state)
//!
//! A `Timer` is one measured start/stop interval, or a running accumulator
//! in [`TimerMode::Sum`]. Records are fixed-shape: every field exists from
//! construction and `stopped_at` is written exactly once per interval.
//!
//! # Lifecycle
//!
//! 1. `start` on the registry → `Timer` created (running)
//! 2. `stop` (or `stop_all` at report time) → `stopped_at` recorded
//! 3. Sum-mode timers may reopen: same record, same accumulator
//!
//! Readings come from [`Instant`], so measurements are monotonic and immune
//! to wall-clock adjustments.

use std::fmt;
use std::panic::Location;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::error::TimerError;

/// Merge behavior for repeated `start` calls on one key.
///
/// The mode is fixed by the key's first use; reusing a key under a
/// different mode is rejected by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    /// One measurement per key; restarting an existing key is an error.
    Default,
    /// Repeated start/stop cycles fold into one running total.
    Sum,
    /// Every start appends an independent, concurrently open entry.
    Stack,
}

impl TimerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Sum => "sum",
            Self::Stack => "stack",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerMode {
    type Err = TimerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "sum" => Ok(Self::Sum),
            "stack" => Ok(Self::Stack),
            _ => Err(TimerError::InvalidMode(s.to_string())),
        }
    }
}

/// Call site that started a timer, kept for diagnostic display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Origin {
    pub file: &'static str,
    pub line: u32,
}

impl Origin {
    /// Capture the caller's location.
    ///
    /// Works through any chain of `#[track_caller]` functions, so the
    /// recorded site is the application call, not registry internals.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A single measured interval (or accumulator, in `Sum` mode).
#[derive(Debug, Clone)]
pub struct Timer {
    /// Registry key this timer was started under
    pub key: String,

    /// Merge behavior for repeated starts on this key
    pub mode: TimerMode,

    /// Optional human-readable label
    pub title: Option<String>,

    // ─── Readings (monotonic clock) ─────────────────────────────────────────
    /// When the current interval began
    pub started_at: Instant,

    /// When the timer finished; `None` while running
    pub stopped_at: Option<Instant>,

    /// Measured time; a running total across cycles in `Sum` mode, the
    /// single interval's duration otherwise
    pub accumulated: Duration,

    /// Number of start calls folded into this record
    pub occurrences: u32,

    /// Call site of the most recent start, when captured
    pub origin: Option<Origin>,
}

impl Timer {
    pub(crate) fn new(
        key: &str,
        mode: TimerMode,
        title: Option<&str>,
        origin: Option<Origin>,
    ) -> Self {
        Self {
            key: key.to_string(),
            mode,
            title: title.map(str::to_string),
            started_at: Instant::now(),
            stopped_at: None,
            accumulated: Duration::ZERO,
            occurrences: 1,
            origin,
        }
    }

    /// Whether the timer has a started interval with no stop recorded yet
    pub fn is_running(&self) -> bool {
        self.stopped_at.is_none()
    }

    /// Measured time in seconds
    pub fn accumulated_secs(&self) -> f64 {
        self.accumulated.as_secs_f64()
    }

    /// Begin a new interval on an existing record (`Sum` mode restarts).
    ///
    /// The accumulator is preserved; a new title or origin replaces the
    /// previous one when supplied.
    pub(crate) fn reopen(&mut self, title: Option<&str>, origin: Option<Origin>) {
        self.started_at = Instant::now();
        self.stopped_at = None;
        self.occurrences += 1;
        if title.is_some() {
            self.title = title.map(str::to_string);
        }
        if origin.is_some() {
            self.origin = origin;
        }
    }

    /// Record the stop reading and fold the elapsed interval in.
    ///
    /// Callers must check `is_running` first; finishing twice would
    /// double-count a `Sum` accumulator.
    pub(crate) fn finish(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.started_at);
        self.stopped_at = Some(now);
        match self.mode {
            TimerMode::Sum => self.accumulated += elapsed,
            TimerMode::Default | TimerMode::Stack => self.accumulated = elapsed,
        }
        elapsed
    }
}
