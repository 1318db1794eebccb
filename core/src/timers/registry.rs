//! Timer registry
//!
//! Owns all timer state for one measurement scope (a request, a CLI run)
//! and enforces the mode semantics on every `start`/`stop`. Entries are
//! kept in insertion order, which is also the report order; they are never
//! removed, the registry is simply dropped with its scope.

use indexmap::IndexMap;

use super::error::TimerError;
use super::snapshot::{SnapshotEntry, TimerSnapshot, TimerView};
use super::timer::{Origin, Timer, TimerMode};

/// Per-key slot inside the registry.
#[derive(Debug, Clone)]
pub enum TimerEntry {
    /// One timer per key (`Default` and `Sum` modes)
    Single(Timer),
    /// Independent timers sharing the key, in start order (`Stack` mode)
    Stack(Vec<Timer>),
}

impl TimerEntry {
    /// The mode the key was first used in
    pub fn mode(&self) -> TimerMode {
        match self {
            Self::Single(timer) => timer.mode,
            Self::Stack(_) => TimerMode::Stack,
        }
    }

    /// All timers under this key, in start order
    pub fn timers(&self) -> &[Timer] {
        match self {
            Self::Single(timer) => std::slice::from_ref(timer),
            Self::Stack(timers) => timers,
        }
    }

    /// Whether any timer under this key is still running
    pub fn has_running(&self) -> bool {
        self.timers().iter().any(Timer::is_running)
    }
}

/// Insertion-ordered collection of timers, keyed by name.
///
/// All mutation goes through [`start`](Self::start) and
/// [`stop`](Self::stop); reporting goes through
/// [`snapshot`](Self::snapshot). The registry is single-threaded state:
/// one instance per unit of work, serialized externally if a concurrent
/// host ever needs to share it.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    entries: IndexMap<String, TimerEntry>,
    auto_key_seq: u32,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a timer under `key` with the given mode.
    ///
    /// With no key, one is generated: a strictly increasing `timer_NNN`
    /// for `Default`, the fixed literals `sum` / `stack` for the other
    /// modes. Returns the resolved key so auto-keyed timers can be
    /// stopped by name.
    ///
    /// # Errors
    ///
    /// - [`TimerError::ModeConflict`] when the key already exists under a
    ///   different mode
    /// - [`TimerError::DuplicateKey`] when a `Default` key is started a
    ///   second time (restart intent is expressed as `Sum` mode)
    #[track_caller]
    pub fn start(
        &mut self,
        key: Option<&str>,
        title: Option<&str>,
        mode: TimerMode,
    ) -> Result<String, TimerError> {
        self.start_with_origin(key, title, mode, Some(Origin::caller()))
    }

    /// Start an accumulating timer; repeated cycles on the key fold into
    /// one total.
    #[track_caller]
    pub fn start_sum(
        &mut self,
        key: Option<&str>,
        title: Option<&str>,
    ) -> Result<String, TimerError> {
        self.start_with_origin(key, title, TimerMode::Sum, Some(Origin::caller()))
    }

    /// Start an independent timer under a shared key; every call appends
    /// a new concurrently open entry.
    #[track_caller]
    pub fn start_stack(
        &mut self,
        key: Option<&str>,
        title: Option<&str>,
    ) -> Result<String, TimerError> {
        self.start_with_origin(key, title, TimerMode::Stack, Some(Origin::caller()))
    }

    /// `start` with an explicit (or absent) call-site origin, for callers
    /// that capture the location themselves.
    pub fn start_with_origin(
        &mut self,
        key: Option<&str>,
        title: Option<&str>,
        mode: TimerMode,
        origin: Option<Origin>,
    ) -> Result<String, TimerError> {
        let key = match key {
            Some(key) => key.to_string(),
            None => self.auto_key(mode),
        };

        if let Some(entry) = self.entries.get_mut(key.as_str()) {
            let existing = entry.mode();
            if existing != mode {
                return Err(TimerError::ModeConflict {
                    key,
                    existing,
                    requested: mode,
                });
            }
            match entry {
                TimerEntry::Single(timer) => {
                    if mode == TimerMode::Default {
                        return Err(TimerError::DuplicateKey(key));
                    }
                    timer.reopen(title, origin);
                }
                TimerEntry::Stack(timers) => {
                    timers.push(Timer::new(&key, TimerMode::Stack, title, origin));
                }
            }
            return Ok(key);
        }

        // First use of the key fixes its mode
        let timer = Timer::new(&key, mode, title, origin);
        let entry = match mode {
            TimerMode::Stack => TimerEntry::Stack(vec![timer]),
            TimerMode::Default | TimerMode::Sum => TimerEntry::Single(timer),
        };
        self.entries.insert(key.clone(), entry);
        Ok(key)
    }

    /// Stop a timer and fold the elapsed interval into its record.
    ///
    /// With no key, resolves to the most recently inserted entry that
    /// still has a running timer. Stack keys close *every* open entry in
    /// the sequence, since several may be open at once. Returns the
    /// resolved key.
    ///
    /// # Errors
    ///
    /// - [`TimerError::NoActiveTimer`] when no key is given and nothing
    ///   is running
    /// - [`TimerError::TimerNotFound`] when the key has no entry
    /// - [`TimerError::AlreadyStopped`] when nothing under the key is
    ///   still running
    pub fn stop(&mut self, key: Option<&str>) -> Result<String, TimerError> {
        let key = match key {
            Some(key) => key.to_string(),
            None => self
                .last_started()
                .map(str::to_string)
                .ok_or(TimerError::NoActiveTimer)?,
        };

        let entry = self
            .entries
            .get_mut(key.as_str())
            .ok_or_else(|| TimerError::TimerNotFound(key.clone()))?;

        match entry {
            TimerEntry::Single(timer) => {
                if !timer.is_running() {
                    return Err(TimerError::AlreadyStopped(key));
                }
                timer.finish();
            }
            TimerEntry::Stack(timers) => {
                let mut closed = 0usize;
                for timer in timers.iter_mut().filter(|t| t.is_running()) {
                    timer.finish();
                    closed += 1;
                }
                if closed == 0 {
                    return Err(TimerError::AlreadyStopped(key));
                }
            }
        }

        Ok(key)
    }

    /// Key of the most recently inserted entry with a running timer, or
    /// `None` when everything is closed.
    pub fn last_started(&self) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(_, entry)| entry.has_running())
            .map(|(key, _)| key.as_str())
    }

    /// Close every running timer, in insertion order.
    ///
    /// Called by reporting adapters so partially finished timers still
    /// show a duration. Idempotent: a second call finds nothing running.
    pub fn stop_all(&mut self) {
        let mut closed = 0usize;
        for entry in self.entries.values_mut() {
            let timers = match entry {
                TimerEntry::Single(timer) => std::slice::from_mut(timer),
                TimerEntry::Stack(timers) => timers.as_mut_slice(),
            };
            for timer in timers.iter_mut().filter(|t| t.is_running()) {
                timer.finish();
                closed += 1;
            }
        }
        if closed > 0 {
            tracing::debug!(closed, "closed running timers at report time");
        }
    }

    /// Read-only, insertion-ordered view of every entry.
    ///
    /// The snapshot is an owned, serializable copy; taking one does not
    /// stop anything, so running timers appear with their flag set and
    /// whatever they have accumulated so far.
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            entries: self
                .entries
                .iter()
                .map(|(key, entry)| SnapshotEntry {
                    key: key.clone(),
                    mode: entry.mode(),
                    timers: entry.timers().iter().map(TimerView::from).collect(),
                })
                .collect(),
        }
    }

    /// Borrowing iteration over entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &TimerEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Look up a single entry by key
    pub fn get(&self, key: &str) -> Option<&TimerEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn auto_key(&mut self, mode: TimerMode) -> String {
        match mode {
            TimerMode::Default => {
                self.auto_key_seq += 1;
                format!("timer_{:03}", self.auto_key_seq)
            }
            TimerMode::Sum => "sum".to_string(),
            TimerMode::Stack => "stack".to_string(),
        }
    }
}
