pub mod format;
pub mod globals;
pub mod panel;
pub mod preferences;
pub mod timers;

// Re-exports for convenience
pub use format::{DefaultFormatter, DurationFormatter, FormattedDuration, Severity};
pub use globals::{
    last_started_timer, register, register_panel, start_timer, start_timer_stack, start_timer_sum,
    stop_timer, unregister, with_panel,
};
pub use panel::TimerPanel;
pub use preferences::{PanelPreferences, PreferencesError};
pub use timers::{
    Origin, SnapshotEntry, Timer, TimerEntry, TimerError, TimerMode, TimerRegistry, TimerSnapshot,
    TimerView,
};
