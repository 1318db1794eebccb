//! Panel registration and shortcut functions
//!
//! The explicit [`TimerPanel`] instance is the primary API; these
//! shortcuts exist for instrumentation sprinkled through code that has no
//! panel handle in reach. The registered panel is scoped to the current
//! thread, matching the single-threaded cooperative model: one panel per
//! unit of work, dropped with it.

use std::cell::RefCell;

use crate::panel::TimerPanel;
use crate::timers::{Origin, TimerError, TimerMode};

thread_local! {
    static PANEL: RefCell<Option<TimerPanel>> = const { RefCell::new(None) };
}

/// Install a default panel for the current thread if none is registered.
///
/// Idempotent: returns `true` when a new panel was installed, `false`
/// when one was already present.
pub fn register() -> bool {
    PANEL.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_some() {
            false
        } else {
            *slot = Some(TimerPanel::new());
            true
        }
    })
}

/// Replace the registered panel, returning the previous one.
pub fn register_panel(panel: TimerPanel) -> Option<TimerPanel> {
    PANEL.with(|slot| slot.borrow_mut().replace(panel))
}

/// Remove the registered panel, ending the current measurement scope.
pub fn unregister() -> Option<TimerPanel> {
    PANEL.with(|slot| slot.borrow_mut().take())
}

/// Run `f` against the registered panel, installing a default one first
/// when none exists yet.
pub fn with_panel<R>(f: impl FnOnce(&mut TimerPanel) -> R) -> R {
    PANEL.with(|slot| {
        let mut slot = slot.borrow_mut();
        let panel = slot.get_or_insert_with(TimerPanel::new);
        f(panel)
    })
}

/// Start a default-mode timer on the registered panel.
#[track_caller]
pub fn start_timer(key: Option<&str>, title: Option<&str>) -> Result<String, TimerError> {
    let origin = Origin::caller();
    with_panel(|panel| {
        panel
            .registry_mut()
            .start_with_origin(key, title, TimerMode::Default, Some(origin))
    })
}

/// Start an accumulating timer on the registered panel.
#[track_caller]
pub fn start_timer_sum(key: Option<&str>, title: Option<&str>) -> Result<String, TimerError> {
    let origin = Origin::caller();
    with_panel(|panel| {
        panel
            .registry_mut()
            .start_with_origin(key, title, TimerMode::Sum, Some(origin))
    })
}

/// Start a stack-mode timer on the registered panel.
#[track_caller]
pub fn start_timer_stack(key: Option<&str>, title: Option<&str>) -> Result<String, TimerError> {
    let origin = Origin::caller();
    with_panel(|panel| {
        panel
            .registry_mut()
            .start_with_origin(key, title, TimerMode::Stack, Some(origin))
    })
}

/// Stop a timer on the registered panel; no key stops the last started.
pub fn stop_timer(key: Option<&str>) -> Result<String, TimerError> {
    with_panel(|panel| panel.stop(key))
}

/// Key of the most recently started, still-running timer.
pub fn last_started_timer() -> Option<String> {
    with_panel(|panel| panel.last_started().map(str::to_string))
}
