//! Demo scenarios
//!
//! Small workloads that exercise every timer mode and print a full panel
//! report. Sleeps stand in for real work.

use std::thread;
use std::time::Duration;

use lapse_core::{TimerError, TimerMode, TimerPanel};

/// Sleep for a varied 50-100 ms slice of pretend work
fn work(step: u64) {
    let ms = 50 + (step * 17) % 51;
    thread::sleep(Duration::from_millis(ms));
}

/// Named timer, titled timer, two auto-keyed timers, then an
/// accumulating loop under one key.
pub fn basic(panel: &mut TimerPanel) -> Result<(), TimerError> {
    panel.start(Some("foo"), None)?;
    work(0);
    panel.stop(None)?;

    panel.start(Some("bar"), Some("My flowers are beautiful"))?;
    work(1);
    panel.stop(Some("bar"))?;

    for step in 2..4 {
        panel.start(None, None)?;
        work(step);
        panel.stop(None)?;
    }

    for step in 0..16 {
        panel.start_sum(Some("sum"), Some("Sum of multiple timers"))?;
        work(step);
        panel.stop(Some("sum"))?;
    }

    Ok(())
}

/// Auto-keyed and explicit sum cycles, then a stack of auto-keyed
/// entries left open for the report to close.
pub fn modes(panel: &mut TimerPanel) -> Result<(), TimerError> {
    for step in 0..4 {
        panel.start_sum(None, None)?;
        work(step);
        panel.stop(None)?;

        panel.start_sum(Some("mysum"), None)?;
        work(step + 1);
        panel.stop(Some("mysum"))?;
    }

    for step in 0..4 {
        panel.start_stack(None, None)?;
        work(step);
        panel.stop(None)?;
    }

    Ok(())
}

/// Repeated start/stop cycles under one key, in whatever mode the
/// caller picked. Default mode rejects a second cycle on an explicit
/// key; restart intent belongs to sum mode.
pub fn cycles(
    panel: &mut TimerPanel,
    mode: TimerMode,
    key: Option<&str>,
    ms: u64,
    count: u32,
) -> Result<(), TimerError> {
    for _ in 0..count {
        let key = panel.registry_mut().start(key, None, mode)?;
        thread::sleep(Duration::from_millis(ms));
        panel.stop(Some(&key))?;
    }

    Ok(())
}
