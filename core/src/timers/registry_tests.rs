//! Tests for TimerRegistry mode semantics
//!
//! Verifies keying, mode merge behavior, last-started resolution, and
//! report-time reconciliation. Timing assertions use real sleeps with
//! bounds loose enough for scheduler jitter.

use std::thread;
use std::time::Duration;

use super::{TimerEntry, TimerError, TimerMode, TimerRegistry};

fn sleep_ms(ms: u64) {
    thread::sleep(Duration::from_millis(ms));
}

/// Seconds measured under `key`, summed across stack entries
fn measured(registry: &TimerRegistry, key: &str) -> f64 {
    registry
        .get(key)
        .map(|entry| entry.timers().iter().map(|t| t.accumulated_secs()).sum())
        .unwrap_or(0.0)
}

#[test]
fn test_default_timer_measures_interval() {
    let mut registry = TimerRegistry::new();

    registry.start(Some("a"), None, TimerMode::Default).unwrap();
    sleep_ms(50);
    registry.stop(Some("a")).unwrap();

    let secs = measured(&registry, "a");
    assert!(secs >= 0.045, "expected at least the slept 50ms, got {secs}");
    assert!(secs < 0.5, "expected no runaway interval, got {secs}");

    let entry = registry.get("a").unwrap();
    let timer = &entry.timers()[0];
    assert!(!timer.is_running());
    assert_eq!(timer.occurrences, 1);
}

#[test]
fn test_sum_accumulates_across_cycles() {
    let mut registry = TimerRegistry::new();

    registry.start_sum(Some("s"), None).unwrap();
    sleep_ms(10);
    registry.stop(Some("s")).unwrap();

    registry.start_sum(Some("s"), None).unwrap();
    sleep_ms(10);
    registry.stop(Some("s")).unwrap();

    let entry = registry.get("s").unwrap();
    let timer = &entry.timers()[0];
    assert_eq!(timer.occurrences, 2, "both starts fold into one record");

    let secs = timer.accumulated_secs();
    assert!(secs >= 0.020, "expected both intervals summed, got {secs}");
    assert!(secs < 0.5, "expected no runaway total, got {secs}");

    assert_eq!(registry.len(), 1, "sum cycles share a single entry");
}

#[test]
fn test_stack_starts_are_independent() {
    let mut registry = TimerRegistry::new();

    registry.start_stack(Some("st"), None).unwrap();
    sleep_ms(10);
    registry.start_stack(Some("st"), None).unwrap();
    sleep_ms(10);
    registry.stop(Some("st")).unwrap();

    let entry = registry.get("st").unwrap();
    assert!(matches!(entry, TimerEntry::Stack(_)));
    let timers = entry.timers();
    assert_eq!(timers.len(), 2, "each start appends its own entry");
    assert!(timers.iter().all(|t| !t.is_running()), "stop closes every open entry");
    assert!(timers.iter().all(|t| t.occurrences == 1));

    // The first entry ran through both sleeps, the second only the last
    assert!(timers[0].accumulated_secs() >= timers[1].accumulated_secs());
    assert!(timers[1].accumulated_secs() >= 0.009);
}

#[test]
fn test_stack_stop_skips_already_closed_entries() {
    let mut registry = TimerRegistry::new();

    registry.start_stack(Some("st"), None).unwrap();
    sleep_ms(10);
    registry.stop(Some("st")).unwrap();
    let first = measured(&registry, "st");

    registry.start_stack(Some("st"), None).unwrap();
    sleep_ms(10);
    registry.stop(Some("st")).unwrap();

    let entry = registry.get("st").unwrap();
    assert_eq!(entry.timers().len(), 2);

    // The first entry's reading is untouched by the second stop
    let first_after = entry.timers()[0].accumulated_secs();
    assert_eq!(first, first_after);
}

#[test]
fn test_auto_keys_increment() {
    let mut registry = TimerRegistry::new();

    let k1 = registry.start(None, None, TimerMode::Default).unwrap();
    let k2 = registry.start(None, None, TimerMode::Default).unwrap();
    let k3 = registry.start(None, None, TimerMode::Default).unwrap();

    assert_eq!(k1, "timer_001");
    assert_eq!(k2, "timer_002");
    assert_eq!(k3, "timer_003");
}

#[test]
fn test_auto_keys_for_sum_and_stack_are_fixed_literals() {
    let mut registry = TimerRegistry::new();

    assert_eq!(registry.start_sum(None, None).unwrap(), "sum");
    registry.stop(Some("sum")).unwrap();
    assert_eq!(registry.start_sum(None, None).unwrap(), "sum");
    assert_eq!(registry.len(), 1, "auto sum reuses one entry");

    assert_eq!(registry.start_stack(None, None).unwrap(), "stack");
    assert_eq!(registry.start_stack(None, None).unwrap(), "stack");
    assert_eq!(
        registry.get("stack").unwrap().timers().len(),
        2,
        "auto stack appends under one key"
    );
}

#[test]
fn test_mode_conflict_rejected() {
    let mut registry = TimerRegistry::new();

    registry.start(Some("x"), None, TimerMode::Default).unwrap();
    let err = registry.start_stack(Some("x"), None).unwrap_err();
    assert_eq!(
        err,
        TimerError::ModeConflict {
            key: "x".to_string(),
            existing: TimerMode::Default,
            requested: TimerMode::Stack,
        }
    );

    registry.start_sum(Some("y"), None).unwrap();
    let err = registry.start(Some("y"), None, TimerMode::Default).unwrap_err();
    assert!(matches!(err, TimerError::ModeConflict { .. }));
}

#[test]
fn test_duplicate_default_key_rejected() {
    let mut registry = TimerRegistry::new();

    registry.start(Some("x"), None, TimerMode::Default).unwrap();
    let err = registry.start(Some("x"), None, TimerMode::Default).unwrap_err();
    assert_eq!(err, TimerError::DuplicateKey("x".to_string()));

    // The running timer is untouched by the rejected restart
    assert!(registry.get("x").unwrap().has_running());
}

#[test]
fn test_stop_missing_key() {
    let mut registry = TimerRegistry::new();

    let err = registry.stop(Some("missing")).unwrap_err();
    assert_eq!(err, TimerError::TimerNotFound("missing".to_string()));
}

#[test]
fn test_double_stop_rejected() {
    let mut registry = TimerRegistry::new();

    registry.start(Some("x"), None, TimerMode::Default).unwrap();
    registry.stop(Some("x")).unwrap();
    let err = registry.stop(Some("x")).unwrap_err();
    assert_eq!(err, TimerError::AlreadyStopped("x".to_string()));
}

#[test]
fn test_stop_fully_closed_stack_rejected() {
    let mut registry = TimerRegistry::new();

    registry.start_stack(Some("st"), None).unwrap();
    registry.stop(Some("st")).unwrap();
    let err = registry.stop(Some("st")).unwrap_err();
    assert_eq!(err, TimerError::AlreadyStopped("st".to_string()));
}

#[test]
fn test_stop_without_key_resolves_last_started() {
    let mut registry = TimerRegistry::new();

    registry.start(Some("first"), None, TimerMode::Default).unwrap();
    registry.start(Some("second"), None, TimerMode::Default).unwrap();

    let stopped = registry.stop(None).unwrap();
    assert_eq!(stopped, "second", "reverse insertion order wins");

    let stopped = registry.stop(None).unwrap();
    assert_eq!(stopped, "first");

    let err = registry.stop(None).unwrap_err();
    assert_eq!(err, TimerError::NoActiveTimer);
}

#[test]
fn test_last_started_skips_finished_entries() {
    let mut registry = TimerRegistry::new();

    assert_eq!(registry.last_started(), None);

    registry.start(Some("a"), None, TimerMode::Default).unwrap();
    registry.start(Some("b"), None, TimerMode::Default).unwrap();
    assert_eq!(registry.last_started(), Some("b"));

    registry.stop(Some("b")).unwrap();
    assert_eq!(registry.last_started(), Some("a"));

    registry.stop(Some("a")).unwrap();
    assert_eq!(registry.last_started(), None);
}

#[test]
fn test_last_started_sees_open_stack_entries() {
    let mut registry = TimerRegistry::new();

    registry.start_stack(Some("st"), None).unwrap();
    registry.start(Some("z"), None, TimerMode::Default).unwrap();
    registry.stop(Some("z")).unwrap();

    assert_eq!(registry.last_started(), Some("st"));
}

#[test]
fn test_stop_all_closes_everything_and_is_idempotent() {
    let mut registry = TimerRegistry::new();

    registry.start(Some("a"), None, TimerMode::Default).unwrap();
    registry.start_sum(Some("s"), None).unwrap();
    registry.start_stack(Some("st"), None).unwrap();
    registry.start_stack(Some("st"), None).unwrap();
    sleep_ms(10);

    registry.stop_all();
    assert_eq!(registry.last_started(), None, "nothing left running");

    let readings: Vec<f64> = registry
        .entries()
        .flat_map(|(_, entry)| entry.timers().iter().map(|t| t.accumulated_secs()))
        .collect();
    assert_eq!(readings.len(), 4);
    assert!(readings.iter().all(|&s| s >= 0.009));

    // Second call finds nothing to close and changes no reading
    sleep_ms(5);
    registry.stop_all();
    let after: Vec<f64> = registry
        .entries()
        .flat_map(|(_, entry)| entry.timers().iter().map(|t| t.accumulated_secs()))
        .collect();
    assert_eq!(readings, after, "stop_all must be idempotent");
}

#[test]
fn test_snapshot_preserves_insertion_order() {
    let mut registry = TimerRegistry::new();

    registry.start(Some("zeta"), None, TimerMode::Default).unwrap();
    registry.start_sum(Some("alpha"), None).unwrap();
    registry.start_stack(Some("mid"), None).unwrap();
    registry.stop_all();

    let snapshot = registry.snapshot();
    let keys: Vec<&str> = snapshot.entries.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, ["zeta", "alpha", "mid"], "report order is insertion order");
    assert_eq!(snapshot.entries[2].mode, TimerMode::Stack);
}

#[test]
fn test_snapshot_totals_and_running_flag() {
    let mut registry = TimerRegistry::new();

    registry.start(Some("done"), None, TimerMode::Default).unwrap();
    sleep_ms(10);
    registry.stop(Some("done")).unwrap();
    registry.start(Some("open"), None, TimerMode::Default).unwrap();

    let snapshot = registry.snapshot();
    assert!(!snapshot.is_empty());
    assert_eq!(snapshot.len(), 2);

    let done = &snapshot.entries[0].timers[0];
    let open = &snapshot.entries[1].timers[0];
    assert!(!done.running);
    assert!(open.running, "snapshot does not stop anything");
    assert_eq!(open.seconds, 0.0, "open interval not folded in yet");

    let total = snapshot.total_seconds();
    assert!((total - done.seconds).abs() < f64::EPSILON);
}

#[test]
fn test_titles_and_origins_recorded() {
    let mut registry = TimerRegistry::new();

    registry
        .start(Some("bar"), Some("My flowers are beautiful"), TimerMode::Default)
        .unwrap();
    registry.stop(Some("bar")).unwrap();

    let timer = &registry.get("bar").unwrap().timers()[0];
    assert_eq!(timer.title.as_deref(), Some("My flowers are beautiful"));

    let origin = timer.origin.expect("start captures its call site");
    assert!(origin.file.ends_with("registry_tests.rs"));
    assert!(origin.line > 0);
}

#[test]
fn test_sum_reopen_replaces_title_and_origin() {
    let mut registry = TimerRegistry::new();

    registry.start_sum(Some("s"), Some("first")).unwrap();
    registry.stop(Some("s")).unwrap();
    let first_line = registry.get("s").unwrap().timers()[0]
        .origin
        .expect("origin captured")
        .line;

    registry.start_sum(Some("s"), Some("second")).unwrap();
    registry.stop(Some("s")).unwrap();

    let timer = &registry.get("s").unwrap().timers()[0];
    assert_eq!(timer.title.as_deref(), Some("second"));
    let second_line = timer.origin.expect("origin captured").line;
    assert_ne!(first_line, second_line, "reopen records the latest start site");
}
