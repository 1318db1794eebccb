//! Panel rendering
//!
//! [`TimerPanel`] is the report-facing wrapper around a
//! [`TimerRegistry`]: it closes out running timers at report time and
//! renders the snapshot as text for a debug bar or terminal. Rendering is
//! best-effort display glue; all bookkeeping rules live in the registry.

use std::fmt::{self, Write as _};

use crate::format::{DefaultFormatter, DurationFormatter, FormattedDuration, Severity};
use crate::preferences::PanelPreferences;
use crate::timers::{TimerError, TimerMode, TimerRegistry, TimerSnapshot};

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

const KEY_WIDTH: usize = 18;
const TITLE_WIDTH: usize = 30;
const TIME_WIDTH: usize = 14;
const PANEL_WIDTH: usize = 80;

/// A timer registry plus the display policy to report it with.
pub struct TimerPanel {
    registry: TimerRegistry,
    formatter: Box<dyn DurationFormatter>,
    preferences: PanelPreferences,
}

impl TimerPanel {
    pub fn new() -> Self {
        Self::with_preferences(PanelPreferences::default())
    }

    pub fn with_preferences(preferences: PanelPreferences) -> Self {
        let formatter = DefaultFormatter::with_elevated_threshold(preferences.elevated_threshold_ms);
        Self {
            registry: TimerRegistry::new(),
            formatter: Box::new(formatter),
            preferences,
        }
    }

    /// Swap in a custom display policy
    pub fn set_formatter(&mut self, formatter: impl DurationFormatter + 'static) -> &mut Self {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn registry(&self) -> &TimerRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TimerRegistry {
        &mut self.registry
    }

    pub fn preferences(&self) -> &PanelPreferences {
        &self.preferences
    }

    // ─── Registry delegations ───────────────────────────────────────────────

    #[track_caller]
    pub fn start(&mut self, key: Option<&str>, title: Option<&str>) -> Result<String, TimerError> {
        self.registry.start(key, title, TimerMode::Default)
    }

    #[track_caller]
    pub fn start_sum(
        &mut self,
        key: Option<&str>,
        title: Option<&str>,
    ) -> Result<String, TimerError> {
        self.registry.start_sum(key, title)
    }

    #[track_caller]
    pub fn start_stack(
        &mut self,
        key: Option<&str>,
        title: Option<&str>,
    ) -> Result<String, TimerError> {
        self.registry.start_stack(key, title)
    }

    pub fn stop(&mut self, key: Option<&str>) -> Result<String, TimerError> {
        self.registry.stop(key)
    }

    pub fn last_started(&self) -> Option<&str> {
        self.registry.last_started()
    }

    pub fn stop_all(&mut self) {
        self.registry.stop_all();
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.registry.snapshot()
    }

    // ─── Reports ────────────────────────────────────────────────────────────

    /// Short tab label: total measured time across every timer.
    ///
    /// Closes running timers first so partial measurements still count.
    pub fn tab(&mut self) -> String {
        self.registry.stop_all();
        let snapshot = self.registry.snapshot();
        let total = self
            .formatter
            .format(snapshot.total_seconds(), self.preferences.precision);
        format!("Timers: {}", total.text)
    }

    /// Full report: one row per timer in insertion order, stack entries
    /// indented under their key, total at the bottom.
    pub fn panel(&mut self) -> String {
        self.registry.stop_all();
        let snapshot = self.registry.snapshot();

        let mut out = String::new();
        if snapshot.is_empty() {
            let _ = writeln!(out, "no timers recorded");
            return out;
        }

        let _ = writeln!(
            out,
            "{:<KEY_WIDTH$} {:<TITLE_WIDTH$} {:<TIME_WIDTH$} {:>5}  Origin",
            "Key", "Title", "Time", "Count"
        );
        let _ = writeln!(out, "{}", "-".repeat(PANEL_WIDTH));

        for entry in &snapshot.entries {
            match entry.mode {
                TimerMode::Stack => {
                    let aggregate = self
                        .formatter
                        .format(entry.seconds(), self.preferences.precision);
                    let _ = writeln!(
                        out,
                        "{:<KEY_WIDTH$} {:<TITLE_WIDTH$} {} {:>5}",
                        entry.key,
                        "-",
                        self.paint(&aggregate),
                        entry.timers.len()
                    );
                    for (index, timer) in entry.timers.iter().enumerate() {
                        let formatted =
                            self.formatter.format(timer.seconds, self.preferences.precision);
                        let label = format!("  #{}", index + 1);
                        let _ = writeln!(
                            out,
                            "{:<KEY_WIDTH$} {:<TITLE_WIDTH$} {} {:>5}  {}",
                            label,
                            timer.title.as_deref().unwrap_or("-"),
                            self.paint(&formatted),
                            timer.occurrences,
                            self.origin_cell(timer.origin.as_ref())
                        );
                    }
                }
                TimerMode::Default | TimerMode::Sum => {
                    let timer = &entry.timers[0];
                    let formatted =
                        self.formatter.format(timer.seconds, self.preferences.precision);
                    let _ = writeln!(
                        out,
                        "{:<KEY_WIDTH$} {:<TITLE_WIDTH$} {} {:>5}  {}",
                        entry.key,
                        timer.title.as_deref().unwrap_or("-"),
                        self.paint(&formatted),
                        timer.occurrences,
                        self.origin_cell(timer.origin.as_ref())
                    );
                }
            }
        }

        let total = self
            .formatter
            .format(snapshot.total_seconds(), self.preferences.precision);
        let _ = writeln!(out, "{}", "-".repeat(PANEL_WIDTH));
        let _ = writeln!(
            out,
            "{:<KEY_WIDTH$} {:<TITLE_WIDTH$} {}",
            "Total",
            "",
            self.paint(&total)
        );

        out
    }

    /// Fixed-width time cell, colorized by severity when enabled
    fn paint(&self, formatted: &FormattedDuration) -> String {
        let cell = format!("{:<TIME_WIDTH$}", formatted.text);
        let color = match formatted.severity {
            Severity::Severe => Some(RED),
            Severity::Elevated => Some(YELLOW),
            Severity::Normal => None,
        };
        match color {
            Some(color) if self.preferences.colors => format!("{color}{cell}{RESET}"),
            _ => cell,
        }
    }

    fn origin_cell(&self, origin: Option<&crate::timers::Origin>) -> String {
        if !self.preferences.show_origin {
            return String::new();
        }
        origin.map(|o| o.to_string()).unwrap_or_default()
    }
}

impl Default for TimerPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TimerPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerPanel")
            .field("registry", &self.registry)
            .field("preferences", &self.preferences)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{FormattedDuration, Severity};

    fn plain_panel() -> TimerPanel {
        TimerPanel::with_preferences(PanelPreferences {
            colors: false,
            ..PanelPreferences::default()
        })
    }

    #[test]
    fn empty_panel_reports_nothing_recorded() {
        let mut panel = plain_panel();
        assert_eq!(panel.panel(), "no timers recorded\n");
    }

    #[test]
    fn tab_shows_a_total() {
        let mut panel = plain_panel();
        panel.start(Some("work"), None).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));

        let tab = panel.tab();
        assert!(tab.starts_with("Timers: "), "got {tab:?}");
        assert!(tab.ends_with("ms"), "sub-second totals render in ms: {tab:?}");
    }

    #[test]
    fn panel_lists_rows_in_insertion_order_with_total() {
        let mut panel = plain_panel();
        panel.start(Some("zeta"), Some("First thing")).unwrap();
        panel.stop(Some("zeta")).unwrap();
        panel.start_sum(Some("alpha"), None).unwrap();
        panel.stop(Some("alpha")).unwrap();

        let report = panel.panel();
        let zeta = report.find("zeta").expect("zeta row present");
        let alpha = report.find("alpha").expect("alpha row present");
        assert!(zeta < alpha, "rows follow insertion order");
        assert!(report.contains("First thing"));
        assert!(report.contains("Total"));
    }

    #[test]
    fn stack_entries_render_indented() {
        let mut panel = plain_panel();
        panel.start_stack(Some("st"), None).unwrap();
        panel.start_stack(Some("st"), None).unwrap();

        let report = panel.panel();
        assert!(report.contains("\n  #1"), "first stack entry indented: {report}");
        assert!(report.contains("\n  #2"), "second stack entry indented: {report}");
    }

    #[test]
    fn report_closes_running_timers() {
        let mut panel = plain_panel();
        panel.start(Some("open"), None).unwrap();

        let _ = panel.panel();
        assert_eq!(panel.last_started(), None);
    }

    #[test]
    fn colors_disabled_leaves_plain_text() {
        let mut panel = plain_panel();
        panel.start(Some("x"), None).unwrap();

        let report = panel.panel();
        assert!(!report.contains('\x1b'));
    }

    #[test]
    fn severe_durations_are_painted_when_colors_enabled() {
        let mut panel = TimerPanel::with_preferences(PanelPreferences::default());
        panel.set_formatter(|_seconds: f64, _precision: usize| FormattedDuration {
            text: "9 s".to_string(),
            severity: Severity::Severe,
        });
        panel.start(Some("slow"), None).unwrap();

        let report = panel.panel();
        assert!(report.contains("\x1b[31m"), "severe rows painted red: {report:?}");
    }

    #[test]
    fn origin_column_can_be_hidden() {
        let mut panel = TimerPanel::with_preferences(PanelPreferences {
            colors: false,
            show_origin: false,
            ..PanelPreferences::default()
        });
        panel.start(Some("x"), None).unwrap();

        let report = panel.panel();
        assert!(!report.contains("panel.rs:"), "origin hidden: {report}");
    }
}
