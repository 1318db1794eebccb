//! Duration formatting for panel display
//!
//! Formatting is a strategy injected into the panel, so hosts can change
//! display policy without touching timer bookkeeping. The default policy
//! renders a second and above in seconds, anything below in milliseconds,
//! and grades each reading with a severity hint for coloring.

use std::fmt;

use serde::Serialize;

/// Display urgency of a measured duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Normal,
    /// Sub-second, but slow enough to stand out
    Elevated,
    /// A second or more
    Severe,
}

/// A duration rendered for display, with its severity hint.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedDuration {
    pub text: String,
    pub severity: Severity,
}

impl fmt::Display for FormattedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Strategy for turning raw seconds into display text.
pub trait DurationFormatter {
    fn format(&self, seconds: f64, precision: usize) -> FormattedDuration;
}

/// Plain functions and closures work as formatters directly.
impl<F> DurationFormatter for F
where
    F: Fn(f64, usize) -> FormattedDuration,
{
    fn format(&self, seconds: f64, precision: usize) -> FormattedDuration {
        self(seconds, precision)
    }
}

/// The stock display policy.
///
/// Durations of a second or more are rendered in seconds and graded
/// `Severe`; below that they are rendered in milliseconds, graded
/// `Elevated` from the configured threshold up. Values are rounded to
/// the requested precision with trailing zeros trimmed.
#[derive(Debug, Clone, Copy)]
pub struct DefaultFormatter {
    elevated_threshold_ms: f64,
}

impl DefaultFormatter {
    pub const ELEVATED_THRESHOLD_MS: f64 = 500.0;

    pub fn new() -> Self {
        Self::with_elevated_threshold(Self::ELEVATED_THRESHOLD_MS)
    }

    /// Policy with a custom millisecond threshold for the `Elevated` grade
    pub fn with_elevated_threshold(threshold_ms: f64) -> Self {
        Self {
            elevated_threshold_ms: threshold_ms,
        }
    }
}

impl Default for DefaultFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl DurationFormatter for DefaultFormatter {
    fn format(&self, seconds: f64, precision: usize) -> FormattedDuration {
        let (value, unit, severity) = if seconds >= 1.0 {
            (seconds, "s", Severity::Severe)
        } else {
            let ms = seconds * 1000.0;
            let severity = if ms >= self.elevated_threshold_ms {
                Severity::Elevated
            } else {
                Severity::Normal
            };
            (ms, "ms", severity)
        };

        FormattedDuration {
            text: format!("{} {}", round_to(value, precision), unit),
            severity,
        }
    }
}

/// Round to `precision` decimal places, printed without trailing zeros
fn round_to(value: f64, precision: usize) -> String {
    let text = format!("{value:.precision$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}
