//! Splitting durations into display fields.

use std::fmt;

/// A duration rounded to the nearest tenth of a second and split into
/// clock fields. Hours are unbounded.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TimeParts {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub tenths: u64,
}

impl TimeParts {
    /// Decompose a duration in seconds. Negative and non-finite input is
    /// treated as zero; halves round away from zero.
    pub fn from_secs_f64(elapsed: f64) -> Self {
        let tenths_total = if elapsed.is_finite() && elapsed > 0.0 {
            (elapsed * 10.0).round() as u64
        } else {
            0
        };
        Self::from_tenths(tenths_total)
    }

    /// Decompose a duration in milliseconds.
    pub fn from_ms(ms: u64) -> Self {
        Self::from_tenths(ms.saturating_add(50) / 100)
    }

    pub fn from_tenths(tenths_total: u64) -> Self {
        let hours = tenths_total / 36_000;
        let rem = tenths_total % 36_000;
        let minutes = rem / 600;
        let rem = rem % 600;
        Self {
            hours,
            minutes,
            seconds: rem / 10,
            tenths: rem % 10,
        }
    }

    pub fn total_tenths(&self) -> u64 {
        self.hours * 36_000 + self.minutes * 600 + self.seconds * 10 + self.tenths
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.total_tenths() as f64 / 10.0
    }
}

/// Formats as "HH:MM:SS.t".
impl fmt::Display for TimeParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{}",
            self.hours, self.minutes, self.seconds, self.tenths
        )
    }
}

/// Format milliseconds as "HH:MM:SS.t"
pub fn format_hms_tenths(ms: u64) -> String {
    TimeParts::from_ms(ms).to_string()
}

/// Format whole seconds as "HH:MM:SS"
pub fn format_hms(total_secs: u64) -> String {
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// Format milliseconds rounded to the nearest second as "HH:MM:SS"
pub fn format_hms_rounded(ms: u64) -> String {
    format_hms(ms.saturating_add(500) / 1000)
}
