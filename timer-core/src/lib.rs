//! Pure timing logic library with no platform dependencies.
//! Testable on host; the GUI only renders what these types return.

pub mod alert;
pub mod clock;
pub mod countdown;
pub mod error;
pub mod format;
pub mod parse;
pub mod stopwatch;

pub use alert::{Alert, AlertSink};
pub use clock::{
    Clock, ClockReading, ClockRender, FixedClock, LocalClock, SweepBand, WallClock,
};
pub use countdown::{Countdown, CountdownBand, CountdownRender, CountdownState};
pub use error::{DurationError, ParseError, ValidationError};
pub use format::{format_hms, format_hms_rounded, format_hms_tenths, TimeParts};
pub use parse::{parse_countdown_duration, parse_duration};
pub use stopwatch::{Lap, Stopwatch, StopwatchRender, StopwatchState};

/// Nominal interval between ticks.
pub const TICK_INTERVAL_MS: u64 = 100;

/// A display component driven by a periodic tick.
///
/// `now_ms` is a monotonic millisecond reading shared by every component
/// ticked in the same pass.
pub trait Tickable {
    type Render;

    /// Advance one tick and return what to show.
    fn tick(&mut self, now_ms: u64) -> Self::Render;

    /// What to show right now, without advancing.
    fn render(&self, now_ms: u64) -> Self::Render;
}
