//! Wall clock display with a minute sweep.

use chrono::{Local, Timelike};

use crate::Tickable;

/// One read of the local time of day.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ClockReading {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Sub-second part, in [0, 1).
    pub fraction: f64,
}

impl ClockReading {
    pub fn new(hour: u32, minute: u32, second: u32, fraction: f64) -> Self {
        Self {
            hour,
            minute,
            second,
            fraction: fraction.clamp(0.0, 0.999_999),
        }
    }

    /// "HH:MM:SS"
    pub fn text(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }

    /// How far through the current minute, in [0, 1].
    pub fn sweep_fraction(&self) -> f64 {
        ((self.second as f64 + self.fraction) / 60.0).clamp(0.0, 1.0)
    }
}

/// Color of the minute-sweep bar.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SweepBand {
    Green,
    Yellow,
    Red,
}

impl SweepBand {
    pub fn for_fraction(fraction: f64) -> Self {
        if fraction < 0.5 {
            SweepBand::Green
        } else if fraction < 0.9 {
            SweepBand::Yellow
        } else {
            SweepBand::Red
        }
    }
}

/// Source of wall-clock readings.
pub trait WallClock {
    fn read(&self) -> ClockReading;
}

/// Reads the system's local time.
#[derive(Clone, Copy, Default, Debug)]
pub struct LocalClock;

impl WallClock for LocalClock {
    fn read(&self) -> ClockReading {
        let now = Local::now();
        // nanosecond() runs past 1e9 during a leap second; new() clamps it
        let fraction = now.nanosecond() as f64 / 1_000_000_000.0;
        ClockReading::new(now.hour(), now.minute(), now.second(), fraction)
    }
}

/// Always reads the same time.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub ClockReading);

impl WallClock for FixedClock {
    fn read(&self) -> ClockReading {
        self.0
    }
}

pub struct Clock<W: WallClock = LocalClock> {
    source: W,
}

impl Clock<LocalClock> {
    pub fn local() -> Self {
        Self::new(LocalClock)
    }
}

impl Default for Clock<LocalClock> {
    fn default() -> Self {
        Self::local()
    }
}

impl<W: WallClock> Clock<W> {
    pub fn new(source: W) -> Self {
        Self { source }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct ClockRender {
    /// "HH:MM:SS"
    pub text: String,
    pub fraction: f64,
    pub band: SweepBand,
}

impl From<ClockReading> for ClockRender {
    fn from(reading: ClockReading) -> Self {
        let fraction = reading.sweep_fraction();
        Self {
            text: reading.text(),
            fraction,
            band: SweepBand::for_fraction(fraction),
        }
    }
}

/// The clock keeps no state of its own; both calls just read the source.
impl<W: WallClock> Tickable for Clock<W> {
    type Render = ClockRender;

    fn tick(&mut self, now_ms: u64) -> ClockRender {
        self.render(now_ms)
    }

    fn render(&self, _now_ms: u64) -> ClockRender {
        self.source.read().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_band_boundaries() {
        assert_eq!(SweepBand::for_fraction(0.0), SweepBand::Green);
        assert_eq!(SweepBand::for_fraction(0.49), SweepBand::Green);
        assert_eq!(SweepBand::for_fraction(0.5), SweepBand::Yellow);
        assert_eq!(SweepBand::for_fraction(0.89), SweepBand::Yellow);
        assert_eq!(SweepBand::for_fraction(0.9), SweepBand::Red);
        assert_eq!(SweepBand::for_fraction(1.0), SweepBand::Red);
    }

    #[test]
    fn test_sweep_fraction() {
        let reading = ClockReading::new(9, 5, 30, 0.0);
        assert_eq!(reading.sweep_fraction(), 0.5);
        let reading = ClockReading::new(9, 5, 54, 0.0);
        assert_eq!(reading.sweep_fraction(), 0.9);
        assert_eq!(SweepBand::for_fraction(reading.sweep_fraction()), SweepBand::Red);
        let reading = ClockReading::new(9, 5, 59, 0.75);
        assert!(reading.sweep_fraction() < 1.0);
    }

    #[test]
    fn test_fraction_is_clamped() {
        let reading = ClockReading::new(23, 59, 59, 1.2);
        assert!(reading.fraction < 1.0);
        assert!(reading.sweep_fraction() <= 1.0);
    }

    #[test]
    fn test_render_fixed_clock() {
        let mut clock = Clock::new(FixedClock(ClockReading::new(7, 3, 15, 0.0)));
        let render = clock.tick(0);
        assert_eq!(render.text, "07:03:15");
        assert_eq!(render.fraction, 0.25);
        assert_eq!(render.band, SweepBand::Green);
    }

    #[test]
    fn test_local_clock_reads_valid_fields() {
        let reading = LocalClock.read();
        assert!(reading.hour < 24);
        assert!(reading.minute < 60);
        assert!(reading.second < 61);
        assert!((0.0..1.0).contains(&reading.fraction));
    }
}
