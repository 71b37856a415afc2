use std::fmt;

use crate::format::TimeParts;
use crate::Tickable;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StopwatchState {
    Stopped,
    Running,
}

/// A split recorded by [`Stopwatch::lap`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Lap {
    /// 1-based position in the lap list.
    pub index: usize,
    /// Time since the previous lap (or since zero for the first).
    pub split_ms: u64,
    /// Stopwatch reading when the lap was taken.
    pub cumulative_ms: u64,
}

impl Lap {
    pub fn split_secs(&self) -> f64 {
        self.split_ms as f64 / 1000.0
    }

    pub fn cumulative_secs(&self) -> f64 {
        self.cumulative_ms as f64 / 1000.0
    }
}

/// Formats as "Lap 02  |  +00:00:07.0  |  00:00:12.0".
impl fmt::Display for Lap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lap {:02}  |  +{}  |  {}",
            self.index,
            TimeParts::from_ms(self.split_ms),
            TimeParts::from_ms(self.cumulative_ms)
        )
    }
}

/// Elapsed-time accumulator with lap splits.
///
/// Every method that depends on the present takes `now_ms`, a reading from a
/// monotonic millisecond source owned by the caller.
pub struct Stopwatch {
    state: StopwatchState,
    start_ms: Option<u64>,
    base_elapsed_ms: u64,
    last_lap_ms: u64,
    laps: Vec<Lap>,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            state: StopwatchState::Stopped,
            start_ms: None,
            base_elapsed_ms: 0,
            last_lap_ms: 0,
            laps: Vec::new(),
        }
    }

    pub fn state(&self) -> StopwatchState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == StopwatchState::Running
    }

    pub fn start(&mut self, now_ms: u64) {
        if self.state == StopwatchState::Running {
            return;
        }
        self.start_ms = Some(now_ms);
        self.state = StopwatchState::Running;
        log::debug!("stopwatch started at {} ms elapsed", self.base_elapsed_ms);
    }

    pub fn stop(&mut self, now_ms: u64) {
        if self.state != StopwatchState::Running {
            return;
        }
        if let Some(start) = self.start_ms.take() {
            self.base_elapsed_ms += now_ms.saturating_sub(start);
        }
        self.state = StopwatchState::Stopped;
        log::debug!("stopwatch stopped at {} ms elapsed", self.base_elapsed_ms);
    }

    /// Start when stopped, stop when running. Returns the new state.
    pub fn toggle(&mut self, now_ms: u64) -> StopwatchState {
        match self.state {
            StopwatchState::Stopped => self.start(now_ms),
            StopwatchState::Running => self.stop(now_ms),
        }
        self.state
    }

    pub fn reset(&mut self) {
        self.state = StopwatchState::Stopped;
        self.start_ms = None;
        self.base_elapsed_ms = 0;
        self.last_lap_ms = 0;
        self.laps.clear();
        log::debug!("stopwatch reset");
    }

    /// Record a split at the current reading. Works while stopped too, in
    /// which case the split is measured against the frozen reading.
    pub fn lap(&mut self, now_ms: u64) -> Lap {
        let total = self.current_elapsed_ms(now_ms);
        let lap = Lap {
            index: self.laps.len() + 1,
            split_ms: total.saturating_sub(self.last_lap_ms),
            cumulative_ms: total,
        };
        self.last_lap_ms = total;
        self.laps.push(lap);
        log::debug!("{}", lap);
        lap
    }

    pub fn current_elapsed_ms(&self, now_ms: u64) -> u64 {
        match self.start_ms {
            Some(start) => self.base_elapsed_ms + now_ms.saturating_sub(start),
            None => self.base_elapsed_ms,
        }
    }

    /// Elapsed seconds.
    pub fn current_elapsed(&self, now_ms: u64) -> f64 {
        self.current_elapsed_ms(now_ms) as f64 / 1000.0
    }

    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    pub fn lap_count(&self) -> usize {
        self.laps.len()
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct StopwatchRender {
    /// "HH:MM:SS.t"
    pub text: String,
    pub elapsed_ms: u64,
    pub running: bool,
    pub lap_count: usize,
}

impl Tickable for Stopwatch {
    type Render = StopwatchRender;

    fn tick(&mut self, now_ms: u64) -> StopwatchRender {
        self.render(now_ms)
    }

    fn render(&self, now_ms: u64) -> StopwatchRender {
        let elapsed_ms = self.current_elapsed_ms(now_ms);
        StopwatchRender {
            text: TimeParts::from_ms(elapsed_ms).to_string(),
            elapsed_ms,
            running: self.is_running(),
            lap_count: self.lap_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopwatch_basic() {
        let mut sw = Stopwatch::new();
        assert_eq!(sw.state(), StopwatchState::Stopped);
        assert_eq!(sw.current_elapsed_ms(0), 0);

        sw.start(1000);
        assert_eq!(sw.state(), StopwatchState::Running);
        assert_eq!(sw.current_elapsed_ms(1500), 500);
        assert_eq!(sw.current_elapsed_ms(2000), 1000);

        sw.stop(2000);
        assert_eq!(sw.state(), StopwatchState::Stopped);
        assert_eq!(sw.current_elapsed_ms(5000), 1000); // Frozen while stopped

        sw.start(5000);
        assert_eq!(sw.current_elapsed_ms(5500), 1500);
    }

    #[test]
    fn test_stop_then_start_loses_nothing() {
        let mut sw = Stopwatch::new();
        sw.start(0);
        sw.stop(4_300);
        let at_stop = sw.current_elapsed(4_300);
        sw.start(60_000);
        assert_eq!(sw.current_elapsed(60_000), at_stop);
        assert_eq!(sw.current_elapsed(61_000), at_stop + 1.0);
    }

    #[test]
    fn test_monotonic_while_running() {
        let mut sw = Stopwatch::new();
        sw.start(250);
        let mut last = 0;
        for tick in 0..200 {
            let now = 250 + tick * 100 + (tick % 7) * 13;
            let elapsed = sw.tick(now).elapsed_ms;
            assert!(elapsed >= last);
            last = elapsed;
        }
    }

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let mut sw = Stopwatch::new();
        sw.start(100);
        sw.start(900); // ignored, still timing from 100
        assert_eq!(sw.current_elapsed_ms(1100), 1000);
        sw.stop(1100);
        sw.stop(5000); // ignored
        assert_eq!(sw.current_elapsed_ms(9000), 1000);
    }

    #[test]
    fn test_toggle() {
        let mut sw = Stopwatch::new();
        assert_eq!(sw.toggle(0), StopwatchState::Running);
        assert_eq!(sw.toggle(2_000), StopwatchState::Stopped);
        assert_eq!(sw.current_elapsed_ms(3_000), 2_000);
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut sw = Stopwatch::new();
        sw.start(0);
        sw.lap(1_000);
        sw.reset();
        assert_eq!(sw.current_elapsed(50_000), 0.0);
        assert!(sw.laps().is_empty());
        assert!(!sw.is_running());

        sw.start(0);
        sw.stop(3_000);
        sw.lap(3_000);
        sw.reset();
        assert_eq!(sw.current_elapsed(50_000), 0.0);
        assert_eq!(sw.lap_count(), 0);

        // Laps after a reset split from zero again
        sw.start(10_000);
        let lap = sw.lap(12_000);
        assert_eq!(lap.index, 1);
        assert_eq!(lap.split_ms, 2_000);
    }

    #[test]
    fn test_lap_splits() {
        let mut sw = Stopwatch::new();
        sw.start(0);

        let lap1 = sw.lap(5_000);
        assert_eq!(lap1.index, 1);
        assert_eq!(lap1.split_secs(), 5.0);
        assert_eq!(lap1.cumulative_secs(), 5.0);

        let lap2 = sw.lap(12_000);
        assert_eq!(lap2.index, 2);
        assert_eq!(lap2.split_secs(), 7.0);
        assert_eq!(lap2.cumulative_secs(), 12.0);

        // Laps don't disturb the running total
        assert_eq!(sw.current_elapsed_ms(13_000), 13_000);
        assert_eq!(sw.laps(), &[lap1, lap2]);
    }

    #[test]
    fn test_lap_across_pause() {
        let mut sw = Stopwatch::new();
        sw.start(0);
        sw.lap(2_000);
        sw.stop(3_000);
        sw.start(10_000);
        let lap = sw.lap(11_500);
        assert_eq!(lap.split_ms, 2_500);
        assert_eq!(lap.cumulative_ms, 4_500);
    }

    #[test]
    fn test_lap_while_stopped() {
        let mut sw = Stopwatch::new();
        let lap = sw.lap(9_999);
        assert_eq!(lap.split_ms, 0);
        assert_eq!(lap.cumulative_ms, 0);
        assert_eq!(sw.lap_count(), 1);
    }

    #[test]
    fn test_lap_display() {
        let lap = Lap {
            index: 2,
            split_ms: 7_000,
            cumulative_ms: 12_000,
        };
        assert_eq!(lap.to_string(), "Lap 02  |  +00:00:07.0  |  00:00:12.0");
    }

    #[test]
    fn test_render() {
        let mut sw = Stopwatch::new();
        sw.start(0);
        sw.lap(1_000);
        let render = sw.render(61_250);
        assert_eq!(render.text, "00:01:01.3");
        assert!(render.running);
        assert_eq!(render.lap_count, 1);
    }
}
