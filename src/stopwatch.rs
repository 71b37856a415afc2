use timer_core::{Lap, Stopwatch, StopwatchState};

pub struct StopwatchTab {
    pub stopwatch: Stopwatch,
    pub show_laps: bool,
}

impl StopwatchTab {
    pub fn new() -> Self {
        Self {
            stopwatch: Stopwatch::new(),
            show_laps: false,
        }
    }

    pub fn toggle(&mut self, now_ms: u64) -> StopwatchState {
        self.stopwatch.toggle(now_ms)
    }

    /// Records a lap and brings up the lap list.
    pub fn record_lap(&mut self, now_ms: u64) -> Lap {
        self.show_laps = true;
        self.stopwatch.lap(now_ms)
    }

    pub fn reset(&mut self) {
        self.stopwatch.reset();
    }
}

impl Default for StopwatchTab {
    fn default() -> Self {
        Self::new()
    }
}
