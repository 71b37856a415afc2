//! Countdown from a user-entered duration, with color bands and alert
//! signals for the final seconds.

use crate::alert::{Alert, AlertSink};
use crate::error::{DurationError, ValidationError};
use crate::format::format_hms_rounded;
use crate::parse::{parse_countdown_duration, validate_duration};
use crate::{Tickable, TICK_INTERVAL_MS};

/// Seconds before zero that get one tick alert each.
pub const ALERT_WINDOW_SECS: u64 = 10;
/// Alerts emitted back to back on expiry.
pub const FINAL_ALERT_COUNT: usize = 3;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CountdownState {
    /// No duration armed yet.
    Idle,
    /// Duration set, not counting.
    Armed,
    Running,
    /// Reached zero.
    Expired,
}

/// Display color category for the remaining fraction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CountdownBand {
    /// More than half left.
    Start,
    /// Half or less.
    Mid,
    /// The last tenth.
    Final,
}

impl CountdownBand {
    pub fn for_fraction(fraction: f64) -> Self {
        if fraction <= 0.10 {
            CountdownBand::Final
        } else if fraction <= 0.50 {
            CountdownBand::Mid
        } else {
            CountdownBand::Start
        }
    }
}

pub struct Countdown<S: AlertSink> {
    state: CountdownState,
    total_secs: u64,
    remaining_ms: u64,
    last_whole_second_alerted: Option<u64>,
    tick_interval_ms: u64,
    sink: S,
}

impl<S: AlertSink> Countdown<S> {
    pub fn new(sink: S) -> Self {
        Self::with_tick_interval(sink, TICK_INTERVAL_MS)
    }

    /// Each tick takes `tick_interval_ms` off the remaining time.
    pub fn with_tick_interval(sink: S, tick_interval_ms: u64) -> Self {
        Self {
            state: CountdownState::Idle,
            total_secs: 0,
            remaining_ms: 0,
            last_whole_second_alerted: None,
            tick_interval_ms: tick_interval_ms.max(1),
            sink,
        }
    }

    /// Parse `text` and arm with it. On error nothing changes.
    pub fn set_duration(&mut self, text: &str) -> Result<u64, DurationError> {
        let seconds = parse_countdown_duration(text)?;
        self.arm(seconds)?;
        Ok(seconds)
    }

    /// Arm with a duration in whole seconds, stopping any run in progress.
    pub fn arm(&mut self, seconds: u64) -> Result<(), ValidationError> {
        validate_duration(seconds)?;
        self.total_secs = seconds;
        self.rewind();
        self.state = CountdownState::Armed;
        log::debug!("countdown armed with {} s", seconds);
        Ok(())
    }

    /// Begin or resume counting. An expired countdown starts over from its
    /// full duration. Returns false when there is nothing armed to run.
    pub fn start(&mut self) -> bool {
        match self.state {
            CountdownState::Idle => return false,
            CountdownState::Running => return true,
            CountdownState::Armed => {}
            CountdownState::Expired => self.rewind(),
        }
        self.state = CountdownState::Running;
        log::debug!("countdown running, {} ms left", self.remaining_ms);
        true
    }

    /// Start, arming from `pending_entry` first if no duration was ever set.
    ///
    /// This is the Start button's fallback for a user who typed a time but
    /// never pressed Set. If the entry doesn't parse, the error is returned
    /// and the countdown stays idle.
    pub fn start_with_pending(&mut self, pending_entry: &str) -> Result<bool, DurationError> {
        if self.state == CountdownState::Idle {
            self.set_duration(pending_entry)?;
        }
        Ok(self.start())
    }

    pub fn pause(&mut self) {
        if self.state == CountdownState::Running {
            self.state = CountdownState::Armed;
            log::debug!("countdown paused, {} ms left", self.remaining_ms);
        }
    }

    /// Pause when running, otherwise [`start_with_pending`](Self::start_with_pending).
    pub fn toggle(&mut self, pending_entry: &str) -> Result<CountdownState, DurationError> {
        if self.state == CountdownState::Running {
            self.pause();
        } else {
            self.start_with_pending(pending_entry)?;
        }
        Ok(self.state)
    }

    /// Stop and restore the full duration.
    pub fn reset(&mut self) {
        if self.state == CountdownState::Idle {
            return;
        }
        self.rewind();
        self.state = CountdownState::Armed;
        log::debug!("countdown reset to {} s", self.total_secs);
    }

    fn rewind(&mut self) {
        self.remaining_ms = self.total_secs.saturating_mul(1000);
        self.last_whole_second_alerted = None;
    }

    /// Take one tick off the remaining time, emitting any alerts that fall
    /// due. Does nothing unless running.
    pub fn advance(&mut self) -> Vec<Alert> {
        self.advance_by(1)
    }

    /// Take `steps` ticks off the remaining time at once. Only the alerts due
    /// where the countdown lands are emitted: at most one tick alert for the
    /// current second, plus the final alerts if it reached zero. Seconds
    /// skipped over stay silent.
    pub fn advance_by(&mut self, steps: u64) -> Vec<Alert> {
        let mut alerts = Vec::new();
        if self.state != CountdownState::Running || steps == 0 {
            return alerts;
        }

        let elapsed_ms = steps.saturating_mul(self.tick_interval_ms);
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);

        let whole = self.remaining_ms.div_ceil(1000);
        if whole > 0 && whole <= ALERT_WINDOW_SECS && self.last_whole_second_alerted != Some(whole) {
            self.last_whole_second_alerted = Some(whole);
            alerts.push(Alert::Tick(whole));
        }

        if self.remaining_ms == 0 {
            self.state = CountdownState::Expired;
            alerts.extend([Alert::Final; FINAL_ALERT_COUNT]);
            log::info!("countdown of {} s expired", self.total_secs);
        }

        for alert in &alerts {
            log::trace!("alert {:?}", alert);
            self.sink.emit(*alert);
        }
        alerts
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn remaining_secs(&self) -> f64 {
        self.remaining_ms as f64 / 1000.0
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    /// Remaining over total, or None before a duration is armed.
    pub fn fraction(&self) -> Option<f64> {
        if self.total_secs == 0 {
            return None;
        }
        let total_ms = self.total_secs.saturating_mul(1000) as f64;
        Some((self.remaining_ms as f64 / total_ms).clamp(0.0, 1.0))
    }

    /// None means neutral coloring.
    pub fn band(&self) -> Option<CountdownBand> {
        self.fraction().map(CountdownBand::for_fraction)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct CountdownRender {
    /// "HH:MM:SS", remaining rounded to the nearest second.
    pub text: String,
    pub remaining_ms: u64,
    pub band: Option<CountdownBand>,
    /// Remaining over total, 0 when idle.
    pub progress: f64,
    pub state: CountdownState,
    /// Alerts emitted by this tick.
    pub alerts: Vec<Alert>,
}

impl<S: AlertSink> Countdown<S> {
    fn render_with(&self, alerts: Vec<Alert>) -> CountdownRender {
        CountdownRender {
            text: format_hms_rounded(self.remaining_ms),
            remaining_ms: self.remaining_ms,
            band: self.band(),
            progress: self.fraction().unwrap_or(0.0),
            state: self.state,
            alerts,
        }
    }
}

/// Ticks advance by the fixed tick interval, so `now_ms` is not consulted.
impl<S: AlertSink> Tickable for Countdown<S> {
    type Render = CountdownRender;

    fn tick(&mut self, _now_ms: u64) -> CountdownRender {
        let alerts = self.advance();
        self.render_with(alerts)
    }

    fn render(&self, _now_ms: u64) -> CountdownRender {
        self.render_with(Vec::new())
    }
}
