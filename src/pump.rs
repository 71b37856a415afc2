use std::time::Duration;

/// Repeating tick schedule polled from the UI loop.
///
/// Stopping clears the schedule immediately, so a poll after `stop` never
/// reports a tick that was pending before it.
pub struct Pump {
    interval_ms: u64,
    next_due_ms: Option<u64>,
}

impl Pump {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            next_due_ms: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn is_running(&self) -> bool {
        self.next_due_ms.is_some()
    }

    /// First tick falls one interval after `now_ms`. No-op while running.
    pub fn start(&mut self, now_ms: u64) {
        if self.next_due_ms.is_none() {
            self.next_due_ms = Some(now_ms + self.interval_ms);
        }
    }

    pub fn stop(&mut self) {
        self.next_due_ms = None;
    }

    /// Number of ticks that have come due since the last poll. Late polls
    /// catch up rather than drop ticks.
    pub fn poll(&mut self, now_ms: u64) -> u32 {
        let Some(due) = self.next_due_ms else {
            return 0;
        };
        if now_ms < due {
            return 0;
        }
        let owed = (now_ms - due) / self.interval_ms + 1;
        self.next_due_ms = Some(due + owed * self.interval_ms);
        u32::try_from(owed).unwrap_or(u32::MAX)
    }

    /// Time left before the next tick, if running.
    pub fn until_due(&self, now_ms: u64) -> Option<Duration> {
        self.next_due_ms
            .map(|due| Duration::from_millis(due.saturating_sub(now_ms)))
    }
}
