use timer_core::{format_hms, Alert, Countdown, CountdownState, DurationError};

use crate::alerts::{AlertConfig, Beeper};

/// How long the display flashes after expiry.
const FLASH_MS: u64 = 3_000;
const FLASH_PERIOD_MS: u64 = 250;

/// Countdown plus the entry field and notice state around it.
pub struct CountdownTab {
    pub countdown: Countdown<Beeper>,
    pub entry: String,
    /// Set when the entry was rejected; the notice stays up until dismissed.
    pub error: Option<DurationError>,
    flash_until_ms: Option<u64>,
}

impl CountdownTab {
    pub fn new(beeper: Beeper, tick_ms: u64, entry: String) -> Self {
        Self {
            countdown: Countdown::with_tick_interval(beeper, tick_ms),
            entry,
            error: None,
            flash_until_ms: None,
        }
    }

    /// Arm from the entry field. Returns false if the entry was rejected.
    pub fn set_time(&mut self) -> bool {
        match self.countdown.set_duration(&self.entry) {
            Ok(seconds) => {
                log::info!("countdown set to {}", format_hms(seconds));
                self.flash_until_ms = None;
                true
            }
            Err(e) => {
                self.reject(e);
                false
            }
        }
    }

    /// Start/Pause button.
    pub fn toggle(&mut self) -> CountdownState {
        if let Err(e) = self.countdown.toggle(&self.entry) {
            self.reject(e);
        }
        self.flash_until_ms = None;
        self.countdown.state()
    }

    pub fn reset(&mut self) {
        self.countdown.reset();
        self.flash_until_ms = None;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    fn reject(&mut self, e: DurationError) {
        log::warn!("rejected countdown time {:?}: {}", self.entry, e);
        self.error = Some(e);
    }

    /// Watch a tick's alerts for expiry.
    pub fn note_alerts(&mut self, alerts: &[Alert], now_ms: u64) {
        if alerts.contains(&Alert::Final) && self.alert_config().flash {
            self.flash_until_ms = Some(now_ms + FLASH_MS);
        }
    }

    pub fn is_flashing(&self, now_ms: u64) -> bool {
        self.flash_until_ms.is_some_and(|until| now_ms < until)
    }

    /// Whether the flash is in its lit phase.
    pub fn flash_lit(&self, now_ms: u64) -> bool {
        match self.flash_until_ms {
            Some(until) if now_ms < until => ((until - now_ms) / FLASH_PERIOD_MS) % 2 == 1,
            _ => false,
        }
    }

    pub fn alert_config(&self) -> AlertConfig {
        self.countdown.sink().config()
    }

    pub fn set_alert_config(&mut self, config: AlertConfig) {
        if !config.flash {
            self.flash_until_ms = None;
        }
        self.countdown.sink_mut().set_config(config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timer_core::Tickable;

    fn quiet_tab(entry: &str) -> CountdownTab {
        let beeper = Beeper::new(AlertConfig {
            audio: false,
            flash: true,
        });
        CountdownTab::new(beeper, 100, entry.to_string())
    }

    #[test]
    fn test_set_time_from_entry() {
        let mut tab = quiet_tab("0:45");
        assert!(tab.set_time());
        assert_eq!(tab.countdown.total_secs(), 45);
        assert!(tab.error.is_none());
    }

    #[test]
    fn test_rejected_entry_raises_notice() {
        let mut tab = quiet_tab("soon");
        assert!(!tab.set_time());
        assert!(matches!(tab.error, Some(DurationError::Parse(_))));
        assert_eq!(tab.countdown.state(), CountdownState::Idle);

        tab.dismiss_error();
        tab.entry = "0".to_string();
        assert!(!tab.set_time());
        assert!(matches!(tab.error, Some(DurationError::Validation(_))));
    }

    #[test]
    fn test_start_without_set_uses_entry() {
        let mut tab = quiet_tab("3");
        assert_eq!(tab.toggle(), CountdownState::Running);
        assert_eq!(tab.countdown.total_secs(), 3);
    }

    #[test]
    fn test_start_with_bad_entry_stays_idle() {
        let mut tab = quiet_tab("");
        assert_eq!(tab.toggle(), CountdownState::Idle);
        assert!(tab.error.is_some());
    }

    #[test]
    fn test_expiry_flashes() {
        let mut tab = quiet_tab("1");
        tab.toggle();
        let mut now = 0;
        while tab.countdown.is_running() {
            now += 100;
            let render = tab.countdown.tick(now);
            tab.note_alerts(&render.alerts, now);
        }
        assert!(tab.is_flashing(now));
        assert!(!tab.is_flashing(now + FLASH_MS));
        assert_ne!(tab.flash_lit(now + 100), tab.flash_lit(now + 100 + FLASH_PERIOD_MS));

        tab.reset();
        assert!(!tab.is_flashing(now));
    }

    #[test]
    fn test_no_flash_when_disabled() {
        let mut tab = quiet_tab("1");
        tab.set_alert_config(AlertConfig {
            audio: false,
            flash: false,
        });
        tab.note_alerts(&[Alert::Final], 0);
        assert!(!tab.is_flashing(1));
    }
}
