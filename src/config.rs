use clap::Parser;
use timer_core::TICK_INTERVAL_MS;

use crate::alerts::AlertConfig;
use crate::Tab;

/// Digital clock, stopwatch with laps, and countdown timer.
///
/// Nothing is saved between runs; these flags only set the starting state.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Settings {
    /// Tab shown at startup
    #[arg(long, value_enum, default_value_t = Tab::Clock)]
    pub tab: Tab,

    /// Pre-fill the countdown entry (H:MM:SS, MM:SS or SS)
    #[arg(long, value_name = "TIME")]
    pub duration: Option<String>,

    /// Milliseconds between ticks
    #[arg(
        long,
        value_name = "MS",
        default_value_t = TICK_INTERVAL_MS,
        value_parser = clap::value_parser!(u64).range(10..=1000)
    )]
    pub tick_ms: u64,

    /// Start with audio alerts off
    #[arg(long)]
    pub mute: bool,

    /// Start with the expiry flash off
    #[arg(long)]
    pub no_flash: bool,
}

impl Settings {
    pub fn alert_config(&self) -> AlertConfig {
        AlertConfig {
            audio: !self.mute,
            flash: !self.no_flash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::try_parse_from(["tabtimers"]).unwrap();
        assert_eq!(settings.tab, Tab::Clock);
        assert_eq!(settings.tick_ms, 100);
        assert_eq!(settings.duration, None);
        assert_eq!(settings.alert_config(), AlertConfig::default());
    }

    #[test]
    fn test_all_flags() {
        let settings = Settings::try_parse_from([
            "tabtimers",
            "--tab",
            "countdown",
            "--duration",
            "1:30",
            "--tick-ms",
            "50",
            "--mute",
            "--no-flash",
        ])
        .unwrap();
        assert_eq!(settings.tab, Tab::Countdown);
        assert_eq!(settings.duration.as_deref(), Some("1:30"));
        assert_eq!(settings.tick_ms, 50);
        assert_eq!(
            settings.alert_config(),
            AlertConfig {
                audio: false,
                flash: false
            }
        );
    }

    #[test]
    fn test_tick_ms_out_of_range() {
        assert!(Settings::try_parse_from(["tabtimers", "--tick-ms", "5"]).is_err());
        assert!(Settings::try_parse_from(["tabtimers", "--tick-ms", "5000"]).is_err());
    }

    #[test]
    fn test_unknown_tab() {
        assert!(Settings::try_parse_from(["tabtimers", "--tab", "pomodoro"]).is_err());
    }
}
