mod alerts;
mod config;
mod countdown;
mod fonts;
mod pump;
mod stopwatch;
mod tone;
mod ui;

use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use eframe::egui;
use num_traits::{FromPrimitive, ToPrimitive};
use timer_core::{Clock, StopwatchState, Tickable};

use crate::alerts::Beeper;
use crate::config::Settings;
use crate::countdown::CountdownTab;
use crate::pump::Pump;
use crate::stopwatch::StopwatchTab;
use crate::ui::Action;

const APP_NAME: &str = "Timers";
const WINDOW_TITLE: &str = "Digital Clock • Stopwatch • Countdown";

#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    Debug,
    num_derive::FromPrimitive,
    num_derive::ToPrimitive,
    clap::ValueEnum,
)]
pub enum Tab {
    Clock = 0,
    Stopwatch,
    Countdown,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Clock, Tab::Stopwatch, Tab::Countdown];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Clock => "CLOCK",
            Tab::Stopwatch => "Stopwatch",
            Tab::Countdown => "Countdown Timer",
        }
    }

    /// Neighbouring tab, wrapping at either end.
    pub fn cycle(self, forward: bool) -> Tab {
        let count = Self::ALL.len();
        let index = self.to_usize().unwrap_or(0);
        let next = if forward { index + 1 } else { index + count - 1 };
        Tab::from_usize(next % count).unwrap_or(Tab::Clock)
    }
}

struct TimersApp {
    epoch: Instant,
    tab: Tab,
    tick_ms: u64,

    clock: Clock,
    stopwatch: StopwatchTab,
    countdown: CountdownTab,

    pump: Pump,
    show_settings: bool,
}

impl TimersApp {
    fn new(settings: &Settings) -> Self {
        let beeper = Beeper::new(settings.alert_config());
        let entry = settings.duration.clone().unwrap_or_default();
        Self {
            epoch: Instant::now(),
            tab: settings.tab,
            tick_ms: settings.tick_ms,
            clock: Clock::local(),
            stopwatch: StopwatchTab::new(),
            countdown: CountdownTab::new(beeper, settings.tick_ms, entry),
            pump: Pump::new(settings.tick_ms),
            show_settings: false,
        }
    }

    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn start_pump(&mut self, now_ms: u64) {
        if !self.pump.is_running() {
            self.pump.start(now_ms);
            log::debug!("pump started, {} ms interval", self.pump.interval_ms());
        }
    }

    fn stop_pump(&mut self) {
        if self.pump.is_running() {
            self.pump.stop();
            log::debug!("pump stopped");
        }
    }

    /// Runs inside every countdown command so a pause or reset takes the
    /// pending tick with it.
    fn sync_pump(&mut self, now_ms: u64) {
        if self.countdown.countdown.is_running() {
            self.start_pump(now_ms);
        } else {
            self.stop_pump();
        }
    }

    /// Catches up in one step after a stall, so only the alerts due now
    /// reach the beeper.
    fn handle_pump(&mut self, now_ms: u64) {
        let owed = self.pump.poll(now_ms);
        if owed == 0 {
            return;
        }
        if owed > 1 {
            log::debug!("pump behind, folding {} ticks into one", owed);
        }
        let alerts = self.countdown.countdown.advance_by(u64::from(owed));
        self.countdown.note_alerts(&alerts, now_ms);
        if !self.countdown.countdown.is_running() {
            self.stop_pump();
        }
    }

    fn apply(&mut self, action: Action, now_ms: u64) {
        // The invalid-time notice blocks everything else
        if self.countdown.error.is_some() && action != Action::DismissError {
            return;
        }

        match action {
            Action::SelectTab(tab) => {
                self.tab = tab;
            }
            Action::StopwatchToggle => {
                let state = self.stopwatch.toggle(now_ms);
                log::info!(
                    "stopwatch {}",
                    if state == StopwatchState::Running { "started" } else { "stopped" }
                );
            }
            Action::StopwatchLap => {
                let lap = self.stopwatch.record_lap(now_ms);
                log::info!("{}", lap);
            }
            Action::StopwatchReset => {
                self.stopwatch.reset();
            }
            Action::CountdownSet => {
                self.countdown.set_time();
                self.sync_pump(now_ms);
            }
            Action::CountdownToggle => {
                let state = self.countdown.toggle();
                log::info!("countdown {:?}", state);
                self.sync_pump(now_ms);
            }
            Action::CountdownReset => {
                self.countdown.reset();
                self.sync_pump(now_ms);
            }
            Action::DismissError => {
                self.countdown.dismiss_error();
            }
            Action::ToggleSettings => {
                self.show_settings = !self.show_settings;
            }
        }
    }

    fn key_actions(&self, ctx: &egui::Context) -> Vec<Action> {
        let typing = ctx.wants_keyboard_input();
        ctx.input(|input| {
            let mut actions = Vec::new();

            // Ctrl+1..3 pick a tab, Ctrl+PageUp/PageDown step through them
            if input.modifiers.ctrl {
                for (index, key) in [egui::Key::Num1, egui::Key::Num2, egui::Key::Num3]
                    .into_iter()
                    .enumerate()
                {
                    if input.key_pressed(key) {
                        if let Some(tab) = Tab::from_usize(index) {
                            actions.push(Action::SelectTab(tab));
                        }
                    }
                }
                if input.key_pressed(egui::Key::PageDown) {
                    actions.push(Action::SelectTab(self.tab.cycle(true)));
                }
                if input.key_pressed(egui::Key::PageUp) {
                    actions.push(Action::SelectTab(self.tab.cycle(false)));
                }
                return actions;
            }

            if typing {
                return actions;
            }

            match self.tab {
                Tab::Stopwatch => {
                    if input.key_pressed(egui::Key::Space) {
                        actions.push(Action::StopwatchToggle);
                    }
                    if input.key_pressed(egui::Key::L) {
                        actions.push(Action::StopwatchLap);
                    }
                    if input.key_pressed(egui::Key::R) {
                        actions.push(Action::StopwatchReset);
                    }
                }
                Tab::Countdown => {
                    if input.key_pressed(egui::Key::Space) {
                        actions.push(Action::CountdownToggle);
                    }
                    if input.key_pressed(egui::Key::R) {
                        actions.push(Action::CountdownReset);
                    }
                }
                Tab::Clock => {}
            }
            actions
        })
    }

    /// Whether anything on screen changes without input.
    fn needs_ticking(&self, now_ms: u64) -> bool {
        self.tab == Tab::Clock
            || self.stopwatch.stopwatch.is_running()
            || self.pump.is_running()
            || self.countdown.is_flashing(now_ms)
    }
}

impl eframe::App for TimersApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = self.now_ms();
        self.handle_pump(now);

        let mut actions = self.key_actions(ctx);

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            actions.extend(ui::draw_tabs(ui, self.tab));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let action = match self.tab {
                Tab::Clock => {
                    ui::draw_clock(ui, &self.clock.tick(now));
                    None
                }
                Tab::Stopwatch => ui::draw_stopwatch(ui, &self.stopwatch.stopwatch.render(now)),
                Tab::Countdown => {
                    let render = self.countdown.countdown.render(now);
                    let lit = self.countdown.flash_lit(now);
                    ui::draw_countdown(ui, &render, &mut self.countdown.entry, lit)
                }
            };
            actions.extend(action);
        });

        if self.stopwatch.show_laps {
            let mut open = true;
            ui::draw_laps(ctx, self.stopwatch.stopwatch.laps(), &mut open);
            self.stopwatch.show_laps = open;
        }

        if self.show_settings {
            let mut open = true;
            let edited = ui::draw_settings(ctx, &mut open, self.countdown.alert_config());
            self.countdown.set_alert_config(edited);
            self.show_settings = open;
        }

        if let Some(error) = &self.countdown.error {
            if ui::draw_invalid_time(ctx, error) {
                actions.push(Action::DismissError);
            }
        }

        for action in actions {
            self.apply(action, now);
        }

        if self.needs_ticking(now) {
            let wait = self
                .pump
                .until_due(now)
                .unwrap_or(Duration::from_millis(self.tick_ms))
                .min(Duration::from_millis(self.tick_ms));
            ctx.request_repaint_after(wait);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let settings = Settings::parse();
    log::info!(
        "{} starting on the {} tab, {} ms ticks",
        APP_NAME,
        settings.tab.label(),
        settings.tick_ms
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([720.0, 420.0])
            .with_min_inner_size([520.0, 320.0]),
        centered: true,
        ..Default::default()
    };

    let app = TimersApp::new(&settings);
    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |cc| {
            ui::configure_theme(&cc.egui_ctx);
            fonts::install_lcd_font(&cc.egui_ctx);
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow::anyhow!("failed to open the timers window: {err}"))?;

    log::info!("{} closed", APP_NAME);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use timer_core::CountdownState;

    fn quiet_settings(args: &[&str]) -> Settings {
        let mut argv = vec!["tabtimers", "--mute", "--no-flash"];
        argv.extend_from_slice(args);
        Settings::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_tab_indices() {
        assert_eq!(Tab::from_usize(0), Some(Tab::Clock));
        assert_eq!(Tab::from_usize(2), Some(Tab::Countdown));
        assert_eq!(Tab::from_usize(3), None);
        assert_eq!(Tab::Stopwatch.to_usize(), Some(1));
    }

    #[test]
    fn test_tab_cycle_wraps() {
        assert_eq!(Tab::Clock.cycle(true), Tab::Stopwatch);
        assert_eq!(Tab::Countdown.cycle(true), Tab::Clock);
        assert_eq!(Tab::Clock.cycle(false), Tab::Countdown);
    }

    #[test]
    fn test_starts_on_requested_tab() {
        let app = TimersApp::new(&quiet_settings(&["--tab", "stopwatch"]));
        assert_eq!(app.tab, Tab::Stopwatch);
        let app = TimersApp::new(&quiet_settings(&[]));
        assert_eq!(app.tab, Tab::Clock);
    }

    #[test]
    fn test_countdown_commands_drive_pump() {
        let mut app = TimersApp::new(&quiet_settings(&["--duration", "2"]));
        app.apply(Action::CountdownToggle, 0);
        assert!(app.pump.is_running());

        app.handle_pump(1_000);
        assert_eq!(app.countdown.countdown.remaining_ms(), 1_000);

        // Pausing cancels the pending tick
        app.apply(Action::CountdownToggle, 1_050);
        assert!(!app.pump.is_running());
        app.handle_pump(5_000);
        assert_eq!(app.countdown.countdown.remaining_ms(), 1_000);

        app.apply(Action::CountdownToggle, 5_000);
        app.handle_pump(6_000);
        assert_eq!(app.countdown.countdown.remaining_ms(), 0);
        assert_eq!(app.countdown.countdown.state(), CountdownState::Expired);
        assert!(!app.pump.is_running());
    }

    #[test]
    fn test_stalled_frame_expires_with_final_alerts_only() {
        let settings =
            Settings::try_parse_from(["tabtimers", "--mute", "--duration", "12"]).unwrap();
        let mut app = TimersApp::new(&settings);
        app.apply(Action::CountdownToggle, 0);
        app.handle_pump(20_000);

        assert_eq!(app.countdown.countdown.state(), CountdownState::Expired);
        assert!(!app.pump.is_running());
        assert!(app.countdown.is_flashing(20_000));
    }

    #[test]
    fn test_reset_stops_pump() {
        let mut app = TimersApp::new(&quiet_settings(&["--duration", "1:00"]));
        app.apply(Action::CountdownToggle, 0);
        app.apply(Action::CountdownReset, 300);
        assert!(!app.pump.is_running());
        assert_eq!(app.countdown.countdown.remaining_ms(), 60_000);
    }

    #[test]
    fn test_invalid_entry_blocks_until_dismissed() {
        let mut app = TimersApp::new(&quiet_settings(&["--duration", "nope"]));
        app.apply(Action::CountdownSet, 0);
        assert!(app.countdown.error.is_some());

        app.apply(Action::SelectTab(Tab::Countdown), 0);
        assert_eq!(app.tab, Tab::Clock);
        app.apply(Action::StopwatchToggle, 0);
        assert!(!app.stopwatch.stopwatch.is_running());

        app.apply(Action::DismissError, 0);
        app.apply(Action::StopwatchToggle, 0);
        assert!(app.stopwatch.stopwatch.is_running());
    }

    #[test]
    fn test_stopwatch_actions() {
        let mut app = TimersApp::new(&quiet_settings(&[]));
        app.apply(Action::StopwatchToggle, 1_000);
        app.apply(Action::StopwatchLap, 6_000);
        app.apply(Action::StopwatchLap, 13_000);
        let laps = app.stopwatch.stopwatch.laps();
        assert_eq!(laps[1].split_ms, 7_000);
        assert!(app.stopwatch.show_laps);

        app.apply(Action::StopwatchReset, 14_000);
        assert!(app.stopwatch.stopwatch.laps().is_empty());
        assert_eq!(app.stopwatch.stopwatch.current_elapsed_ms(20_000), 0);
    }
}
