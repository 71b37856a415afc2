use eframe::egui::{self, Color32, RichText, Ui};
use timer_core::{
    ClockRender, CountdownBand, CountdownRender, CountdownState, DurationError, Lap,
    StopwatchRender, SweepBand,
};

use crate::alerts::AlertConfig;
use crate::fonts::lcd_font;
use crate::Tab;

pub const BG: Color32 = Color32::from_rgb(0x10, 0x13, 0x16);
pub const PANEL_BG: Color32 = Color32::from_rgb(0x16, 0x1a, 0x1f);
pub const FG: Color32 = Color32::from_rgb(0xe6, 0xf0, 0xff);
pub const MUTED: Color32 = Color32::from_rgb(0x9a, 0xa7, 0xb2);
pub const ACCENT: Color32 = Color32::from_rgb(0x79, 0xc0, 0xff);
pub const BUTTON_BG: Color32 = Color32::from_rgb(0x22, 0x28, 0x30);
pub const TAB_ACTIVE_BG: Color32 = Color32::from_rgb(0x1c, 0x21, 0x28);
pub const LCD_FG: Color32 = Color32::from_rgb(0xb7, 0xff, 0xb7);
pub const BEZEL: Color32 = Color32::from_rgb(0x2a, 0x31, 0x39);

pub const GREEN: Color32 = Color32::from_rgb(0x34, 0xd0, 0x58);
pub const YELLOW: Color32 = Color32::from_rgb(0xff, 0xdf, 0x5d);
pub const RED: Color32 = Color32::from_rgb(0xf8, 0x51, 0x49);

const CLOCK_DIGITS: f32 = 64.0;
const TIMER_DIGITS: f32 = 56.0;
const BUTTON_SIZE: [f32; 2] = [110.0, 30.0];

/// Something the user asked for, applied by the app after drawing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    SelectTab(Tab),
    StopwatchToggle,
    StopwatchLap,
    StopwatchReset,
    CountdownSet,
    CountdownToggle,
    CountdownReset,
    DismissError,
    ToggleSettings,
}

pub fn configure_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.override_text_color = Some(FG);
    visuals.panel_fill = BG;
    visuals.window_fill = PANEL_BG;
    visuals.extreme_bg_color = BG;
    visuals.widgets.noninteractive.bg_fill = PANEL_BG;
    visuals.widgets.inactive.bg_fill = BUTTON_BG;
    visuals.widgets.inactive.weak_bg_fill = BUTTON_BG;
    visuals.widgets.hovered.bg_fill = TAB_ACTIVE_BG;
    visuals.widgets.hovered.weak_bg_fill = TAB_ACTIVE_BG;
    visuals.widgets.active.bg_fill = TAB_ACTIVE_BG;
    visuals.widgets.active.weak_bg_fill = TAB_ACTIVE_BG;
    visuals.selection.bg_fill = TAB_ACTIVE_BG;
    visuals.selection.stroke.color = ACCENT;
    ctx.set_visuals(visuals);
}

pub fn sweep_color(band: SweepBand) -> Color32 {
    match band {
        SweepBand::Green => GREEN,
        SweepBand::Yellow => YELLOW,
        SweepBand::Red => RED,
    }
}

/// Neutral LCD green before a duration is armed.
pub fn countdown_color(band: Option<CountdownBand>) -> Color32 {
    match band {
        Some(CountdownBand::Start) => GREEN,
        Some(CountdownBand::Mid) => YELLOW,
        Some(CountdownBand::Final) => RED,
        None => LCD_FG,
    }
}

pub fn draw_tabs(ui: &mut Ui, current: Tab) -> Option<Action> {
    let mut action = None;
    ui.horizontal(|ui| {
        for tab in Tab::ALL {
            let label = RichText::new(tab.label()).size(15.0);
            if ui.selectable_label(current == tab, label).clicked() && current != tab {
                action = Some(Action::SelectTab(tab));
            }
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Settings").clicked() {
                action = Some(Action::ToggleSettings);
            }
        });
    });
    action
}

/// Big LCD digits inside a bezel.
fn lcd(ui: &mut Ui, text: &str, size: f32, color: Color32, face: Color32) {
    egui::Frame::default()
        .fill(BEZEL)
        .inner_margin(6.0)
        .show(ui, |ui| {
            egui::Frame::default()
                .fill(face)
                .inner_margin(12.0)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new(text).font(lcd_font(size)).strong().color(color));
                    });
                });
        });
}

fn bar(ui: &mut Ui, fraction: f64, color: Color32) {
    ui.add(
        egui::ProgressBar::new(fraction as f32)
            .fill(color)
            .desired_width(ui.available_width()),
    );
}

fn button(ui: &mut Ui, text: &str) -> bool {
    ui.add_sized(BUTTON_SIZE, egui::Button::new(text)).clicked()
}

pub fn draw_clock(ui: &mut Ui, render: &ClockRender) {
    ui.add_space(8.0);
    lcd(ui, &render.text, CLOCK_DIGITS, LCD_FG, PANEL_BG);
    ui.add_space(8.0);
    bar(ui, render.fraction, sweep_color(render.band));
}

pub fn draw_stopwatch(ui: &mut Ui, render: &StopwatchRender) -> Option<Action> {
    let mut action = None;
    ui.add_space(8.0);
    lcd(ui, &render.text, TIMER_DIGITS, LCD_FG, PANEL_BG);
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        let toggle = if render.running { "Stop" } else { "Start" };
        if button(ui, toggle) {
            action = Some(Action::StopwatchToggle);
        }
        if button(ui, "Reset") {
            action = Some(Action::StopwatchReset);
        }
        if button(ui, "Lap") {
            action = Some(Action::StopwatchLap);
        }
    });

    ui.add_space(4.0);
    let hint = match render.lap_count {
        0 => "space=start/stop  l=lap  r=reset".to_string(),
        1 => "1 lap  |  space=start/stop  l=lap  r=reset".to_string(),
        n => format!("{} laps  |  space=start/stop  l=lap  r=reset", n),
    };
    ui.label(RichText::new(hint).small().color(MUTED));
    action
}

pub fn draw_countdown(
    ui: &mut Ui,
    render: &CountdownRender,
    entry: &mut String,
    flash_lit: bool,
) -> Option<Action> {
    let mut action = None;
    ui.add_space(8.0);
    let face = if flash_lit { RED } else { PANEL_BG };
    let digits = if flash_lit { PANEL_BG } else { countdown_color(render.band) };
    lcd(ui, &render.text, TIMER_DIGITS, digits, face);
    ui.add_space(8.0);
    bar(ui, render.progress, countdown_color(render.band));
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.label(RichText::new("Time:").color(MUTED));
        let response = ui.add(egui::TextEdit::singleline(entry).desired_width(120.0));
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            action = Some(Action::CountdownSet);
        }
        ui.label(RichText::new("(H:MM:SS, MM:SS, or SS)").color(MUTED));
    });

    ui.horizontal(|ui| {
        if button(ui, "Set") {
            action = Some(Action::CountdownSet);
        }
        let toggle = if render.state == CountdownState::Running { "Pause" } else { "Start" };
        if button(ui, toggle) {
            action = Some(Action::CountdownToggle);
        }
        if button(ui, "Reset") {
            action = Some(Action::CountdownReset);
        }
    });
    action
}

pub fn draw_laps(ctx: &egui::Context, laps: &[Lap], open: &mut bool) {
    egui::Window::new("Lap Times")
        .open(open)
        .default_size([300.0, 320.0])
        .resizable(true)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    if laps.is_empty() {
                        ui.label(RichText::new("No laps yet").color(MUTED));
                    }
                    for lap in laps {
                        ui.label(RichText::new(lap.to_string()).monospace());
                    }
                });
        });
}

/// Returns true once the notice is dismissed.
pub fn draw_invalid_time(ctx: &egui::Context, error: &DurationError) -> bool {
    let mut dismissed = false;
    egui::Window::new("Invalid time")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("Please enter time as H:MM:SS, MM:SS, or SS (positive integers).");
            ui.label(RichText::new(error.to_string()).small().color(MUTED));
            ui.add_space(6.0);
            ui.vertical_centered(|ui| {
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        });
    dismissed || ctx.input(|i| i.key_pressed(egui::Key::Escape) || i.key_pressed(egui::Key::Enter))
}

/// Returns the edited settings.
pub fn draw_settings(ctx: &egui::Context, open: &mut bool, config: AlertConfig) -> AlertConfig {
    let mut edited = config;
    egui::Window::new("Settings")
        .open(open)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.checkbox(&mut edited.audio, "Beep for the last 10 seconds and at zero");
            ui.checkbox(&mut edited.flash, "Flash the countdown at zero");
        });
    edited
}
