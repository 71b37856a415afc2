//! Digit font for the LCD displays: the first installed segment-style face
//! from a priority list, backed by egui's monospace fonts.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use eframe::egui::{self, FontData, FontDefinitions, FontFamily, FontId};

pub const LCD_FAMILY: &str = "lcd";

/// Lowercased file-name fragments, best first.
const CANDIDATES: &[&str] = &[
    "digital-7 (mono)",
    "digital-7",
    "ds-digi",
    "lcdmono2",
    "lcdm2",
    "quartz",
    "seven segment",
    "segment7",
    "let's go digital",
    "dseg7classic",
    "dseg14classic",
];

const MAX_DEPTH: usize = 4;

pub fn lcd_font(size: f32) -> FontId {
    FontId::new(size, FontFamily::Name(LCD_FAMILY.into()))
}

/// Registers the LCD family. Without a matching face it is plain monospace.
pub fn install_lcd_font(ctx: &egui::Context) {
    let mut fonts = FontDefinitions::default();
    let mut family = fonts
        .families
        .get(&FontFamily::Monospace)
        .cloned()
        .unwrap_or_default();

    let mut files = Vec::new();
    for dir in font_dirs() {
        collect_font_files(&dir, 0, &mut files);
    }

    match pick_lcd_font(&files).map(|path| (path, std::fs::read(path))) {
        Some((path, Ok(bytes))) => {
            log::info!("LCD digits use {}", path.display());
            fonts
                .font_data
                .insert(LCD_FAMILY.to_owned(), Arc::new(FontData::from_owned(bytes)));
            family.insert(0, LCD_FAMILY.to_owned());
        }
        Some((path, Err(e))) => {
            log::warn!("can't read {}: {}, using monospace digits", path.display(), e);
        }
        None => log::info!("no LCD font installed, using monospace digits"),
    }

    fonts
        .families
        .insert(FontFamily::Name(LCD_FAMILY.into()), family);
    ctx.set_fonts(fonts);
}

/// First file matching the highest-priority candidate.
pub fn pick_lcd_font(files: &[PathBuf]) -> Option<&PathBuf> {
    CANDIDATES.iter().find_map(|candidate| {
        files.iter().find(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().to_lowercase())
                .is_some_and(|name| name.contains(candidate))
        })
    })
}

fn font_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/Library/Fonts"),
        PathBuf::from("/System/Library/Fonts"),
    ];
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        dirs.push(home.join(".fonts"));
        dirs.push(home.join(".local/share/fonts"));
        dirs.push(home.join("Library/Fonts"));
    }
    if let Some(windir) = std::env::var_os("WINDIR").map(PathBuf::from) {
        dirs.push(windir.join("Fonts"));
    }
    if let Some(local) = std::env::var_os("LOCALAPPDATA").map(PathBuf::from) {
        dirs.push(local.join("Microsoft/Windows/Fonts"));
    }
    dirs
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| ext == "ttf" || ext == "otf")
}

/// Missing or unreadable directories are skipped.
fn collect_font_files(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    if depth > MAX_DEPTH {
        return;
    }
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_font_files(&path, depth + 1, out);
        } else if is_font_file(&path) {
            out.push(path);
        }
    }
}
