//! External configuration loader.
//!
//! Reads `config.toml` from the executable's directory (or CWD).
//! Falls back to defaults if the file is missing or incomplete.
//! Value ranges are not checked here; `Viewer::init` rejects bad geometry.

use serde::Deserialize;
use std::path::PathBuf;

use crossterm::style::Color;

use crate::ui::grid::Palette;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub universe: UniverseConfig,
    pub view: ViewSettings,
    pub timing: TimingConfig,
    pub palette: Palette,
}

#[derive(Clone, Debug)]
pub struct UniverseConfig {
    pub width: u32,
    pub height: u32,
    /// Probability that a cell starts alive.
    pub density: f64,
}

#[derive(Clone, Debug)]
pub struct ViewSettings {
    pub cell_size: u32,
    pub min_scale: f64,
    pub zoom_sensitivity: f64,
    /// Wheel delta reported for one notch of a terminal scroll event.
    pub wheel_notch: f64,
    /// Screen pixels per arrow-key pan.
    pub pan_step: f64,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    pub frame_interval_ms: u64,
    pub start_playing: bool,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    universe: TomlUniverse,
    #[serde(default)]
    view: TomlView,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    colors: TomlColors,
}

#[derive(Deserialize, Debug)]
struct TomlUniverse {
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
    #[serde(default = "default_density")]
    density: f64,
}

#[derive(Deserialize, Debug)]
struct TomlView {
    #[serde(default = "default_cell_size")]
    cell_size: u32,
    #[serde(default = "default_min_scale")]
    min_scale: f64,
    #[serde(default = "default_zoom_sensitivity")]
    zoom_sensitivity: f64,
    #[serde(default = "default_wheel_notch")]
    wheel_notch: f64,
    #[serde(default = "default_pan_step")]
    pan_step: f64,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_frame_interval")]
    frame_interval_ms: u64,
    #[serde(default)]
    start_playing: bool,
}

#[derive(Deserialize, Debug)]
struct TomlColors {
    #[serde(default = "default_grid_color")]
    grid: String,
    #[serde(default = "default_dead_color")]
    dead: String,
    #[serde(default = "default_alive_color")]
    alive: String,
}

// ── Defaults ──

fn default_width() -> u32 { 64 }
fn default_height() -> u32 { 32 }
fn default_density() -> f64 { 0.5 }
fn default_cell_size() -> u32 { 2 }
fn default_min_scale() -> f64 { 0.1 }
fn default_zoom_sensitivity() -> f64 { -0.01 }
fn default_wheel_notch() -> f64 { 10.0 }  // one notch = 0.1 scale at default sensitivity
fn default_pan_step() -> f64 { 4.0 }
fn default_frame_interval() -> u64 { 16 }  // ~60 fps
fn default_grid_color() -> String { "#CCCCCC".into() }
fn default_dead_color() -> String { "#FFFFFF".into() }
fn default_alive_color() -> String { "#000000".into() }

impl Default for TomlUniverse {
    fn default() -> Self {
        TomlUniverse {
            width: default_width(),
            height: default_height(),
            density: default_density(),
        }
    }
}

impl Default for TomlView {
    fn default() -> Self {
        TomlView {
            cell_size: default_cell_size(),
            min_scale: default_min_scale(),
            zoom_sensitivity: default_zoom_sensitivity(),
            wheel_notch: default_wheel_notch(),
            pan_step: default_pan_step(),
        }
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            frame_interval_ms: default_frame_interval(),
            start_playing: false,
        }
    }
}

impl Default for TomlColors {
    fn default() -> Self {
        TomlColors {
            grid: default_grid_color(),
            dead: default_dead_color(),
            alive: default_alive_color(),
        }
    }
}

// ── Loading ──

impl ViewerConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        ViewerConfig::from_toml(load_toml(&candidate_dirs()))
    }

    #[allow(dead_code)]
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(ViewerConfig::from_toml)
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let fallback = Palette::default();
        ViewerConfig {
            universe: UniverseConfig {
                width: cfg.universe.width,
                height: cfg.universe.height,
                density: cfg.universe.density,
            },
            view: ViewSettings {
                cell_size: cfg.view.cell_size,
                min_scale: cfg.view.min_scale,
                zoom_sensitivity: cfg.view.zoom_sensitivity,
                wheel_notch: cfg.view.wheel_notch,
                pan_step: cfg.view.pan_step,
            },
            timing: TimingConfig {
                frame_interval_ms: cfg.timing.frame_interval_ms,
                start_playing: cfg.timing.start_playing,
            },
            palette: Palette {
                grid: color_or("grid", &cfg.colors.grid, fallback.grid),
                dead: color_or("dead", &cfg.colors.dead, fallback.dead),
                alive: color_or("alive", &cfg.colors.alive, fallback.alive),
            },
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig::from_toml(TomlConfig::default())
    }
}

/// Parse `#RRGGBB` (leading `#` optional).
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb { r: channel(0)?, g: channel(2)?, b: channel(4)? })
}

fn color_or(name: &str, value: &str, fallback: Color) -> Color {
    parse_hex_color(value).unwrap_or_else(|| {
        log::warn!("config.toml: colors.{name} = {value:?} is not #RRGGBB, using default");
        fallback
    })
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/lifeview)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/lifeview");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory
    let sys = PathBuf::from("/usr/share/lifeview");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => {
                        log::info!("loaded {}", path.display());
                        return cfg;
                    }
                    Err(e) => {
                        log::warn!("{}: parse error: {e}; using default settings", path.display());
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    log::warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
