//! Game settings and preferences
//!
//! Persisted as `settings.json` in the data directory, separate from the
//! balance values in `tuning`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use crate::platform::input::KeyBindings;
use crate::platform::storage;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Play area ===
    /// Simulation width in px (independent of the terminal size)
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Gameplay ===
    /// Fixed RNG seed; a fresh seed per launch when unset
    pub seed: Option<u64>,
    /// Keep spawn timers running while paused
    pub spawn_while_paused: bool,

    // === Input ===
    pub key_bindings: KeyBindings,
    /// Keys without a release event count as held for this long (ms)
    pub hold_window_ms: u64,

    // === HUD ===
    /// Show remaining seconds on power-ups
    pub show_power_up_timers: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,

            seed: None,
            spawn_while_paused: true,

            key_bindings: KeyBindings::default(),
            hold_window_ms: 150,

            show_power_up_timers: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Storage file name
    const STORAGE_KEY: &'static str = "settings.json";

    /// Play area size
    pub fn canvas(&self) -> Vec2 {
        Vec2::new(self.canvas_width.max(1.0), self.canvas_height.max(1.0))
    }

    /// Step the master volume, clamped to 0.0 - 1.0. Returns the new level.
    pub fn adjust_master_volume(&mut self, delta: f32) -> f32 {
        // Snap to tenths so repeated steps don't drift
        self.master_volume = ((self.master_volume + delta) * 10.0).round().clamp(0.0, 10.0) / 10.0;
        self.master_volume
    }

    /// Load settings from the data directory, falling back to defaults
    pub fn load() -> Self {
        match storage::load_json::<Settings>(Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings file: {e}");
                Self::default()
            }
        }
    }

    /// Save settings to the data directory
    pub fn save(&self) {
        match storage::save_json(Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Could not save settings: {e}"),
        }
    }
}
