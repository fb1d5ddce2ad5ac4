//! Chaos Survival - a top-down arcade survival game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, spawning, tick)
//! - `game`: Session owning state, spawn timers, RNG and clock
//! - `renderer`: Render sink trait and the crossterm terminal renderer
//! - `platform`: Input mapping, time sources and file storage
//! - `tuning`: Data-driven game balance
//! - `settings` / `highscores`: Persisted player preferences and records

pub mod audio;
pub mod game;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use game::{FrameOutcome, Session};
pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Default play area (px)
    pub const DEFAULT_CANVAS_WIDTH: f32 = 800.0;
    pub const DEFAULT_CANVAS_HEIGHT: f32 = 600.0;

    /// Frame pacing of the native loop (~60 Hz)
    pub const FRAME_MS: u64 = 16;

    /// Maximum spawn timer firings reported by a single poll
    pub const MAX_TIMER_CATCH_UP: u32 = 8;
}
