//! Data-driven game balance
//!
//! Every gameplay constant lives here so a tuning file can override it
//! without a rebuild. Defaults reproduce the classic survival mode.

use serde::{Deserialize, Serialize};

use crate::platform::storage;

/// Gameplay balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Timing ===
    /// Fixed duration of one tick (ms), used for cooldown bookkeeping
    pub tick_ms: u32,
    /// Survival time per wave (ms)
    pub wave_duration_ms: u64,

    // === Player ===
    pub player_size: f32,
    pub player_base_speed: f32,
    pub player_max_health: u32,
    /// Distance from the bottom edge to the player's top edge at spawn
    pub player_spawn_offset: f32,
    /// Minimum gap between two shots (ms)
    pub shot_cooldown_ms: u64,
    pub dash_multiplier: f32,
    pub dash_window_ms: u32,
    pub dash_cooldown_ms: u32,
    /// How long a shield pickup protects the player (ms)
    pub shield_grant_ms: u32,

    // === Bullets ===
    pub bullet_size: f32,
    pub bullet_speed: f32,
    pub bullet_damage: i32,

    // === Enemies ===
    pub enemy_size: f32,
    pub enemy_min_speed: f32,
    pub enemy_max_speed: f32,
    pub enemy_speed_per_wave: f32,
    pub enemy_base_health: i32,
    pub enemy_health_per_wave: i32,
    pub enemy_contact_damage: u32,
    pub enemy_kill_score: u64,
    pub enemy_spawn_interval_ms: u64,

    // === Power-ups ===
    pub power_up_size: f32,
    pub power_up_lifetime_ms: u64,
    pub power_up_spawn_interval_ms: u64,
    pub heal_amount: u32,
    pub speed_boost: f32,
    pub bullet_boost: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            wave_duration_ms: 30_000,

            player_size: 50.0,
            player_base_speed: 5.0,
            player_max_health: 100,
            player_spawn_offset: 100.0,
            shot_cooldown_ms: 300,
            dash_multiplier: 3.0,
            dash_window_ms: 300,
            dash_cooldown_ms: 2000,
            shield_grant_ms: 3000,

            bullet_size: 10.0,
            bullet_speed: 6.0,
            bullet_damage: 20,

            enemy_size: 50.0,
            enemy_min_speed: 1.0,
            enemy_max_speed: 3.0,
            enemy_speed_per_wave: 0.2,
            enemy_base_health: 30,
            enemy_health_per_wave: 5,
            enemy_contact_damage: 10,
            enemy_kill_score: 10,
            enemy_spawn_interval_ms: 2000,

            power_up_size: 30.0,
            power_up_lifetime_ms: 10_000,
            power_up_spawn_interval_ms: 10_000,
            heal_amount: 20,
            speed_boost: 2.0,
            bullet_boost: 2.0,
        }
    }
}

impl Tuning {
    /// Storage file name
    const STORAGE_KEY: &'static str = "tuning.json";

    /// Load tuning overrides, falling back to the built-in balance
    pub fn load() -> Self {
        match storage::load_json::<Tuning>(Self::STORAGE_KEY) {
            Ok(Some(tuning)) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Ignoring tuning file: {e}");
                Self::default()
            }
        }
    }

    /// Extra descent speed added on top of the random roll at a wave
    pub fn enemy_speed_bonus(&self, wave: u32) -> f32 {
        wave as f32 * self.enemy_speed_per_wave
    }

    /// Enemy starting health for a wave
    pub fn enemy_health(&self, wave: u32) -> i32 {
        self.enemy_base_health + wave as i32 * self.enemy_health_per_wave
    }
}
