//! Enemy and power-up creation
//!
//! Spawning is stateless: callers decide *when* (see `schedule`), these
//! functions decide *what*. All randomness comes through the injected RNG.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, PowerUp, PowerUpKind};
use crate::tuning::Tuning;

/// Wave number for a survival time: one wave per `wave_duration_ms`,
/// starting at 1
pub fn wave_for_elapsed(elapsed_ms: u64, wave_duration_ms: u64) -> u32 {
    (elapsed_ms / wave_duration_ms.max(1)) as u32 + 1
}

/// One enemy just above the visible area, scaled for `wave`
pub fn spawn_enemy(
    rng: &mut impl Rng,
    canvas: Vec2,
    wave: u32,
    now_ms: u64,
    tuning: &Tuning,
) -> Enemy {
    let size = Vec2::splat(tuning.enemy_size);
    let x = random_offset(rng, canvas.x - size.x);
    let roll = if tuning.enemy_max_speed > tuning.enemy_min_speed {
        rng.random_range(tuning.enemy_min_speed..tuning.enemy_max_speed)
    } else {
        tuning.enemy_min_speed
    };
    let speed = roll + tuning.enemy_speed_bonus(wave);

    Enemy {
        pos: Vec2::new(x, -size.y),
        size,
        speed,
        health: tuning.enemy_health(wave),
        spawned_ms: now_ms,
    }
}

/// One power-up somewhere inside the play area
pub fn spawn_power_up(rng: &mut impl Rng, canvas: Vec2, now_ms: u64, tuning: &Tuning) -> PowerUp {
    let size = Vec2::splat(tuning.power_up_size);
    let pos = Vec2::new(
        random_offset(rng, canvas.x - size.x),
        random_offset(rng, canvas.y - size.y),
    );
    let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];

    PowerUp {
        pos,
        size,
        kind,
        lifetime_ms: tuning.power_up_lifetime_ms,
        spawned_ms: now_ms,
    }
}

/// Uniform in `[0, span)`, or 0 when the entity is wider than the area
fn random_offset(rng: &mut impl Rng, span: f32) -> f32 {
    if span > 0.0 {
        rng.random_range(0.0..span)
    } else {
        0.0
    }
}
