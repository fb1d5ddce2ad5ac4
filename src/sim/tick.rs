//! Fixed-order simulation tick
//!
//! One call advances a running game by one frame. The order of the steps
//! is part of the game rules: input, timers, bullets, enemies, power-ups,
//! then the terminal check.

use super::collision::is_colliding;
use super::state::{GameEvent, GamePhase, GameState, Player, PowerUpKind};
use crate::tuning::Tuning;

/// Player intents for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Fire (rate-limited by the player)
    pub shoot: bool,
    /// Shield is up while held
    pub shield: bool,
    /// Trigger a dash (ignored during cooldown)
    pub dash: bool,
}

/// Whether the caller should schedule another tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    Continue,
    GameOver,
}

/// Result of one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub status: TickStatus,
    pub events: Vec<GameEvent>,
}

impl TickOutcome {
    fn new(status: TickStatus, events: Vec<GameEvent>) -> Self {
        Self { status, events }
    }

    /// False once the run is over; the caller stops its frame loop
    pub fn reschedule(&self) -> bool {
        self.status == TickStatus::Continue
    }
}

/// Advance the game by one tick at wall-clock time `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) -> TickOutcome {
    let mut events = Vec::new();

    match state.phase {
        GamePhase::GameOver => return TickOutcome::new(TickStatus::GameOver, events),
        GamePhase::Paused => {
            // Survival time keeps running while paused
            state.now_ms = state.now_ms.max(now_ms);
            return TickOutcome::new(TickStatus::Continue, events);
        }
        GamePhase::Running => {}
    }

    state.now_ms = state.now_ms.max(now_ms);
    state.time_ticks += 1;

    apply_input(state, input, &mut events);
    state.player.tick_timers(state.tuning.tick_ms);
    update_bullets(state, &mut events);
    update_enemies(state, &mut events);
    update_power_ups(state, &mut events);

    let wave = state.wave();
    if wave > state.last_wave {
        log::info!("Wave {} reached after {} ms", wave, state.elapsed_ms());
        state.last_wave = wave;
        events.push(GameEvent::WaveAdvanced(wave));
    }

    if !state.player.is_alive() {
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game over: score {}, wave {}, survived {} ms",
            state.player.score,
            wave,
            state.elapsed_ms()
        );
        events.push(GameEvent::GameOver {
            score: state.player.score,
            wave,
            survived_ms: state.elapsed_ms(),
        });
        return TickOutcome::new(TickStatus::GameOver, events);
    }

    TickOutcome::new(TickStatus::Continue, events)
}

/// Movement, shooting, shield hold and dash trigger
pub fn apply_input(state: &mut GameState, input: &TickInput, events: &mut Vec<GameEvent>) {
    let player = &mut state.player;

    player.apply_movement(input, state.canvas);

    if input.shoot && player.try_shoot(state.now_ms, &state.tuning) {
        events.push(GameEvent::BulletFired);
    }

    player.shield_held = input.shield;
    player.refresh_shield();

    if input.dash && player.try_dash(&state.tuning) {
        log::debug!("Dash started, speed {}", player.speed);
        events.push(GameEvent::DashStarted);
    }
}

/// Move bullets up, drop those off the top, resolve enemy hits.
///
/// A bullet damages at most one enemy and is consumed by the hit. Bullets
/// and enemies are both scanned newest first.
pub fn update_bullets(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let tuning = &state.tuning;
    let enemies = &mut state.enemies;
    let bullets = &mut state.player.bullets;
    let mut score_gain = 0;

    for i in (0..bullets.len()).rev() {
        let bullet = &mut bullets[i];
        bullet.pos.y -= bullet.speed;
        if bullet.pos.y < 0.0 {
            bullets.remove(i);
            continue;
        }

        let Some(index) = enemies
            .iter()
            .rposition(|enemy| is_colliding(&bullets[i], enemy))
        else {
            continue;
        };
        bullets.remove(i);

        let enemy = &mut enemies[index];
        enemy.health -= tuning.bullet_damage;
        if enemy.health <= 0 {
            enemies.remove(index);
            score_gain += tuning.enemy_kill_score;
            events.push(GameEvent::EnemyDestroyed {
                score: tuning.enemy_kill_score,
            });
        } else {
            events.push(GameEvent::EnemyHit {
                remaining_health: enemy.health,
            });
        }
    }

    state.player.score += score_gain;
}

/// Move enemies down, drop escapees, resolve contact with the player.
///
/// Contact always consumes the enemy; damage only lands without a shield.
pub fn update_enemies(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let floor = state.canvas.y;
    let damage = state.tuning.enemy_contact_damage;
    let player = &mut state.player;

    state.enemies.retain_mut(|enemy| {
        enemy.pos.y += enemy.speed;
        if enemy.pos.y > floor {
            events.push(GameEvent::EnemyEscaped);
            return false;
        }

        if is_colliding(&*player, &*enemy) {
            let shielded = player.shield_active;
            if !shielded {
                player.take_damage(damage);
            }
            events.push(GameEvent::PlayerHit {
                damage: if shielded { 0 } else { damage },
                shielded,
            });
            return false;
        }
        true
    });
}

/// Age power-ups by wall-clock time, drop expired ones, apply pickups
pub fn update_power_ups(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let now = state.now_ms;
    let tuning = &state.tuning;
    let player = &mut state.player;

    state.power_ups.retain_mut(|power_up| {
        let age = now.saturating_sub(power_up.spawned_ms);
        power_up.lifetime_ms = tuning.power_up_lifetime_ms.saturating_sub(age);
        if power_up.lifetime_ms == 0 {
            events.push(GameEvent::PowerUpExpired(power_up.kind));
            return false;
        }

        if is_colliding(&*player, &*power_up) {
            apply_power_up(player, power_up.kind, tuning);
            events.push(GameEvent::PowerUpCollected(power_up.kind));
            return false;
        }
        true
    });
}

/// Apply a collected power-up's effect
pub fn apply_power_up(player: &mut Player, kind: PowerUpKind, tuning: &Tuning) {
    log::debug!("Picked up {} power-up", kind.as_str());
    match kind {
        PowerUpKind::Health => player.heal(tuning.heal_amount),
        PowerUpKind::Shield => player.grant_shield(tuning.shield_grant_ms),
        PowerUpKind::Speed => player.boost_speed(tuning.speed_boost),
        PowerUpKind::Bullet => {
            for bullet in &mut player.bullets {
                bullet.speed += tuning.bullet_boost;
            }
        }
    }
}
