//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in [`GameState`]. Entities are
//! plain records owned by the state; nothing is shared.

use glam::Vec2;

use super::collision::{Aabb, Bounded, clamp_into};
use super::spawner::wave_for_elapsed;
use super::tick::TickInput;
use crate::tuning::Tuning;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Simulation advancing every tick
    Running,
    /// Simulation frozen; frames still get scheduled
    Paused,
    /// Run ended (terminal)
    GameOver,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    /// Heal, capped at max health
    Health,
    /// Timed shield
    Shield,
    /// Permanent movement speed boost
    Speed,
    /// Speeds up every bullet currently in flight
    Bullet,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Health,
        PowerUpKind::Shield,
        PowerUpKind::Speed,
        PowerUpKind::Bullet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Health => "health",
            PowerUpKind::Shield => "shield",
            PowerUpKind::Speed => "speed",
            PowerUpKind::Bullet => "bullet",
        }
    }
}

/// A player-fired bullet travelling straight up
#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    /// Upward speed (px per tick)
    pub speed: f32,
}

impl Bullet {
    /// Bullet leaving the top-centre of the player
    pub fn fired_from(player: &Player, tuning: &Tuning) -> Self {
        let size = Vec2::splat(tuning.bullet_size);
        Self {
            pos: Vec2::new(player.pos.x + player.size.x / 2.0 - size.x / 2.0, player.pos.y),
            size,
            speed: tuning.bullet_speed,
        }
    }
}

/// A descending enemy
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    /// Downward speed (px per tick)
    pub speed: f32,
    pub health: i32,
    pub spawned_ms: u64,
}

/// A collectible lying in the play area
#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PowerUpKind,
    /// Remaining lifetime (ms), recomputed from the spawn time every tick
    pub lifetime_ms: u64,
    pub spawned_ms: u64,
}

/// The player's avatar
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Current movement speed (px per tick), tripled while dashing
    pub speed: f32,
    /// Speed outside a dash
    pub base_speed: f32,
    pub health: u32,
    pub max_health: u32,
    pub score: u64,
    /// Bullets in flight
    pub bullets: Vec<Bullet>,
    /// Effective shield this tick
    pub shield_active: bool,
    /// Shield key held this tick
    pub shield_held: bool,
    /// Remaining time on a shield pickup (ms)
    pub shield_grant_ms: u32,
    pub dash_cooldown_ms: u32,
    /// Remaining time of the current dash burst (ms)
    pub dash_window_ms: u32,
    pub last_shot_ms: Option<u64>,
}

impl Player {
    /// Fresh player at the bottom-centre of the play area
    pub fn new(canvas: Vec2, tuning: &Tuning) -> Self {
        let size = Vec2::splat(tuning.player_size);
        Self {
            pos: Vec2::new(
                canvas.x / 2.0 - size.x / 2.0,
                canvas.y - tuning.player_spawn_offset,
            ),
            size,
            speed: tuning.player_base_speed,
            base_speed: tuning.player_base_speed,
            health: tuning.player_max_health,
            max_health: tuning.player_max_health,
            score: 0,
            bullets: Vec::new(),
            shield_active: false,
            shield_held: false,
            shield_grant_ms: 0,
            dash_cooldown_ms: 0,
            dash_window_ms: 0,
            last_shot_ms: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_dashing(&self) -> bool {
        self.dash_window_ms > 0
    }

    pub fn heal(&mut self, amount: u32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Move by current speed in every held direction, staying in bounds
    pub fn apply_movement(&mut self, input: &TickInput, canvas: Vec2) {
        let mut delta = Vec2::ZERO;
        if input.left {
            delta.x -= self.speed;
        }
        if input.right {
            delta.x += self.speed;
        }
        if input.up {
            delta.y -= self.speed;
        }
        if input.down {
            delta.y += self.speed;
        }
        self.pos = clamp_into(self.pos + delta, self.size, canvas);
    }

    /// Fire a bullet unless the last shot was too recent
    pub fn try_shoot(&mut self, now_ms: u64, tuning: &Tuning) -> bool {
        if let Some(last) = self.last_shot_ms
            && now_ms.saturating_sub(last) <= tuning.shot_cooldown_ms
        {
            return false;
        }
        let bullet = Bullet::fired_from(self, tuning);
        self.bullets.push(bullet);
        self.last_shot_ms = Some(now_ms);
        true
    }

    /// Start a dash if the cooldown has run out
    pub fn try_dash(&mut self, tuning: &Tuning) -> bool {
        if self.dash_cooldown_ms > 0 {
            return false;
        }
        self.speed = self.base_speed * tuning.dash_multiplier;
        self.dash_window_ms = tuning.dash_window_ms;
        self.dash_cooldown_ms = tuning.dash_cooldown_ms;
        true
    }

    /// Count down dash and shield timers by one tick
    pub fn tick_timers(&mut self, tick_ms: u32) {
        self.dash_cooldown_ms = self.dash_cooldown_ms.saturating_sub(tick_ms);

        if self.dash_window_ms > 0 {
            self.dash_window_ms = self.dash_window_ms.saturating_sub(tick_ms);
            if self.dash_window_ms == 0 {
                self.speed = self.base_speed;
            }
        }

        self.shield_grant_ms = self.shield_grant_ms.saturating_sub(tick_ms);
        self.refresh_shield();
    }

    /// Grant a timed shield (does not stack, refreshes to the longer duration)
    pub fn grant_shield(&mut self, duration_ms: u32) {
        self.shield_grant_ms = self.shield_grant_ms.max(duration_ms);
        self.refresh_shield();
    }

    /// Permanent speed boost. Applies to the base so a dash cannot undo it.
    pub fn boost_speed(&mut self, amount: f32) {
        self.base_speed += amount;
        self.speed += amount;
    }

    pub fn refresh_shield(&mut self) {
        self.shield_active = self.shield_held || self.shield_grant_ms > 0;
    }
}

macro_rules! impl_bounded {
    ($($ty:ty),*) => {
        $(impl Bounded for $ty {
            fn bounds(&self) -> Aabb {
                Aabb::new(self.pos, self.size)
            }
        })*
    };
}

impl_bounded!(Player, Enemy, Bullet, PowerUp);

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    BulletFired,
    DashStarted,
    /// A bullet hit an enemy that survived
    EnemyHit { remaining_health: i32 },
    EnemyDestroyed { score: u64 },
    /// An enemy left the bottom of the play area
    EnemyEscaped,
    PlayerHit { damage: u32, shielded: bool },
    PowerUpCollected(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    WaveAdvanced(u32),
    GameOver { score: u64, wave: u32, survived_ms: u64 },
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Play area size in px
    pub canvas: Vec2,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Time the run started (ms)
    pub start_ms: u64,
    /// Time of the most recent tick (ms)
    pub now_ms: u64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub power_ups: Vec<PowerUp>,
    /// Wave reported by the most recent tick
    pub last_wave: u32,
    /// Ticks simulated this run
    pub time_ticks: u64,
}

impl GameState {
    /// New running game started at `now_ms`
    pub fn new(canvas: Vec2, tuning: Tuning, now_ms: u64) -> Self {
        Self {
            player: Player::new(canvas, &tuning),
            canvas,
            tuning,
            phase: GamePhase::Running,
            start_ms: now_ms,
            now_ms,
            enemies: Vec::new(),
            power_ups: Vec::new(),
            last_wave: 1,
            time_ticks: 0,
        }
    }

    /// Start action: clear every collection and counter, restart the clock
    pub fn reset(&mut self, now_ms: u64) {
        self.player = Player::new(self.canvas, &self.tuning);
        self.enemies.clear();
        self.power_ups.clear();
        self.phase = GamePhase::Running;
        self.start_ms = now_ms;
        self.now_ms = now_ms;
        self.last_wave = 1;
        self.time_ticks = 0;
    }

    /// Survival time so far
    pub fn elapsed_ms(&self) -> u64 {
        self.now_ms.saturating_sub(self.start_ms)
    }

    /// Current wave, derived from survival time
    pub fn wave(&self) -> u32 {
        self.wave_at(self.now_ms)
    }

    pub fn wave_at(&self, now_ms: u64) -> u32 {
        wave_for_elapsed(now_ms.saturating_sub(self.start_ms), self.tuning.wave_duration_ms)
    }

    /// Running -> Paused. Returns whether the phase changed.
    pub fn pause(&mut self) -> bool {
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Paused;
            true
        } else {
            false
        }
    }

    /// Paused -> Running. Returns whether the phase changed.
    pub fn resume(&mut self) -> bool {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Running;
            true
        } else {
            false
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Immutable view for rendering
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            canvas: self.canvas,
            player: &self.player,
            bullets: &self.player.bullets,
            enemies: &self.enemies,
            power_ups: &self.power_ups,
            score: self.player.score,
            health: self.player.health,
            wave: self.wave(),
            elapsed_ms: self.elapsed_ms(),
        }
    }
}

/// Read-only frame data handed to a render sink
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub canvas: Vec2,
    pub player: &'a Player,
    pub bullets: &'a [Bullet],
    pub enemies: &'a [Enemy],
    pub power_ups: &'a [PowerUp],
    pub score: u64,
    pub health: u32,
    pub wave: u32,
    pub elapsed_ms: u64,
}
