//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in as an argument, never from the system clock
//! - Seeded RNG only, passed in by the caller
//! - No rendering or platform dependencies

pub mod collision;
pub mod schedule;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Bounded, is_colliding};
pub use schedule::{IntervalTimer, SpawnDue, SpawnSchedule};
pub use spawner::{spawn_enemy, spawn_power_up, wave_for_elapsed};
pub use state::{
    Bullet, Enemy, GameEvent, GamePhase, GameState, Player, PowerUp, PowerUpKind, Snapshot,
};
pub use tick::{TickInput, TickOutcome, TickStatus, tick};
