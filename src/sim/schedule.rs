//! Interval timers driving enemy and power-up spawns
//!
//! Timers are polled with the current time instead of firing callbacks, so
//! the frame loop owns every mutation and tests can step time by hand.

use crate::consts::MAX_TIMER_CATCH_UP;
use crate::tuning::Tuning;

/// Repeating timer, inert until started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalTimer {
    period_ms: u64,
    next_due_ms: Option<u64>,
}

impl IntervalTimer {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            next_due_ms: None,
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// (Re)arm so the first firing is one period after `now_ms`
    pub fn start(&mut self, now_ms: u64) {
        self.next_due_ms = Some(now_ms + self.period_ms);
    }

    pub fn stop(&mut self) {
        self.next_due_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due_ms.is_some()
    }

    /// Number of periods elapsed since the last poll.
    ///
    /// At most `MAX_TIMER_CATCH_UP` firings are reported; older missed
    /// periods are dropped.
    pub fn fire(&mut self, now_ms: u64) -> u32 {
        let Some(mut next) = self.next_due_ms else {
            return 0;
        };

        let mut count = 0;
        while next <= now_ms {
            count += 1;
            next += self.period_ms;
            if count == MAX_TIMER_CATCH_UP {
                // Skip the backlog, keep the phase
                if next <= now_ms {
                    next += self.period_ms * ((now_ms - next) / self.period_ms + 1);
                }
                break;
            }
        }
        self.next_due_ms = Some(next);
        count
    }
}

/// Spawns due since the last poll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnDue {
    pub enemies: u32,
    pub power_ups: u32,
}

/// The two spawn timers of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnSchedule {
    pub enemy: IntervalTimer,
    pub power_up: IntervalTimer,
}

impl SpawnSchedule {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            enemy: IntervalTimer::new(tuning.enemy_spawn_interval_ms),
            power_up: IntervalTimer::new(tuning.power_up_spawn_interval_ms),
        }
    }

    /// Cancel every timer
    pub fn stop_all(&mut self) {
        self.enemy.stop();
        self.power_up.stop();
    }

    /// Stop, then start every timer. Never leaves a stale schedule running.
    pub fn start_all(&mut self, now_ms: u64) {
        self.stop_all();
        self.enemy.start(now_ms);
        self.power_up.start(now_ms);
    }

    pub fn is_running(&self) -> bool {
        self.enemy.is_running() || self.power_up.is_running()
    }

    pub fn poll(&mut self, now_ms: u64) -> SpawnDue {
        SpawnDue {
            enemies: self.enemy.fire(now_ms),
            power_ups: self.power_up.fire(now_ms),
        }
    }
}
