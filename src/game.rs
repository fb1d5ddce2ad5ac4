//! Game session
//!
//! A [`Session`] owns everything one player's run needs: the simulation
//! state, the spawn timers, the RNG and the clock. Front-ends call
//! [`Session::frame`] once per frame and react to the returned events.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::platform::Clock;
use crate::renderer::RenderSink;
use crate::sim::{
    GameEvent, GameState, SpawnDue, SpawnSchedule, TickInput, spawn_enemy, spawn_power_up, tick,
};
use crate::tuning::Tuning;
use crate::ui::Overlays;

/// What happened during one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub events: Vec<GameEvent>,
    /// False once the run has ended
    pub reschedule: bool,
    /// Entities appended by spawn timers this frame
    pub spawned: SpawnDue,
}

/// One owned game context
pub struct Session<C: Clock> {
    clock: C,
    state: GameState,
    schedule: SpawnSchedule,
    rng: Pcg32,
    seed: u64,
    overlays: Overlays,
    /// Keep spawn timers firing while paused
    spawn_while_paused: bool,
    started: bool,
}

impl<C: Clock> Session<C> {
    /// Session sitting on the title screen; nothing runs until [`Session::start`]
    pub fn new(clock: C, canvas: Vec2, tuning: Tuning, seed: u64, spawn_while_paused: bool) -> Self {
        let now = clock.now_ms();
        let schedule = SpawnSchedule::new(&tuning);
        Self {
            clock,
            state: GameState::new(canvas, tuning, now),
            schedule,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            overlays: Overlays::title_screen(),
            spawn_while_paused,
            started: false,
        }
    }

    /// Start or restart the run. Timers are always stopped before being started again.
    pub fn start(&mut self) {
        let now = self.clock.now_ms();
        let restart = self.started;

        self.schedule.stop_all();
        self.state.reset(now);
        self.schedule.start_all(now);
        self.overlays.on_start();
        self.started = true;

        if restart {
            log::info!("Run restarted at {now} ms");
        } else {
            log::info!("Run started at {now} ms (seed {})", self.seed);
        }
    }

    pub fn pause(&mut self) -> bool {
        if !self.state.pause() {
            return false;
        }
        if !self.spawn_while_paused {
            self.schedule.stop_all();
        }
        self.overlays.on_pause();
        log::info!("Paused at {} ms", self.state.elapsed_ms());
        true
    }

    pub fn resume(&mut self) -> bool {
        if !self.state.resume() {
            return false;
        }
        if !self.spawn_while_paused {
            self.schedule.start_all(self.clock.now_ms());
        }
        self.overlays.on_resume();
        log::info!("Resumed");
        true
    }

    /// Pause if running, resume if paused. Ignored before start and after game over.
    pub fn toggle_pause(&mut self) -> bool {
        if !self.started {
            return false;
        }
        self.pause() || self.resume()
    }

    /// Run one frame: due spawns, one tick, one render
    pub fn frame(&mut self, input: &TickInput, sink: &mut impl RenderSink) -> FrameOutcome {
        let mut outcome = FrameOutcome {
            events: Vec::new(),
            reschedule: !self.state.is_over(),
            spawned: SpawnDue::default(),
        };

        if self.started && !self.state.is_over() {
            let now = self.clock.now_ms();
            outcome.spawned = self.spawn_due(now);

            let result = tick(&mut self.state, input, now);
            outcome.reschedule = result.reschedule();
            outcome.events = result.events;

            if !outcome.reschedule {
                self.schedule.stop_all();
                self.overlays.on_game_over();
            }
        }

        if let Err(e) = sink.render(&self.state.snapshot(), &self.overlays) {
            log::warn!("Render failed: {e}");
        }

        outcome
    }

    fn spawn_due(&mut self, now: u64) -> SpawnDue {
        let due = self.schedule.poll(now);
        let wave = self.state.wave_at(now);

        for _ in 0..due.enemies {
            let enemy = spawn_enemy(
                &mut self.rng,
                self.state.canvas,
                wave,
                now,
                &self.state.tuning,
            );
            log::debug!("Enemy spawned at x={:.0}, speed {:.2}", enemy.pos.x, enemy.speed);
            self.state.enemies.push(enemy);
        }
        for _ in 0..due.power_ups {
            let power_up = spawn_power_up(&mut self.rng, self.state.canvas, now, &self.state.tuning);
            log::debug!("{} power-up spawned", power_up.kind.as_str());
            self.state.power_ups.push(power_up);
        }

        due
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn overlays(&self) -> &Overlays {
        &self.overlays
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn schedule(&self) -> &SpawnSchedule {
        &self.schedule
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualClock;
    use crate::renderer::NullSink;
    use crate::sim::{Enemy, GamePhase, Snapshot};
    use crate::ui::Overlay;

    const FRAME: u64 = 16;

    fn session(seed: u64) -> Session<ManualClock> {
        Session::new(
            ManualClock::new(0),
            Vec2::new(800.0, 600.0),
            Tuning::default(),
            seed,
            true,
        )
    }

    fn run_frames(session: &mut Session<ManualClock>, input: &TickInput, frames: u32) {
        for _ in 0..frames {
            session.clock().advance(FRAME);
            session.frame(input, &mut NullSink);
        }
    }

    #[derive(Default)]
    struct CountingSink {
        frames: u32,
        last_score: u64,
    }

    impl RenderSink for CountingSink {
        fn render(&mut self, snapshot: &Snapshot<'_>, _overlays: &Overlays) -> std::io::Result<()> {
            self.frames += 1;
            self.last_score = snapshot.score;
            Ok(())
        }
    }

    struct FailingSink;

    impl RenderSink for FailingSink {
        fn render(&mut self, _snapshot: &Snapshot<'_>, _overlays: &Overlays) -> std::io::Result<()> {
            Err(std::io::Error::other("terminal gone"))
        }
    }

    #[test]
    fn test_start_then_no_ticks() {
        let mut s = session(1);
        s.clock().set(5_000);
        s.start();

        let state = s.state();
        assert_eq!(state.player.health, 100);
        assert_eq!(state.player.score, 0);
        assert!(state.enemies.is_empty());
        assert_eq!(state.wave(), 1);
        assert!(s.overlays().is_clear());
        assert!(s.schedule().is_running());
    }

    #[test]
    fn test_title_screen_does_not_simulate() {
        let mut s = session(1);
        let mut sink = CountingSink::default();
        s.clock().advance(10_000);
        let outcome = s.frame(&TickInput::default(), &mut sink);

        assert!(outcome.reschedule);
        assert!(outcome.events.is_empty());
        assert_eq!(outcome.spawned, SpawnDue::default());
        assert_eq!(s.state().time_ticks, 0);
        assert_eq!(sink.frames, 1);
        assert!(s.overlays().is_visible(Overlay::Start));
    }

    #[test]
    fn test_enemy_timer_spawns_every_two_seconds() {
        let mut s = session(3);
        s.start();
        // 125 frames * 16 ms = 2000 ms
        run_frames(&mut s, &TickInput::default(), 125);
        assert_eq!(s.state().enemies.len(), 1);
        run_frames(&mut s, &TickInput::default(), 125);
        assert_eq!(s.state().enemies.len(), 2);
    }

    #[test]
    fn test_restart_does_not_duplicate_timers() {
        let mut s = session(4);
        s.start();
        run_frames(&mut s, &TickInput::default(), 100);
        s.start();
        s.start();
        assert!(s.state().enemies.is_empty());

        s.clock().advance(2_000);
        let outcome = s.frame(&TickInput::default(), &mut NullSink);
        assert_eq!(outcome.spawned.enemies, 1);
        assert_eq!(s.state().enemies.len(), 1);
    }

    #[test]
    fn test_paused_session_does_not_move_entities() {
        let mut s = session(5);
        s.start();
        s.state_mut().enemies.push(Enemy {
            pos: Vec2::new(10.0, 10.0),
            size: Vec2::splat(50.0),
            speed: 2.0,
            health: 30,
            spawned_ms: 0,
        });
        assert!(s.pause());
        assert!(s.overlays().is_visible(Overlay::Pause));

        let ticks = s.state().time_ticks;
        let player_pos = s.state().player.pos;
        run_frames(&mut s, &TickInput { left: true, ..Default::default() }, 60);

        assert_eq!(s.state().enemies[0].pos, Vec2::new(10.0, 10.0));
        assert_eq!(s.state().player.pos, player_pos);
        assert_eq!(s.state().time_ticks, ticks);

        assert!(s.toggle_pause());
        assert_eq!(s.state().phase, GamePhase::Running);
        assert!(s.overlays().is_clear());
    }

    #[test]
    fn test_spawns_continue_while_paused_by_default() {
        let mut s = session(6);
        s.start();
        s.pause();
        s.clock().advance(2_000);
        let outcome = s.frame(&TickInput::default(), &mut NullSink);
        assert_eq!(outcome.spawned.enemies, 1);
    }

    #[test]
    fn test_spawns_can_halt_while_paused() {
        let mut s = Session::new(
            ManualClock::new(0),
            Vec2::new(800.0, 600.0),
            Tuning::default(),
            6,
            false,
        );
        s.start();
        s.pause();
        assert!(!s.schedule().is_running());
        s.clock().advance(5_000);
        let outcome = s.frame(&TickInput::default(), &mut NullSink);
        assert_eq!(outcome.spawned, SpawnDue::default());

        s.resume();
        assert!(s.schedule().is_running());
    }

    #[test]
    fn test_same_seed_same_run() {
        let input = TickInput {
            shoot: true,
            right: true,
            ..Default::default()
        };
        let mut a = session(42);
        let mut b = session(42);
        a.start();
        b.start();
        run_frames(&mut a, &input, 1_500);
        run_frames(&mut b, &input, 1_500);

        let (sa, sb) = (a.state(), b.state());
        assert_eq!(sa.player.score, sb.player.score);
        assert_eq!(sa.player.health, sb.player.health);
        assert_eq!(sa.enemies.len(), sb.enemies.len());
        for (ea, eb) in sa.enemies.iter().zip(&sb.enemies) {
            assert_eq!(ea.pos, eb.pos);
            assert_eq!(ea.speed, eb.speed);
        }
        assert_eq!(sa.power_ups.len(), sb.power_ups.len());
    }

    #[test]
    fn test_render_once_per_frame() {
        let mut s = session(7);
        s.start();
        let mut sink = CountingSink::default();
        for _ in 0..10 {
            s.clock().advance(FRAME);
            s.frame(&TickInput::default(), &mut sink);
        }
        assert_eq!(sink.frames, 10);
    }

    #[test]
    fn test_render_failure_is_not_fatal() {
        let mut s = session(8);
        s.start();
        s.clock().advance(FRAME);
        let outcome = s.frame(&TickInput::default(), &mut FailingSink);
        assert!(outcome.reschedule);
        assert_eq!(s.state().time_ticks, 1);
    }

    #[test]
    fn test_game_over_stops_timers() {
        let mut s = session(9);
        s.start();
        s.state_mut().player.health = 10;
        let player_pos = s.state().player.pos;
        s.state_mut().enemies.push(Enemy {
            pos: player_pos,
            size: Vec2::splat(50.0),
            speed: 0.0,
            health: 30,
            spawned_ms: 0,
        });

        s.clock().advance(FRAME);
        let outcome = s.frame(&TickInput::default(), &mut NullSink);
        assert!(!outcome.reschedule);
        assert!(matches!(outcome.events.last(), Some(GameEvent::GameOver { .. })));
        assert!(!s.schedule().is_running());
        assert!(s.overlays().is_visible(Overlay::GameOver));
        assert!(!s.toggle_pause());

        // Further frames only redraw
        s.clock().advance(10_000);
        let outcome = s.frame(&TickInput::default(), &mut NullSink);
        assert!(!outcome.reschedule);
        assert!(outcome.events.is_empty());
        assert!(s.state().enemies.is_empty());

        s.start();
        assert_eq!(s.state().phase, GamePhase::Running);
        assert!(s.overlays().is_clear());
    }
}
