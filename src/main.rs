//! Chaos Survival entry point
//!
//! Terminal front-end: owns raw mode, the key event thread and frame pacing,
//! and drives a [`Session`] once per frame.

use std::io::{BufWriter, Write, stdout};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    ExecutableCommand, cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal,
};

use chaos_survival::audio::AudioManager;
use chaos_survival::consts::FRAME_MS;
use chaos_survival::platform::time::unix_ms;
use chaos_survival::platform::{Clock, InputMapper, SystemClock};
use chaos_survival::renderer::TerminalRenderer;
use chaos_survival::sim::GameEvent;
use chaos_survival::{HighScores, Session, Settings, Tuning};

const FRAME: Duration = Duration::from_millis(FRAME_MS);

/// What a key press means outside the simulation
enum Command {
    Quit,
    Start,
    ToggleMute,
    /// Nudge the master volume by this much
    Volume(f32),
}

const VOLUME_STEP: f32 = 0.1;

/// Name a key the way key bindings spell it. `None` for keys we never bind.
fn key_name(code: KeyCode) -> Option<String> {
    let name: String = match code {
        KeyCode::Char(c) => c.to_lowercase().collect(),
        KeyCode::Left => "arrowleft".into(),
        KeyCode::Right => "arrowright".into(),
        KeyCode::Up => "arrowup".into(),
        KeyCode::Down => "arrowdown".into(),
        KeyCode::Esc => "escape".into(),
        KeyCode::Enter => "enter".into(),
        _ => return None,
    };
    Some(name)
}

fn command_for(key: &KeyEvent, started: bool, game_over: bool) -> Option<Command> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char('x') | KeyCode::Char('X') => Some(Command::Quit),
        KeyCode::Enter | KeyCode::Char(' ') if !started => Some(Command::Start),
        KeyCode::Char('r') | KeyCode::Char('R') if game_over => Some(Command::Start),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(Command::ToggleMute),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Command::Volume(VOLUME_STEP)),
        KeyCode::Char('-') => Some(Command::Volume(-VOLUME_STEP)),
        _ => None,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    settings: &mut Settings,
    tuning: Tuning,
    high_scores: &mut HighScores,
) -> std::io::Result<()> {
    let seed = settings.seed.unwrap_or_else(unix_ms);
    let mut session = Session::new(
        SystemClock::new(),
        settings.canvas(),
        tuning,
        seed,
        settings.spawn_while_paused,
    );

    let (cols, rows) = terminal::size()?;
    let mut renderer = TerminalRenderer::new(out, cols, rows)
        .with_power_up_timers(settings.show_power_up_timers);
    renderer.set_high_scores(high_scores, unix_ms(), None);

    let mut input = InputMapper::new(settings.key_bindings.clone())
        .with_hold_window(settings.hold_window_ms);
    let mut audio = AudioManager::from_settings(settings);

    loop {
        let frame_start = Instant::now();
        let now = session.clock().now_ms();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(key) => {
                    match key.kind {
                        KeyEventKind::Press => {
                            match command_for(&key, session.is_started(), session.state().is_over()) {
                                Some(Command::Quit) => return Ok(()),
                                Some(Command::Start) => {
                                    input.clear();
                                    session.start();
                                    continue;
                                }
                                Some(Command::ToggleMute) => {
                                    settings.muted = audio.toggle_mute();
                                    log::info!("Audio {}", if settings.muted { "muted" } else { "unmuted" });
                                }
                                Some(Command::Volume(delta)) => {
                                    let volume = settings.adjust_master_volume(delta);
                                    audio.sync_volume(Some(volume));
                                    log::info!("Master volume {:.0}%", volume * 100.0);
                                }
                                None => {}
                            }
                            if let Some(name) = key_name(key.code) {
                                input.key_down(&name, now);
                            }
                        }
                        // Repeat: refresh so the key stays held
                        KeyEventKind::Repeat => {
                            if let Some(name) = key_name(key.code) {
                                input.key_down(&name, now);
                            }
                        }
                        KeyEventKind::Release => {
                            if let Some(name) = key_name(key.code) {
                                input.key_up(&name);
                            }
                        }
                    }
                }
                Event::Resize(cols, rows) => renderer.resize(cols, rows),
                Event::FocusLost => input.clear(),
                _ => {}
            }
        }

        input.expire_stale(now);
        if input.take_pause() {
            session.toggle_pause();
        }

        let outcome = session.frame(&input.intents(), &mut renderer);

        if audio.cues(&outcome.events).iter().any(|cue| cue.is_alert()) {
            // Terminal bell
            renderer.writer().write_all(b"\x07")?;
            renderer.writer().flush()?;
        }

        for event in &outcome.events {
            if let GameEvent::GameOver {
                score,
                wave,
                survived_ms,
            } = *event
            {
                let now = unix_ms();
                let rank = high_scores.add_score(score, wave, survived_ms, now);
                if let Some(rank) = rank {
                    log::info!("New high score #{rank}: {score}");
                    high_scores.save();
                }
                renderer.set_high_scores(high_scores, now, rank);
            }
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    env_logger::init();
    log::info!("Chaos Survival starting...");

    let mut settings = Settings::load();
    let loaded_settings = settings.clone();
    let tuning = Tuning::load();
    let mut high_scores = HighScores::load();

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Key-release events where the terminal supports them; others rely on the hold window
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread so the frame loop never waits on I/O
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &mut settings, tuning, &mut high_scores);

    if settings != loaded_settings {
        settings.save();
    }

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("Terminal error: {e}");
    }
    result
}
