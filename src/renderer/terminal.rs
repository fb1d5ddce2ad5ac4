//! Terminal renderer
//!
//! Draws a snapshot with crossterm. The play area is scaled from simulation
//! pixels onto whatever terminal grid is available:
//!
//! ```text
//! row 0        HUD
//! row 1        top border
//! rows 2..h-3  play area
//! row h-2      bottom border
//! row h-1      controls hint
//! ```

use std::io::Write;

use crossterm::{
    QueueableCommand, cursor,
    style::{self, Color, Print},
    terminal,
};
use glam::Vec2;

use super::RenderSink;
use crate::highscores::{HighScoreEntry, HighScores, format_age, format_survival};
use crate::sim::{GamePhase, PowerUpKind, Snapshot};
use crate::ui::{Overlay, Overlays};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD: Color = Color::White;
const C_HUD_HEALTH_LOW: Color = Color::Red;
const C_PLAYER: Color = Color::Blue;
const C_SHIELD: Color = Color::Cyan;
const C_ENEMY: Color = Color::Green;
const C_BULLET: Color = Color::Red;
const C_POWER_UP: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

/// Health at or below which the HUD turns red
const LOW_HEALTH: u32 = 30;

/// Leaderboard rows shown on the title and game-over panels
const LEADERBOARD_ROWS: usize = 5;

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Inclusive cell rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub col0: u16,
    pub row0: u16,
    pub col1: u16,
    pub row1: u16,
}

/// Maps simulation pixels onto terminal cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    /// Smallest usable terminal
    pub const MIN_COLS: u16 = 20;
    pub const MIN_ROWS: u16 = 10;

    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols: cols.max(Self::MIN_COLS),
            rows: rows.max(Self::MIN_ROWS),
        }
    }

    fn inner_cols(&self) -> f32 {
        f32::from(self.cols - 2)
    }

    fn inner_rows(&self) -> f32 {
        f32::from(self.rows - 4)
    }

    /// Cells covered by a box, clipped to the play area. `None` if off-screen.
    pub fn cells(&self, pos: Vec2, size: Vec2, canvas: Vec2) -> Option<CellRect> {
        let min = pos.max(Vec2::ZERO);
        let max = (pos + size).min(canvas);
        if max.x <= min.x || max.y <= min.y {
            return None;
        }

        let scale = Vec2::new(self.inner_cols(), self.inner_rows()) / canvas;
        let lo = (min * scale).floor();
        let hi = ((max * scale).ceil() - Vec2::ONE).max(lo);
        let clamp_col = |v: f32| (v as u16).min(self.cols - 3) + 1;
        let clamp_row = |v: f32| (v as u16).min(self.rows - 5) + 2;

        Some(CellRect {
            col0: clamp_col(lo.x),
            row0: clamp_row(lo.y),
            col1: clamp_col(hi.x),
            row1: clamp_row(hi.y),
        })
    }
}

// ── Renderer ──────────────────────────────────────────────────────────────────

/// Crossterm-backed render sink
pub struct TerminalRenderer<W: Write> {
    out: W,
    viewport: Viewport,
    show_power_up_timers: bool,
    leaderboard: Vec<HighScoreEntry>,
    /// Unix time (ms) the ages in the table are measured against
    leaderboard_now: u64,
    /// Rank the last finished run earned
    latest_rank: Option<usize>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            viewport: Viewport::new(cols, rows),
            show_power_up_timers: true,
            leaderboard: Vec::new(),
            leaderboard_now: 0,
            latest_rank: None,
        }
    }

    pub fn with_power_up_timers(mut self, show: bool) -> Self {
        self.show_power_up_timers = show;
        self
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.viewport = Viewport::new(cols, rows);
    }

    /// Refresh the leaderboard shown on the title and game-over panels
    pub fn set_high_scores(&mut self, scores: &HighScores, now_unix_ms: u64, latest_rank: Option<usize>) {
        self.leaderboard = scores.entries.iter().take(LEADERBOARD_ROWS).cloned().collect();
        self.leaderboard_now = now_unix_ms;
        self.latest_rank = latest_rank;
    }

    fn leaderboard_lines(&self, lines: &mut Vec<(String, Color)>) {
        if self.leaderboard.is_empty() {
            return;
        }
        lines.push((String::new(), Color::White));
        lines.push(("── TOP SCORES ──".into(), Color::Yellow));
        for (i, entry) in self.leaderboard.iter().enumerate() {
            let color = if self.latest_rank == Some(i + 1) {
                Color::Yellow
            } else {
                Color::White
            };
            lines.push((
                format!(
                    "{:>2}. {:>6}  wave {:>2}  {:>5}  {}",
                    i + 1,
                    entry.score,
                    entry.wave,
                    format_survival(entry.survived_ms),
                    format_age(self.leaderboard_now, entry.timestamp)
                ),
                color,
            ));
        }
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    fn draw_border(&mut self) -> std::io::Result<()> {
        let w = usize::from(self.viewport.cols);
        let h = self.viewport.rows;

        self.out.queue(style::SetForegroundColor(C_BORDER))?;
        self.out.queue(cursor::MoveTo(0, 1))?;
        self.out.queue(Print(format!("┌{}┐", "─".repeat(w - 2))))?;
        self.out.queue(cursor::MoveTo(0, h - 2))?;
        self.out.queue(Print(format!("└{}┘", "─".repeat(w - 2))))?;

        for row in 2..h - 2 {
            self.out.queue(cursor::MoveTo(0, row))?;
            self.out.queue(Print("│"))?;
            self.out.queue(cursor::MoveTo(self.viewport.cols - 1, row))?;
            self.out.queue(Print("│"))?;
        }
        Ok(())
    }

    fn draw_hud(&mut self, snap: &Snapshot<'_>) -> std::io::Result<()> {
        let health_color = if snap.health <= LOW_HEALTH {
            C_HUD_HEALTH_LOW
        } else {
            C_HUD
        };

        self.out.queue(cursor::MoveTo(1, 0))?;
        self.out.queue(style::SetForegroundColor(health_color))?;
        self.out.queue(Print(format!("Health: {:>3}", snap.health)))?;
        self.out.queue(style::SetForegroundColor(C_HUD))?;
        self.out.queue(Print(format!(
            "   Score: {:>6}   Wave: {:>2}   Time: {}s",
            snap.score,
            snap.wave,
            snap.elapsed_ms / 1000
        )))?;

        let player = snap.player;
        let mut status = String::new();
        if player.shield_active {
            status.push_str(" SHIELD");
        }
        if player.is_dashing() {
            status.push_str(" DASH");
        } else if player.dash_cooldown_ms == 0 {
            status.push_str(" dash ready");
        }
        let col = self.viewport.cols.saturating_sub(status.chars().count() as u16 + 1);
        self.out.queue(cursor::MoveTo(col, 0))?;
        self.out.queue(style::SetForegroundColor(C_SHIELD))?;
        self.out.queue(Print(status))?;
        Ok(())
    }

    fn fill(&mut self, rect: CellRect, glyph: char, color: Color) -> std::io::Result<()> {
        let width = usize::from(rect.col1 - rect.col0 + 1);
        let line: String = std::iter::repeat_n(glyph, width).collect();
        self.out.queue(style::SetForegroundColor(color))?;
        for row in rect.row0..=rect.row1 {
            self.out.queue(cursor::MoveTo(rect.col0, row))?;
            self.out.queue(Print(&line))?;
        }
        Ok(())
    }

    fn draw_entities(&mut self, snap: &Snapshot<'_>) -> std::io::Result<()> {
        let canvas = snap.canvas;
        let vp = self.viewport;

        for power_up in snap.power_ups {
            if let Some(rect) = vp.cells(power_up.pos, power_up.size, canvas) {
                self.fill(rect, power_up_glyph(power_up.kind), C_POWER_UP)?;
                if self.show_power_up_timers && rect.row1 + 1 < vp.rows - 2 {
                    self.out.queue(cursor::MoveTo(rect.col0, rect.row1 + 1))?;
                    self.out.queue(Print(format!("{:.1}s", power_up.lifetime_ms as f32 / 1000.0)))?;
                }
            }
        }

        for enemy in snap.enemies {
            if let Some(rect) = vp.cells(enemy.pos, enemy.size, canvas) {
                self.fill(rect, '▓', C_ENEMY)?;
            }
        }

        for bullet in snap.bullets {
            if let Some(rect) = vp.cells(bullet.pos, bullet.size, canvas) {
                self.out.queue(cursor::MoveTo(rect.col0, rect.row0))?;
                self.out.queue(style::SetForegroundColor(C_BULLET))?;
                self.out.queue(Print("║"))?;
            }
        }

        let player = snap.player;
        if let Some(rect) = vp.cells(player.pos, player.size, canvas) {
            self.fill(rect, '█', C_PLAYER)?;
            if player.shield_active {
                self.out.queue(style::SetForegroundColor(C_SHIELD))?;
                for row in rect.row0..=rect.row1 {
                    if rect.col0 > 1 {
                        self.out.queue(cursor::MoveTo(rect.col0 - 1, row))?;
                        self.out.queue(Print("("))?;
                    }
                    if rect.col1 + 1 < vp.cols - 1 {
                        self.out.queue(cursor::MoveTo(rect.col1 + 1, row))?;
                        self.out.queue(Print(")"))?;
                    }
                }
            }
        }
        Ok(())
    }

    fn draw_hint(&mut self, snap: &Snapshot<'_>) -> std::io::Result<()> {
        let hint = match snap.phase {
            GamePhase::GameOver => "R : Restart   X : Quit",
            _ => "WASD/←↑→↓ : Move   SPACE : Shoot   Q : Shield   E : Dash   P : Pause   X : Quit",
        };
        self.out.queue(cursor::MoveTo(1, self.viewport.rows - 1))?;
        self.out.queue(style::SetForegroundColor(C_HINT))?;
        self.out.queue(Print(hint))?;
        Ok(())
    }

    fn draw_panel(&mut self, lines: &[(String, Color)]) -> std::io::Result<()> {
        let cx = self.viewport.cols / 2;
        let start_row = (self.viewport.rows / 2).saturating_sub(lines.len() as u16 / 2);

        for (i, (msg, color)) in lines.iter().enumerate() {
            let row = start_row + i as u16;
            let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
            self.out.queue(cursor::MoveTo(col, row))?;
            self.out.queue(style::SetForegroundColor(*color))?;
            self.out.queue(Print(msg))?;
        }
        Ok(())
    }

    fn draw_overlays(&mut self, snap: &Snapshot<'_>, overlays: &Overlays) -> std::io::Result<()> {
        let mut lines: Vec<(String, Color)> = Vec::new();

        if overlays.is_visible(Overlay::Start) {
            lines.push(("╔══════════════════════════════╗".into(), Color::Cyan));
            lines.push(("║  CHAOS KEYBOARD  *  SURVIVAL  ║".into(), Color::Cyan));
            lines.push(("╚══════════════════════════════╝".into(), Color::Cyan));
            lines.push(("Press ENTER to start".into(), Color::White));
        }
        if overlays.is_visible(Overlay::Instructions) {
            lines.push((String::new(), Color::White));
            lines.push(("Survive the descending swarm. A new wave every 30s.".into(), C_HINT));
            lines.push(("Power-ups: H heal   S shield   + speed   B bullet boost".into(), C_POWER_UP));
        }
        if overlays.is_visible(Overlay::Start) {
            self.leaderboard_lines(&mut lines);
        }
        if overlays.is_visible(Overlay::Pause) {
            lines.push(("── PAUSED ──".into(), Color::Yellow));
            lines.push(("P : Resume".into(), Color::White));
        }
        if overlays.is_visible(Overlay::GameOver) {
            lines.push(("╔══════════════════╗".into(), Color::Red));
            lines.push(("║    GAME  OVER    ║".into(), Color::Red));
            lines.push(("╚══════════════════╝".into(), Color::Red));
            lines.push((format!("Final Score: {}", snap.score), Color::Yellow));
            lines.push((
                format!("Wave {}   Survived {}", snap.wave, format_survival(snap.elapsed_ms)),
                Color::White,
            ));
            if let Some(rank) = self.latest_rank {
                lines.push((format!("New high score! Rank #{rank}"), Color::Yellow));
            }
            self.leaderboard_lines(&mut lines);
        }

        if lines.is_empty() {
            Ok(())
        } else {
            self.draw_panel(&lines)
        }
    }
}

impl<W: Write> RenderSink for TerminalRenderer<W> {
    fn render(&mut self, snapshot: &Snapshot<'_>, overlays: &Overlays) -> std::io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;

        self.draw_border()?;
        self.draw_hud(snapshot)?;
        if !overlays.is_visible(Overlay::Start) {
            self.draw_entities(snapshot)?;
        }
        self.draw_hint(snapshot)?;
        self.draw_overlays(snapshot, overlays)?;

        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.viewport.rows - 1))?;
        self.out.flush()
    }
}

fn power_up_glyph(kind: PowerUpKind) -> char {
    match kind {
        PowerUpKind::Health => 'H',
        PowerUpKind::Shield => 'S',
        PowerUpKind::Speed => '+',
        PowerUpKind::Bullet => 'B',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameState;
    use crate::tuning::Tuning;

    fn canvas() -> Vec2 {
        Vec2::new(800.0, 600.0)
    }

    #[test]
    fn test_viewport_minimum_size() {
        let vp = Viewport::new(3, 2);
        assert_eq!(vp.cols, Viewport::MIN_COLS);
        assert_eq!(vp.rows, Viewport::MIN_ROWS);
    }

    #[test]
    fn test_cells_scale_into_play_area() {
        // 80x24 terminal: 78 inner cols, 20 inner rows
        let vp = Viewport::new(80, 24);
        let rect = vp.cells(Vec2::ZERO, Vec2::new(800.0, 600.0), canvas()).unwrap();
        assert_eq!(rect, CellRect { col0: 1, row0: 2, col1: 78, row1: 21 });
    }

    #[test]
    fn test_small_entity_gets_one_cell() {
        let vp = Viewport::new(80, 24);
        let rect = vp.cells(Vec2::new(400.0, 300.0), Vec2::splat(1.0), canvas()).unwrap();
        assert_eq!(rect.col0, rect.col1);
        assert_eq!(rect.row0, rect.row1);
    }

    #[test]
    fn test_off_screen_entity_hidden() {
        let vp = Viewport::new(80, 24);
        assert!(vp.cells(Vec2::new(100.0, -50.0), Vec2::splat(50.0), canvas()).is_none());
        assert!(vp.cells(Vec2::new(100.0, 600.0), Vec2::splat(50.0), canvas()).is_none());
        // Partly visible enemy is clipped, not hidden
        let rect = vp.cells(Vec2::new(100.0, -25.0), Vec2::splat(50.0), canvas()).unwrap();
        assert_eq!(rect.row0, 2);
    }

    #[test]
    fn test_render_writes_hud() {
        let state = GameState::new(canvas(), Tuning::default(), 0);
        let mut renderer = TerminalRenderer::new(Vec::new(), 80, 24);
        renderer.render(&state.snapshot(), &Overlays::default()).unwrap();
        let text = String::from_utf8_lossy(renderer.writer());
        assert!(text.contains("Health: 100"));
        assert!(text.contains("Wave:  1"));
    }

    #[test]
    fn test_render_game_over_panel() {
        let mut state = GameState::new(canvas(), Tuning::default(), 0);
        state.phase = GamePhase::GameOver;
        state.player.score = 130;
        let mut overlays = Overlays::default();
        overlays.on_game_over();

        let mut renderer = TerminalRenderer::new(Vec::new(), 80, 24);
        renderer.render(&state.snapshot(), &overlays).unwrap();
        let text = String::from_utf8_lossy(renderer.writer());
        assert!(text.contains("GAME  OVER"));
        assert!(text.contains("Final Score: 130"));
        assert!(!text.contains("TOP SCORES"));
    }

    #[test]
    fn test_leaderboard_on_title_and_game_over() {
        let now = 10 * 3_600_000;
        let mut scores = HighScores::new();
        scores.add_score(40, 2, 45_000, now - 5 * 60_000);
        let rank = scores.add_score(130, 5, 95_400, now);

        let mut state = GameState::new(canvas(), Tuning::default(), 0);
        let mut renderer = TerminalRenderer::new(Vec::new(), 80, 30);
        renderer.set_high_scores(&scores, now, None);
        renderer.render(&state.snapshot(), &Overlays::title_screen()).unwrap();
        let text = String::from_utf8_lossy(renderer.writer()).into_owned();
        assert!(text.contains("TOP SCORES"));
        assert!(text.contains(" 1.    130  wave  5   1:35  Just now"));
        assert!(text.contains(" 2.     40  wave  2   0:45  5 mins ago"));
        assert!(!text.contains("New high score"));

        renderer.writer().clear();
        state.phase = GamePhase::GameOver;
        let mut overlays = Overlays::default();
        overlays.on_game_over();
        renderer.set_high_scores(&scores, now, rank);
        renderer.render(&state.snapshot(), &overlays).unwrap();
        let text = String::from_utf8_lossy(renderer.writer()).into_owned();
        assert!(text.contains("New high score! Rank #1"));
        assert!(text.contains("TOP SCORES"));
    }
}
