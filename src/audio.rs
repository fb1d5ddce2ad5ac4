//! Audio cues and volume control
//!
//! The simulation never depends on audio. Game events are mapped to sound
//! cues here; a front-end decides how (or whether) to play them. A missing
//! volume control simply leaves the current volume alone.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Shoot,
    Dash,
    /// Bullet hit an enemy that survived
    EnemyHit,
    EnemyDestroyed,
    PlayerHit,
    /// Enemy bounced off the shield
    ShieldBlock,
    PickupCollect,
    WaveAdvance,
    GameOver,
}

impl SoundEffect {
    /// Important enough to interrupt the player (terminal bell)
    pub fn is_alert(&self) -> bool {
        matches!(self, SoundEffect::PlayerHit | SoundEffect::GameOver | SoundEffect::WaveAdvance)
    }

    /// Cue for a game event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::BulletFired => Some(SoundEffect::Shoot),
            GameEvent::DashStarted => Some(SoundEffect::Dash),
            GameEvent::EnemyHit { .. } => Some(SoundEffect::EnemyHit),
            GameEvent::EnemyDestroyed { .. } => Some(SoundEffect::EnemyDestroyed),
            GameEvent::PlayerHit { shielded: true, .. } => Some(SoundEffect::ShieldBlock),
            GameEvent::PlayerHit { .. } => Some(SoundEffect::PlayerHit),
            GameEvent::PowerUpCollected(_) => Some(SoundEffect::PickupCollect),
            GameEvent::WaveAdvanced(_) => Some(SoundEffect::WaveAdvance),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::EnemyEscaped | GameEvent::PowerUpExpired(_) => None,
        }
    }
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Follow an external volume control when one is present
    pub fn sync_volume(&mut self, control: Option<f32>) {
        if let Some(vol) = control {
            self.set_master_volume(vol);
        }
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Cues to play for a batch of events, empty when silent
    pub fn cues(&self, events: &[GameEvent]) -> Vec<SoundEffect> {
        if self.effective_volume() <= 0.0 {
            return Vec::new();
        }
        events.iter().filter_map(SoundEffect::for_event).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PowerUpKind;

    #[test]
    fn test_missing_control_keeps_volume() {
        let mut audio = AudioManager::new();
        audio.sync_volume(None);
        assert_eq!(audio.master_volume(), 0.8);
        audio.sync_volume(Some(0.3));
        assert_eq!(audio.master_volume(), 0.3);
        audio.sync_volume(Some(7.0));
        assert_eq!(audio.master_volume(), 1.0);
    }

    #[test]
    fn test_volume_follows_settings_control() {
        let mut settings = Settings::default();
        let mut audio = AudioManager::from_settings(&settings);

        let lowered = settings.adjust_master_volume(-0.8);
        audio.sync_volume(Some(lowered));
        assert_eq!(audio.master_volume(), 0.0);
        assert!(audio.cues(&[GameEvent::BulletFired]).is_empty());

        let raised = settings.adjust_master_volume(0.5);
        audio.sync_volume(Some(raised));
        assert_eq!(audio.master_volume(), 0.5);
        assert_eq!(audio.cues(&[GameEvent::BulletFired]), vec![SoundEffect::Shoot]);
    }

    #[test]
    fn test_cues_for_events() {
        let audio = AudioManager::new();
        let events = [
            GameEvent::BulletFired,
            GameEvent::EnemyEscaped,
            GameEvent::PlayerHit {
                damage: 0,
                shielded: true,
            },
            GameEvent::PowerUpCollected(PowerUpKind::Health),
        ];
        assert_eq!(
            audio.cues(&events),
            vec![
                SoundEffect::Shoot,
                SoundEffect::ShieldBlock,
                SoundEffect::PickupCollect
            ]
        );
    }

    #[test]
    fn test_muted_is_silent() {
        let mut audio = AudioManager::new();
        audio.toggle_mute();
        assert!(audio.cues(&[GameEvent::BulletFired]).is_empty());

        audio.toggle_mute();
        audio.set_master_volume(0.0);
        assert!(audio.cues(&[GameEvent::BulletFired]).is_empty());
    }

    #[test]
    fn test_alerts() {
        assert!(SoundEffect::GameOver.is_alert());
        assert!(SoundEffect::PlayerHit.is_alert());
        assert!(!SoundEffect::Shoot.is_alert());
    }
}
