//! Overlay visibility
//!
//! Overlays are the full-screen panels drawn over the play area. The session
//! flips them at state transitions only; renderers just read them.

/// Overlay panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Start,
    Instructions,
    Pause,
    GameOver,
}

impl Overlay {
    pub const ALL: [Overlay; 4] = [
        Overlay::Start,
        Overlay::Instructions,
        Overlay::Pause,
        Overlay::GameOver,
    ];

    fn bit(self) -> u8 {
        match self {
            Overlay::Start => 1,
            Overlay::Instructions => 1 << 1,
            Overlay::Pause => 1 << 2,
            Overlay::GameOver => 1 << 3,
        }
    }
}

/// Set of visible overlays
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overlays {
    visible: u8,
}

impl Overlays {
    /// Title screen: start panel and instructions
    pub fn title_screen() -> Self {
        let mut overlays = Self::default();
        overlays.show(Overlay::Start);
        overlays.show(Overlay::Instructions);
        overlays
    }

    pub fn show(&mut self, overlay: Overlay) {
        self.visible |= overlay.bit();
    }

    pub fn hide(&mut self, overlay: Overlay) {
        self.visible &= !overlay.bit();
    }

    pub fn hide_all(&mut self) {
        self.visible = 0;
    }

    pub fn is_visible(&self, overlay: Overlay) -> bool {
        self.visible & overlay.bit() != 0
    }

    /// Nothing drawn over the play area
    pub fn is_clear(&self) -> bool {
        self.visible == 0
    }

    pub fn visible(&self) -> impl Iterator<Item = Overlay> + '_ {
        Overlay::ALL.into_iter().filter(|o| self.is_visible(*o))
    }

    pub fn on_start(&mut self) {
        self.hide_all();
    }

    pub fn on_pause(&mut self) {
        self.show(Overlay::Pause);
    }

    pub fn on_resume(&mut self) {
        self.hide(Overlay::Pause);
    }

    pub fn on_game_over(&mut self) {
        self.hide(Overlay::Pause);
        self.show(Overlay::GameOver);
    }
}
