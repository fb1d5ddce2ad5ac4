//! Keyboard input mapping
//!
//! Raw key names go in, per-tick player intents come out. Key names are the
//! lower-cased `KeyboardEvent.key` style strings (`"a"`, `"arrowleft"`,
//! `" "`), which keeps the mapper independent of any one input backend.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::sim::TickInput;

/// Logical actions a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Shoot,
    /// Shield is up while held
    Shield,
    Dash,
    /// One-shot pause/resume toggle
    Pause,
}

/// Key name to action table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    keys: BTreeMap<String, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self {
            keys: BTreeMap::new(),
        };
        for (key, action) in [
            ("a", Action::MoveLeft),
            ("arrowleft", Action::MoveLeft),
            ("d", Action::MoveRight),
            ("arrowright", Action::MoveRight),
            ("w", Action::MoveUp),
            ("arrowup", Action::MoveUp),
            ("s", Action::MoveDown),
            ("arrowdown", Action::MoveDown),
            (" ", Action::Shoot),
            ("q", Action::Shield),
            ("e", Action::Dash),
            ("p", Action::Pause),
            ("escape", Action::Pause),
        ] {
            bindings.bind(key, action);
        }
        bindings
    }
}

impl KeyBindings {
    /// Bind a key (case-insensitive), replacing any previous binding
    pub fn bind(&mut self, key: &str, action: Action) {
        self.keys.insert(key.to_lowercase(), action);
    }

    /// Action bound to a key, if any
    pub fn action_for(&self, key: &str) -> Option<Action> {
        self.keys.get(&key.to_lowercase()).copied()
    }
}

/// Tracks held keys and turns them into [`TickInput`]s
#[derive(Debug, Clone)]
pub struct InputMapper {
    bindings: KeyBindings,
    /// Held key -> time it was last seen pressed (ms)
    held: HashMap<String, u64>,
    /// Keys with no release event expire after this much silence
    hold_window_ms: Option<u64>,
    pause_requested: bool,
}

impl Default for InputMapper {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

impl InputMapper {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: HashMap::new(),
            hold_window_ms: None,
            pause_requested: false,
        }
    }

    /// Expire held keys after `window_ms` without a press or repeat.
    ///
    /// Needed for input sources that never report key releases.
    pub fn with_hold_window(mut self, window_ms: u64) -> Self {
        self.hold_window_ms = Some(window_ms);
        self
    }

    /// Key pressed (or auto-repeated). Unbound keys are ignored.
    pub fn key_down(&mut self, key: &str, now_ms: u64) {
        let Some(action) = self.bindings.action_for(key) else {
            return;
        };
        let key = key.to_lowercase();

        // Repeats of a held pause key must not toggle again
        if action == Action::Pause && !self.held.contains_key(&key) {
            self.pause_requested = !self.pause_requested;
        }
        self.held.insert(key, now_ms);
    }

    /// Key released
    pub fn key_up(&mut self, key: &str) {
        self.held.remove(&key.to_lowercase());
    }

    /// Release keys that have gone quiet for longer than the hold window
    pub fn expire_stale(&mut self, now_ms: u64) {
        if let Some(window) = self.hold_window_ms {
            self.held
                .retain(|_, last| now_ms.saturating_sub(*last) <= window);
        }
    }

    /// Release everything (focus loss, restart)
    pub fn clear(&mut self) {
        self.held.clear();
        self.pause_requested = false;
    }

    /// Whether any held key maps to `action`
    pub fn is_active(&self, action: Action) -> bool {
        self.held
            .keys()
            .any(|key| self.bindings.action_for(key) == Some(action))
    }

    /// Consume a pending pause toggle
    pub fn take_pause(&mut self) -> bool {
        std::mem::take(&mut self.pause_requested)
    }

    /// Intents for the next tick
    pub fn intents(&self) -> TickInput {
        TickInput {
            left: self.is_active(Action::MoveLeft),
            right: self.is_active(Action::MoveRight),
            up: self.is_active(Action::MoveUp),
            down: self.is_active(Action::MoveDown),
            shoot: self.is_active(Action::Shoot),
            shield: self.is_active(Action::Shield),
            dash: self.is_active(Action::Dash),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wasd_and_arrows_map_to_moves() {
        let mut input = InputMapper::default();
        input.key_down("A", 0);
        input.key_down("ArrowUp", 0);
        let intents = input.intents();
        assert!(intents.left);
        assert!(intents.up);
        assert!(!intents.right);
        assert!(!intents.down);
    }

    #[test]
    fn test_release_clears_intent() {
        let mut input = InputMapper::default();
        input.key_down(" ", 0);
        input.key_down("q", 0);
        assert!(input.intents().shoot);
        assert!(input.intents().shield);

        input.key_up(" ");
        input.key_up("Q");
        assert!(!input.intents().shoot);
        assert!(!input.intents().shield);
    }

    #[test]
    fn test_two_keys_same_action() {
        let mut input = InputMapper::default();
        input.key_down("a", 0);
        input.key_down("arrowleft", 0);
        input.key_up("a");
        assert!(input.intents().left);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut input = InputMapper::default();
        input.key_down("z", 0);
        input.key_down("F12", 0);
        assert_eq!(input.intents(), TickInput::default());
        assert!(!input.take_pause());
    }

    #[test]
    fn test_pause_is_one_shot() {
        let mut input = InputMapper::default();
        input.key_down("p", 0);
        input.key_down("p", 30); // auto-repeat
        assert!(input.take_pause());
        assert!(!input.take_pause());

        input.key_up("p");
        input.key_down("p", 100);
        assert!(input.take_pause());
    }

    #[test]
    fn test_hold_window_expires_silent_keys() {
        let mut input = InputMapper::default().with_hold_window(150);
        input.key_down("d", 0);
        input.expire_stale(150);
        assert!(input.intents().right);

        input.key_down("d", 140); // repeat keeps it alive
        input.expire_stale(290);
        assert!(input.intents().right);

        input.expire_stale(291);
        assert!(!input.intents().right);
    }

    #[test]
    fn test_no_hold_window_never_expires() {
        let mut input = InputMapper::default();
        input.key_down("e", 0);
        input.expire_stale(1_000_000);
        assert!(input.intents().dash);
    }

    #[test]
    fn test_custom_binding() {
        let mut bindings = KeyBindings::default();
        bindings.bind("J", Action::Shoot);
        let mut input = InputMapper::new(bindings);
        input.key_down("j", 0);
        assert!(input.intents().shoot);
    }

    #[test]
    fn test_bindings_serialize_as_map() {
        let json = serde_json::to_string(&KeyBindings::default()).unwrap();
        assert!(json.contains(r#""e":"dash""#));
        let back: KeyBindings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, KeyBindings::default());
    }
}
