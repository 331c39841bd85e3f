//! Key State
//!
//! The action engine never polls devices. It reads already edge-detected key
//! state through [`KeySource`], once per tick.

use std::collections::BTreeSet;
use serde::{Serialize, Deserialize};

/// A physical key or button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// Arrow up
    Up,
    /// Arrow down
    Down,
    /// Arrow left
    Left,
    /// Arrow right
    Right,
    /// Space bar
    Space,
    /// Enter / Return
    Enter,
    /// Escape
    Escape,
    /// Tab
    Tab,
    /// Either shift key
    Shift,
    /// Either control key
    Ctrl,
    /// A printable character key (letters are lowercase)
    Char(char),
    /// Mouse button by index (0 = primary)
    Mouse(u8),
}

/// Per-tick key state supplied by the host loop.
///
/// `pressed` and `released` must be true only on the tick the transition
/// happened.
pub trait KeySource {
    /// Key is currently held.
    fn is_key_down(&self, key: KeyCode) -> bool;

    /// Key went down this tick.
    fn is_key_pressed(&self, key: KeyCode) -> bool;

    /// Key went up this tick.
    fn is_key_released(&self, key: KeyCode) -> bool;

    /// Key is currently not held.
    fn is_key_up(&self, key: KeyCode) -> bool {
        !self.is_key_down(key)
    }
}

/// In-memory key state with edge detection between ticks.
///
/// Feed raw down/up events with [`press`](Self::press) and
/// [`release`](Self::release), then call [`begin_tick`](Self::begin_tick)
/// once at the start of every tick to latch the previous state.
#[derive(Clone, Debug, Default)]
pub struct KeyboardState {
    /// Keys held now
    down: BTreeSet<KeyCode>,
    /// Keys held at the previous tick boundary
    previous: BTreeSet<KeyCode>,
}

impl KeyboardState {
    /// Create an empty state (nothing held).
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch the current state as "previous". Call once per tick before
    /// applying that tick's events.
    pub fn begin_tick(&mut self) {
        self.previous.clone_from(&self.down);
    }

    /// Record a key going down.
    pub fn press(&mut self, key: KeyCode) {
        self.down.insert(key);
    }

    /// Record a key going up.
    pub fn release(&mut self, key: KeyCode) {
        self.down.remove(&key);
    }

    /// Set a key's raw state.
    pub fn set(&mut self, key: KeyCode, down: bool) {
        if down {
            self.press(key);
        } else {
            self.release(key);
        }
    }

    /// Release everything (e.g. on focus loss).
    pub fn clear(&mut self) {
        self.down.clear();
    }

    /// True if any key is held.
    pub fn is_any_key_down(&self) -> bool {
        !self.down.is_empty()
    }

    /// True if any key went down this tick.
    pub fn is_any_key_pressed(&self) -> bool {
        self.down.difference(&self.previous).next().is_some()
    }

    /// Keys currently held, in key order.
    pub fn held(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.down.iter().copied()
    }
}

impl KeySource for KeyboardState {
    fn is_key_down(&self, key: KeyCode) -> bool {
        self.down.contains(&key)
    }

    fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.down.contains(&key) && !self.previous.contains(&key)
    }

    fn is_key_released(&self, key: KeyCode) -> bool {
        !self.down.contains(&key) && self.previous.contains(&key)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_last_one_tick() {
        let mut keys = KeyboardState::new();
        let space = KeyCode::Space;

        keys.begin_tick();
        keys.press(space);
        assert!(keys.is_key_down(space));
        assert!(keys.is_key_pressed(space));
        assert!(!keys.is_key_released(space));

        keys.begin_tick();
        assert!(keys.is_key_down(space));
        assert!(!keys.is_key_pressed(space));

        keys.begin_tick();
        keys.release(space);
        assert!(keys.is_key_up(space));
        assert!(keys.is_key_released(space));

        keys.begin_tick();
        assert!(!keys.is_key_released(space));
    }

    #[test]
    fn test_tap_within_one_tick_is_invisible() {
        let mut keys = KeyboardState::new();
        keys.begin_tick();
        keys.press(KeyCode::Char('w'));
        keys.release(KeyCode::Char('w'));
        assert!(!keys.is_key_pressed(KeyCode::Char('w')));
        assert!(!keys.is_key_released(KeyCode::Char('w')));
    }

    #[test]
    fn test_any_key() {
        let mut keys = KeyboardState::new();
        assert!(!keys.is_any_key_down());

        keys.begin_tick();
        keys.set(KeyCode::Mouse(0), true);
        assert!(keys.is_any_key_down());
        assert!(keys.is_any_key_pressed());

        keys.begin_tick();
        assert!(keys.is_any_key_down());
        assert!(!keys.is_any_key_pressed());
        assert_eq!(keys.held().collect::<Vec<_>>(), vec![KeyCode::Mouse(0)]);

        keys.clear();
        assert!(!keys.is_any_key_down());
    }
}
