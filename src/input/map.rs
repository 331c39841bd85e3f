//! Action Map
//!
//! Binds logical commands to [`Action`]s. Writing a command that is already
//! bound replaces its action.

use std::collections::BTreeMap;
use tracing::debug;

use super::action::Action;
use super::clock::Frame;

/// Ordered command to action bindings.
#[derive(Clone, Debug)]
pub struct ActionMap<K: Ord> {
    actions: BTreeMap<K, Action>,
}

impl<K: Ord> Default for ActionMap<K> {
    fn default() -> Self {
        Self {
            actions: BTreeMap::new(),
        }
    }
}

impl<K: Ord + std::fmt::Debug> ActionMap<K> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `action` to `key`, returning the action it replaces.
    pub fn insert(&mut self, key: K, action: Action) -> Option<Action> {
        let previous = self.actions.insert(key, action);
        if previous.is_some() {
            debug!("action rebound");
        }
        previous
    }

    /// Action bound to `key`.
    pub fn get(&self, key: &K) -> Option<&Action> {
        self.actions.get(key)
    }

    /// Mutable action bound to `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut Action> {
        self.actions.get_mut(key)
    }

    /// Unbind `key`.
    pub fn remove(&mut self, key: &K) -> Option<Action> {
        self.actions.remove(key)
    }

    /// Whether `key` is bound.
    pub fn contains(&self, key: &K) -> bool {
        self.actions.contains_key(key)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// No bindings.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Bindings in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Action)> {
        self.actions.iter()
    }

    /// Whether the action bound to `key` is active this tick. Unbound keys
    /// are never active.
    pub fn is_active(&mut self, key: &K, frame: &Frame<'_>) -> bool {
        match self.actions.get_mut(key) {
            Some(action) => action.is_active(frame),
            None => {
                debug!(?key, "query for unbound action");
                false
            }
        }
    }

    /// Every key whose action is active this tick, in key order.
    ///
    /// Evaluates all bindings, so every multi-press action advances.
    pub fn active_keys(&mut self, frame: &Frame<'_>) -> Vec<&K> {
        self.actions
            .iter_mut()
            .filter_map(|(key, action)| action.is_active(frame).then_some(key))
            .collect()
    }
}

impl<K: Ord> FromIterator<(K, Action)> for ActionMap<K> {
    fn from_iter<I: IntoIterator<Item = (K, Action)>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::action::ActionType;
    use crate::input::clock::FrameClock;
    use crate::input::keys::{KeyCode, KeyboardState};

    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
    enum Command {
        Jump,
        Fire,
        Pause,
    }

    #[test]
    fn test_insert_overwrites() {
        let mut map = ActionMap::new();
        assert!(map.insert(Command::Jump, Action::press(KeyCode::Space)).is_none());

        let previous = map.insert(Command::Jump, Action::multi_press(KeyCode::Space, 3));
        assert!(matches!(
            previous.map(|a| a.node().counter().is_none()),
            Some(true)
        ));
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get(&Command::Jump).unwrap().node().counter().unwrap().target(),
            3
        );
    }

    #[test]
    fn test_overwritten_binding_is_the_one_evaluated() {
        let mut map = ActionMap::new();
        map.insert(Command::Fire, Action::hold(KeyCode::Char('f')));
        map.insert(Command::Fire, Action::hold(KeyCode::Ctrl));

        let mut keys = KeyboardState::new();
        let mut clock = FrameClock::default();
        clock.advance();
        keys.begin_tick();
        keys.press(KeyCode::Char('f'));
        assert!(!map.is_active(&Command::Fire, &clock.frame(&keys)));

        clock.advance();
        keys.begin_tick();
        keys.press(KeyCode::Ctrl);
        assert!(map.is_active(&Command::Fire, &clock.frame(&keys)));
    }

    #[test]
    fn test_unbound_is_inactive() {
        let mut map: ActionMap<Command> = ActionMap::new();
        let keys = KeyboardState::new();
        let clock = FrameClock::default();
        assert!(!map.is_active(&Command::Pause, &clock.frame(&keys)));
        assert!(map.is_empty());
    }

    #[test]
    fn test_active_keys_in_order() {
        let mut map: ActionMap<Command> = [
            (Command::Pause, Action::press(KeyCode::Escape)),
            (Command::Jump, Action::hold(KeyCode::Space)),
            (Command::Fire, Action::new(KeyCode::Space, ActionType::PressOnce, 1)),
        ]
        .into_iter()
        .collect();

        let mut keys = KeyboardState::new();
        let mut clock = FrameClock::default();
        clock.advance();
        keys.begin_tick();
        keys.press(KeyCode::Space);
        let frame = clock.frame(&keys);
        assert_eq!(map.active_keys(&frame), vec![&Command::Jump, &Command::Fire]);

        clock.advance();
        keys.begin_tick();
        let frame = clock.frame(&keys);
        assert_eq!(map.active_keys(&frame), vec![&Command::Jump]);
    }

    #[test]
    fn test_remove() {
        let mut map = ActionMap::new();
        map.insert(Command::Jump, Action::hold(KeyCode::Space));
        assert!(map.contains(&Command::Jump));
        assert!(map.remove(&Command::Jump).is_some());
        assert!(!map.contains(&Command::Jump));
        assert_eq!(map.iter().count(), 0);
    }
}
