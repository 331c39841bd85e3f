//! Actions
//!
//! User-facing handle over one [`ActionNode`] tree. Combining actions with
//! `&`, `|` and `!` builds a new tree that takes ownership of the operands.

use serde::{Deserialize, Serialize};
use std::ops::{BitAnd, BitOr, Not};
use std::time::Duration;

use super::clock::Frame;
use super::keys::KeyCode;
use super::node::{ActionConfigError, ActionNode, Trigger};

/// Default maximum gap between the presses of a multi-press gesture.
pub const DEFAULT_MULTI_DELAY: Duration = Duration::from_millis(200);

// =============================================================================
// ACTION TYPE
// =============================================================================

/// Gesture kind for a single-key action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    /// Active while held
    Hold,
    /// Active on the press tick
    PressOnce,
    /// Active on the release tick
    ReleaseOnce,
    /// Held after a double press
    HoldTwice,
    /// Active on the second press of a double press
    PressTwice,
    /// Active on the release after a double press
    ReleaseTwice,
    /// Held after N presses
    MultiHold,
    /// Active on the Nth press
    MultiPress,
    /// Active on the release after N presses
    MultiRelease,
}

impl ActionType {
    /// Needs a press counter.
    pub fn is_multi(self) -> bool {
        !matches!(self, ActionType::Hold | ActionType::PressOnce | ActionType::ReleaseOnce)
    }

    /// Fixed press count, for the `*Twice` types.
    pub fn fixed_target(self) -> Option<u32> {
        match self {
            ActionType::HoldTwice | ActionType::PressTwice | ActionType::ReleaseTwice => Some(2),
            _ => None,
        }
    }

    /// Gesture the type reacts to.
    pub fn trigger(self) -> Trigger {
        match self {
            ActionType::Hold | ActionType::HoldTwice | ActionType::MultiHold => Trigger::Hold,
            ActionType::PressOnce | ActionType::PressTwice | ActionType::MultiPress => {
                Trigger::Press
            }
            ActionType::ReleaseOnce | ActionType::ReleaseTwice | ActionType::MultiRelease => {
                Trigger::Release
            }
        }
    }
}

// =============================================================================
// CONFIG
// =============================================================================

/// Timing parameters shared by the actions of one map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionConfig {
    /// Maximum average gap between presses of a multi-press gesture
    #[serde(rename = "multi_delay_ms", with = "millis")]
    pub multi_delay: Duration,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            multi_delay: DEFAULT_MULTI_DELAY,
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

// =============================================================================
// ACTION
// =============================================================================

/// A composable input predicate.
#[derive(Clone, Debug)]
pub struct Action {
    root: ActionNode,
}

impl Action {
    /// Action on `key` with the default timing.
    ///
    /// `multi` is the press count for [`ActionType::MultiHold`],
    /// [`ActionType::MultiPress`] and [`ActionType::MultiRelease`]; values
    /// below 2 become 2. It is ignored for the other types.
    pub fn new(key: KeyCode, kind: ActionType, multi: u32) -> Self {
        Self::with_config(key, kind, multi, &ActionConfig::default())
    }

    /// Action on `key` with explicit timing.
    pub fn with_config(key: KeyCode, kind: ActionType, multi: u32, config: &ActionConfig) -> Self {
        let root = if kind.is_multi() {
            let target = kind.fixed_target().unwrap_or(multi.max(2));
            ActionNode::counted(key, kind.trigger(), target, config.multi_delay)
        } else {
            ActionNode::Simple {
                key,
                trigger: kind.trigger(),
            }
        };
        Self { root }
    }

    /// Active while `key` is held.
    pub fn hold(key: KeyCode) -> Self {
        Self::new(key, ActionType::Hold, 1)
    }

    /// Active on the tick `key` goes down.
    pub fn press(key: KeyCode) -> Self {
        Self::new(key, ActionType::PressOnce, 1)
    }

    /// Active on the tick `key` goes up.
    pub fn release(key: KeyCode) -> Self {
        Self::new(key, ActionType::ReleaseOnce, 1)
    }

    /// Held after `count` presses.
    pub fn multi_hold(key: KeyCode, count: u32) -> Self {
        Self::new(key, ActionType::MultiHold, count)
    }

    /// Active on the `count`-th press.
    pub fn multi_press(key: KeyCode, count: u32) -> Self {
        Self::new(key, ActionType::MultiPress, count)
    }

    /// Active on the release after `count` presses.
    pub fn multi_release(key: KeyCode, count: u32) -> Self {
        Self::new(key, ActionType::MultiRelease, count)
    }

    /// Wrap an already validated tree.
    pub fn from_node(root: ActionNode) -> Self {
        Self { root }
    }

    /// Root of the tree.
    pub fn node(&self) -> &ActionNode {
        &self.root
    }

    /// Evaluate for `frame`. Stable within a tick.
    pub fn is_active(&mut self, frame: &Frame<'_>) -> bool {
        self.root.is_active(frame)
    }

    /// Advance every multi-press leaf for `frame`, including branches that
    /// short-circuiting would skip.
    pub fn force_update(&mut self, frame: &Frame<'_>) {
        self.root.force_update(frame);
    }

    /// Active when both are.
    pub fn and(self, other: Action) -> Action {
        Action::from_node(ActionNode::and(self.root, other.root))
    }

    /// Active when either is.
    pub fn or(self, other: Action) -> Action {
        Action::from_node(ActionNode::or(self.root, other.root))
    }

    /// Active when `self` is not.
    pub fn negate(self) -> Action {
        Action::from_node(ActionNode::negate(self.root))
    }
}

impl TryFrom<(KeyCode, ActionType, u32)> for Action {
    type Error = ActionConfigError;

    /// Strict construction: no target normalization.
    fn try_from((key, kind, multi): (KeyCode, ActionType, u32)) -> Result<Self, Self::Error> {
        let root = if kind.is_multi() {
            ActionNode::multi(key, kind, kind.fixed_target().unwrap_or(multi), DEFAULT_MULTI_DELAY)?
        } else {
            ActionNode::simple(key, kind)?
        };
        Ok(Self { root })
    }
}

impl BitAnd for Action {
    type Output = Action;

    fn bitand(self, rhs: Action) -> Action {
        self.and(rhs)
    }
}

impl BitOr for Action {
    type Output = Action;

    fn bitor(self, rhs: Action) -> Action {
        self.or(rhs)
    }
}

impl Not for Action {
    type Output = Action;

    fn not(self) -> Action {
        self.negate()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::clock::FrameClock;
    use crate::input::keys::KeyboardState;

    const K: KeyCode = KeyCode::Char('k');

    fn step(clock: &mut FrameClock, keys: &mut KeyboardState, down: &[KeyCode]) {
        clock.advance();
        keys.begin_tick();
        keys.clear();
        for &key in down {
            keys.press(key);
        }
    }

    #[test]
    fn test_type_classification() {
        assert!(!ActionType::Hold.is_multi());
        assert!(ActionType::PressTwice.is_multi());
        assert_eq!(ActionType::ReleaseTwice.fixed_target(), Some(2));
        assert_eq!(ActionType::MultiRelease.fixed_target(), None);
        assert_eq!(ActionType::HoldTwice.trigger(), Trigger::Hold);
        assert_eq!(ActionType::MultiPress.trigger(), Trigger::Press);
    }

    #[test]
    fn test_multi_target_normalized() {
        for multi in [0, 1, 2] {
            let action = Action::multi_press(K, multi);
            assert_eq!(action.node().counter().unwrap().target(), 2);
        }
        let action = Action::multi_press(K, 5);
        assert_eq!(action.node().counter().unwrap().target(), 5);

        // Twice types ignore the multiplier
        let action = Action::new(K, ActionType::PressTwice, 7);
        assert_eq!(action.node().counter().unwrap().target(), 2);

        // Simple types ignore it too
        let action = Action::new(K, ActionType::Hold, 7);
        assert!(action.node().counter().is_none());
    }

    #[test]
    fn test_strict_construction() {
        assert_eq!(
            Action::try_from((K, ActionType::MultiPress, 1)).unwrap_err(),
            ActionConfigError::TargetTooSmall(1)
        );
        assert!(Action::try_from((K, ActionType::PressTwice, 0)).is_ok());
        assert!(Action::try_from((K, ActionType::Hold, 0)).is_ok());
    }

    #[test]
    fn test_triple_press() {
        let mut action = Action::multi_press(K, 3);
        let mut keys = KeyboardState::new();
        let mut clock = FrameClock::new(60);
        let mut fired = Vec::new();

        // Taps on alternating ticks, well inside the 600 ms window
        for i in 0..6 {
            let down = if i % 2 == 0 { vec![K] } else { vec![] };
            step(&mut clock, &mut keys, &down);
            fired.push(action.is_active(&clock.frame(&keys)));
        }
        assert_eq!(fired, vec![false, false, false, false, true, false]);
        assert_eq!(action.node().counter().unwrap().count(), 0);
    }

    #[test]
    fn test_late_fourth_press_starts_fresh_window() {
        let mut action = Action::multi_press(K, 3);
        let mut keys = KeyboardState::new();
        let mut clock = FrameClock::new(60);

        for i in 0..4 {
            let down = if i % 2 == 0 { vec![K] } else { vec![] };
            step(&mut clock, &mut keys, &down);
            action.is_active(&clock.frame(&keys));
        }
        assert_eq!(action.node().counter().unwrap().count(), 2);

        // One full second later: beyond 3 x 200 ms
        clock.advance_by(Duration::from_secs(1));
        keys.begin_tick();
        keys.press(K);
        assert!(!action.is_active(&clock.frame(&keys)));
        assert_eq!(action.node().counter().unwrap().count(), 1);
    }

    #[test]
    fn test_custom_delay() {
        let config = ActionConfig {
            multi_delay: Duration::from_millis(10),
        };
        let mut action = Action::with_config(K, ActionType::PressTwice, 0, &config);
        let mut keys = KeyboardState::new();
        // 60 Hz: two presses two ticks apart span ~33 ms, above the 20 ms window
        let mut clock = FrameClock::new(60);

        step(&mut clock, &mut keys, &[K]);
        assert!(!action.is_active(&clock.frame(&keys)));
        step(&mut clock, &mut keys, &[]);
        assert!(!action.is_active(&clock.frame(&keys)));
        step(&mut clock, &mut keys, &[K]);
        assert!(!action.is_active(&clock.frame(&keys)));
    }

    #[test]
    fn test_operators() {
        let mut keys = KeyboardState::new();
        let mut clock = FrameClock::default();

        let mut move_up = Action::hold(KeyCode::Up) | Action::hold(KeyCode::Char('w'));
        let mut sprint = Action::hold(KeyCode::Shift) & !Action::hold(KeyCode::Ctrl);

        step(&mut clock, &mut keys, &[KeyCode::Char('w'), KeyCode::Shift]);
        let frame = clock.frame(&keys);
        assert!(move_up.is_active(&frame));
        assert!(sprint.is_active(&frame));

        step(&mut clock, &mut keys, &[KeyCode::Shift, KeyCode::Ctrl]);
        let frame = clock.frame(&keys);
        assert!(!move_up.is_active(&frame));
        assert!(!sprint.is_active(&frame));
    }

    #[test]
    fn test_extreme_config_does_not_panic() {
        let config: ActionConfig =
            serde_json::from_str(r#"{"multi_delay_ms": 18446744073709551615}"#).unwrap();
        let mut action = Action::with_config(KeyCode::Space, ActionType::MultiPress, 2000, &config);
        let mut keys = KeyboardState::new();
        let mut clock = FrameClock::default();

        for down in [true, false, true, false] {
            let pressed: &[KeyCode] = if down { &[KeyCode::Space] } else { &[] };
            step(&mut clock, &mut keys, pressed);
            assert!(!action.is_active(&clock.frame(&keys)));
        }
        assert_eq!(action.node().counter().unwrap().count(), 2);
    }

    #[test]
    fn test_config_json() {
        let config: ActionConfig = serde_json::from_str(r#"{"multi_delay_ms": 150}"#).unwrap();
        assert_eq!(config.multi_delay, Duration::from_millis(150));

        let json = serde_json::to_string(&ActionConfig::default()).unwrap();
        assert_eq!(json, r#"{"multi_delay_ms":200}"#);
    }
}
