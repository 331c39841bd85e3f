//! Action Nodes
//!
//! An action is a tree of nodes evaluated once per tick. Leaves read a single
//! key; combinators (`And`, `Or`, `Not`) own their children exclusively.
//!
//! ## Multi-press state machine
//!
//! ```text
//!   Idle ──press──▶ Accumulating ──press (count == target)──▶ Fired
//!    ▲                   │                                      │
//!    └── window expired ─┴──────────── variant-specific ────────┘
//! ```
//!
//! Every evaluation runs, in order:
//! 1. window check: reset when `time - start > delay * target`
//! 2. pre-press hook (per variant)
//! 3. press handling: first press opens the window, every press counts
//! 4. post-press hook (per variant)
//!
//! Multi-press leaves memoize their result per tick, so a leaf reached
//! through several branches of one tree makes exactly one transition per
//! tick.

use std::time::Duration;
use thiserror::Error;
use tracing::trace;

use super::action::ActionType;
use super::clock::Frame;
use super::keys::KeyCode;

// =============================================================================
// ERRORS
// =============================================================================

/// Inconsistent action configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionConfigError {
    /// A simple node was requested with a multi-press action type.
    #[error("action type {0:?} needs a multi-press node")]
    NotSimple(ActionType),

    /// A multi-press node was requested with a simple action type.
    #[error("action type {0:?} is not a multi-press type")]
    NotMulti(ActionType),

    /// A multi-press node needs at least two presses.
    #[error("multi-press target must be at least 2, got {0}")]
    TargetTooSmall(u32),
}

// =============================================================================
// GESTURES
// =============================================================================

/// What a leaf reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// Active while the key is held
    Hold,
    /// Active on the tick the key goes down
    Press,
    /// Active on the tick the key goes up
    Release,
}

/// Shared multi-press bookkeeping.
#[derive(Clone, Debug)]
pub struct MultiCounter {
    key: KeyCode,
    /// Presses needed to fire
    target: u32,
    /// Maximum gap per press; the window is `delay * target`
    delay: Duration,
    /// Presses counted in the current window
    count: u32,
    /// Time of the first press in the current window
    started: Option<Duration>,
    active: bool,
    /// Tick of the last evaluation
    last_tick: Option<u64>,
}

impl MultiCounter {
    fn new(key: KeyCode, target: u32, delay: Duration) -> Self {
        Self {
            key,
            target,
            delay,
            count: 0,
            started: None,
            active: false,
            last_tick: None,
        }
    }

    /// Bound key.
    pub fn key(&self) -> KeyCode {
        self.key
    }

    /// Presses needed to fire.
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Presses counted in the current window.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Time of the first press in the current window, if any.
    pub fn window_start(&self) -> Option<Duration> {
        self.started
    }

    /// Saturates instead of overflowing for huge delays or targets.
    fn window(&self) -> Duration {
        self.delay.saturating_mul(self.target)
    }

    /// Reset the counter if the window has elapsed. Runs before any press
    /// is handled, so a press arriving at expiry opens a fresh window.
    fn expire(&mut self, now: Duration) {
        if let Some(start) = self.started {
            if now.saturating_sub(start) > self.window() {
                trace!(key = ?self.key, count = self.count, "multi-press window expired");
                self.count = 0;
                self.started = None;
            }
        }
    }

    /// Count a press. Returns true when this press reaches the target.
    fn register_press(&mut self, now: Duration) -> bool {
        if self.count == 0 {
            trace!(key = ?self.key, "multi-press window opened");
            self.started = Some(now);
        }
        self.count += 1;
        self.count == self.target
    }
}

// =============================================================================
// NODE
// =============================================================================

/// A node of an action tree.
#[derive(Clone, Debug)]
pub enum ActionNode {
    /// Single key, single gesture. Stateless.
    Simple {
        /// Bound key
        key: KeyCode,
        /// Gesture
        trigger: Trigger,
    },

    /// Active from the target-th press until the key is released.
    MultiHold(MultiCounter),

    /// Active only on the tick of the target-th press.
    MultiPress {
        /// Press bookkeeping
        counter: MultiCounter,
        /// Tick the node last fired
        fired_tick: Option<u64>,
    },

    /// Active only on the tick the key is released after the target-th press.
    MultiRelease {
        /// Press bookkeeping
        counter: MultiCounter,
        /// Target reached, waiting for release
        holding: bool,
        /// Tick the node last fired
        fired_tick: Option<u64>,
    },

    /// Both children active. The right child is skipped when the left is not.
    And(Box<ActionNode>, Box<ActionNode>),

    /// Either child active. The right child is skipped when the left is.
    Or(Box<ActionNode>, Box<ActionNode>),

    /// Child inactive.
    Not(Box<ActionNode>),
}

impl ActionNode {
    /// Leaf for a simple gesture.
    ///
    /// Fails with [`ActionConfigError::NotSimple`] for multi-press types.
    pub fn simple(key: KeyCode, kind: ActionType) -> Result<Self, ActionConfigError> {
        if kind.is_multi() {
            return Err(ActionConfigError::NotSimple(kind));
        }
        Ok(ActionNode::Simple {
            key,
            trigger: kind.trigger(),
        })
    }

    /// Leaf for a multi-press gesture needing `target` presses, each at
    /// most `delay` apart on average.
    pub fn multi(
        key: KeyCode,
        kind: ActionType,
        target: u32,
        delay: Duration,
    ) -> Result<Self, ActionConfigError> {
        if !kind.is_multi() {
            return Err(ActionConfigError::NotMulti(kind));
        }
        if target < 2 {
            return Err(ActionConfigError::TargetTooSmall(target));
        }
        Ok(Self::counted(key, kind.trigger(), target, delay))
    }

    /// Multi-press leaf without validation. `target` must be at least 2.
    pub(crate) fn counted(key: KeyCode, trigger: Trigger, target: u32, delay: Duration) -> Self {
        let counter = MultiCounter::new(key, target, delay);
        match trigger {
            Trigger::Hold => ActionNode::MultiHold(counter),
            Trigger::Press => ActionNode::MultiPress {
                counter,
                fired_tick: None,
            },
            Trigger::Release => ActionNode::MultiRelease {
                counter,
                holding: false,
                fired_tick: None,
            },
        }
    }

    /// Conjunction of two trees.
    pub fn and(lhs: ActionNode, rhs: ActionNode) -> Self {
        ActionNode::And(Box::new(lhs), Box::new(rhs))
    }

    /// Disjunction of two trees.
    pub fn or(lhs: ActionNode, rhs: ActionNode) -> Self {
        ActionNode::Or(Box::new(lhs), Box::new(rhs))
    }

    /// Negation of a tree.
    pub fn negate(node: ActionNode) -> Self {
        ActionNode::Not(Box::new(node))
    }

    /// Multi-press bookkeeping, for multi-press leaves.
    pub fn counter(&self) -> Option<&MultiCounter> {
        match self {
            ActionNode::MultiHold(counter)
            | ActionNode::MultiPress { counter, .. }
            | ActionNode::MultiRelease { counter, .. } => Some(counter),
            _ => None,
        }
    }

    fn counter_mut(&mut self) -> Option<&mut MultiCounter> {
        match self {
            ActionNode::MultiHold(counter)
            | ActionNode::MultiPress { counter, .. }
            | ActionNode::MultiRelease { counter, .. } => Some(counter),
            _ => None,
        }
    }

    /// Evaluate the tree for `frame`.
    ///
    /// Multi-press leaves advance at most once per tick; repeated queries in
    /// the same tick return the cached result. Combinators short-circuit, so
    /// a skipped branch does not advance that tick.
    pub fn is_active(&mut self, frame: &Frame<'_>) -> bool {
        match self {
            ActionNode::Simple { key, trigger } => match trigger {
                Trigger::Hold => frame.keys.is_key_down(*key),
                Trigger::Press => frame.keys.is_key_pressed(*key),
                Trigger::Release => frame.keys.is_key_released(*key),
            },
            ActionNode::And(lhs, rhs) => lhs.is_active(frame) && rhs.is_active(frame),
            ActionNode::Or(lhs, rhs) => lhs.is_active(frame) || rhs.is_active(frame),
            ActionNode::Not(node) => !node.is_active(frame),
            _ => {
                let stale = self
                    .counter()
                    .is_some_and(|counter| counter.last_tick != Some(frame.tick));
                if stale {
                    self.step(frame);
                }
                self.counter().is_some_and(|counter| counter.active)
            }
        }
    }

    /// Run the tick transition now, even if this tick was already
    /// evaluated. Reaches every leaf of the tree, without short-circuiting.
    pub fn force_update(&mut self, frame: &Frame<'_>) {
        match self {
            ActionNode::Simple { .. } => {}
            ActionNode::And(lhs, rhs) | ActionNode::Or(lhs, rhs) => {
                lhs.force_update(frame);
                rhs.force_update(frame);
            }
            ActionNode::Not(node) => node.force_update(frame),
            _ => self.step(frame),
        }
    }

    /// One multi-press transition.
    fn step(&mut self, frame: &Frame<'_>) {
        let keys = frame.keys;
        let now = frame.time;
        let tick = frame.tick;

        if let Some(counter) = self.counter_mut() {
            counter.expire(now);
            counter.last_tick = Some(tick);
        }

        match self {
            ActionNode::MultiHold(counter) => {
                if keys.is_key_released(counter.key) {
                    counter.active = false;
                }
                if keys.is_key_pressed(counter.key) && counter.register_press(now) {
                    trace!(key = ?counter.key, tick, "multi-hold engaged");
                    counter.active = true;
                }
            }
            ActionNode::MultiPress {
                counter,
                fired_tick,
            } => {
                // One-tick pulse: clear and restart counting the tick after firing
                counter.active = false;
                if fired_tick.is_some_and(|fired| fired + 1 == tick) {
                    counter.count = 0;
                }
                if keys.is_key_pressed(counter.key) && counter.register_press(now) {
                    trace!(key = ?counter.key, tick, "multi-press fired");
                    counter.active = true;
                    *fired_tick = Some(tick);
                }
            }
            ActionNode::MultiRelease {
                counter,
                holding,
                fired_tick,
            } => {
                if fired_tick.is_some_and(|fired| fired + 1 == tick) {
                    counter.count = 0;
                }
                if keys.is_key_pressed(counter.key) && counter.register_press(now) {
                    *holding = true;
                }
                if *holding && keys.is_key_released(counter.key) {
                    trace!(key = ?counter.key, tick, "multi-release fired");
                    *holding = false;
                    counter.active = true;
                    *fired_tick = Some(tick);
                } else {
                    counter.active = false;
                }
            }
            _ => {}
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
