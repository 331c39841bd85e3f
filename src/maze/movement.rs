//! Node Movement
//!
//! Grid-locked movement with a one-slot turn queue. A requested turn that
//! cannot be taken immediately is held until the actor reaches an
//! intersection that allows it.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::node::IntersectionNode;
use crate::core::direction::Direction4;
use crate::geometry::Point;

/// Movement parameters of one actor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Units per second
    pub speed: f32,
    /// Whether a reverse request applies immediately, between nodes
    pub allow_reverse: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: 4.0,
            allow_reverse: true,
        }
    }
}

/// A change of the current direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectionChange {
    /// Direction before the change
    pub from: Direction4,
    /// Direction after the change
    pub to: Direction4,
}

/// Direction state of one actor.
#[derive(Clone, Debug, Default)]
pub struct NodeMovement {
    config: MovementConfig,
    current: Direction4,
    next: Direction4,
    /// Direction to restore on resume, while paused
    paused: Option<Direction4>,
}

impl NodeMovement {
    /// Standing still with an empty queue.
    pub fn new(config: MovementConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Movement parameters.
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Direction of travel.
    #[inline]
    pub fn current(&self) -> Direction4 {
        self.current
    }

    /// Queued turn (`Neutral` when none).
    #[inline]
    pub fn next(&self) -> Direction4 {
        self.next
    }

    /// Between [`wait`](Self::wait) and [`resume`](Self::resume).
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused.is_some()
    }

    /// Velocity for the current direction.
    pub fn velocity(&self) -> Point {
        self.current.to_vector() * self.config.speed
    }

    /// Force the direction of travel.
    pub fn set_current(&mut self, dir: Direction4) -> Option<DirectionChange> {
        if dir == self.current {
            return None;
        }
        let change = DirectionChange {
            from: self.current,
            to: dir,
        };
        debug!(from = %change.from, to = %change.to, "direction changed");
        self.current = dir;
        Some(change)
    }

    /// Request a turn.
    ///
    /// Applies immediately when standing still, or when reversing and
    /// reversing is allowed. Repeating the current direction clears the
    /// queue. Anything else is queued for the next intersection. While
    /// paused the request is only stored.
    pub fn set_next(&mut self, dir: Direction4) -> Option<DirectionChange> {
        if self.is_paused() {
            self.next = dir;
            return None;
        }

        if self.current.is_neutral() || (self.config.allow_reverse && dir.is_opposite(self.current)) {
            self.next = Direction4::Neutral;
            self.set_current(dir)
        } else {
            if dir == self.current {
                self.next = Direction4::Neutral;
            } else {
                self.next = dir;
            }
            None
        }
    }

    /// Request a turn while possibly parked on `at`. A stopped actor may only
    /// ask for the exits of the node it stands on.
    pub fn request(&mut self, dir: Direction4, at: Option<&IntersectionNode>) -> Option<DirectionChange> {
        match at {
            Some(node) if !node.is_allowed(dir) => None,
            _ => self.set_next(dir),
        }
    }

    /// Stop and remember the direction to resume in.
    pub fn wait(&mut self) -> Option<DirectionChange> {
        if self.is_paused() {
            return None;
        }
        self.paused = Some(self.current);
        self.set_current(Direction4::Neutral)
    }

    /// Continue after [`wait`](Self::wait). A reverse request queued while
    /// paused wins over the stored direction.
    pub fn resume(&mut self) -> Option<DirectionChange> {
        let stored = self.paused.take()?;
        let before = self.current;
        self.set_current(stored);

        if self.config.allow_reverse && self.next.is_opposite(self.current) {
            let reverse = self.next;
            self.next = Direction4::Neutral;
            self.set_current(reverse);
        }

        (self.current != before).then_some(DirectionChange {
            from: before,
            to: self.current,
        })
    }

    /// Player rule at an intersection: take the queued turn when the node
    /// allows it, otherwise stop if the way ahead is closed.
    ///
    /// Returns the change, if any. The caller snaps the actor to
    /// `node.position` whenever this returns `Some`. The queued turn stays
    /// queued, so holding a direction keeps taking it at every node.
    pub fn on_node(&mut self, node: &IntersectionNode) -> Option<DirectionChange> {
        if !self.next.is_neutral() && node.is_allowed(self.next) {
            self.set_current(self.next)
        } else if !node.is_allowed(self.current) {
            self.set_current(Direction4::Neutral)
        } else {
            None
        }
    }

    /// Ghost rule at an intersection: pick a random exit, never turning back
    /// unless at a dead end.
    pub fn on_node_random<R: Rng + ?Sized>(
        &mut self,
        node: &IntersectionNode,
        rng: &mut R,
    ) -> Option<DirectionChange> {
        let dir = node.choose_random(self.current, rng)?;
        self.set_current(dir)
    }
}

// =============================================================================
// TESTS
// =============================================================================
