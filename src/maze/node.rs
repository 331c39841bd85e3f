//! Intersection Nodes
//!
//! Points of the maze where an actor may change direction. Each node lists
//! the directions leaving it and which of those corridors carry dots.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::direction::Direction4;
use crate::geometry::Point;

// =============================================================================
// DIRECTION SET
// =============================================================================

/// Set of cardinal directions. `Neutral` is never a member.
///
/// Serialized as its bit mask (`Up = 2`, `Right = 4`, `Down = 8`, `Left = 16`).
/// Other bits are dropped when deserializing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct DirectionSet(u8);

impl DirectionSet {
    /// No directions.
    pub const EMPTY: DirectionSet = DirectionSet(0);

    /// All four cardinal directions.
    pub const ALL: DirectionSet = DirectionSet(0b1_1110);

    #[inline]
    fn bit(dir: Direction4) -> u8 {
        1 << (dir as u8)
    }

    /// Add `dir`. Returns false for `Neutral` or when already present.
    pub fn insert(&mut self, dir: Direction4) -> bool {
        if dir.is_neutral() || self.contains(dir) {
            return false;
        }
        self.0 |= Self::bit(dir);
        true
    }

    /// Remove `dir`. Returns whether it was present.
    pub fn remove(&mut self, dir: Direction4) -> bool {
        let present = self.contains(dir);
        self.0 &= !Self::bit(dir);
        present
    }

    /// Whether `dir` is a member.
    #[inline]
    pub fn contains(&self, dir: Direction4) -> bool {
        !dir.is_neutral() && self.0 & Self::bit(dir) != 0
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        (self.0 & Self::ALL.0).count_ones() as usize
    }

    /// No members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Members in clockwise order from `Up`.
    pub fn iter(self) -> impl Iterator<Item = Direction4> {
        Direction4::ALL.into_iter().filter(move |dir| self.contains(*dir))
    }
}

impl From<u8> for DirectionSet {
    fn from(bits: u8) -> Self {
        DirectionSet(bits & DirectionSet::ALL.0)
    }
}

impl From<DirectionSet> for u8 {
    fn from(set: DirectionSet) -> Self {
        set.0
    }
}

impl FromIterator<Direction4> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction4>>(iter: I) -> Self {
        let mut set = DirectionSet::EMPTY;
        for dir in iter {
            set.insert(dir);
        }
        set
    }
}

// =============================================================================
// INTERSECTION NODE
// =============================================================================

/// A maze intersection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntersectionNode {
    /// World position
    pub position: Point,
    /// Directions an actor may leave in
    pub allowed: DirectionSet,
    /// Corridors that carry dots
    #[serde(default)]
    pub dots: DirectionSet,
    /// Ghost house exit
    #[serde(default)]
    pub is_exit: bool,
}

impl IntersectionNode {
    /// Node at `position` with the given exits.
    pub fn new(position: Point, allowed: impl IntoIterator<Item = Direction4>) -> Self {
        Self {
            position,
            allowed: allowed.into_iter().collect(),
            dots: DirectionSet::EMPTY,
            is_exit: false,
        }
    }

    /// Mark corridors as carrying dots.
    pub fn with_dots(mut self, dots: impl IntoIterator<Item = Direction4>) -> Self {
        self.dots = dots.into_iter().collect();
        self
    }

    /// Mark as the ghost house exit.
    pub fn exit(mut self) -> Self {
        self.is_exit = true;
        self
    }

    /// Whether an actor may leave in `dir`. Never true for `Neutral`.
    #[inline]
    pub fn is_allowed(&self, dir: Direction4) -> bool {
        self.allowed.contains(dir)
    }

    /// Exits of this node.
    #[inline]
    pub fn allowed_directions(&self) -> DirectionSet {
        self.allowed
    }

    /// Exits an actor arriving with `current` may take: turning back is
    /// only an option at a dead end.
    pub fn candidates(&self, current: Direction4) -> DirectionSet {
        let mut dirs = self.allowed;
        let back = current.opposite();
        if dirs.contains(back) && dirs.len() > 1 {
            dirs.remove(back);
        }
        dirs
    }

    /// Uniformly random exit among the [`candidates`](Self::candidates).
    pub fn choose_random<R: Rng + ?Sized>(&self, current: Direction4, rng: &mut R) -> Option<Direction4> {
        let dirs = self.candidates(current);
        if dirs.is_empty() {
            return None;
        }
        let index = rng.random_range(0..dirs.len());
        dirs.iter().nth(index)
    }

    /// Candidate exit whose first step gets closest to `target`. Ties go to
    /// the earlier direction in clockwise order from `Up`.
    pub fn choose_closest(&self, current: Direction4, target: Point) -> Option<Direction4> {
        self.candidates(current).iter().min_by(|a, b| {
            let da = (self.position + a.to_vector()).distance_squared(target);
            let db = (self.position + b.to_vector()).distance_squared(target);
            da.total_cmp(&db)
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;
    use Direction4::*;

    #[test]
    fn test_direction_set() {
        let mut set = DirectionSet::EMPTY;
        assert!(set.is_empty());
        assert!(!set.insert(Neutral));
        assert!(set.insert(Left));
        assert!(set.insert(Up));
        assert!(!set.insert(Up));
        assert_eq!(set.len(), 2);
        assert!(!set.contains(Neutral));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Up, Left]);
        assert!(set.remove(Up));
        assert!(!set.remove(Up));
        assert_eq!(DirectionSet::ALL.len(), 4);
        assert_eq!(Direction4::ALL.into_iter().collect::<DirectionSet>(), DirectionSet::ALL);
    }

    #[test]
    fn test_neutral_never_allowed() {
        let node = IntersectionNode::new(Point::ZERO, Direction4::ALL);
        assert!(!node.is_allowed(Neutral));
        assert!(node.is_allowed(Down));
    }

    #[test]
    fn test_candidates_drop_reverse() {
        let node = IntersectionNode::new(Point::ZERO, [Up, Down, Left]);
        // Moving up: arriving from below, so Down is the way back
        assert_eq!(node.candidates(Up).iter().collect::<Vec<_>>(), vec![Up, Left]);

        // Dead end: reversing is the only option
        let dead_end = IntersectionNode::new(Point::ZERO, [Down]);
        assert_eq!(dead_end.candidates(Up).iter().collect::<Vec<_>>(), vec![Down]);

        // Standing still keeps everything
        assert_eq!(node.candidates(Neutral).len(), 3);
    }

    #[test]
    fn test_choose_random_stays_in_candidates() {
        let node = IntersectionNode::new(Point::ZERO, [Up, Right, Down]);
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = BTreeSet::new();
        for _ in 0..200 {
            let dir = node.choose_random(Left, &mut rng).unwrap();
            assert_ne!(dir, Right);
            seen.insert(dir);
        }
        assert_eq!(seen.into_iter().collect::<Vec<_>>(), vec![Up, Down]);

        let walled = IntersectionNode::new(Point::ZERO, []);
        assert_eq!(walled.choose_random(Up, &mut rng), None);
    }

    #[test]
    fn test_choose_random_is_seeded() {
        let node = IntersectionNode::new(Point::ZERO, Direction4::ALL);
        let picks = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..16).map(|_| node.choose_random(Neutral, &mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(picks(42), picks(42));
    }

    #[test]
    fn test_choose_closest() {
        let node = IntersectionNode::new(Point::new(5.0, 5.0), Direction4::ALL);
        assert_eq!(node.choose_closest(Neutral, Point::new(5.0, 20.0)), Some(Up));
        assert_eq!(node.choose_closest(Neutral, Point::new(-3.0, 5.5)), Some(Left));

        // Target straight behind: reversing is pruned, tie between Right and Left
        assert_eq!(node.choose_closest(Up, Point::new(5.0, -10.0)), Some(Right));
    }

    #[test]
    fn test_node_json() {
        let node = IntersectionNode::new(Point::new(1.0, 2.0), [Up, Left]).with_dots([Up]).exit();
        let json = serde_json::to_string(&node).unwrap();
        let back: IntersectionNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);

        let minimal: IntersectionNode =
            serde_json::from_str(r#"{"position":[0.0,0.0],"allowed":6}"#).unwrap();
        assert_eq!(minimal.allowed.iter().collect::<Vec<_>>(), vec![Up, Right]);
        assert!(!minimal.is_exit);
    }

    #[test]
    fn test_stray_bits_are_dropped() {
        // Neutral bit and bits above Left
        let set: DirectionSet = serde_json::from_str("31").unwrap();
        assert_eq!(set, DirectionSet::ALL);
        let set: DirectionSet = serde_json::from_str("255").unwrap();
        assert_eq!(set, DirectionSet::ALL);
        let set: DirectionSet = serde_json::from_str("1").unwrap();
        assert_eq!(set, DirectionSet::EMPTY);
        assert!(set.is_empty());

        assert_eq!(serde_json::to_string(&DirectionSet::ALL).unwrap(), "30");
    }

    #[test]
    fn test_iter_outlives_set() {
        fn exits(node: &IntersectionNode) -> impl Iterator<Item = Direction4> {
            node.candidates(Neutral).iter()
        }
        let node = IntersectionNode::new(Point::ZERO, [Right, Down]);
        assert_eq!(exits(&node).collect::<Vec<_>>(), vec![Right, Down]);
    }
}
