//! Grid Directions
//!
//! The four orthogonal and eight compass directions used by maze movement,
//! with conversions between them and to unit step vectors.

use std::fmt;
use glam::Vec2;
use serde::{Serialize, Deserialize};
use thiserror::Error;

// =============================================================================
// ERRORS
// =============================================================================

/// Direction conversion errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DirectionError {
    /// Raw value does not name a direction.
    #[error("direction enumerant {value} out of range (max {max})")]
    OutOfRange {
        /// The raw value received
        value: u8,
        /// Largest valid enumerant
        max: u8,
    },

    /// Diagonal direction has no 4-way equivalent.
    #[error("diagonal direction {0} has no orthogonal equivalent")]
    Diagonal(Direction8),

    /// A real direction was required.
    #[error("operation needs a direction, got neutral")]
    Neutral,
}

// =============================================================================
// DIRECTION4
// =============================================================================

/// One of the four orthogonal directions, or no direction at all.
///
/// Discriminants follow clockwise order starting at `Up = 1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction4 {
    /// Standing still
    #[default]
    Neutral = 0,
    /// +Y
    Up = 1,
    /// +X
    Right = 2,
    /// -Y
    Down = 3,
    /// -X
    Left = 4,
}

impl Direction4 {
    /// The four cardinal directions in clockwise order.
    pub const ALL: [Direction4; 4] = [
        Direction4::Up,
        Direction4::Right,
        Direction4::Down,
        Direction4::Left,
    ];

    /// Widen to the 8-way enum.
    #[inline]
    pub fn to8(self) -> Direction8 {
        match self {
            Direction4::Neutral => Direction8::Neutral,
            Direction4::Up => Direction8::Up,
            Direction4::Right => Direction8::Right,
            Direction4::Down => Direction8::Down,
            Direction4::Left => Direction8::Left,
        }
    }

    /// The direction pointing the other way. `Neutral` stays `Neutral`.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Direction4::Neutral => Direction4::Neutral,
            Direction4::Up => Direction4::Down,
            Direction4::Right => Direction4::Left,
            Direction4::Down => Direction4::Up,
            Direction4::Left => Direction4::Right,
        }
    }

    /// True if both are real directions pointing opposite ways.
    #[inline]
    pub fn is_opposite(self, other: Self) -> bool {
        self.to8().is_opposite(other.to8())
    }

    /// Unit step vector (zero for `Neutral`).
    #[inline]
    pub fn to_vector(self) -> Vec2 {
        self.to8().to_vector()
    }

    /// Whether this is a real direction.
    #[inline]
    pub fn is_neutral(self) -> bool {
        self == Direction4::Neutral
    }
}

impl TryFrom<u8> for Direction4 {
    type Error = DirectionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Direction4::Neutral),
            1 => Ok(Direction4::Up),
            2 => Ok(Direction4::Right),
            3 => Ok(Direction4::Down),
            4 => Ok(Direction4::Left),
            _ => Err(DirectionError::OutOfRange { value, max: 4 }),
        }
    }
}

impl fmt::Display for Direction4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to8(), f)
    }
}

// =============================================================================
// DIRECTION8
// =============================================================================

/// One of the eight compass directions, or no direction at all.
///
/// Discriminants follow clockwise order starting at `Up = 1`, so that
/// orthogonal directions are odd and diagonals are even.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction8 {
    /// Standing still
    #[default]
    Neutral = 0,
    /// +Y
    Up = 1,
    /// +X +Y
    UpRight = 2,
    /// +X
    Right = 3,
    /// +X -Y
    DownRight = 4,
    /// -Y
    Down = 5,
    /// -X -Y
    DownLeft = 6,
    /// -X
    Left = 7,
    /// -X +Y
    UpLeft = 8,
}

impl Direction8 {
    /// Number of real directions (excluding `Neutral`).
    const COUNT: u8 = 8;

    /// Narrow to the 4-way enum.
    ///
    /// Fails for diagonals.
    pub fn to4(self) -> Result<Direction4, DirectionError> {
        match self {
            Direction8::Neutral => Ok(Direction4::Neutral),
            Direction8::Up => Ok(Direction4::Up),
            Direction8::Right => Ok(Direction4::Right),
            Direction8::Down => Ok(Direction4::Down),
            Direction8::Left => Ok(Direction4::Left),
            diagonal => Err(DirectionError::Diagonal(diagonal)),
        }
    }

    /// Whether this direction is one of the four diagonals.
    #[inline]
    pub fn is_diagonal(self) -> bool {
        let raw = self as u8;
        raw != 0 && raw % 2 == 0
    }

    /// The direction pointing the other way. `Neutral` stays `Neutral`.
    #[inline]
    pub fn opposite(self) -> Self {
        if self == Direction8::Neutral {
            return Direction8::Neutral;
        }
        // Half a turn is four steps around the ring 1..=8.
        let raw = (self as u8 + 3) % Self::COUNT + 1;
        Self::from_ring(raw)
    }

    /// True if both are real directions pointing opposite ways.
    #[inline]
    pub fn is_opposite(self, other: Self) -> bool {
        self != Direction8::Neutral
            && other != Direction8::Neutral
            && (self as u8).abs_diff(other as u8) == 4
    }

    /// Step vector. Diagonals are the plain sum of their two axes, not normalized.
    pub fn to_vector(self) -> Vec2 {
        match self {
            Direction8::Neutral => Vec2::ZERO,
            Direction8::Up => Vec2::Y,
            Direction8::UpRight => Vec2::Y + Vec2::X,
            Direction8::Right => Vec2::X,
            Direction8::DownRight => Vec2::NEG_Y + Vec2::X,
            Direction8::Down => Vec2::NEG_Y,
            Direction8::DownLeft => Vec2::NEG_Y + Vec2::NEG_X,
            Direction8::Left => Vec2::NEG_X,
            Direction8::UpLeft => Vec2::Y + Vec2::NEG_X,
        }
    }

    // `raw` is always in 1..=8 here.
    fn from_ring(raw: u8) -> Self {
        match raw {
            1 => Direction8::Up,
            2 => Direction8::UpRight,
            3 => Direction8::Right,
            4 => Direction8::DownRight,
            5 => Direction8::Down,
            6 => Direction8::DownLeft,
            7 => Direction8::Left,
            _ => Direction8::UpLeft,
        }
    }
}

impl TryFrom<u8> for Direction8 {
    type Error = DirectionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Direction8::Neutral),
            1..=8 => Ok(Self::from_ring(value)),
            _ => Err(DirectionError::OutOfRange { value, max: Self::COUNT }),
        }
    }
}

impl From<Direction4> for Direction8 {
    fn from(dir: Direction4) -> Self {
        dir.to8()
    }
}

impl TryFrom<Direction8> for Direction4 {
    type Error = DirectionError;

    fn try_from(dir: Direction8) -> Result<Self, Self::Error> {
        dir.to4()
    }
}

impl fmt::Display for Direction8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction8::Neutral => "neutral",
            Direction8::Up => "up",
            Direction8::UpRight => "up-right",
            Direction8::Right => "right",
            Direction8::DownRight => "down-right",
            Direction8::Down => "down",
            Direction8::DownLeft => "down-left",
            Direction8::Left => "left",
            Direction8::UpLeft => "up-left",
        };
        f.write_str(name)
    }
}

// =============================================================================
// TESTS
// =============================================================================
