//! Shared primitives.

pub mod direction;

pub use direction::{Direction4, Direction8, DirectionError};
