//! Input Actions
//!
//! Composable, per-tick input predicates:
//! - `keys`: key codes and the per-tick key state capability
//! - `clock`: tick clock and evaluation frame
//! - `node`: action trees and the multi-press state machine
//! - `action`: user-facing action handle and operators
//! - `map`: command to action bindings

pub mod action;
pub mod clock;
pub mod keys;
pub mod map;
pub mod node;

pub use action::{Action, ActionConfig, ActionType, DEFAULT_MULTI_DELAY};
pub use clock::{Frame, FrameClock};
pub use keys::{KeyCode, KeySource, KeyboardState};
pub use map::ActionMap;
pub use node::{ActionConfigError, ActionNode, MultiCounter, Trigger};
