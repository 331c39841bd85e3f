//! # Pac-Man Core
//!
//! Engine-independent building blocks for a Pac-Man style maze game: 2D
//! line geometry, composable per-tick input actions, and intersection-based
//! maze movement.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       PACMAN CORE                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Shared primitives                         │
//! │  └── direction.rs- 4-way / 8-way directions                  │
//! │                                                              │
//! │  geometry/       - Pure value geometry                       │
//! │  ├── line.rs     - Infinite lines (slope/intercept)          │
//! │  └── segment.rs  - Finite segments, projections              │
//! │                                                              │
//! │  input/          - Per-tick action engine                    │
//! │  ├── keys.rs     - Key codes and key state                   │
//! │  ├── clock.rs    - Tick clock and evaluation frame           │
//! │  ├── node.rs     - Action trees, multi-press machine         │
//! │  ├── action.rs   - Action handle and operators               │
//! │  └── map.rs      - Command bindings                          │
//! │                                                              │
//! │  maze/           - Maze graph and movement                   │
//! │  ├── node.rs     - Intersections, exit choice                │
//! │  └── movement.rs - Turn queue                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! - No process clock: time comes from the [`input::Frame`] passed in
//! - No HashMap (BTreeMap / BTreeSet for ordered iteration)
//! - Randomness only through a caller-supplied `rand::Rng`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod geometry;
pub mod input;
pub mod maze;

// Re-export commonly used types
pub use crate::core::direction::{Direction4, Direction8, DirectionError};
pub use crate::error::{Error, Result};
pub use geometry::{GeometryError, Line, LineSegment, Point, Projection};
pub use input::{Action, ActionConfig, ActionMap, ActionType, Frame, FrameClock, KeyCode, KeyboardState};
pub use maze::{IntersectionNode, Maze, NodeMovement};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tick rate (Hz)
pub const TICK_RATE: u32 = 60;
