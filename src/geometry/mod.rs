//! 2D Line Geometry
//!
//! Infinite lines and finite segments with intersection, angle and distance
//! queries. Pure value types: no temporal state, safe to share across threads.
//!
//! ## Module Structure
//!
//! - `line`: Infinite lines in slope/intercept form
//! - `segment`: Finite segments and projection classification

pub mod line;
pub mod segment;

use thiserror::Error;

/// A point (or vector) in the plane.
pub type Point = glam::Vec2;

// Re-export key types
pub use line::Line;
pub use segment::{LineSegment, Projection};

/// Geometry contract violations.
///
/// These are programming errors surfaced to the caller, never "no result"
/// outcomes: parallel-but-distinct lines and off-segment intersections are
/// reported as `Ok(None)` instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A line or segment was defined by two identical points.
    #[error("degenerate input: start and end are both {0}")]
    Degenerate(Point),

    /// Intersection requested between two identical lines.
    #[error("coincident lines ({0}) have no single intersection point")]
    CoincidentLines(Line),

    /// Intersection requested between collinear segments sharing more than one point.
    #[error("overlapping segments {0} and {1} have no single intersection point")]
    OverlappingSegments(LineSegment, LineSegment),

    /// Intersection requested between a segment and the line it lies on.
    #[error("segment {0} is a portion of line ({1})")]
    SegmentOnLine(LineSegment, Line),

    /// Polar line construction with a negative distance from the origin.
    #[error("radius must be non-negative, got {0}")]
    NegativeRadius(f32),
}
