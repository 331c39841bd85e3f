//! Maze Graph
//!
//! Intersections joined by straight corridors. Corridors are derived from
//! the nodes: along every column (and every row) a corridor opens at a node
//! whose exit points up (right) and closes at the next node without one.
//!
//! ## Module Structure
//!
//! - `node`: Intersections and exit selection
//! - `movement`: Per-actor direction queue

pub mod movement;
pub mod node;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::direction::{Direction4, DirectionError};
use crate::geometry::{GeometryError, LineSegment, Point};
use crate::Error;

// Re-export key types
pub use movement::{DirectionChange, MovementConfig, NodeMovement};
pub use node::{DirectionSet, IntersectionNode};

/// How far a jump landing may be from a corridor and still count as on it.
pub const JUMP_TOLERANCE: f32 = 0.01;

/// Axis-aligned level rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower-left corner
    pub min: Point,
    /// Upper-right corner
    pub max: Point,
}

impl Bounds {
    /// Rectangle spanning two corners, in any order.
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Width and height.
    pub fn size(&self) -> Point {
        self.max - self.min
    }

    /// Whether `point` lies inside or on the border.
    pub fn contains(&self, point: Point) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Where a ray from `from` in `dir` leaves the rectangle.
    fn edge(&self, from: Point, dir: Direction4) -> Point {
        match dir {
            Direction4::Up => Point::new(from.x, self.max.y),
            Direction4::Right => Point::new(self.max.x, from.y),
            Direction4::Down => Point::new(from.x, self.min.y),
            Direction4::Left => Point::new(self.min.x, from.y),
            Direction4::Neutral => from,
        }
    }
}

/// Intersections and the corridors between them.
#[derive(Clone, Debug)]
pub struct Maze {
    nodes: Vec<IntersectionNode>,
    connections: Vec<LineSegment>,
    bounds: Bounds,
}

impl Maze {
    /// Build the maze and derive its corridors.
    ///
    /// Fails with [`GeometryError::Degenerate`] if two nodes share a position
    /// where a corridor would join them.
    pub fn new(nodes: Vec<IntersectionNode>, bounds: Bounds) -> Result<Self, GeometryError> {
        let mut connections = Vec::new();

        // Columns: group by x, walk upwards
        let mut by_column: Vec<&IntersectionNode> = nodes.iter().collect();
        by_column.sort_by(|a, b| {
            a.position.x.total_cmp(&b.position.x).then(a.position.y.total_cmp(&b.position.y))
        });
        for column in by_column.chunk_by(|a, b| a.position.x == b.position.x) {
            connect_line(column, Direction4::Up, &mut connections)?;
        }

        // Rows: group by y, walk rightwards
        let mut by_row: Vec<&IntersectionNode> = nodes.iter().collect();
        by_row.sort_by(|a, b| {
            a.position.y.total_cmp(&b.position.y).then(a.position.x.total_cmp(&b.position.x))
        });
        for row in by_row.chunk_by(|a, b| a.position.y == b.position.y) {
            connect_line(row, Direction4::Right, &mut connections)?;
        }

        debug!(nodes = nodes.len(), connections = connections.len(), "maze built");
        Ok(Self {
            nodes,
            connections,
            bounds,
        })
    }

    /// All intersections.
    pub fn nodes(&self) -> &[IntersectionNode] {
        &self.nodes
    }

    /// All corridors.
    pub fn connections(&self) -> &[LineSegment] {
        &self.connections
    }

    /// Level rectangle.
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Distance from `point` to the nearest corridor, or `None` for a maze
    /// without corridors.
    pub fn distance_to_path(&self, point: Point) -> Option<f32> {
        self.connections
            .iter()
            .map(|segment| segment.distance_to_point(point))
            .min_by(f32::total_cmp)
    }

    /// Whether `point` is within `tolerance` of a corridor.
    pub fn is_on_path(&self, point: Point, tolerance: f32) -> bool {
        self.distance_to_path(point).is_some_and(|d| d <= tolerance)
    }

    /// Nearest intersection within `tolerance` of `point`.
    pub fn node_at(&self, point: Point, tolerance: f32) -> Option<&IntersectionNode> {
        self.nodes
            .iter()
            .map(|node| (node.position.distance(point), node))
            .filter(|(d, _)| *d <= tolerance)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, node)| node)
    }

    /// Landing point of a jump of `distance` from `from` in `dir`.
    ///
    /// Lands exactly `distance` away when that point is on a corridor.
    /// Otherwise hops to the first corridor crossing the way ahead, up to the
    /// level border. Corridors running along the jump itself are not
    /// crossings. `Ok(None)` when nothing lies ahead.
    pub fn jump_target(&self, from: Point, dir: Direction4, distance: f32) -> Result<Option<Point>, Error> {
        if dir.is_neutral() {
            return Err(DirectionError::Neutral.into());
        }

        let step = dir.to_vector();
        let landing = from + step * distance;
        if self.is_on_path(landing, JUMP_TOLERANCE) {
            trace!(%landing, "jump lands on corridor");
            return Ok(Some(landing));
        }

        let edge = self.bounds.edge(from, dir);
        if (edge - from).dot(step) <= 0.0 {
            return Ok(None);
        }
        let ray = LineSegment::new(from, edge)?;

        let mut best: Option<(f32, Point)> = None;
        for connection in &self.connections {
            if connection.line() == ray.line() {
                continue;
            }
            let Some(hit) = connection.intersect(&ray)? else {
                continue;
            };
            let ahead = (hit - from).dot(step);
            if ahead > 0.0 && best.map_or(true, |(nearest, _)| ahead < nearest) {
                best = Some((ahead, hit));
            }
        }

        if let Some((_, hit)) = best {
            trace!(%hit, "jump crosses to corridor");
        }
        Ok(best.map(|(_, hit)| hit))
    }
}

/// Corridors along one sorted column or row of nodes.
fn connect_line(
    nodes: &[&IntersectionNode],
    dir: Direction4,
    out: &mut Vec<LineSegment>,
) -> Result<(), GeometryError> {
    let mut open: Option<Point> = None;
    for node in nodes {
        match open {
            None if node.is_allowed(dir) => open = Some(node.position),
            Some(start) if !node.is_allowed(dir) => {
                out.push(LineSegment::new(start, node.position)?);
                open = None;
            }
            _ => {}
        }
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
