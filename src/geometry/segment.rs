//! Finite 2D Line Segment
//!
//! A segment is a pair of distinct endpoints plus the infinite line through
//! them. Most queries reduce to the line and then filter by where the result
//! projects onto the segment.

use std::fmt;
use tracing::debug;

use super::{GeometryError, Line, Point};

/// Where a point's perpendicular projection lands relative to a segment.
///
/// With `r = ((p - start) · (end - start)) / |end - start|²`:
/// `r < 0` is [`BeforeStart`](Projection::BeforeStart), `r > 1` is
/// [`AfterEnd`](Projection::AfterEnd), and the closed range `[0, 1]`
/// is [`OnSegment`](Projection::OnSegment).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Projection {
    /// On the backward extension, beyond `start`
    BeforeStart,
    /// Between the endpoints, inclusive
    OnSegment,
    /// On the forward extension, beyond `end`
    AfterEnd,
}

/// A finite segment between two distinct points.
///
/// Endpoint order matters for `direction` and projection, but not for
/// equality: `a -> b` equals `b -> a`.
#[derive(Clone, Copy, Debug)]
pub struct LineSegment {
    start: Point,
    end: Point,
    line: Line,
}

impl LineSegment {
    /// Segment between two points.
    ///
    /// Fails with [`GeometryError::Degenerate`] when the points are equal.
    pub fn new(start: Point, end: Point) -> Result<Self, GeometryError> {
        let line = Line::from_points(start, end)?;
        Ok(Self { start, end, line })
    }

    /// Segment starting at `start`, running `length` units along `direction`.
    ///
    /// A zero direction or zero length yields [`GeometryError::Degenerate`].
    pub fn from_direction(start: Point, direction: Point, length: f32) -> Result<Self, GeometryError> {
        let end = start + direction.normalize_or_zero() * length;
        Self::new(start, end)
    }

    /// First endpoint.
    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    /// Second endpoint.
    #[inline]
    pub fn end(&self) -> Point {
        self.end
    }

    /// The infinite line through both endpoints.
    #[inline]
    pub fn line(&self) -> &Line {
        &self.line
    }

    /// Euclidean distance between the endpoints.
    #[inline]
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Unit vector from `start` towards `end`.
    #[inline]
    pub fn direction(&self) -> Point {
        (self.end - self.start).normalize()
    }

    /// Midpoint.
    #[inline]
    pub fn center(&self) -> Point {
        (self.start + self.end) / 2.0
    }

    /// Classify where `point` projects onto this segment's line.
    ///
    /// Compares the numerator and denominator of `r` rather than dividing.
    pub fn locate(&self, point: Point) -> Projection {
        let (numerator, denominator) = self.projection_terms(point);
        if numerator < 0.0 {
            Projection::BeforeStart
        } else if numerator > denominator {
            Projection::AfterEnd
        } else {
            Projection::OnSegment
        }
    }

    /// Shortest distance from `point` to any point of the segment.
    ///
    /// Projections at exactly `r = 0` or `r = 1` are measured to the endpoint.
    pub fn distance_to_point(&self, point: Point) -> f32 {
        let (numerator, denominator) = self.projection_terms(point);
        if numerator <= 0.0 {
            point.distance(self.start)
        } else if numerator >= denominator {
            point.distance(self.end)
        } else {
            self.line.distance_to_point(point)
        }
    }

    /// Whether `point` lies on the segment.
    pub fn contains_point(&self, point: Point) -> bool {
        self.distance_to_point(point) == 0.0
    }

    /// The single point shared with another segment.
    ///
    /// Returns `Ok(None)` when the segments are parallel and apart, when
    /// collinear segments do not touch, or when the crossing lies on an
    /// extension. Collinear segments sharing more than one point fail with
    /// [`GeometryError::OverlappingSegments`].
    pub fn intersect(&self, other: &LineSegment) -> Result<Option<Point>, GeometryError> {
        if !self.line.is_parallel(&other.line) {
            let crossing = self.line.intersect(&other.line)?.filter(|&p| {
                self.locate(p) == Projection::OnSegment && other.locate(p) == Projection::OnSegment
            });
            return Ok(crossing);
        }

        if self.line.intercept() != other.line.intercept() {
            return Ok(None);
        }

        // Collinear. Call this segment AB and the other CD.
        let proj_c = self.locate(other.start);
        let proj_d = self.locate(other.end);

        if proj_c != Projection::OnSegment && proj_c == proj_d {
            // C and D on the same extension: nothing shared
            return Ok(None);
        }

        if (self.start == other.start && proj_d == Projection::BeforeStart)
            || (self.start == other.end && proj_c == Projection::BeforeStart)
        {
            return Ok(Some(self.start));
        }

        if (self.end == other.start && proj_d == Projection::AfterEnd)
            || (self.end == other.end && proj_c == Projection::AfterEnd)
        {
            return Ok(Some(self.end));
        }

        debug!(segment = %self, other = %other, "intersection requested between overlapping segments");
        Err(GeometryError::OverlappingSegments(*self, *other))
    }

    /// The single point shared with an infinite line.
    ///
    /// Returns `Ok(None)` for a parallel distinct line or a crossing beyond
    /// the endpoints. A line containing the whole segment fails with
    /// [`GeometryError::SegmentOnLine`].
    pub fn intersect_line(&self, line: &Line) -> Result<Option<Point>, GeometryError> {
        if self.line.is_parallel(line) {
            if self.line.intercept() == line.intercept() {
                debug!(segment = %self, line = %line, "intersection requested with the segment's own line");
                return Err(GeometryError::SegmentOnLine(*self, *line));
            }
            return Ok(None);
        }

        let crossing = self
            .line
            .intersect(line)?
            .filter(|&p| self.locate(p) == Projection::OnSegment);
        Ok(crossing)
    }

    /// Whether the segments share exactly one point.
    pub fn intersects(&self, other: &LineSegment) -> Result<bool, GeometryError> {
        Ok(self.intersect(other)?.is_some())
    }

    /// Whether the segment crosses `line` at exactly one point.
    pub fn intersects_line(&self, line: &Line) -> Result<bool, GeometryError> {
        Ok(self.intersect_line(line)?.is_some())
    }

    /// Numerator and denominator of the projection parameter `r`.
    #[inline]
    fn projection_terms(&self, point: Point) -> (f32, f32) {
        let ab = self.end - self.start;
        let ac = point - self.start;
        (ac.dot(ab), ab.length_squared())
    }
}

impl From<&LineSegment> for Line {
    fn from(segment: &LineSegment) -> Self {
        segment.line
    }
}

impl From<LineSegment> for Line {
    fn from(segment: LineSegment) -> Self {
        segment.line
    }
}

impl PartialEq for LineSegment {
    fn eq(&self, other: &Self) -> bool {
        (self.start == other.start && self.end == other.end)
            || (self.start == other.end && self.end == other.start)
    }
}

impl fmt::Display for LineSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) -> ({}, {})",
            self.start.x, self.start.y, self.end.x, self.end.y
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPSILON: f32 = 1e-4;

    fn seg(x1: f32, y1: f32, x2: f32, y2: f32) -> LineSegment {
        LineSegment::new(Point::new(x1, y1), Point::new(x2, y2)).unwrap()
    }

    #[test]
    fn test_derived_attributes() {
        let s = seg(1.0, 1.0, 4.0, 5.0);
        assert_eq!(s.length(), 5.0);
        assert!((s.direction() - Point::new(0.6, 0.8)).length() < EPSILON);
        assert_eq!(s.center(), Point::new(2.5, 3.0));
        assert_eq!(Line::from(&s), Line::from_points(s.start(), s.end()).unwrap());
    }

    #[test]
    fn test_degenerate_segment() {
        let p = Point::new(2.0, 2.0);
        assert_eq!(LineSegment::new(p, p), Err(GeometryError::Degenerate(p)));
        assert!(LineSegment::from_direction(p, Point::ZERO, 3.0).is_err());
        assert!(LineSegment::from_direction(p, Point::X, 0.0).is_err());
    }

    #[test]
    fn test_from_direction() {
        let s = LineSegment::from_direction(Point::new(1.0, 1.0), Point::new(0.0, 10.0), 3.0).unwrap();
        assert_eq!(s.end(), Point::new(1.0, 4.0));
        assert_eq!(s.length(), 3.0);
    }

    #[test]
    fn test_equality_ignores_orientation() {
        assert_eq!(seg(0.0, 0.0, 1.0, 2.0), seg(1.0, 2.0, 0.0, 0.0));
        assert_ne!(seg(0.0, 0.0, 1.0, 2.0), seg(0.0, 0.0, 1.0, 3.0));
    }

    #[test]
    fn test_locate() {
        let s = seg(0.0, 0.0, 4.0, 0.0);
        assert_eq!(s.locate(Point::new(-1.0, 3.0)), Projection::BeforeStart);
        assert_eq!(s.locate(Point::new(0.0, 3.0)), Projection::OnSegment);
        assert_eq!(s.locate(Point::new(2.0, -3.0)), Projection::OnSegment);
        assert_eq!(s.locate(Point::new(4.0, 1.0)), Projection::OnSegment);
        assert_eq!(s.locate(Point::new(4.5, 0.0)), Projection::AfterEnd);
    }

    #[test]
    fn test_distance_uses_closest_endpoint() {
        let s = seg(0.0, 5.0, 0.0, 8.0);
        let origin = Point::ZERO;
        assert_eq!(s.distance_to_point(origin), 5.0);
        assert_eq!(s.line().distance_to_point(origin), 0.0);

        assert_eq!(s.distance_to_point(Point::new(0.0, 10.0)), 2.0);
        assert_eq!(s.distance_to_point(Point::new(3.0, 6.0)), 3.0);
        // Exactly at r = 0 and r = 1
        assert_eq!(s.distance_to_point(Point::new(4.0, 5.0)), 4.0);
        assert_eq!(s.distance_to_point(Point::new(-4.0, 8.0)), 4.0);
    }

    #[test]
    fn test_contains_point() {
        let s = seg(0.0, 0.0, 2.0, 0.0);
        assert!(s.contains_point(Point::new(1.0, 0.0)));
        assert!(s.contains_point(Point::new(2.0, 0.0)));
        assert!(!s.contains_point(Point::new(3.0, 0.0)));
        assert!(!s.contains_point(Point::new(1.0, 0.1)));
    }

    #[test]
    fn test_crossing_segments() {
        let a = seg(0.0, 0.0, 2.0, 0.0);
        let b = seg(1.0, -1.0, 1.0, 1.0);
        assert_eq!(a.intersect(&b), Ok(Some(Point::new(1.0, 0.0))));
        assert_eq!(b.intersect(&a), Ok(Some(Point::new(1.0, 0.0))));
        assert_eq!(a.intersects(&b), Ok(true));
    }

    #[test]
    fn test_crossing_on_extension_is_none() {
        let a = seg(0.0, 0.0, 2.0, 0.0);
        // Crosses the extension of `a`
        let b = seg(3.0, -1.0, 3.0, 1.0);
        assert_eq!(a.intersect(&b), Ok(None));
        // Lines cross on `a` but beyond the end of `c`
        let c = seg(1.0, 1.0, 1.0, 2.0);
        assert_eq!(a.intersect(&c), Ok(None));
        assert_eq!(c.intersect(&a), Ok(None));
    }

    #[test]
    fn test_touching_at_corner() {
        let a = seg(0.0, 0.0, 2.0, 0.0);
        let b = seg(2.0, 0.0, 2.0, 3.0);
        assert_eq!(a.intersect(&b), Ok(Some(Point::new(2.0, 0.0))));
    }

    #[test]
    fn test_parallel_segments() {
        let a = seg(0.0, 0.0, 2.0, 0.0);
        let b = seg(0.0, 1.0, 2.0, 1.0);
        assert_eq!(a.intersect(&b), Ok(None));

        let v1 = seg(0.0, 0.0, 0.0, 2.0);
        let v2 = seg(1.0, 0.0, 1.0, 2.0);
        assert_eq!(v1.intersect(&v2), Ok(None));
    }

    #[test]
    fn test_collinear_disjoint() {
        let a = seg(0.0, 0.0, 2.0, 0.0);
        assert_eq!(a.intersect(&seg(3.0, 0.0, 5.0, 0.0)), Ok(None));
        assert_eq!(a.intersect(&seg(-5.0, 0.0, -1.0, 0.0)), Ok(None));
        assert_eq!(a.intersect(&seg(-1.0, 0.0, -5.0, 0.0)), Ok(None));
    }

    #[test]
    fn test_collinear_shared_endpoint() {
        let a = seg(0.0, 0.0, 2.0, 0.0);
        // Continues past the end
        assert_eq!(a.intersect(&seg(2.0, 0.0, 4.0, 0.0)), Ok(Some(Point::new(2.0, 0.0))));
        assert_eq!(a.intersect(&seg(4.0, 0.0, 2.0, 0.0)), Ok(Some(Point::new(2.0, 0.0))));
        // Continues before the start
        assert_eq!(a.intersect(&seg(0.0, 0.0, -3.0, 0.0)), Ok(Some(Point::ZERO)));
        assert_eq!(a.intersect(&seg(-3.0, 0.0, 0.0, 0.0)), Ok(Some(Point::ZERO)));

        // Vertical
        let v = seg(1.0, 0.0, 1.0, 1.0);
        assert_eq!(v.intersect(&seg(1.0, 1.0, 1.0, 5.0)), Ok(Some(Point::new(1.0, 1.0))));
    }

    #[test]
    fn test_collinear_overlap_is_error() {
        let a = seg(0.0, 0.0, 2.0, 0.0);
        let b = seg(1.0, 0.0, 3.0, 0.0);
        assert_eq!(a.intersect(&b), Err(GeometryError::OverlappingSegments(a, b)));

        // Identical segments, either orientation
        assert!(a.intersect(&a).is_err());
        assert!(a.intersect(&seg(2.0, 0.0, 0.0, 0.0)).is_err());

        // Shared endpoint but the other end folds back over `a`
        let folded = seg(2.0, 0.0, 1.0, 0.0);
        assert!(matches!(
            a.intersect(&folded),
            Err(GeometryError::OverlappingSegments(_, _))
        ));

        // Containment
        assert!(a.intersect(&seg(-1.0, 0.0, 3.0, 0.0)).is_err());
    }

    #[test]
    fn test_intersect_line() {
        let s = seg(0.0, 0.0, 2.0, 2.0);
        let vertical = Line::from_points(Point::new(1.0, -5.0), Point::new(1.0, 5.0)).unwrap();
        assert_eq!(s.intersect_line(&vertical), Ok(Some(Point::new(1.0, 1.0))));
        assert_eq!(vertical.intersect_segment(&s), Ok(Some(Point::new(1.0, 1.0))));

        let far = Line::from_points(Point::new(5.0, 0.0), Point::new(5.0, 1.0)).unwrap();
        assert_eq!(s.intersect_line(&far), Ok(None));
        assert_eq!(s.intersects_line(&far), Ok(false));

        let parallel = Line::from_slope_intercept(1.0, 1.0);
        assert_eq!(s.intersect_line(&parallel), Ok(None));
    }

    #[test]
    fn test_intersect_own_line_is_error() {
        let s = seg(0.0, 0.0, 2.0, 2.0);
        let own = Line::from_slope_intercept(1.0, 0.0);
        assert_eq!(s.intersect_line(&own), Err(GeometryError::SegmentOnLine(s, own)));
        assert!(s.intersects_line(&own).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(seg(0.0, 1.5, -2.0, 3.0).to_string(), "(0, 1.5) -> (-2, 3)");
    }

    fn distinct_points() -> impl Strategy<Value = (Point, Point)> {
        (-100i32..100, -100i32..100, -100i32..100, -100i32..100)
            .prop_filter("points must differ", |(x1, y1, x2, y2)| (x1, y1) != (x2, y2))
            .prop_map(|(x1, y1, x2, y2)| {
                (
                    Point::new(x1 as f32, y1 as f32),
                    Point::new(x2 as f32, y2 as f32),
                )
            })
    }

    proptest! {
        #[test]
        fn prop_midpoint_lies_on_line((p1, p2) in distinct_points()) {
            let s = LineSegment::new(p1, p2).unwrap();
            let line: Line = s.into();
            prop_assert!(line.distance_to_point(s.center()) < 1e-3);
        }

        #[test]
        fn prop_segment_distance_bounds_line_distance(
            (p1, p2) in distinct_points(),
            x in -150i32..150,
            y in -150i32..150,
        ) {
            let s = LineSegment::new(p1, p2).unwrap();
            let p = Point::new(x as f32, y as f32);
            let on_segment = s.distance_to_point(p);
            prop_assert!(on_segment + 1e-3 >= s.line().distance_to_point(p));
            prop_assert!(on_segment <= p.distance(p1).min(p.distance(p2)) + 1e-3);
        }

        #[test]
        fn prop_reversed_segment_is_equal((p1, p2) in distinct_points()) {
            let a = LineSegment::new(p1, p2).unwrap();
            let b = LineSegment::new(p2, p1).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
