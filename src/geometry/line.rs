//! Infinite 2D Line
//!
//! Lines are stored as slope `k` and intercept `b` of `y = k * x + b`.
//! When `k` is infinite the line is vertical and `b` is its x-intercept
//! instead, so the equation becomes `x = b`. Without that convention the
//! lines `x = 5` and `x = -5` would be indistinguishable.

use std::fmt;
use tracing::debug;

use super::{GeometryError, LineSegment, Point};

/// An infinite line in the plane.
///
/// Immutable once constructed.
#[derive(Clone, Copy, Debug)]
pub struct Line {
    /// Slope (±infinity for vertical lines)
    k: f32,
    /// Y-intercept, or x-intercept when vertical
    b: f32,
}

impl Line {
    /// Line through two distinct points.
    ///
    /// Fails with [`GeometryError::Degenerate`] when the points are equal.
    pub fn from_points(p1: Point, p2: Point) -> Result<Self, GeometryError> {
        if p1 == p2 {
            debug!(x = p1.x, y = p1.y, "rejecting line through a single point");
            return Err(GeometryError::Degenerate(p1));
        }

        let k = (p2.y - p1.y) / (p2.x - p1.x);
        let b = if k.is_infinite() { p1.x } else { p1.y - k * p1.x };
        Ok(Self { k, b })
    }

    /// Line from slope and intercept.
    ///
    /// An infinite `slope` makes `intercept` the x-intercept.
    pub const fn from_slope_intercept(slope: f32, intercept: f32) -> Self {
        Self { k: slope, b: intercept }
    }

    /// Line in Hough form: `radius` is the distance from the origin and
    /// `theta` (degrees) the angle of the normal from the origin to the line.
    pub fn from_r_theta(radius: f32, theta: f32) -> Result<Self, GeometryError> {
        if radius < 0.0 {
            return Err(GeometryError::NegativeRadius(radius));
        }

        let (sine, cosine) = theta.to_radians().sin_cos();
        let foot = Point::new(radius * cosine, radius * sine);

        // -1/tan gives the slope of the line rather than of its normal
        let k = -cosine / sine;
        let b = if k.is_infinite() { radius } else { foot.y - k * foot.x };
        Ok(Self { k, b })
    }

    /// Line through `point` whose normal has angle `theta` (degrees).
    pub fn from_point_theta(point: Point, theta: f32) -> Self {
        let k = -1.0 / theta.to_radians().tan();
        let b = if k.is_infinite() { point.x } else { point.y - k * point.x };
        Self { k, b }
    }

    /// Slope. Infinite for vertical lines.
    #[inline]
    pub fn slope(&self) -> f32 {
        self.k
    }

    /// Y-intercept, or x-intercept for vertical lines.
    #[inline]
    pub fn intercept(&self) -> f32 {
        self.b
    }

    /// Whether the line is parallel to the Y axis.
    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.k.is_infinite()
    }

    /// Whether the line is parallel to the X axis.
    #[inline]
    pub fn is_horizontal(&self) -> bool {
        self.k == 0.0
    }

    /// Same slope, or both vertical.
    #[inline]
    pub(crate) fn is_parallel(&self, other: &Line) -> bool {
        self.k == other.k || (self.is_vertical() && other.is_vertical())
    }

    /// Acute angle between two lines, in degrees within `[0, 90]`.
    pub fn angle_between(&self, other: &Line) -> f32 {
        if self.is_parallel(other) {
            return 0.0;
        }

        let k1 = self.k;
        let k2 = other.k;

        let angle = match (self.is_vertical(), other.is_vertical()) {
            (false, false) => {
                // Perpendicular lines divide by zero here, giving atan(inf) = 90°
                let tan_phi = (k2 - k1).abs() / (1.0 + k1 * k2);
                tan_phi.atan()
            }
            (true, _) => std::f32::consts::FRAC_PI_2 - k2.atan().abs(),
            (_, true) => std::f32::consts::FRAC_PI_2 - k1.atan().abs(),
        };

        angle.to_degrees().abs()
    }

    /// The single point where two lines cross.
    ///
    /// Returns `Ok(None)` for parallel distinct lines and
    /// [`GeometryError::CoincidentLines`] for identical ones.
    pub fn intersect(&self, other: &Line) -> Result<Option<Point>, GeometryError> {
        let (k1, b1) = (self.k, self.b);
        let (k2, b2) = (other.k, other.b);

        if self.is_parallel(other) {
            if b1 == b2 {
                debug!(line = %self, "intersection requested between coincident lines");
                return Err(GeometryError::CoincidentLines(*self));
            }
            return Ok(None);
        }

        let point = if self.is_vertical() {
            Point::new(b1, k2 * b1 + b2)
        } else if other.is_vertical() {
            Point::new(b2, k1 * b2 + b1)
        } else {
            let x = (b2 - b1) / (k1 - k2);
            Point::new(x, k1 * x + b1)
        };

        Ok(Some(point))
    }

    /// Intersection with a finite segment. See [`LineSegment::intersect_line`].
    pub fn intersect_segment(&self, segment: &LineSegment) -> Result<Option<Point>, GeometryError> {
        segment.intersect_line(self)
    }

    /// Perpendicular distance from `point` to the line.
    pub fn distance_to_point(&self, point: Point) -> f32 {
        if self.is_vertical() {
            (self.b - point.x).abs()
        } else {
            let div = (self.k * self.k + 1.0).sqrt();
            ((self.k * point.x + self.b - point.y) / div).abs()
        }
    }
}

impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        self.is_parallel(other) && self.b == other.b
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k = {}, b = {}", self.k, self.b)
    }
}

// =============================================================================
// TESTS
// =============================================================================
