// Copyright 2025 the Pathwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line segments.

use core::f64::consts::TAU;
use core::ops::{Add, Mul, Sub};

use crate::{Affine, BezPath, CubicBez, Point, Rect, SegmentError, Transform, Vec2};

/// A single line segment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// The line's start point.
    pub p0: Point,
    /// The line's end point.
    pub p1: Point,
}

impl Line {
    /// Create a new line.
    #[inline(always)]
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Line {
        Line {
            p0: p0.into(),
            p1: p1.into(),
        }
    }

    /// Create a line from a list of exactly two points.
    pub fn from_points(points: &[Point]) -> Result<Line, SegmentError> {
        let &[p0, p1] = points else {
            return Err(SegmentError::WrongPointCount {
                expected: 2,
                found: points.len(),
            });
        };
        let line = Line::new(p0, p1);
        if !line.is_finite() {
            return Err(SegmentError::NonFinite);
        }
        Ok(line)
    }

    /// Create a line starting at `start` with the given length, heading in
    /// the direction of `radians`.
    ///
    /// The angle doesn't need to be normalized; [`Line::radians`] on the
    /// result reports it in `[0, 2π)`.
    pub fn from_length_angle(start: Point, length: f64, radians: f64) -> Result<Line, SegmentError> {
        if !(length.is_finite() && radians.is_finite() && start.is_finite()) {
            return Err(SegmentError::NonFinite);
        }
        if length < 0.0 {
            return Err(SegmentError::NegativeLength);
        }
        Ok(Line::new(start, start + Vec2::from_angle(radians) * length))
    }

    /// The two end points.
    #[inline]
    pub fn points(&self) -> [Point; 2] {
        [self.p0, self.p1]
    }

    /// Returns a copy of this `Line` with the end points swapped so that it
    /// points in the opposite direction.
    #[must_use]
    #[inline(always)]
    pub fn reversed(&self) -> Line {
        Line {
            p0: self.p1,
            p1: self.p0,
        }
    }

    /// The length of the line.
    #[inline]
    pub fn length(&self) -> f64 {
        (self.p1 - self.p0).hypot()
    }

    /// The direction of the line, in `[0, 2π)`.
    pub fn radians(&self) -> f64 {
        let angle = (self.p1 - self.p0).atan2();
        if angle < 0.0 {
            angle + TAU
        } else {
            angle
        }
    }

    /// The point at parameter `t`.
    ///
    /// `t == 0` and `t == 1` return the end points exactly.
    #[inline]
    pub fn eval(&self, t: f64) -> Point {
        if t == 0.0 {
            self.p0
        } else if t == 1.0 {
            self.p1
        } else {
            self.p0.lerp(self.p1, t)
        }
    }

    /// The point at parameter `t`; same as [`Line::eval`].
    #[inline]
    pub fn compute_point(&self, t: f64) -> Point {
        self.eval(t)
    }

    /// The derivative, which is the same at every `t`.
    #[inline]
    pub fn tangent(&self, _t: f64) -> Vec2 {
        self.p1 - self.p0
    }

    /// The midpoint of the line.
    #[must_use]
    #[inline]
    pub fn midpoint(&self) -> Point {
        self.p0.midpoint(self.p1)
    }

    /// The parameter of the point on the line nearest to `p`.
    ///
    /// A zero-length line projects everything to `0`.
    pub fn project_point(&self, p: Point) -> f64 {
        let d = self.p1 - self.p0;
        let len2 = d.hypot2();
        if len2 == 0.0 {
            return 0.0;
        }
        ((p - self.p0).dot(d) / len2).clamp(0.0, 1.0)
    }

    /// Split the line at parameter `t`.
    pub fn split(&self, t: f64) -> (Line, Line) {
        let mid = self.eval(t);
        (Line::new(self.p0, mid), Line::new(mid, self.p1))
    }

    /// The line moved by `v`.
    #[must_use]
    #[inline]
    pub fn translate(&self, v: Vec2) -> Line {
        *self + v
    }

    /// The line with both end points mapped through `transform`.
    #[must_use]
    pub fn transform(&self, transform: &Transform) -> Line {
        Line::new(transform.apply(self.p0), transform.apply(self.p1))
    }

    /// The smallest rectangle enclosing the line.
    #[inline]
    pub fn bounding_box(&self) -> Rect {
        Rect::from_points(self.p0, self.p1)
    }

    /// The same line as a cubic Bézier, with control points at one and two
    /// thirds.
    pub fn to_cubic(&self) -> CubicBez {
        let d = self.p1 - self.p0;
        CubicBez::new(self.p0, self.p0 + d / 3.0, self.p1 - d / 3.0, self.p1)
    }

    /// A path holding just this line.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.p0);
        path.line_to(self.p1);
        path
    }

    /// Is this line [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.p0.is_finite() && self.p1.is_finite()
    }
}

impl From<(Point, Point)> for Line {
    #[inline(always)]
    fn from((from, to): (Point, Point)) -> Self {
        Line::new(from, to)
    }
}

impl Mul<Line> for Affine {
    type Output = Line;

    #[inline]
    fn mul(self, other: Line) -> Line {
        Line {
            p0: self * other.p0,
            p1: self * other.p1,
        }
    }
}

impl Add<Vec2> for Line {
    type Output = Line;

    #[inline]
    fn add(self, v: Vec2) -> Line {
        Line::new(self.p0 + v, self.p1 + v)
    }
}

impl Sub<Vec2> for Line {
    type Output = Line;

    #[inline]
    fn sub(self, v: Vec2) -> Line {
        Line::new(self.p0 - v, self.p1 - v)
    }
}
