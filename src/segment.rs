// Copyright 2025 the Pathwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The segment type shared by lines and curves.

use core::fmt;

use smallvec::SmallVec;

use crate::{BezPath, CubicBez, Line, PathEl, Point, Rect, Tolerance, Transform, Vec2};

/// A single segment of a path: either a line or a cubic Bézier.
///
/// Segments are always open, and every operation returns new values.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Segment {
    /// A line segment.
    Line(Line),
    /// A cubic Bézier segment.
    Curve(CubicBez),
}

/// An error building a segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentError {
    /// The point list doesn't have the number of points the segment needs.
    WrongPointCount {
        /// How many points the segment needs.
        expected: usize,
        /// How many points were given.
        found: usize,
    },
    /// A segment was requested from a point list that's neither a line's two
    /// points nor a curve's four.
    UnsupportedPointCount {
        /// How many points were given.
        found: usize,
    },
    /// A curve was requested from a path element that isn't a cubic.
    NotACurve,
    /// A path element was given with no point before it to start from.
    NoCurrentPoint,
    /// A coordinate, length or angle was NaN or infinite.
    NonFinite,
    /// A line was requested with a negative length.
    NegativeLength,
}

impl Segment {
    /// Build a segment from its points: two make a line, four a curve.
    pub fn from_points(points: &[Point]) -> Result<Segment, SegmentError> {
        match points.len() {
            2 => Line::from_points(points).map(Segment::Line),
            4 => CubicBez::from_points(points).map(Segment::Curve),
            found => Err(SegmentError::UnsupportedPointCount { found }),
        }
    }

    /// Build the segment that `el` draws when the pen is at `start`.
    ///
    /// A `MoveTo` draws nothing and a `ClosePath` has no end point of its
    /// own, so both report [`SegmentError::NoCurrentPoint`].
    pub fn from_start_and_element(start: Point, el: PathEl) -> Result<Segment, SegmentError> {
        match el {
            PathEl::LineTo(p1) => Line::from_points(&[start, p1]).map(Segment::Line),
            PathEl::CurveTo(..) => CubicBez::from_start_and_element(start, el).map(Segment::Curve),
            PathEl::MoveTo(_) | PathEl::ClosePath => Err(SegmentError::NoCurrentPoint),
        }
    }

    /// Whether this is a line segment.
    #[inline]
    pub fn is_line(&self) -> bool {
        matches!(self, Segment::Line(_))
    }

    /// Whether this is a curve segment.
    #[inline]
    pub fn is_curve(&self) -> bool {
        matches!(self, Segment::Curve(_))
    }

    /// The line, if this is a line segment.
    #[inline]
    pub fn as_line(&self) -> Option<Line> {
        match self {
            Segment::Line(line) => Some(*line),
            Segment::Curve(_) => None,
        }
    }

    /// The curve, if this is a curve segment.
    #[inline]
    pub fn as_curve(&self) -> Option<CubicBez> {
        match self {
            Segment::Line(_) => None,
            Segment::Curve(c) => Some(*c),
        }
    }

    /// Segments are never closed.
    #[inline]
    pub fn is_closed(&self) -> bool {
        false
    }

    /// The start point.
    #[inline]
    pub fn start_point(&self) -> Point {
        match self {
            Segment::Line(line) => line.p0,
            Segment::Curve(c) => c.p0,
        }
    }

    /// The end point.
    #[inline]
    pub fn end_point(&self) -> Point {
        match self {
            Segment::Line(line) => line.p1,
            Segment::Curve(c) => c.p3,
        }
    }

    /// The defining points, in order: two for a line, four for a curve.
    pub fn points(&self) -> SmallVec<[Point; 4]> {
        match self {
            Segment::Line(line) => SmallVec::from_slice(&line.points()),
            Segment::Curve(c) => SmallVec::from_slice(&c.points()),
        }
    }

    /// Split at parameter `t` into two segments of the same kind.
    pub fn split(&self, t: f64) -> (Segment, Segment) {
        match self {
            Segment::Line(line) => {
                let (a, b) = line.split(t);
                (Segment::Line(a), Segment::Line(b))
            }
            Segment::Curve(c) => {
                let (a, b) = c.split(t);
                (Segment::Curve(a), Segment::Curve(b))
            }
        }
    }

    /// The point at parameter `t`. End points are exact.
    #[inline]
    pub fn compute_point(&self, t: f64) -> Point {
        match self {
            Segment::Line(line) => line.eval(t),
            Segment::Curve(c) => c.compute_point(t),
        }
    }

    /// The first derivative at parameter `t`.
    #[inline]
    pub fn tangent(&self, t: f64) -> Vec2 {
        match self {
            Segment::Line(line) => line.tangent(t),
            Segment::Curve(c) => c.tangent(t),
        }
    }

    /// The parameter of the point on the segment nearest to `p`.
    pub fn project_point(&self, p: Point) -> f64 {
        match self {
            Segment::Line(line) => line.project_point(p),
            Segment::Curve(c) => c.project_point(p),
        }
    }

    /// The segment moved by `v`.
    #[must_use]
    pub fn translate(&self, v: Vec2) -> Segment {
        match self {
            Segment::Line(line) => Segment::Line(line.translate(v)),
            Segment::Curve(c) => Segment::Curve(c.translate(v)),
        }
    }

    /// The segment with its defining points mapped through `transform`.
    #[must_use]
    pub fn transform(&self, transform: &Transform) -> Segment {
        match self {
            Segment::Line(line) => Segment::Line(line.transform(transform)),
            Segment::Curve(c) => Segment::Curve(c.transform(transform)),
        }
    }

    /// The same segment traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Segment {
        match self {
            Segment::Line(line) => Segment::Line(line.reversed()),
            Segment::Curve(c) => Segment::Curve(c.reversed()),
        }
    }

    /// The tight bounding box.
    pub fn bounding_box(&self, tolerance: &Tolerance) -> Rect {
        match self {
            Segment::Line(line) => line.bounding_box(),
            Segment::Curve(c) => c.bounding_box(tolerance),
        }
    }

    /// The lower left corner of the bounding box.
    #[inline]
    pub fn lower_left(&self, tolerance: &Tolerance) -> Point {
        self.bounding_box(tolerance).lower_left()
    }

    /// The upper right corner of the bounding box.
    #[inline]
    pub fn upper_right(&self, tolerance: &Tolerance) -> Point {
        self.bounding_box(tolerance).upper_right()
    }

    /// The width of the bounding box.
    #[inline]
    pub fn width(&self, tolerance: &Tolerance) -> f64 {
        self.bounding_box(tolerance).width()
    }

    /// The height of the bounding box.
    #[inline]
    pub fn height(&self, tolerance: &Tolerance) -> f64 {
        self.bounding_box(tolerance).height()
    }

    /// A path holding just this segment.
    pub fn to_path(&self) -> BezPath {
        match self {
            Segment::Line(line) => line.to_path(),
            Segment::Curve(c) => c.to_path(),
        }
    }

    /// Is this segment [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    pub fn is_finite(&self) -> bool {
        match self {
            Segment::Line(line) => line.is_finite(),
            Segment::Curve(c) => c.is_finite(),
        }
    }
}

impl From<Line> for Segment {
    #[inline]
    fn from(line: Line) -> Segment {
        Segment::Line(line)
    }
}

impl From<CubicBez> for Segment {
    #[inline]
    fn from(c: CubicBez) -> Segment {
        Segment::Curve(c)
    }
}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentError::WrongPointCount { expected, found } => {
                write!(f, "expected {expected} points, found {found}")
            }
            SegmentError::UnsupportedPointCount { found } => {
                write!(f, "expected 2 points for a line or 4 for a curve, found {found}")
            }
            SegmentError::NotACurve => write!(f, "path element is not a cubic curve"),
            SegmentError::NoCurrentPoint => write!(f, "path element has no current point"),
            SegmentError::NonFinite => write!(f, "non-finite coordinate"),
            SegmentError::NegativeLength => write!(f, "negative line length"),
        }
    }
}

impl core::error::Error for SegmentError {}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use crate::{
        Affine, CubicBez, Line, PathEl, Point, Rect, Segment, SegmentError, Tolerance, Transform,
        Vec2,
    };

    fn curve() -> Segment {
        Segment::Curve(CubicBez::new(
            (0.0, 0.0),
            (1.0, 2.0),
            (3.0, 2.0),
            (4.0, 0.0),
        ))
    }

    fn line() -> Segment {
        Segment::Line(Line::new((0.0, 2.0), (4.0, 2.0)))
    }

    #[test]
    fn segment_from_points() {
        let two = [Point::new(0.0, 2.0), Point::new(4.0, 2.0)];
        assert_eq!(Segment::from_points(&two), Ok(line()));
        assert_eq!(Segment::from_points(&curve().points()), Ok(curve()));
        let three = [Point::ZERO; 3];
        assert_eq!(
            Segment::from_points(&three),
            Err(SegmentError::UnsupportedPointCount { found: 3 })
        );
        let five = [Point::ZERO; 5];
        assert_eq!(
            Segment::from_points(&five),
            Err(SegmentError::UnsupportedPointCount { found: 5 })
        );
    }

    #[test]
    fn segment_from_element() {
        let start = Point::new(1.0, 1.0);
        assert_eq!(
            Segment::from_start_and_element(start, PathEl::LineTo(Point::ZERO)),
            Ok(Segment::Line(Line::new(start, Point::ZERO)))
        );
        assert_eq!(
            Segment::from_start_and_element(start, PathEl::ClosePath),
            Err(SegmentError::NoCurrentPoint)
        );
    }

    #[test]
    fn segment_kind_and_points() {
        assert!(line().is_line() && !line().is_curve());
        assert!(curve().is_curve() && !curve().is_line());
        assert!(!line().is_closed() && !curve().is_closed());
        assert_eq!(line().points().len(), 2);
        assert_eq!(curve().points().len(), 4);
        assert_eq!(curve().start_point(), Point::new(0.0, 0.0));
        assert_eq!(curve().end_point(), Point::new(4.0, 0.0));
        assert!(line().as_curve().is_none());
        assert_eq!(curve().as_curve().map(|c| c.p1), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn segment_endpoints_exact() {
        for seg in [line(), curve()] {
            assert_eq!(seg.compute_point(0.0), seg.start_point());
            assert_eq!(seg.compute_point(1.0), seg.end_point());
            let (a, b) = seg.split(0.3);
            assert_eq!(a.start_point(), seg.start_point());
            assert_eq!(b.end_point(), seg.end_point());
            assert_eq!(a.end_point(), b.start_point());
            assert_eq!(a.is_line(), seg.is_line());
        }
    }

    #[test]
    fn segment_extents() {
        let tol = Tolerance::default();
        assert_eq!(line().bounding_box(&tol), Rect::new(0.0, 2.0, 4.0, 2.0));
        assert_eq!(line().height(&tol), 0.0);
        assert_eq!(curve().lower_left(&tol), Point::new(0.0, 0.0));
        assert_eq!(curve().width(&tol), 4.0);
        assert!((curve().upper_right(&tol).y - 1.5).abs() < 1e-6);
    }

    #[test]
    fn segment_transform() {
        let v = Vec2::new(1.0, 1.0);
        assert_eq!(curve().translate(v).start_point(), Point::new(1.0, 1.0));
        let t = Transform::Affine(Affine::translate(v));
        assert_eq!(curve().transform(&t), curve().translate(v));
        assert_eq!(line().reversed().start_point(), Point::new(4.0, 2.0));
        assert_eq!(curve().to_path().elements().len(), 2);
        let p = Point::new(2.0, 5.0);
        assert_eq!(line().project_point(p), 0.5);
        assert!((curve().project_point(p) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn segment_error_display() {
        let err = SegmentError::WrongPointCount {
            expected: 4,
            found: 1,
        };
        assert_eq!(err.to_string(), "expected 4 points, found 1");
        assert_eq!(
            SegmentError::UnsupportedPointCount { found: 3 }.to_string(),
            "expected 2 points for a line or 4 for a curve, found 3"
        );
    }
}
