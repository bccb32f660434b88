// Copyright 2025 the Pathwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bézier paths made of lines and cubics, possibly with multiple subpaths.

use alloc::vec::Vec;
use core::ops::Mul;

use crate::{Affine, CubicBez, Line, Point, Rect, Segment, Tolerance, Transform, Vec2};

/// A path of line and cubic Bézier segments, possibly with multiple
/// subpaths.
#[derive(Clone, Default, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BezPath(Vec<PathEl>);

/// The element of a Bézier path.
///
/// A valid path has `MoveTo` at the beginning of each subpath.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathEl {
    /// Move directly to the point without drawing anything, starting a new
    /// subpath.
    MoveTo(Point),
    /// Draw a line from the current location to the point.
    LineTo(Point),
    /// Draw a cubic Bézier using the current location and the three points.
    CurveTo(Point, Point, Point),
    /// Close off the subpath, drawing back to its start if needed.
    ClosePath,
}

impl PathEl {
    /// The point the pen ends up at, if the element has one.
    #[inline]
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            PathEl::MoveTo(p) | PathEl::LineTo(p) | PathEl::CurveTo(_, _, p) => Some(p),
            PathEl::ClosePath => None,
        }
    }

    /// The element with every point mapped through `f`.
    fn map_points(self, f: impl Fn(Point) -> Point) -> PathEl {
        match self {
            PathEl::MoveTo(p) => PathEl::MoveTo(f(p)),
            PathEl::LineTo(p) => PathEl::LineTo(f(p)),
            PathEl::CurveTo(p1, p2, p3) => PathEl::CurveTo(f(p1), f(p2), f(p3)),
            PathEl::ClosePath => PathEl::ClosePath,
        }
    }
}

impl BezPath {
    /// Create a new path.
    pub fn new() -> BezPath {
        BezPath::default()
    }

    /// Create a path from a vector of path elements.
    pub fn from_vec(v: Vec<PathEl>) -> BezPath {
        BezPath(v)
    }

    /// Push a generic path element onto the path.
    pub fn push(&mut self, el: PathEl) {
        self.0.push(el);
    }

    /// Push a "move to" element onto the path.
    pub fn move_to<P: Into<Point>>(&mut self, p: P) {
        self.push(PathEl::MoveTo(p.into()));
    }

    /// Push a "line to" element onto the path.
    pub fn line_to<P: Into<Point>>(&mut self, p: P) {
        self.push(PathEl::LineTo(p.into()));
    }

    /// Push a "curve to" element onto the path.
    pub fn curve_to<P: Into<Point>>(&mut self, p1: P, p2: P, p3: P) {
        self.push(PathEl::CurveTo(p1.into(), p2.into(), p3.into()));
    }

    /// Push a "close path" element onto the path.
    pub fn close_path(&mut self) {
        self.push(PathEl::ClosePath);
    }

    /// Get the path elements.
    pub fn elements(&self) -> &[PathEl] {
        &self.0
    }

    /// Returns `true` if the path contains no segments.
    pub fn is_empty(&self) -> bool {
        self.segments().next().is_none()
    }

    /// Iterate over the path segments.
    pub fn segments(&self) -> Segments<'_> {
        segments(&self.0)
    }

    /// Iterate over the subpaths, each a run of elements starting at a
    /// `MoveTo`.
    pub fn subpaths(&self) -> impl Iterator<Item = &[PathEl]> + '_ {
        let mut ranges = Vec::new();
        let mut start = 0;
        for (i, el) in self.0.iter().enumerate() {
            if i > start && matches!(el, PathEl::MoveTo(_)) {
                ranges.push(start..i);
                start = i;
            }
        }
        if start < self.0.len() {
            ranges.push(start..self.0.len());
        }
        ranges
            .into_iter()
            .map(move |range| &self.0[range])
            .filter(|subpath| segments(subpath).next().is_some())
    }

    /// The bounding box of all the segments.
    ///
    /// An empty path has an empty rectangle at the origin.
    pub fn bounding_box(&self, tolerance: &Tolerance) -> Rect {
        self.segments()
            .map(|seg| seg.bounding_box(tolerance))
            .reduce(|a, b| a.union(b))
            .unwrap_or_default()
    }

    /// The path with every point mapped through `transform`.
    #[must_use]
    pub fn transform(&self, transform: &Transform) -> BezPath {
        self.0
            .iter()
            .map(|el| el.map_points(|p| transform.apply(p)))
            .collect()
    }

    /// The path moved by `v`.
    #[must_use]
    pub fn translate(&self, v: Vec2) -> BezPath {
        self.0.iter().map(|el| el.map_points(|p| p + v)).collect()
    }
}

/// Iterate over the segments drawn by a run of path elements.
///
/// A drawing element before any `MoveTo` starts the subpath at its own end
/// point instead of drawing.
pub fn segments(elements: &[PathEl]) -> Segments<'_> {
    Segments {
        elements: elements.iter(),
        start: None,
        last: None,
    }
}

/// An iterator over the [`Segment`]s of a path.
///
/// See [`BezPath::segments`].
#[derive(Clone, Debug)]
pub struct Segments<'a> {
    elements: core::slice::Iter<'a, PathEl>,
    start: Option<Point>,
    last: Option<Point>,
}

impl Iterator for Segments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        for el in &mut self.elements {
            let (Some(start), Some(last)) = (self.start, self.last) else {
                if let Some(p) = el.end_point() {
                    self.start = Some(p);
                    self.last = Some(p);
                }
                continue;
            };
            let (seg, end) = match *el {
                PathEl::MoveTo(p) => {
                    self.start = Some(p);
                    self.last = Some(p);
                    continue;
                }
                PathEl::LineTo(p) => (Segment::Line(Line::new(last, p)), p),
                PathEl::CurveTo(p1, p2, p3) => (Segment::Curve(CubicBez::new(last, p1, p2, p3)), p3),
                PathEl::ClosePath => {
                    if last == start {
                        continue;
                    }
                    (Segment::Line(Line::new(last, start)), start)
                }
            };
            self.last = Some(end);
            return Some(seg);
        }
        None
    }
}

impl FromIterator<PathEl> for BezPath {
    fn from_iter<T: IntoIterator<Item = PathEl>>(iter: T) -> Self {
        BezPath(iter.into_iter().collect())
    }
}

impl Extend<PathEl> for BezPath {
    fn extend<I: IntoIterator<Item = PathEl>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a BezPath {
    type Item = PathEl;
    type IntoIter = core::iter::Cloned<core::slice::Iter<'a, PathEl>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements().iter().cloned()
    }
}

impl Mul<PathEl> for Affine {
    type Output = PathEl;

    fn mul(self, other: PathEl) -> PathEl {
        other.map_points(|p| self * p)
    }
}

impl Mul<&BezPath> for Affine {
    type Output = BezPath;

    fn mul(self, other: &BezPath) -> BezPath {
        other.0.iter().map(|&el| self * el).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Affine, BezPath, Line, PathEl, Point, Rect, Segment, Tolerance, Transform, Vec2,
    };

    fn square(x: f64, y: f64) -> BezPath {
        let mut path = BezPath::new();
        path.move_to((x, y));
        path.line_to((x + 1.0, y));
        path.line_to((x + 1.0, y + 1.0));
        path.line_to((x, y + 1.0));
        path.close_path();
        path
    }

    #[test]
    fn close_path_adds_closing_line() {
        let segs = square(0.0, 0.0).segments().collect::<Vec<_>>();
        assert_eq!(segs.len(), 4);
        assert_eq!(
            segs[3],
            Segment::Line(Line::new((0.0, 1.0), (0.0, 0.0)))
        );

        // Already back at the start, so there is nothing to draw.
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((1.0, 0.0));
        path.line_to((0.0, 0.0));
        path.close_path();
        assert_eq!(path.segments().count(), 2);
    }

    #[test]
    fn curve_segments() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.curve_to((1.0, 2.0), (3.0, 2.0), (4.0, 0.0));
        path.line_to((4.0, -1.0));
        let segs = path.segments().collect::<Vec<_>>();
        assert!(segs[0].is_curve());
        assert!(segs[1].is_line());
        assert_eq!(segs[1].start_point(), Point::new(4.0, 0.0));
        let bbox = path.bounding_box(&Tolerance::default());
        assert_eq!(bbox.y0, -1.0);
        assert!((bbox.y1 - 1.5).abs() < 1e-6);
    }

    #[test]
    fn subpaths() {
        let mut path = square(0.0, 0.0);
        path.extend(square(5.0, 5.0).elements().iter().copied());
        // A trailing move draws nothing and isn't a subpath.
        path.move_to((9.0, 9.0));
        let subpaths = path.subpaths().collect::<Vec<_>>();
        assert_eq!(subpaths.len(), 2);
        assert_eq!(subpaths[1][0], PathEl::MoveTo(Point::new(5.0, 5.0)));
        assert_eq!(path.segments().count(), 8);
    }

    #[test]
    fn missing_move_to() {
        let path = BezPath::from_vec(vec![PathEl::LineTo(Point::ZERO), PathEl::LineTo((1.0, 0.0).into())]);
        let segs = path.segments().collect::<Vec<_>>();
        assert_eq!(segs, vec![Segment::Line(Line::new((0.0, 0.0), (1.0, 0.0)))]);
        assert!(BezPath::new().is_empty());
        assert_eq!(BezPath::new().bounding_box(&Tolerance::default()), Rect::default());
    }

    #[test]
    fn transform_path() {
        let path = square(0.0, 0.0);
        let moved = path.translate(Vec2::new(2.0, 0.0));
        assert_eq!(moved, square(2.0, 0.0));
        let affine = Affine::translate((2.0, 0.0));
        assert_eq!(path.transform(&Transform::Affine(affine)), moved);
        assert_eq!(affine * &path, moved);
        let flipped = path.transform(&Transform::map(|p| Point::new(p.y, p.x)));
        assert_eq!(flipped.elements()[1], PathEl::LineTo(Point::new(0.0, 1.0)));
    }
}
