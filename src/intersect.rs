// Copyright 2025 the Pathwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Intersections between pairs of segments.
//!
//! Line/line intersections are solved in closed form. A curve meets a line
//! where the curve's cubic, rotated into the line's frame, crosses zero,
//! which Cardano's method solves directly. Two curves are subdivided until
//! they're flat enough to stand in for their chords.

use smallvec::SmallVec;

use crate::common::{solve_cubic_cardano, solve_quadratic};
use crate::{Affine, CubicBez, Line, Point, Segment, Tolerance};

/// How many times curve/curve intersection may halve a pair of curves
/// before resolving it with their chords.
pub const MAX_SUBDIVISION_DEPTH: usize = 32;

/// The intersection points of a pair of segments.
pub type Intersections = SmallVec<[Point; 3]>;

const NEWTON_STEPS: usize = 3;

/// All points where two segments meet.
///
/// Parallel lines never meet, even when they overlap.
///
/// ```
/// use pathwise::{intersections, Line, Point, Segment, Tolerance};
///
/// let a = Segment::Line(Line::new((0.0, 2.0), (4.0, 2.0)));
/// let b = Segment::Line(Line::new((2.0, 0.0), (2.0, 4.0)));
/// let points = intersections(&a, &b, &Tolerance::default());
/// assert_eq!(points.as_slice(), &[Point::new(2.0, 2.0)]);
/// ```
pub fn intersections(a: &Segment, b: &Segment, tolerance: &Tolerance) -> Intersections {
    match (a, b) {
        (Segment::Line(a), Segment::Line(b)) => line_line(a, b, tolerance).into_iter().collect(),
        (Segment::Curve(c), Segment::Line(l)) | (Segment::Line(l), Segment::Curve(c)) => {
            curve_line(c, l, tolerance)
        }
        (Segment::Curve(a), Segment::Curve(b)) => curve_curve(a, b, tolerance),
    }
}

/// The point where two line segments cross, if they do.
///
/// Uses the determinant of the two direction vectors. A determinant that's
/// zero within tolerance, relative to the lengths of the two lines, means
/// they're parallel and reports nothing. The crossing point of
/// the infinite lines is only accepted when it's within both segments'
/// extents on both axes.
pub fn line_line(a: &Line, b: &Line, tolerance: &Tolerance) -> Option<Point> {
    let (x1, y1, x2, y2) = (a.p0.x, a.p0.y, a.p1.x, a.p1.y);
    let (x3, y3, x4, y4) = (b.p0.x, b.p0.y, b.p1.x, b.p1.y);
    let d = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    if d == 0.0 || tolerance.is_zero(d / (a.length() * b.length())) {
        return None;
    }
    let pre = x1 * y2 - y1 * x2;
    let post = x3 * y4 - y3 * x4;
    let p = Point::new(
        (pre * (x3 - x4) - (x1 - x2) * post) / d,
        (pre * (y3 - y4) - (y1 - y2) * post) / d,
    );
    if !p.is_finite() {
        return None;
    }
    (in_extent(a, p, tolerance) && in_extent(b, p, tolerance)).then_some(p)
}

/// The points where a curve crosses a line segment.
///
/// When the curve degenerates to lower degree in the line's frame the cubic
/// can't be solved directly, and the line is treated as a curve and
/// intersected by subdivision instead.
pub fn curve_line(c: &CubicBez, line: &Line, tolerance: &Tolerance) -> Intersections {
    match analytic_curve_line(c, line, tolerance) {
        Some(points) => points,
        None => {
            log::trace!("degenerate curve/line cubic, falling back to subdivision");
            curve_curve(c, &line.to_cubic(), tolerance)
        }
    }
}

/// The points where two curves cross.
///
/// Both curves are halved together until each is flat within
/// [`Tolerance::flatness`], pruning pairs whose bounding boxes are
/// disjoint. A flat curve is replaced by its chord. Pairs still unresolved
/// after [`MAX_SUBDIVISION_DEPTH`] halvings are resolved by their chords.
pub fn curve_curve(a: &CubicBez, b: &CubicBez, tolerance: &Tolerance) -> Intersections {
    let mut result = Intersections::new();
    subdivide_curves(a, b, tolerance, 0, &mut result);
    result
}

/// Solve a curve against a line in the line's frame.
///
/// Returns `None` when the cubic term is negligible next to the others, as
/// normalizing by it would swamp the roots with rounding error.
fn analytic_curve_line(c: &CubicBez, line: &Line, tolerance: &Tolerance) -> Option<Intersections> {
    let align = Affine::rotate(-line.radians()) * Affine::translate(-line.p0.to_vec2());
    let [y0, y1, y2, y3] = c.points().map(|p| (align * p).y);
    let a3 = -y0 + 3.0 * y1 - 3.0 * y2 + y3;
    let a2 = 3.0 * y0 - 6.0 * y1 + 3.0 * y2;
    let a1 = -3.0 * y0 + 3.0 * y1;
    let a0 = y0;
    let scale = a0.abs().max(a1.abs()).max(a2.abs());
    if tolerance.is_zero(a3) || tolerance.is_zero(a3 / scale) {
        return None;
    }
    let cubic = [a0, a1, a2, a3];
    let unit = tolerance.range(0.0, 1.0);
    let roots: SmallVec<[f64; 3]> = solve_cubic_cardano(a0, a1, a2, a3)
        .into_iter()
        .map(|t| polish_root(&cubic, t))
        .filter(|&t| unit.includes(t))
        .map(|t| t.clamp(0.0, 1.0))
        .collect();
    let mut result = Intersections::new();
    for &t in &roots {
        let p = c.compute_point(t);
        if in_extent(line, p, tolerance) {
            push_unique(&mut result, p, tolerance);
        }
    }
    // A curve touching the line has a double root, which rounding can turn
    // into none at all, so check where the curve turns. A turn that dips
    // through the line already has a root on each side.
    for t in solve_quadratic(a1, 2.0 * a2, 3.0 * a3) {
        if !unit.includes(t) || !tolerance.is_zero(eval_cubic(&cubic, t)) {
            continue;
        }
        let t = t.clamp(0.0, 1.0);
        let touch = c.compute_point(t);
        let distinct = |r: f64| !c.compute_point(r).approx_eq(touch, tolerance);
        let before = roots.iter().any(|&r| r < t && distinct(r));
        let after = roots.iter().any(|&r| r > t && distinct(r));
        if !(before && after) && in_extent(line, touch, tolerance) {
            push_unique(&mut result, touch, tolerance);
        }
    }
    Some(result)
}

fn eval_cubic(&[a0, a1, a2, a3]: &[f64; 4], t: f64) -> f64 {
    ((a3 * t + a2) * t + a1) * t + a0
}

/// Refine a root of the cubic with Newton steps, keeping only steps that
/// bring it closer to zero.
fn polish_root(cubic: &[f64; 4], mut t: f64) -> f64 {
    let [_, a1, a2, a3] = *cubic;
    let mut value = eval_cubic(cubic, t);
    for _ in 0..NEWTON_STEPS {
        let slope = (3.0 * a3 * t + 2.0 * a2) * t + a1;
        let next = t - value / slope;
        let next_value = eval_cubic(cubic, next);
        if !next.is_finite() || next_value.abs() >= value.abs() {
            break;
        }
        t = next;
        value = next_value;
    }
    t
}

fn subdivide_curves(
    a: &CubicBez,
    b: &CubicBez,
    tolerance: &Tolerance,
    depth: usize,
    result: &mut Intersections,
) {
    if depth >= MAX_SUBDIVISION_DEPTH {
        log::debug!("curve/curve subdivision hit depth {depth}, resolving by chords");
        extend_unique(result, line_line(&a.chord(), &b.chord(), tolerance), tolerance);
        return;
    }
    match (a.is_flat(tolerance), b.is_flat(tolerance)) {
        (true, true) => {
            extend_unique(result, line_line(&a.chord(), &b.chord(), tolerance), tolerance);
        }
        (true, false) => curve_against_flat(b, a, tolerance, depth, result),
        (false, true) => curve_against_flat(a, b, tolerance, depth, result),
        (false, false) => {
            if !boxes_overlap(a, b, tolerance) {
                return;
            }
            let (a0, a1) = a.subdivide();
            let (b0, b1) = b.subdivide();
            for (a, b) in [(a0, b0), (a0, b1), (a1, b0), (a1, b1)] {
                subdivide_curves(&a, &b, tolerance, depth + 1, result);
            }
        }
    }
}

/// Intersect a curve with one that's flat enough to be its chord.
fn curve_against_flat(
    curve: &CubicBez,
    flat: &CubicBez,
    tolerance: &Tolerance,
    depth: usize,
    result: &mut Intersections,
) {
    if let Some(points) = analytic_curve_line(curve, &flat.chord(), tolerance) {
        extend_unique(result, points, tolerance);
        return;
    }
    // Degenerate in the chord's frame: keep halving the curved one.
    if !boxes_overlap(curve, flat, tolerance) {
        return;
    }
    let (c0, c1) = curve.subdivide();
    subdivide_curves(&c0, flat, tolerance, depth + 1, result);
    subdivide_curves(&c1, flat, tolerance, depth + 1, result);
}

fn boxes_overlap(a: &CubicBez, b: &CubicBez, tolerance: &Tolerance) -> bool {
    let delta = tolerance.delta();
    a.bounding_box(tolerance)
        .inflate(delta, delta)
        .overlaps(&b.bounding_box(tolerance))
}

/// Whether `p` is within the line's extent on both axes.
fn in_extent(line: &Line, p: Point, tolerance: &Tolerance) -> bool {
    tolerance.range(line.p0.x, line.p1.x).includes(p.x)
        && tolerance.range(line.p0.y, line.p1.y).includes(p.y)
}

fn push_unique(result: &mut Intersections, p: Point, tolerance: &Tolerance) {
    if !result.iter().any(|q| q.approx_eq(p, tolerance)) {
        result.push(p);
    }
}

fn extend_unique(
    result: &mut Intersections,
    points: impl IntoIterator<Item = Point>,
    tolerance: &Tolerance,
) {
    for p in points {
        push_unique(result, p, tolerance);
    }
}
